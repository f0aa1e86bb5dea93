use crate::error::EngineError;
use crate::key_rotator::KeyRotator;
use crate::models::{
    GeminiContent, GeminiGenerationConfig, GeminiPart, GeminiRequest, GeminiResponse,
};
use crate::retry::{retry, RetryPolicy};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use uuid::Uuid;

/// Raw document handed to the model alongside the prompt.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Boundary to the external model. The pipeline only ever sees free text
/// back; everything provider-specific stays behind this trait.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, EngineError>;

    fn model_id(&self) -> &str;
}

pub struct GeminiService {
    client: Client,
    rotator: Arc<KeyRotator>,
    model: String,
}

impl GeminiService {
    pub fn new(rotator: Arc<KeyRotator>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            rotator,
            model: model.into(),
        }
    }

    /// One call to the generateContent endpoint. Each attempt draws a fresh
    /// credential from the rotator and a fresh session id; no affinity is
    /// kept between retries.
    async fn send_once(
        &self,
        prompt: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, String> {
        let mut parts = vec![GeminiPart::text(prompt)];
        if let Some(attachment) = attachment {
            parts.push(GeminiPart::inline_data(&attachment.mime, &attachment.bytes));
        }
        let request = GeminiRequest {
            contents: vec![GeminiContent { parts }],
            generation_config: Some(GeminiGenerationConfig {
                temperature: 0.3,
                max_output_tokens: 8192,
            }),
        };

        let session_id = Uuid::new_v4();
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model,
            self.rotator.next_key()
        );
        log::debug!(
            "model call {session_id}: {} prompt chars, attachment: {}",
            prompt.len(),
            attachment.is_some()
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|err| err.to_string())?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Gemini API error {status}: {body}"));
        }

        let gemini_response: GeminiResponse =
            response.json().await.map_err(|err| err.to_string())?;
        let answer = gemini_response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .and_then(|part| part.text.clone())
            .unwrap_or_else(|| "No response generated".to_string());

        Ok(answer)
    }
}

#[async_trait]
impl LlmClient for GeminiService {
    async fn generate(
        &self,
        prompt: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, EngineError> {
        retry(RetryPolicy::model(), || self.send_once(prompt, attachment))
            .await
            .map_err(EngineError::ModelInvocation)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
