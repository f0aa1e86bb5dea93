use crate::error::EngineError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_QUESTIONS: usize = 50;
pub const MAX_QUESTION_CHARS: usize = 1000;

/// Ordered, validated list of questions. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct QuestionSet(Vec<String>);

impl QuestionSet {
    pub fn new(questions: Vec<String>) -> Result<Self, EngineError> {
        if questions.is_empty() {
            return Err(EngineError::Validation(
                "at least one question is required".to_string(),
            ));
        }
        if questions.len() > MAX_QUESTIONS {
            return Err(EngineError::Validation(format!(
                "too many questions: {} (maximum {MAX_QUESTIONS})",
                questions.len()
            )));
        }
        for (idx, question) in questions.iter().enumerate() {
            if question.trim().is_empty() {
                return Err(EngineError::Validation(format!(
                    "question {} is empty",
                    idx + 1
                )));
            }
            let chars = question.chars().count();
            if chars > MAX_QUESTION_CHARS {
                return Err(EngineError::Validation(format!(
                    "question {} is {chars} characters long (maximum {MAX_QUESTION_CHARS})",
                    idx + 1
                )));
            }
        }
        Ok(Self(questions))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Url,
    Upload,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Url => "url",
            SourceKind::Upload => "upload",
        }
    }
}

/// Raw document bytes plus resolved metadata. Request-scoped.
#[derive(Debug, Clone)]
pub struct DocumentContent {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub name: String,
    pub source: SourceKind,
}

/// Where the document comes from for one request.
#[derive(Debug)]
pub enum DocumentSource {
    Url(String),
    Upload {
        filename: Option<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
}

/// The one context representation produced per request.
#[derive(Debug, Clone)]
pub enum ContextPayload {
    Text(String),
    Attachment { bytes: Vec<u8>, mime: String },
    Chunks(Vec<String>),
}

/// Pipeline output handed to the API layer for response assembly.
#[derive(Debug)]
pub struct QaOutcome {
    pub answers: Vec<String>,
    pub metadata: serde_json::Value,
    pub processing_time: f64,
    pub request_id: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub document_name: String,
    pub processing_time: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRecord {
    pub session_id: String,
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    pub generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<GeminiInlineData>,
}

impl GeminiPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline_data(mime: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            text: None,
            inline_data: Some(GeminiInlineData {
                mime_type: mime.into(),
                data: STANDARD.encode(bytes),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiInlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiGenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiResponse {
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiCandidate {
    pub content: GeminiContent,
}
