use crate::answer_parser::split_answers;
use crate::context_builder::ContextBuilder;
use crate::document_fetcher::DocumentFetcher;
use crate::error::EngineError;
use crate::gemini_service::{Attachment, LlmClient};
use crate::models::{
    ChatRecord, ContextPayload, DocumentSource, QaOutcome, QuestionSet, SessionRecord,
};
use crate::prompt::build_answer_prompt;
use crate::session_store::SessionStore;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Exceeding this is logged, not enforced.
const SOFT_LATENCY_TARGET_SECS: f64 = 30.0;

/// The request-orchestration pipeline: acquire, build context, prompt,
/// invoke, split, persist, assemble. One instance is shared by all
/// requests; per-request state lives on the stack of `process`.
pub struct QueryService {
    fetcher: DocumentFetcher,
    context_builder: ContextBuilder,
    llm: Arc<dyn LlmClient>,
    store: Arc<dyn SessionStore>,
}

impl QueryService {
    pub fn new(
        fetcher: DocumentFetcher,
        context_builder: ContextBuilder,
        llm: Arc<dyn LlmClient>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            fetcher,
            context_builder,
            llm,
            store,
        }
    }

    /// Answers every question in one batched model call and returns an
    /// answer list aligned with the question order.
    pub async fn process(
        &self,
        source: DocumentSource,
        questions: QuestionSet,
    ) -> Result<QaOutcome, EngineError> {
        let started = Instant::now();

        let document = match source {
            DocumentSource::Url(url) => self.fetcher.fetch_url(&url).await?,
            DocumentSource::Upload {
                filename,
                content_type,
                bytes,
            } => DocumentFetcher::from_upload(filename.as_deref(), content_type.as_deref(), bytes)?,
        };

        let context = self.context_builder.build(&document, self.llm.as_ref()).await?;
        let chunk_count = match &context {
            ContextPayload::Chunks(chunks) => Some(chunks.len()),
            _ => None,
        };
        let (context_text, attachment) = match context {
            ContextPayload::Text(text) => (Some(text), None),
            ContextPayload::Chunks(chunks) => (Some(chunks.join("\n\n")), None),
            ContextPayload::Attachment { bytes, mime } => {
                (None, Some(Attachment { mime, bytes }))
            }
        };

        let prompt = build_answer_prompt(&questions, context_text.as_deref());
        let raw_response = self.llm.generate(&prompt, attachment.as_ref()).await?;
        let answers = split_answers(&raw_response, questions.len());

        let processing_time = started.elapsed().as_secs_f64();
        if processing_time > SOFT_LATENCY_TARGET_SECS {
            log::warn!(
                "processing {} took {processing_time:.1}s, above the {SOFT_LATENCY_TARGET_SECS:.0}s target",
                document.name
            );
        }

        let session_id = Uuid::new_v4().to_string();
        let request_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let record = SessionRecord {
            session_id: session_id.clone(),
            document_name: document.name.clone(),
            processing_time,
            created_at: now,
        };
        let chats: Vec<ChatRecord> = questions
            .iter()
            .zip(answers.iter())
            .map(|(question, answer)| ChatRecord {
                session_id: session_id.clone(),
                question: question.to_string(),
                answer: answer.clone(),
                timestamp: now,
            })
            .collect();
        // The answers are already computed; a failed write degrades history,
        // not the response.
        if let Err(err) = self.store.record_session(record, chats).await {
            log::error!("failed to persist session {session_id}: {err}");
        }

        let mut metadata = json!({
            "document_name": document.name.clone(),
            "model_used": self.llm.model_id(),
            "source_type": document.source.as_str(),
            "session_id": session_id.clone(),
        });
        if let Some(count) = chunk_count {
            metadata["chunk_count"] = json!(count);
        }

        log::info!(
            "request {request_id}: {} answer(s) for {} in {processing_time:.2}s",
            answers.len(),
            document.name
        );

        Ok(QaOutcome {
            answers,
            metadata,
            processing_time,
            request_id,
            session_id,
        })
    }
}
