pub mod answer_parser;
pub mod config;
pub mod context_builder;
pub mod document_fetcher;
pub mod error;
pub mod gemini_service;
pub mod key_rotator;
pub mod models;
pub mod prompt;
pub mod query_service;
pub mod retry;
pub mod session_store;

pub use answer_parser::{split_answers, MALFORMED_ANSWER};
pub use config::{ContextStrategy, EngineConfig};
pub use context_builder::ContextBuilder;
pub use document_fetcher::DocumentFetcher;
pub use error::EngineError;
pub use gemini_service::{Attachment, GeminiService, LlmClient};
pub use key_rotator::KeyRotator;
pub use models::{
    ChatRecord, ContextPayload, DocumentContent, DocumentSource, QaOutcome, QuestionSet,
    SessionRecord, SourceKind,
};
pub use prompt::{ANSWER_SEPARATOR, CHUNK_SEPARATOR, NOT_FOUND_PHRASE};
pub use query_service::QueryService;
pub use retry::{retry, RetryPolicy};
pub use session_store::{InMemoryStore, SessionStore};
