use qa_engine::QaOutcome;
use serde::Serialize;

#[derive(Serialize)]
pub struct QueryResponse {
    pub answers: Vec<String>,
    pub metadata: serde_json::Value,
    pub processing_time: f64,
    pub cache_hit: bool,
    pub request_id: String,
}

impl From<QaOutcome> for QueryResponse {
    fn from(outcome: QaOutcome) -> Self {
        Self {
            answers: outcome.answers,
            metadata: outcome.metadata,
            processing_time: outcome.processing_time,
            // Part of the response contract; no cache sits in front of the
            // pipeline, so every request is a miss.
            cache_hit: false,
            request_id: outcome.request_id,
        }
    }
}
