use serde::Deserialize;

/// Body of `POST /hackrx/run`: one document URL plus the question list.
/// Count and length limits are enforced by `QuestionSet`, not here.
#[derive(Deserialize)]
pub struct HackRxRequest {
    pub documents: String,
    pub questions: Vec<String>,
}
