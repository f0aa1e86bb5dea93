use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use qa_engine::{DocumentSource, EngineError, QuestionSet};
use serde_json::{json, Value};

use crate::auth::{self, AuthError};
use crate::hackrx_request::HackRxRequest;
use crate::query_response::QueryResponse;
use crate::AppState;

type ApiError = (StatusCode, Json<Value>);

fn error_body(status: StatusCode, kind: &str, message: &str) -> ApiError {
    (status, Json(json!({ "error": kind, "message": message })))
}

/// Engine failures surface only their top-level reason; the full detail is
/// logged server-side.
fn engine_error_response(err: EngineError) -> ApiError {
    log::error!("request failed: {err}");
    let status = match &err {
        EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
        EngineError::Download(_) => StatusCode::BAD_GATEWAY,
        EngineError::Configuration(_)
        | EngineError::Extraction(_)
        | EngineError::ModelInvocation(_)
        | EngineError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_body(status, err.kind(), &err.to_string())
}

fn auth_error_response((status, Json(body)): (StatusCode, Json<AuthError>)) -> ApiError {
    error_body(status, &body.error, &body.message)
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let store_reachable = state.store.ping().await;
    let healthy = !state.config.api_keys.is_empty() && store_reachable;
    Json(json!({
        "status": if healthy { "healthy" } else { "unhealthy" },
        "model": state.config.model,
        "strategy": state.config.strategy.as_str(),
        "store_reachable": store_reachable,
    }))
}

pub async fn run(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Json(payload): Json<HackRxRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    auth::verify_bearer(auth.as_ref(), state.config.bearer_token.as_deref())
        .map_err(auth_error_response)?;

    let questions = QuestionSet::new(payload.questions).map_err(engine_error_response)?;
    let outcome = state
        .service
        .process(DocumentSource::Url(payload.documents), questions)
        .await
        .map_err(engine_error_response)?;
    Ok(Json(QueryResponse::from(outcome)))
}

pub async fn upload(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    mut multipart: Multipart,
) -> Result<Json<QueryResponse>, ApiError> {
    auth::verify_bearer(auth.as_ref(), state.config.bearer_token.as_deref())
        .map_err(auth_error_response)?;

    let mut file: Option<(Option<String>, Option<String>, Vec<u8>)> = None;
    let mut questions_raw: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| error_body(StatusCode::BAD_REQUEST, "invalid_upload", &err.to_string()))?
    {
        let name = field.name().map(|name| name.to_string());
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().map(|name| name.to_string());
                let content_type = field.content_type().map(|ct| ct.to_string());
                let bytes = field.bytes().await.map_err(|err| {
                    error_body(StatusCode::BAD_REQUEST, "invalid_upload", &err.to_string())
                })?;
                file = Some((filename, content_type, bytes.to_vec()));
            }
            Some("questions") => {
                let text = field.text().await.map_err(|err| {
                    error_body(StatusCode::BAD_REQUEST, "invalid_upload", &err.to_string())
                })?;
                questions_raw = Some(text);
            }
            _ => {}
        }
    }

    let (filename, content_type, bytes) = file.ok_or_else(|| {
        error_body(
            StatusCode::BAD_REQUEST,
            "invalid_upload",
            "multipart field 'file' is required",
        )
    })?;
    let questions_raw = questions_raw.ok_or_else(|| {
        error_body(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "multipart field 'questions' is required",
        )
    })?;
    let questions: Vec<String> = serde_json::from_str(&questions_raw).map_err(|_| {
        error_body(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "'questions' must be a JSON array of strings",
        )
    })?;
    let questions = QuestionSet::new(questions).map_err(engine_error_response)?;

    let outcome = state
        .service
        .process(
            DocumentSource::Upload {
                filename,
                content_type,
                bytes,
            },
            questions,
        )
        .await
        .map_err(engine_error_response)?;
    Ok(Json(QueryResponse::from(outcome)))
}

pub async fn session_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let history = state
        .store
        .history(&session_id)
        .await
        .map_err(engine_error_response)?;

    match history {
        Some(records) => {
            let entries: Vec<Value> = records
                .iter()
                .map(|record| {
                    json!({
                        "question": record.question,
                        "answer": record.answer,
                        "timestamp": record.timestamp.to_rfc3339(),
                    })
                })
                .collect();
            Ok(Json(json!({ "session_id": session_id, "history": entries })))
        }
        None => Err(error_body(
            StatusCode::NOT_FOUND,
            "not_found",
            &format!("no history for session {session_id}"),
        )),
    }
}
