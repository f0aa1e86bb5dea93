use axum::{http::StatusCode, Json};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde::Serialize;

#[derive(Serialize)]
pub struct AuthError {
    pub error: String,
    pub message: String,
}

type Rejection = (StatusCode, Json<AuthError>);

fn reject(status: StatusCode, error: &str, message: &str) -> Rejection {
    (
        status,
        Json(AuthError {
            error: error.to_string(),
            message: message.to_string(),
        }),
    )
}

/// Compare the presented bearer token against the configured secret.
/// A missing secret is a server-side configuration problem, reported as
/// 500 at request time; anything wrong with the presented token is 403.
pub fn verify_bearer(
    auth: Option<&TypedHeader<Authorization<Bearer>>>,
    expected: Option<&str>,
) -> Result<(), Rejection> {
    let expected = expected.ok_or_else(|| {
        reject(
            StatusCode::INTERNAL_SERVER_ERROR,
            "configuration_error",
            "BEARER_TOKEN is not configured",
        )
    })?;

    let presented = auth.map(|header| header.token()).ok_or_else(|| {
        reject(
            StatusCode::FORBIDDEN,
            "invalid_token",
            "Authorization Bearer token is required",
        )
    })?;

    if presented != expected {
        return Err(reject(
            StatusCode::FORBIDDEN,
            "invalid_token",
            "Invalid token",
        ));
    }
    Ok(())
}
