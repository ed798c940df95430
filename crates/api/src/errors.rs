//! Consistent error responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use agora_auth::Denial;
use agora_guard::GuardError;

/// Map a pipeline failure to an HTTP response.
///
/// Denials carry their category; infrastructure failures stay opaque to the
/// caller and are traced server-side.
pub fn guard_error_to_response(err: GuardError) -> axum::response::Response {
    match err {
        GuardError::Denied(denial) => denial_to_response(denial),
        GuardError::Store(e) => {
            tracing::warn!(error = %e, "directory failure during guard run");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
        }
        GuardError::Cache(e) => {
            tracing::warn!(error = %e, "cache failure during guard run");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
        }
        GuardError::Inconsistent(detail) => {
            tracing::warn!(detail = %detail, "directory inconsistency during guard run");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
        }
    }
}

pub fn denial_to_response(denial: Denial) -> axum::response::Response {
    let status = match denial {
        Denial::InvalidCredential | Denial::AccountNotFound => StatusCode::UNAUTHORIZED,
        Denial::ResourceNotFound => StatusCode::NOT_FOUND,
        Denial::AccountSuspended
        | Denial::MembershipMissing
        | Denial::MembershipInactive
        | Denial::MembershipTerminated
        | Denial::TenantSuspended
        | Denial::TenantInactive
        | Denial::InsufficientCapability
        | Denial::CrossTenantAccess => StatusCode::FORBIDDEN,
    };
    json_error(status, denial.code(), denial.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
