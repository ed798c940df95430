//! HTTP routes + handlers (one file per domain area).

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::response::Response;

use agora_core::ResourceId;
use agora_guard::{GuardPipeline, OperationSpec, RequestContext, Verdict};

use crate::errors;

pub mod listings;
pub mod system;

/// Run the guard for one operation, mapping failures straight to responses.
pub(crate) async fn run_guard(
    guard: &Arc<GuardPipeline>,
    headers: &HeaderMap,
    operation: &OperationSpec,
    resource: Option<ResourceId>,
) -> Result<Verdict, Response> {
    let mut request = RequestContext::new();
    guard
        .authorize(headers, operation, resource, &mut request)
        .await
        .map_err(errors::guard_error_to_response)
}
