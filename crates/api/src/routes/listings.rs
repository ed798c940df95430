//! Listing routes.
//!
//! Handlers here run the guard and hand the authorized facts to the listing
//! services; the CRUD bodies themselves live outside this subsystem.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use agora_auth::Capability;
use agora_core::ResourceId;
use agora_guard::{GuardPipeline, OperationSpec, Verdict};

use super::run_guard;

const BROWSE: OperationSpec = OperationSpec::public("listings.get");
const LIST_ALL: OperationSpec =
    OperationSpec::tenant_scoped("listings.list_all").with_capability(Capability::ViewAllPosts);
const UPDATE: OperationSpec = OperationSpec::tenant_scoped("listings.update");
const REMOVE: OperationSpec =
    OperationSpec::tenant_scoped("listings.delete").with_capability(Capability::DeletePosts);

pub fn router() -> Router {
    Router::new()
        .route("/listings", get(list_all))
        .route("/listings/:id", get(browse).put(update).delete(remove))
}

/// GET /listings/:id — public browse, the guard terminates permissively.
async fn browse(
    Extension(guard): Extension<Arc<GuardPipeline>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    match run_guard(&guard, &headers, &BROWSE, None).await {
        Ok(verdict) => granted(&BROWSE, Some(id), verdict),
        Err(response) => response,
    }
}

/// GET /listings — tenant-wide view, members need `view_all_posts`.
async fn list_all(
    Extension(guard): Extension<Arc<GuardPipeline>>,
    headers: HeaderMap,
) -> Response {
    match run_guard(&guard, &headers, &LIST_ALL, None).await {
        Ok(verdict) => granted(&LIST_ALL, None, verdict),
        Err(response) => response,
    }
}

/// PUT /listings/:id — ownership/capability arithmetic applies.
async fn update(
    Extension(guard): Extension<Arc<GuardPipeline>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    match run_guard(&guard, &headers, &UPDATE, Some(ResourceId::new(id))).await {
        Ok(verdict) => granted(&UPDATE, Some(id), verdict),
        Err(response) => response,
    }
}

/// DELETE /listings/:id — additionally gated on `delete_posts`.
async fn remove(
    Extension(guard): Extension<Arc<GuardPipeline>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    match run_guard(&guard, &headers, &REMOVE, Some(ResourceId::new(id))).await {
        Ok(verdict) => granted(&REMOVE, Some(id), verdict),
        Err(response) => response,
    }
}

fn granted(operation: &OperationSpec, resource_id: Option<i64>, verdict: Verdict) -> Response {
    let body = match verdict {
        Verdict::Granted(authorized) => json!({
            "operation": operation.name,
            "resource_id": resource_id,
            "subject_id": authorized.identity.subject_id,
            "tenant_id": authorized.tenant.map(|t| t.tenant_id),
        }),
        Verdict::Public => json!({
            "operation": operation.name,
            "resource_id": resource_id,
        }),
    };
    (StatusCode::OK, Json(body)).into_response()
}
