use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::export::{ExportEntity, ExportRecord};
use crate::domain::order::{Principal, Role};
use crate::errors::AppError;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ExportRequest {
    pub entity_type: ExportEntity,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExportResponse {
    pub success: bool,
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<ExportRecord>,
    pub total: i64,
    pub message: String,
}

/// POST /admin/export
///
/// Chunked bulk export of one collection. Collections larger than the
/// configured ceiling are refused up front with the real record count,
/// at the cost of a single count query.
#[utoipa::path(
    post,
    path = "/admin/export",
    request_body = ExportRequest,
    responses(
        (status = 200, description = "Full flattened export", body = ExportResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required"),
        (status = 413, description = "Dataset exceeds the export ceiling"),
    ),
    tag = "admin"
)]
pub async fn export(
    state: web::Data<AppState>,
    principal: Principal,
    body: web::Json<ExportRequest>,
) -> Result<HttpResponse, AppError> {
    // Authorization proper lives upstream; this boundary check only
    // keeps non-admin principals out of the admin scope.
    if principal.role != Role::Admin {
        return Err(AppError::Forbidden);
    }

    let entity = body.into_inner().entity_type;
    let exports = state.exports.clone();
    let outcome = web::block(move || exports.export(entity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ExportResponse {
        success: true,
        data: outcome.records,
        total: outcome.total,
        message: outcome.message,
    }))
}
