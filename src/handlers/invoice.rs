use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::domain::order::Principal;
use crate::errors::AppError;
use crate::AppState;

/// GET /orders/{id}/invoice
///
/// Renders the invoice for a persisted order and returns it as a
/// downloadable document named by order number. A renderer failure or
/// timeout degrades to the minimal fallback document; a missing order
/// is the only error a caller can see.
#[utoipa::path(
    get,
    path = "/orders/{id}/invoice",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Invoice document bytes", content_type = "text/plain"),
        (status = 404, description = "Order not found"),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "orders"
)]
pub async fn download_invoice(
    state: web::Data<AppState>,
    _principal: Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let repo = state.orders.clone();
    let order = web::block(move || repo.find_by_id(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??
        .ok_or(AppError::NotFound)?;

    let document = state.invoices.generate(&order).await;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", document.filename),
        ))
        .body(document.bytes))
}
