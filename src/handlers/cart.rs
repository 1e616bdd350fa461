use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::cart::{CartLine, CartSnapshot, NewCartLine};
use crate::domain::order::Principal;
use crate::errors::AppError;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCartItemRequest {
    pub product_id: Uuid,
    pub name: String,
    pub sku: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
    pub quantity: i32,
    pub image_ref: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetQuantityRequest {
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub sku: String,
    pub unit_price: String,
    pub quantity: i32,
    pub image_ref: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartSnapshotResponse {
    pub lines: Vec<CartLineResponse>,
    pub subtotal: String,
    pub count: i64,
}

impl From<CartLine> for CartLineResponse {
    fn from(l: CartLine) -> Self {
        Self {
            id: l.id,
            product_id: l.product_id,
            name: l.name,
            sku: l.sku,
            unit_price: l.unit_price.to_string(),
            quantity: l.quantity,
            image_ref: l.image_ref,
        }
    }
}

impl From<CartSnapshot> for CartSnapshotResponse {
    fn from(s: CartSnapshot) -> Self {
        Self {
            subtotal: s.subtotal.to_string(),
            count: s.count,
            lines: s.lines.into_iter().map(Into::into).collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /cart
#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "Current cart snapshot", body = CartSnapshotResponse),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "cart"
)]
pub async fn get_cart(
    state: web::Data<AppState>,
    principal: Principal,
) -> Result<HttpResponse, AppError> {
    let carts = state.carts.clone();
    let snapshot = web::block(move || carts.snapshot(principal.id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(HttpResponse::Ok().json(CartSnapshotResponse::from(snapshot)))
}

/// POST /cart/items
///
/// Adds a line to the cart. Adding a product that is already staged
/// merges into the existing line instead of creating a second one.
#[utoipa::path(
    post,
    path = "/cart/items",
    request_body = AddCartItemRequest,
    responses(
        (status = 200, description = "Updated cart snapshot", body = CartSnapshotResponse),
        (status = 400, description = "Malformed price"),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "cart"
)]
pub async fn add_item(
    state: web::Data<AppState>,
    principal: Principal,
    body: web::Json<AddCartItemRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let unit_price = BigDecimal::from_str(&body.unit_price)
        .map_err(|e| AppError::InvalidRequest(format!("invalid unit_price '{}': {e}", body.unit_price)))?;
    if unit_price < BigDecimal::from(0) {
        return Err(AppError::InvalidRequest(format!(
            "unit_price must not be negative (got '{}')",
            body.unit_price
        )));
    }

    let carts = state.carts.clone();
    let snapshot = web::block(move || {
        carts.add_line(
            principal.id,
            NewCartLine {
                product_id: body.product_id,
                name: body.name,
                sku: body.sku,
                unit_price,
                quantity: body.quantity,
                image_ref: body.image_ref,
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CartSnapshotResponse::from(snapshot)))
}

/// PUT /cart/items/{line_id}
///
/// Sets a line's quantity, clamped to a minimum of 1. Removing a line
/// is a distinct operation (DELETE).
#[utoipa::path(
    put,
    path = "/cart/items/{line_id}",
    params(("line_id" = Uuid, Path, description = "Cart line id")),
    request_body = SetQuantityRequest,
    responses(
        (status = 200, description = "Updated cart snapshot", body = CartSnapshotResponse),
        (status = 404, description = "No such cart line"),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "cart"
)]
pub async fn set_quantity(
    state: web::Data<AppState>,
    principal: Principal,
    path: web::Path<Uuid>,
    body: web::Json<SetQuantityRequest>,
) -> Result<HttpResponse, AppError> {
    let line_id = path.into_inner();
    let quantity = body.into_inner().quantity;
    let carts = state.carts.clone();
    let snapshot = web::block(move || carts.set_quantity(principal.id, line_id, quantity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(CartSnapshotResponse::from(snapshot)))
}

/// DELETE /cart/items/{line_id}
#[utoipa::path(
    delete,
    path = "/cart/items/{line_id}",
    params(("line_id" = Uuid, Path, description = "Cart line id")),
    responses(
        (status = 200, description = "Updated cart snapshot", body = CartSnapshotResponse),
        (status = 404, description = "No such cart line"),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "cart"
)]
pub async fn remove_item(
    state: web::Data<AppState>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let line_id = path.into_inner();
    let carts = state.carts.clone();
    let snapshot = web::block(move || carts.remove_line(principal.id, line_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(CartSnapshotResponse::from(snapshot)))
}

/// DELETE /cart
#[utoipa::path(
    delete,
    path = "/cart",
    responses(
        (status = 200, description = "Empty cart snapshot", body = CartSnapshotResponse),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "cart"
)]
pub async fn clear_cart(
    state: web::Data<AppState>,
    principal: Principal,
) -> Result<HttpResponse, AppError> {
    let carts = state.carts.clone();
    let snapshot = web::block(move || carts.clear(principal.id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(CartSnapshotResponse::from(snapshot)))
}
