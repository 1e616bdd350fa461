use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::cart::{Cart, NewCartLine};
use crate::domain::order::{BillingInfo, OrderStatus, OrderView};
use crate::errors::AppError;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
    /// Decimal unit price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItemRequest>,
    /// Client-side total; informational only. The server recomputes the
    /// authoritative totals from the items.
    #[serde(default)]
    pub total: Option<String>,
    pub billing_info: BillingInfo,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: Option<String>,
    pub sku: Option<String>,
    pub quantity: i32,
    pub price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub status: OrderStatus,
    pub subtotal: String,
    pub tax: String,
    pub shipping: String,
    pub discount: String,
    pub total: String,
    pub billing_address: BillingInfo,
    pub shipping_address: BillingInfo,
    pub notes: Option<String>,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        Self {
            id: o.id,
            order_number: o.order_number,
            customer_id: o.customer_id,
            status: o.status,
            subtotal: o.subtotal.to_string(),
            tax: o.tax.to_string(),
            shipping: o.shipping.to_string(),
            discount: o.discount.to_string(),
            total: o.total.to_string(),
            billing_address: o.billing_address,
            shipping_address: o.shipping_address,
            notes: o.notes,
            created_at: o.created_at.to_rfc3339(),
            items: o
                .items
                .into_iter()
                .map(|i| OrderItemResponse {
                    id: i.id,
                    product_id: i.product_id,
                    product_name: i.product_name,
                    sku: i.sku,
                    quantity: i.quantity,
                    price: i.price.to_string(),
                })
                .collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /checkout
///
/// Stages the request items through the cart aggregator (so duplicate
/// products merge and the subtotal is recomputed server-side) and
/// writes the order with all of its items in a single transaction. On
/// success the customer's stored cart is cleared; on failure it is left
/// untouched so the checkout can be retried.
#[utoipa::path(
    post,
    path = "/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Empty cart or invalid billing info"),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Order creation failed"),
    ),
    tag = "orders"
)]
pub async fn checkout(
    state: web::Data<AppState>,
    principal: crate::domain::order::Principal,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let mut cart = Cart::new();
    for item in body.items {
        if item.quantity < 1 {
            return Err(AppError::InvalidRequest(format!(
                "item quantity must be at least 1 (product {})",
                item.product_id
            )));
        }
        let price = BigDecimal::from_str(&item.price)
            .map_err(|e| AppError::InvalidRequest(format!("invalid price '{}': {e}", item.price)))?;
        if price < BigDecimal::from(0) {
            return Err(AppError::InvalidRequest(format!(
                "item price must not be negative (product {})",
                item.product_id
            )));
        }
        cart.add_line(NewCartLine {
            product_id: item.product_id,
            name: item.name.unwrap_or_default(),
            sku: item.sku.unwrap_or_default(),
            unit_price: price,
            quantity: item.quantity,
            image_ref: None,
        });
    }
    let snapshot = cart.snapshot();

    let checkout = state.checkout.clone();
    let billing = body.billing_info;
    let notes = body.notes;
    let order = web::block(move || {
        checkout.create_order(Some(&principal), &snapshot, &billing, notes)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    // Clearing the staging area is the caller's job, not the writer's;
    // a failure here must not undo a committed order.
    let carts = state.carts.clone();
    let customer_id = principal.id;
    if let Err(e) = web::block(move || carts.clear(customer_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    {
        log::warn!("order {} created but cart clear failed: {e}", order.order_number);
    }

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    _principal: crate::domain::order::Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let repo = state.orders.clone();
    let order = web::block(move || repo.find_by_id(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound),
    }
}
