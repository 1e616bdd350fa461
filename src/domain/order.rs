use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle states of a persisted order. Creation always starts at
/// `Pending`; later transitions are driven by order-management flows
/// outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Refunded => "REFUNDED",
        }
    }

    pub fn parse(s: &str) -> Option<OrderStatus> {
        match s {
            "PENDING" => Some(OrderStatus::Pending),
            "CONFIRMED" => Some(OrderStatus::Confirmed),
            "PROCESSING" => Some(OrderStatus::Processing),
            "SHIPPED" => Some(OrderStatus::Shipped),
            "DELIVERED" => Some(OrderStatus::Delivered),
            "CANCELLED" => Some(OrderStatus::Cancelled),
            "REFUNDED" => Some(OrderStatus::Refunded),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    pub fn parse(s: &str) -> Option<Role> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "CUSTOMER" => Some(Role::Customer),
            _ => None,
        }
    }
}

/// An already-verified caller identity. Credential validation happens
/// upstream; this service only consumes the result.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BillingInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Order-time pricing adjustments. The current policy applies none of
/// them, but they are explicit inputs rather than baked-in zeros so a
/// pricing service can be wired in later without touching the writer.
#[derive(Debug, Clone)]
pub struct PricingAdjustments {
    pub tax: BigDecimal,
    pub shipping: BigDecimal,
    pub discount: BigDecimal,
}

impl Default for PricingAdjustments {
    fn default() -> Self {
        Self {
            tax: BigDecimal::from(0),
            shipping: BigDecimal::from(0),
            discount: BigDecimal::from(0),
        }
    }
}

/// One line of an order as it should be persisted. `price` is the unit
/// price frozen at order time.
#[derive(Debug, Clone)]
pub struct OrderItemDraft {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: BigDecimal,
}

/// A fully-computed order ready to be written in one transaction.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub order_number: String,
    pub customer_id: Uuid,
    pub status: OrderStatus,
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub shipping: BigDecimal,
    pub discount: BigDecimal,
    pub total: BigDecimal,
    pub billing_address: BillingInfo,
    pub shipping_address: BillingInfo,
    pub notes: Option<String>,
    pub items: Vec<OrderItemDraft>,
}

#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: Option<String>,
    pub sku: Option<String>,
    pub quantity: i32,
    pub price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub status: OrderStatus,
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub shipping: BigDecimal,
    pub discount: BigDecimal,
    pub total: BigDecimal,
    pub billing_address: BillingInfo,
    pub shipping_address: BillingInfo,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
}
