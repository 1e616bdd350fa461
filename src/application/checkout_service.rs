use chrono::Utc;

use crate::domain::cart::CartSnapshot;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    BillingInfo, OrderDraft, OrderItemDraft, OrderStatus, OrderView, PricingAdjustments, Principal,
};
use crate::domain::ports::OrderRepository;

/// Turns a cart snapshot into a persisted order. Validation happens
/// before any write; the repository commits the header and items as one
/// atomic unit; clearing the cart is left to the caller so a failed
/// checkout leaves the staging area intact for retry.
#[derive(Debug, Clone)]
pub struct CheckoutService<R> {
    repo: R,
    pricing: PricingAdjustments,
}

impl<R: OrderRepository> CheckoutService<R> {
    pub fn new(repo: R, pricing: PricingAdjustments) -> Self {
        Self { repo, pricing }
    }

    pub fn create_order(
        &self,
        principal: Option<&Principal>,
        snapshot: &CartSnapshot,
        billing: &BillingInfo,
        notes: Option<String>,
    ) -> Result<OrderView, DomainError> {
        let principal = principal.ok_or(DomainError::Unauthenticated)?;

        if snapshot.lines.is_empty() {
            return Err(DomainError::InvalidRequest("cart is empty".to_string()));
        }
        validate_billing(billing)?;

        let subtotal = snapshot.subtotal.clone();
        let total = subtotal.clone() + self.pricing.tax.clone() + self.pricing.shipping.clone()
            - self.pricing.discount.clone();

        let draft = OrderDraft {
            order_number: generate_order_number(),
            customer_id: principal.id,
            status: OrderStatus::Pending,
            subtotal,
            tax: self.pricing.tax.clone(),
            shipping: self.pricing.shipping.clone(),
            discount: self.pricing.discount.clone(),
            total,
            billing_address: billing.clone(),
            // The checkout request carries billing info only; shipping
            // defaults to the same address.
            shipping_address: billing.clone(),
            notes,
            items: snapshot
                .lines
                .iter()
                .map(|l| OrderItemDraft {
                    product_id: l.product_id,
                    quantity: l.quantity,
                    price: l.unit_price.clone(),
                })
                .collect(),
        };

        self.repo.create(draft).map_err(|e| match e {
            DomainError::Internal(msg) => DomainError::OrderCreationFailed(msg),
            other => other,
        })
    }
}

/// Time-based prefix plus a random suffix. Collisions are negligible
/// but not impossible; the unique constraint on `order_number` in the
/// storage layer is the authoritative guard.
fn generate_order_number() -> String {
    format!(
        "ORD-{}-{:08X}",
        Utc::now().format("%y%m%d%H%M%S"),
        rand::random::<u32>()
    )
}

fn validate_billing(billing: &BillingInfo) -> Result<(), DomainError> {
    let required = [
        ("first_name", &billing.first_name),
        ("last_name", &billing.last_name),
        ("email", &billing.email),
        ("phone", &billing.phone),
        ("address", &billing.address),
        ("city", &billing.city),
        ("state", &billing.state),
        ("zip_code", &billing.zip_code),
        ("country", &billing.country),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(DomainError::InvalidRequest(format!(
                "billing field `{field}` is required"
            )));
        }
    }
    if !billing.email.contains('@') {
        return Err(DomainError::InvalidRequest(
            "billing email is not a valid address".to_string(),
        ));
    }
    Ok(())
}
