use std::sync::Arc;
use std::time::Duration;

use crate::domain::invoice::{fallback_document, DocumentRenderer, InvoiceDocument};
use crate::domain::order::OrderView;

/// Dispatcher over the two rendering strategies: the primary renderer
/// runs on a blocking task under a bounded wait, and any failure,
/// panic, or timeout degrades to the minimal fallback document. Callers
/// never see a render error for an order that exists.
#[derive(Clone)]
pub struct InvoiceService {
    primary: Arc<dyn DocumentRenderer>,
    render_timeout: Duration,
}

impl InvoiceService {
    pub fn new(primary: Arc<dyn DocumentRenderer>, render_timeout: Duration) -> Self {
        Self {
            primary,
            render_timeout,
        }
    }

    pub async fn generate(&self, order: &OrderView) -> InvoiceDocument {
        let filename = format!("invoice-{}.txt", order.order_number);
        let primary = self.primary.clone();
        let for_render = order.clone();

        let rendered = tokio::time::timeout(
            self.render_timeout,
            tokio::task::spawn_blocking(move || primary.render(&for_render)),
        )
        .await;

        let bytes = match rendered {
            Ok(Ok(Ok(bytes))) => {
                return InvoiceDocument {
                    bytes,
                    filename,
                    degraded: false,
                }
            }
            Ok(Ok(Err(e))) => {
                log::warn!("invoice renderer failed for {}: {e}", order.order_number);
                fallback_document(order)
            }
            Ok(Err(join_err)) => {
                log::warn!(
                    "invoice renderer panicked for {}: {join_err}",
                    order.order_number
                );
                fallback_document(order)
            }
            Err(_) => {
                log::warn!(
                    "invoice renderer timed out after {:?} for {}",
                    self.render_timeout,
                    order.order_number
                );
                fallback_document(order)
            }
        };

        InvoiceDocument {
            bytes,
            filename,
            degraded: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::invoice::{RenderError, TextInvoiceRenderer};
    use crate::domain::order::{BillingInfo, OrderItemView, OrderStatus};

    struct FailingRenderer;
    impl DocumentRenderer for FailingRenderer {
        fn render(&self, _order: &OrderView) -> Result<Vec<u8>, RenderError> {
            Err(RenderError::Engine("engine unavailable".to_string()))
        }
    }

    struct HangingRenderer;
    impl DocumentRenderer for HangingRenderer {
        fn render(&self, _order: &OrderView) -> Result<Vec<u8>, RenderError> {
            std::thread::sleep(Duration::from_secs(5));
            Ok(b"too late".to_vec())
        }
    }

    fn order() -> OrderView {
        let billing = BillingInfo {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "555-0101".to_string(),
            address: "12 High St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62704".to_string(),
            country: "US".to_string(),
        };
        OrderView {
            id: Uuid::new_v4(),
            order_number: "ORD-260829120000-0000BEEF".to_string(),
            customer_id: Uuid::new_v4(),
            customer_email: None,
            customer_name: None,
            status: OrderStatus::Pending,
            subtotal: BigDecimal::from_str("19.98").unwrap(),
            tax: BigDecimal::from(0),
            shipping: BigDecimal::from(0),
            discount: BigDecimal::from(0),
            total: BigDecimal::from_str("19.98").unwrap(),
            billing_address: billing.clone(),
            shipping_address: billing,
            notes: None,
            created_at: Utc::now(),
            items: vec![OrderItemView {
                id: Uuid::new_v4(),
                product_id: Uuid::new_v4(),
                product_name: Some("Widget".to_string()),
                sku: Some("WID-1".to_string()),
                quantity: 2,
                price: BigDecimal::from_str("9.99").unwrap(),
            }],
        }
    }

    #[tokio::test]
    async fn healthy_primary_produces_a_full_document() {
        let service = InvoiceService::new(
            Arc::new(TextInvoiceRenderer::default()),
            Duration::from_secs(5),
        );

        let doc = service.generate(&order()).await;
        assert!(!doc.degraded);
        assert!(!doc.bytes.is_empty());
        assert_eq!(doc.filename, "invoice-ORD-260829120000-0000BEEF.txt");
    }

    #[tokio::test]
    async fn failing_primary_degrades_to_the_fallback() {
        let service = InvoiceService::new(Arc::new(FailingRenderer), Duration::from_secs(5));
        let order = order();

        let doc = service.generate(&order).await;
        assert!(doc.degraded);
        assert!(!doc.bytes.is_empty());

        let primary = TextInvoiceRenderer::default().render(&order).unwrap();
        assert!(doc.bytes.len() < primary.len(), "fallback is the smaller document");
    }

    #[tokio::test]
    async fn slow_primary_times_out_into_the_fallback() {
        let service = InvoiceService::new(Arc::new(HangingRenderer), Duration::from_millis(50));

        let doc = service.generate(&order()).await;
        assert!(doc.degraded);
        let text = String::from_utf8(doc.bytes).unwrap();
        assert!(text.contains("ORD-260829120000-0000BEEF"));
    }
}
