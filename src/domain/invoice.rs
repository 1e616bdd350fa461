use std::fmt::Write;

use bigdecimal::BigDecimal;
use thiserror::Error;

use super::order::OrderView;

/// Internal to invoice generation; never surfaces to callers. The
/// dispatcher converts every failure into the fallback document.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render engine error: {0}")]
    Engine(String),
}

impl From<std::fmt::Error> for RenderError {
    fn from(e: std::fmt::Error) -> Self {
        RenderError::Engine(e.to_string())
    }
}

/// A rendered invoice. `degraded` marks the minimal fallback document
/// produced when the primary renderer failed.
#[derive(Debug, Clone)]
pub struct InvoiceDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub degraded: bool,
}

/// Strategy seam for invoice rendering. The primary implementation may
/// be swapped for an out-of-process engine; the dispatcher in the
/// application layer imposes the bounded wait.
pub trait DocumentRenderer: Send + Sync + 'static {
    fn render(&self, order: &OrderView) -> Result<Vec<u8>, RenderError>;
}

const PAGE_WIDTH: usize = 72;

/// Primary renderer: a paginated plain-text document with a header,
/// parties block, line-item table and totals block. Every figure comes
/// from the order's persisted fields; current product prices are never
/// consulted.
#[derive(Debug, Clone)]
pub struct TextInvoiceRenderer {
    pub items_per_page: usize,
}

impl Default for TextInvoiceRenderer {
    fn default() -> Self {
        Self { items_per_page: 40 }
    }
}

impl DocumentRenderer for TextInvoiceRenderer {
    fn render(&self, order: &OrderView) -> Result<Vec<u8>, RenderError> {
        let items_per_page = self.items_per_page.max(1);
        let pages: Vec<&[super::order::OrderItemView]> = if order.items.is_empty() {
            vec![&order.items[..]]
        } else {
            order.items.chunks(items_per_page).collect()
        };
        let page_count = pages.len();
        let mut out = String::new();

        for (page, items) in pages.into_iter().enumerate() {
            write_page_header(&mut out, order, page + 1, page_count)?;
            if page == 0 {
                write_parties(&mut out, order)?;
            }
            write_item_table(&mut out, items, page * items_per_page)?;
            if page + 1 == page_count {
                write_totals(&mut out, order)?;
            }
            writeln!(out, "{:>width$}", format!("Page {} of {}", page + 1, page_count), width = PAGE_WIDTH)?;
            if page + 1 < page_count {
                writeln!(out, "\u{c}")?;
            }
        }

        Ok(out.into_bytes())
    }
}

fn rule(out: &mut String) -> Result<(), RenderError> {
    writeln!(out, "{}", "-".repeat(PAGE_WIDTH))?;
    Ok(())
}

fn write_page_header(
    out: &mut String,
    order: &OrderView,
    page: usize,
    pages: usize,
) -> Result<(), RenderError> {
    writeln!(out, "{}", "=".repeat(PAGE_WIDTH))?;
    writeln!(out, "INVOICE {}", order.order_number)?;
    writeln!(
        out,
        "Date: {}    Status: {}    ({}/{})",
        order.created_at.format("%Y-%m-%d"),
        order.status.as_str(),
        page,
        pages
    )?;
    rule(out)
}

fn write_parties(out: &mut String, order: &OrderView) -> Result<(), RenderError> {
    let b = &order.billing_address;
    writeln!(out, "BILL TO")?;
    writeln!(out, "{} {}", b.first_name, b.last_name)?;
    writeln!(out, "{}", b.address)?;
    writeln!(out, "{}, {} {}", b.city, b.state, b.zip_code)?;
    writeln!(out, "{}", b.country)?;
    writeln!(out, "{} / {}", b.email, b.phone)?;
    rule(out)
}

fn write_item_table(
    out: &mut String,
    items: &[super::order::OrderItemView],
    index_offset: usize,
) -> Result<(), RenderError> {
    writeln!(
        out,
        "{:>4}  {:<28} {:<12} {:>5} {:>10} {:>8}",
        "#", "DESCRIPTION", "SKU", "QTY", "UNIT PRICE", "TOTAL"
    )?;
    for (i, item) in items.iter().enumerate() {
        let description = item
            .product_name
            .clone()
            .unwrap_or_else(|| format!("product {}", item.product_id));
        let line_total = item.price.clone() * BigDecimal::from(item.quantity);
        writeln!(
            out,
            "{:>4}  {:<28} {:<12} {:>5} {:>10} {:>8}",
            index_offset + i + 1,
            truncate(&description, 28),
            truncate(item.sku.as_deref().unwrap_or("-"), 12),
            item.quantity,
            money(&item.price),
            money(&line_total)
        )?;
    }
    rule(out)
}

fn write_totals(out: &mut String, order: &OrderView) -> Result<(), RenderError> {
    writeln!(out, "{:>width$}", format!("Subtotal: {}", money(&order.subtotal)), width = PAGE_WIDTH)?;
    writeln!(out, "{:>width$}", format!("Tax: {}", money(&order.tax)), width = PAGE_WIDTH)?;
    writeln!(out, "{:>width$}", format!("Shipping: {}", money(&order.shipping)), width = PAGE_WIDTH)?;
    if order.discount > BigDecimal::from(0) {
        writeln!(out, "{:>width$}", format!("Discount: -{}", money(&order.discount)), width = PAGE_WIDTH)?;
    }
    writeln!(out, "{:>width$}", format!("GRAND TOTAL: {}", money(&order.total)), width = PAGE_WIDTH)?;
    rule(out)
}

/// Minimal always-producible substitute used when the primary renderer
/// fails. Intentionally degraded, not a silent success: consumers can
/// detect it by its size and notice line.
pub fn fallback_document(order: &OrderView) -> Vec<u8> {
    format!(
        "INVOICE {}\n\
         Full invoice generation failed; this is a minimal fallback document.\n\
         Order date: {}\n\
         Grand total: {}\n",
        order.order_number,
        order.created_at.format("%Y-%m-%d"),
        money(&order.total)
    )
    .into_bytes()
}

fn money(value: &BigDecimal) -> String {
    value.with_scale(2).to_string()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max.saturating_sub(1)).chain(std::iter::once('…')).collect()
    }
}
