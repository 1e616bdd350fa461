use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One staged line in the pre-order cart. Exactly one line exists per
/// distinct `product_id`; adding the same product again merges into the
/// existing line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub sku: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub image_ref: Option<String>,
}

/// Input for `Cart::add_line`; the line id is generated on insert.
#[derive(Debug, Clone)]
pub struct NewCartLine {
    pub product_id: Uuid,
    pub name: String,
    pub sku: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub image_ref: Option<String>,
}

/// Derived view of the cart at a point in time. Always recomputed from
/// the line list, never stored, so it cannot drift.
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub subtotal: BigDecimal,
    pub count: i64,
}

/// In-memory staging area for order lines. Synchronous and
/// single-threaded; persistence is the caller's concern (see
/// `CartService`), which keeps this unit-testable without any storage.
#[derive(Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds a line, merging by `product_id`: an existing line for the
    /// same product has its quantity incremented instead of a second
    /// line being created. Returns the id of the affected line.
    pub fn add_line(&mut self, new: NewCartLine) -> Uuid {
        let quantity = new.quantity.max(1);
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == new.product_id) {
            // Saturate rather than wrap: an absurd merged quantity stays
            // positive and the quantity >= 1 invariant holds.
            line.quantity = line.quantity.saturating_add(quantity);
            return line.id;
        }
        let id = Uuid::new_v4();
        self.lines.push(CartLine {
            id,
            product_id: new.product_id,
            name: new.name,
            sku: new.sku,
            unit_price: new.unit_price,
            quantity,
            image_ref: new.image_ref,
        });
        id
    }

    /// Removes by line id (not product id). Returns false when no such
    /// line exists.
    pub fn remove_line(&mut self, line_id: Uuid) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != line_id);
        self.lines.len() != before
    }

    /// Sets a line's quantity, clamped to a minimum of 1. Removal is a
    /// distinct operation; zero and negative quantities never exist.
    /// Returns false when no such line exists.
    pub fn set_quantity(&mut self, line_id: Uuid, quantity: i32) -> bool {
        match self.lines.iter_mut().find(|l| l.id == line_id) {
            Some(line) => {
                line.quantity = quantity.max(1);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn snapshot(&self) -> CartSnapshot {
        let subtotal = self
            .lines
            .iter()
            .fold(BigDecimal::from(0), |acc, l| {
                acc + l.unit_price.clone() * BigDecimal::from(l.quantity)
            });
        let count = self.lines.iter().map(|l| i64::from(l.quantity)).sum();
        CartSnapshot {
            lines: self.lines.clone(),
            subtotal,
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn line(price: &str, quantity: i32) -> NewCartLine {
        NewCartLine {
            product_id: Uuid::new_v4(),
            name: "Widget".to_string(),
            sku: "WID-1".to_string(),
            unit_price: BigDecimal::from_str(price).expect("valid decimal"),
            quantity,
            image_ref: None,
        }
    }

    #[test]
    fn snapshot_totals_are_recomputed_from_lines() {
        let mut cart = Cart::new();
        cart.add_line(line("9.99", 2));
        cart.add_line(line("1.50", 3));

        let snap = cart.snapshot();
        assert_eq!(snap.subtotal, BigDecimal::from_str("24.48").unwrap());
        assert_eq!(snap.count, 5);
        assert_eq!(snap.lines.len(), 2);
    }

    #[test]
    fn adding_same_product_twice_merges_into_one_line() {
        let mut cart = Cart::new();
        let first = line("2.00", 3);
        let mut second = line("2.00", 4);
        second.product_id = first.product_id;

        let id_a = cart.add_line(first);
        let id_b = cart.add_line(second);

        assert_eq!(id_a, id_b);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 7);
        assert_eq!(cart.snapshot().count, 7);
    }

    #[test]
    fn add_line_clamps_non_positive_quantity_to_one() {
        let mut cart = Cart::new();
        cart.add_line(line("5.00", 0));
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn merging_huge_quantities_saturates_instead_of_wrapping() {
        let mut cart = Cart::new();
        let first = line("1.00", i32::MAX);
        let mut second = line("1.00", 2);
        second.product_id = first.product_id;

        cart.add_line(first);
        cart.add_line(second);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, i32::MAX);
    }

    #[test]
    fn set_quantity_clamps_to_minimum_of_one() {
        let mut cart = Cart::new();
        let id = cart.add_line(line("5.00", 4));

        assert!(cart.set_quantity(id, 0));
        assert_eq!(cart.lines()[0].quantity, 1);

        assert!(cart.set_quantity(id, -3));
        assert_eq!(cart.lines()[0].quantity, 1);

        assert!(cart.set_quantity(id, 9));
        assert_eq!(cart.lines()[0].quantity, 9);
    }

    #[test]
    fn set_quantity_on_unknown_line_returns_false() {
        let mut cart = Cart::new();
        assert!(!cart.set_quantity(Uuid::new_v4(), 2));
    }

    #[test]
    fn remove_line_removes_by_line_id_only() {
        let mut cart = Cart::new();
        let keep = cart.add_line(line("1.00", 1));
        let gone = cart.add_line(line("2.00", 1));

        assert!(cart.remove_line(gone));
        assert!(!cart.remove_line(gone));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].id, keep);
    }

    #[test]
    fn clear_empties_the_cart() {
        let mut cart = Cart::new();
        cart.add_line(line("1.00", 5));
        cart.clear();

        let snap = cart.snapshot();
        assert!(snap.lines.is_empty());
        assert_eq!(snap.subtotal, BigDecimal::from(0));
        assert_eq!(snap.count, 0);
    }

    #[test]
    fn totals_follow_every_mutation_sequence() {
        let mut cart = Cart::new();
        let a = cart.add_line(line("3.00", 2));
        let b = cart.add_line(line("7.00", 1));
        cart.set_quantity(b, 3);
        cart.remove_line(a);

        let snap = cart.snapshot();
        assert_eq!(snap.subtotal, BigDecimal::from(21));
        assert_eq!(snap.count, 3);
    }
}
