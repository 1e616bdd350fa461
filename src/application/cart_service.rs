use uuid::Uuid;

use crate::domain::cart::{Cart, CartSnapshot, NewCartLine};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartStore;

/// Staging-area service: rehydrates the customer's cart, applies one
/// mutation, and persists the full line list in the same step. Loading
/// is fail-open: unreadable or corrupt stored state is discarded and
/// treated as an empty cart, never as an error.
#[derive(Debug, Clone)]
pub struct CartService<S> {
    store: S,
}

impl<S: CartStore> CartService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn restore(&self, customer_id: Uuid) -> Cart {
        match self.store.load(customer_id) {
            Ok(lines) => Cart::from_lines(lines),
            Err(e) => {
                log::warn!("discarding unreadable cart for customer {customer_id}: {e}");
                Cart::new()
            }
        }
    }

    pub fn snapshot(&self, customer_id: Uuid) -> CartSnapshot {
        self.restore(customer_id).snapshot()
    }

    pub fn add_line(
        &self,
        customer_id: Uuid,
        line: NewCartLine,
    ) -> Result<CartSnapshot, DomainError> {
        let mut cart = self.restore(customer_id);
        cart.add_line(line);
        self.store.save(customer_id, cart.lines())?;
        Ok(cart.snapshot())
    }

    pub fn set_quantity(
        &self,
        customer_id: Uuid,
        line_id: Uuid,
        quantity: i32,
    ) -> Result<CartSnapshot, DomainError> {
        let mut cart = self.restore(customer_id);
        if !cart.set_quantity(line_id, quantity) {
            return Err(DomainError::NotFound);
        }
        self.store.save(customer_id, cart.lines())?;
        Ok(cart.snapshot())
    }

    pub fn remove_line(
        &self,
        customer_id: Uuid,
        line_id: Uuid,
    ) -> Result<CartSnapshot, DomainError> {
        let mut cart = self.restore(customer_id);
        if !cart.remove_line(line_id) {
            return Err(DomainError::NotFound);
        }
        self.store.save(customer_id, cart.lines())?;
        Ok(cart.snapshot())
    }

    pub fn clear(&self, customer_id: Uuid) -> Result<CartSnapshot, DomainError> {
        let cart = Cart::new();
        self.store.save(customer_id, cart.lines())?;
        Ok(cart.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::str::FromStr;
    use std::sync::Mutex;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::cart::CartLine;

    #[derive(Default)]
    struct MemoryCartStore {
        carts: Mutex<HashMap<Uuid, Vec<CartLine>>>,
        fail_load: Mutex<bool>,
        saves: Mutex<usize>,
    }

    impl CartStore for MemoryCartStore {
        fn load(&self, customer_id: Uuid) -> Result<Vec<CartLine>, DomainError> {
            if *self.fail_load.lock().unwrap() {
                return Err(DomainError::Internal("corrupt cart payload".to_string()));
            }
            Ok(self
                .carts
                .lock()
                .unwrap()
                .get(&customer_id)
                .cloned()
                .unwrap_or_default())
        }

        fn save(&self, customer_id: Uuid, lines: &[CartLine]) -> Result<(), DomainError> {
            *self.saves.lock().unwrap() += 1;
            self.carts
                .lock()
                .unwrap()
                .insert(customer_id, lines.to_vec());
            Ok(())
        }
    }

    fn new_line(price: &str, quantity: i32) -> NewCartLine {
        NewCartLine {
            product_id: Uuid::new_v4(),
            name: "Widget".to_string(),
            sku: "WID-1".to_string(),
            unit_price: BigDecimal::from_str(price).unwrap(),
            quantity,
            image_ref: None,
        }
    }

    #[test]
    fn every_mutation_persists_the_line_list() {
        let service = CartService::new(std::sync::Arc::new(MemoryCartStore::default()));
        let customer = Uuid::new_v4();

        let snap = service.add_line(customer, new_line("2.00", 2)).unwrap();
        let line_id = snap.lines[0].id;
        service.set_quantity(customer, line_id, 5).unwrap();
        service.remove_line(customer, line_id).unwrap();
        service.clear(customer).unwrap();

        let restored = service.snapshot(customer);
        assert!(restored.lines.is_empty());
    }

    #[test]
    fn cart_survives_a_service_restart() {
        let store = std::sync::Arc::new(MemoryCartStore::default());
        let customer = Uuid::new_v4();

        CartService::new(store.clone())
            .add_line(customer, new_line("9.99", 3))
            .unwrap();

        let snap = CartService::new(store).snapshot(customer);
        assert_eq!(snap.count, 3);
        assert_eq!(snap.subtotal, BigDecimal::from_str("29.97").unwrap());
    }

    #[test]
    fn unreadable_stored_state_rehydrates_as_an_empty_cart() {
        let store = std::sync::Arc::new(MemoryCartStore::default());
        let customer = Uuid::new_v4();
        let service = CartService::new(store.clone());
        service.add_line(customer, new_line("1.00", 1)).unwrap();

        *store.fail_load.lock().unwrap() = true;
        let snap = service.snapshot(customer);
        assert!(snap.lines.is_empty());
        assert_eq!(snap.count, 0);
    }

    #[test]
    fn mutating_a_missing_line_is_not_found_and_saves_nothing() {
        let store = std::sync::Arc::new(MemoryCartStore::default());
        let service = CartService::new(store.clone());
        let customer = Uuid::new_v4();

        let err = service
            .set_quantity(customer, Uuid::new_v4(), 3)
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound));

        let err = service.remove_line(customer, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound));

        assert_eq!(*store.saves.lock().unwrap(), 0);
    }
}
