use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use uuid::Uuid;

use crate::domain::cart::CartLine;
use crate::domain::errors::DomainError;
use crate::domain::ports::CartStore;

/// File-per-customer JSON store for staged cart lines. A missing file
/// is an empty cart; an unreadable or unparseable file is surfaced as
/// an error and discarded by the fail-open load in `CartService`.
pub struct JsonFileCartStore {
    dir: PathBuf,
}

impl JsonFileCartStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, customer_id: Uuid) -> PathBuf {
        self.dir.join(format!("{customer_id}.json"))
    }
}

impl CartStore for JsonFileCartStore {
    fn load(&self, customer_id: Uuid) -> Result<Vec<CartLine>, DomainError> {
        let raw = match fs::read_to_string(self.path_for(customer_id)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(DomainError::Internal(e.to_string())),
        };
        serde_json::from_str(&raw).map_err(|e| DomainError::Internal(e.to_string()))
    }

    fn save(&self, customer_id: Uuid, lines: &[CartLine]) -> Result<(), DomainError> {
        fs::create_dir_all(&self.dir).map_err(|e| DomainError::Internal(e.to_string()))?;
        let payload =
            serde_json::to_vec_pretty(lines).map_err(|e| DomainError::Internal(e.to_string()))?;
        fs::write(self.path_for(customer_id), payload)
            .map_err(|e| DomainError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::application::cart_service::CartService;
    use crate::domain::cart::NewCartLine;

    fn new_line(price: &str, quantity: i32) -> NewCartLine {
        NewCartLine {
            product_id: Uuid::new_v4(),
            name: "Widget".to_string(),
            sku: "WID-1".to_string(),
            unit_price: BigDecimal::from_str(price).unwrap(),
            quantity,
            image_ref: Some("widget.png".to_string()),
        }
    }

    #[test]
    fn lines_round_trip_through_the_filesystem() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileCartStore::new(dir.path());
        let customer = Uuid::new_v4();

        let mut cart = crate::domain::cart::Cart::new();
        cart.add_line(new_line("9.99", 2));
        store.save(customer, cart.lines()).expect("save failed");

        let restored = store.load(customer).expect("load failed");
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].quantity, 2);
        assert_eq!(restored[0].unit_price, BigDecimal::from_str("9.99").unwrap());
        assert_eq!(restored[0].image_ref.as_deref(), Some("widget.png"));
    }

    #[test]
    fn missing_file_loads_as_an_empty_cart() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileCartStore::new(dir.path());
        assert!(store.load(Uuid::new_v4()).expect("load failed").is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error_and_the_service_fails_open() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileCartStore::new(dir.path());
        let customer = Uuid::new_v4();
        fs::create_dir_all(dir.path()).unwrap();
        fs::write(store.path_for(customer), b"{not json").unwrap();

        assert!(store.load(customer).is_err());

        // The aggregator discards the corrupt state instead of failing.
        let service = CartService::new(std::sync::Arc::new(JsonFileCartStore::new(dir.path())));
        let snap = service.snapshot(customer);
        assert!(snap.lines.is_empty());
    }

    #[test]
    fn carts_are_isolated_per_customer() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = std::sync::Arc::new(JsonFileCartStore::new(dir.path()));
        let service = CartService::new(store);
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        service.add_line(alice, new_line("1.00", 1)).unwrap();
        service.add_line(bob, new_line("2.00", 5)).unwrap();

        assert_eq!(service.snapshot(alice).count, 1);
        assert_eq!(service.snapshot(bob).count, 5);
    }
}
