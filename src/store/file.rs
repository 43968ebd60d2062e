//! Local JSON data source.
//!
//! Lets the tool run against an exported order dump instead of the order
//! service, which is what `--orders-file` and most dry runs use. The file
//! holds either a bare array of records or the same `{"orders": [...]}`
//! envelope the service returns.

use crate::models::{OrderRecord, ProductRecord};
use crate::store::StoreError;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OrdersFile {
    Envelope { orders: Vec<OrderRecord> },
    Bare(Vec<OrderRecord>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProductsFile {
    Envelope { products: Vec<ProductRecord> },
    Bare(Vec<ProductRecord>),
}

/// Reader for local order and catalog dumps.
pub struct FileSource;

impl FileSource {
    /// Load order records from a JSON file.
    pub fn load_orders(path: &Path) -> Result<Vec<OrderRecord>, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let parsed: OrdersFile = serde_json::from_str(&content)?;
        let orders = match parsed {
            OrdersFile::Envelope { orders } => orders,
            OrdersFile::Bare(orders) => orders,
        };

        info!("Loaded {} orders from {}", orders.len(), path.display());
        Ok(orders)
    }

    /// Load catalog entries from a JSON file.
    pub fn load_products(path: &Path) -> Result<Vec<ProductRecord>, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let parsed: ProductsFile = serde_json::from_str(&content)?;
        let products = match parsed {
            ProductsFile::Envelope { products } => products,
            ProductsFile::Bare(products) => products,
        };

        info!(
            "Loaded {} catalog entries from {}",
            products.len(),
            path.display()
        );
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ORDER_JSON: &str = r#"{
        "order_id": 1,
        "customer_name": "Ana",
        "order_time": "09:10:00",
        "weekday": "Monday",
        "subtotal_value": 49.9,
        "products": "Shirt"
    }"#;

    #[test]
    fn test_load_orders_bare_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[{ORDER_JSON}]").unwrap();

        let orders = FileSource::load_orders(file.path()).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].customer_name, "Ana");
    }

    #[test]
    fn test_load_orders_service_envelope() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"orders\": [{ORDER_JSON}]}}").unwrap();

        let orders = FileSource::load_orders(file.path()).unwrap();
        assert_eq!(orders.len(), 1);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = FileSource::load_orders(Path::new("/nonexistent/orders.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_invalid_json_is_a_decode_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = FileSource::load_orders(file.path()).unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }
}
