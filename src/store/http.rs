//! HTTP client for the order service.
//!
//! Thin typed wrapper over the order-service REST API: domain resolution,
//! recent orders for an account, and the store catalog for the
//! product-improvement task.

use crate::models::{OrderRecord, ProductRecord};
use crate::store::{AccountId, DomainLookup, StoreError};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Hard cap on how many orders one run aggregates, matching the upstream
/// query limit.
pub const MAX_ORDERS: usize = 500;

/// How many catalog entries the products task reviews.
pub const MAX_PRODUCTS: usize = 10;

#[derive(Debug, Deserialize)]
struct ResolveResponse {
    account_id: AccountId,
}

#[derive(Debug, Deserialize)]
struct OrdersResponse {
    orders: Vec<OrderRecord>,
}

#[derive(Debug, Deserialize)]
struct ProductsResponse {
    products: Vec<ProductRecord>,
}

/// Client for the order-service API.
pub struct OrderServiceClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl OrderServiceClient {
    /// Create a client with the given base URL and request timeout.
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self, StoreError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Resolve a store domain to its account id.
    ///
    /// A 404 from the service means the domain is unknown and maps to
    /// [`DomainLookup::NotFound`], not an error.
    pub async fn resolve_domain(&self, domain: &str) -> Result<DomainLookup, StoreError> {
        let url = format!("{}/accounts/resolve", self.base_url);
        debug!("Resolving domain {} via {}", domain, url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("domain", domain)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(DomainLookup::NotFound);
        }
        let response = Self::check_status(response).await?;

        let resolved: ResolveResponse = response.json().await?;
        info!("Domain {} resolved to account {}", domain, resolved.account_id);
        Ok(DomainLookup::Found(resolved.account_id))
    }

    /// Fetch the account's orders for a trailing window, newest first,
    /// capped at [`MAX_ORDERS`].
    pub async fn recent_orders(
        &self,
        account_id: AccountId,
        window_days: u32,
        limit: usize,
    ) -> Result<Vec<OrderRecord>, StoreError> {
        let url = format!("{}/accounts/{}/orders", self.base_url, account_id);
        let limit = limit.min(MAX_ORDERS);
        debug!(
            "Fetching up to {} orders from the last {} days for account {}",
            limit, window_days, account_id
        );

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("window_days", window_days.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let payload: OrdersResponse = response.json().await?;
        info!(
            "Fetched {} orders for account {}",
            payload.orders.len(),
            account_id
        );
        Ok(payload.orders)
    }

    /// Fetch the account's active catalog entries, capped at
    /// [`MAX_PRODUCTS`].
    pub async fn store_products(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<ProductRecord>, StoreError> {
        let url = format!("{}/accounts/{}/products", self.base_url, account_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[("limit", MAX_PRODUCTS.to_string())])
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let payload: ProductsResponse = response.json().await?;
        info!(
            "Fetched {} catalog entries for account {}",
            payload.products.len(),
            account_id
        );
        Ok(payload.products)
    }

    /// Turn non-2xx responses into [`StoreError::Api`] with the body kept
    /// for diagnostics.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Api { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = OrderServiceClient::new("http://data.internal/", 30).unwrap();
        assert_eq!(client.base_url, "http://data.internal");
    }

    #[test]
    fn test_orders_payload_decodes() {
        let json = r#"{"orders":[{
            "order_id": 1,
            "customer_name": "Ana",
            "order_time": "09:10:00",
            "weekday": "Monday",
            "subtotal_value": 49.9,
            "products": "Shirt | Hat",
            "campaign": "spring"
        }]}"#;

        let payload: OrdersResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.orders.len(), 1);
        assert_eq!(payload.orders[0].campaign.as_deref(), Some("spring"));
    }

    #[test]
    fn test_products_payload_decodes() {
        let json = r#"{"products":[{
            "name": "Linen Shirt",
            "full_price": 120.0,
            "promo_price": 99.9,
            "category": "Shirts"
        }]}"#;

        let payload: ProductsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.products[0].name, "Linen Shirt");
        assert!(payload.products[0].seo_title.is_none());
    }
}
