//! Order and catalog data sources.
//!
//! Two backends feed the aggregator: the order-service HTTP API and local
//! JSON files for offline runs. Domain resolution returns "not found" as a
//! first-class outcome so the pipeline is never invoked with an invalid
//! account scope.

pub mod file;
pub mod http;

use thiserror::Error;

pub use file::FileSource;
pub use http::OrderServiceClient;

/// Internal account identifier a store domain resolves to.
pub type AccountId = i64;

/// Outcome of resolving a store domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainLookup {
    Found(AccountId),
    NotFound,
}

/// Errors produced by the data layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to the order service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("order service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to decode order payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
