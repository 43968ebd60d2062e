//! Order-history analytics.
//!
//! The aggregator turns a batch of raw order rows into the fixed-shape
//! statistical summary the prompt builder consumes; the sampler picks the
//! handful of example rows that go with it.

pub mod aggregator;
pub mod sample;

pub use aggregator::{aggregate, InsightError, InsightSummary, PRODUCT_SEPARATOR};
pub use sample::{sample_orders, DEFAULT_SAMPLE_SEED, SAMPLE_SIZE};
