//! Data models for the persona generator.
//!
//! This module contains the core data structures used throughout the
//! application: raw order records, store catalog entries, the customer
//! profile supplied by the merchant, and the structures parsed back from
//! the LLM.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One denormalized order row, as returned by the order service.
///
/// Required fields are enforced by deserialization; a payload missing any of
/// them fails to decode in the store layer. Nullable columns are `Option`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Order id, unique within a result set.
    pub order_id: i64,
    /// First name token of the customer.
    pub customer_name: String,
    /// Customer gender, absent when the store does not collect it.
    #[serde(default)]
    pub customer_gender: Option<String>,
    /// Order time formatted `HH:MM:SS`.
    pub order_time: String,
    /// Localized weekday name.
    pub weekday: String,
    /// Order subtotal (currency, non-negative).
    pub subtotal_value: f64,
    /// Marketing UTM campaign tag, if any.
    #[serde(default)]
    pub campaign: Option<String>,
    /// Product names joined with the literal `" | "` separator.
    pub products: String,

    // Extra columns from the order projection. They only enrich the prompt
    // sample and never feed the statistics.
    /// Order date formatted `YYYY-MM-DD`.
    #[serde(default)]
    pub order_date: Option<String>,
    /// Discount applied to the order.
    #[serde(default)]
    pub discount_value: Option<f64>,
    /// Shipping city.
    #[serde(default)]
    pub city: Option<String>,
    /// Shipping state.
    #[serde(default)]
    pub state: Option<String>,
    /// Payment method name.
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// One catalog entry, used by the product-improvement task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub full_price: f64,
    #[serde(default)]
    pub promo_price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_description: Option<String>,
}

/// A real customer described by the merchant, used to seed the personas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub description: String,
}

/// A synthetic customer persona returned by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub photo: String,
    pub age: String,
    pub lifestyle: String,
    pub buying_behavior: String,
    pub top_products: String,
    pub communication_channels: String,
    pub suggestions: String,
}

/// Model reply for the personas task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaSet {
    pub personas: Vec<Persona>,
}

/// Model reply for the insights task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightList {
    pub insights: Vec<String>,
}

/// One product improvement suggestion from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSuggestion {
    pub product_name: String,
    pub suggestion: String,
}

/// Model reply for the products task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionList {
    pub suggestions: Vec<ProductSuggestion>,
}

/// Parsed result of one generation run, independent of the task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerationResult {
    Personas(PersonaSet),
    Insights(InsightList),
    Suggestions(SuggestionList),
}

impl GenerationResult {
    /// Number of items the model produced.
    pub fn item_count(&self) -> usize {
        match self {
            GenerationResult::Personas(set) => set.personas.len(),
            GenerationResult::Insights(list) => list.insights.len(),
            GenerationResult::Suggestions(list) => list.suggestions.len(),
        }
    }
}

impl fmt::Display for GenerationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationResult::Personas(_) => write!(f, "personas"),
            GenerationResult::Insights(_) => write!(f, "insights"),
            GenerationResult::Suggestions(_) => write!(f, "product suggestions"),
        }
    }
}

/// Metadata about one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Store domain the run was scoped to.
    pub store_domain: String,
    /// Date and time of the run.
    pub generated_at: DateTime<Utc>,
    /// Name of the LLM model used.
    pub model_used: String,
    /// Number of orders aggregated.
    pub orders_analyzed: usize,
    /// Trailing window in days the orders were fetched for.
    pub window_days: u32,
    /// Duration of the run in seconds.
    pub duration_seconds: f64,
}
