//! Statistical aggregation of order records.
//!
//! This module is the analytical core of the tool: a single pass over the
//! order batch producing the seven summary metrics injected into the
//! generation prompts. It is pure and deterministic, including tie-break
//! order, so identical inputs always yield an identical summary.

use crate::models::OrderRecord;
use indexmap::IndexMap;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use thiserror::Error;

/// Separator between product names inside `OrderRecord::products`.
///
/// Exactly three characters, no escaping. A product name that itself
/// contains `" | "` over-splits into multiple tokens; that is a known
/// data-quality risk of the upstream format and is not corrected here.
pub const PRODUCT_SEPARATOR: &str = " | ";

/// How many entries the ranked metrics keep.
const TOP_N: usize = 3;

/// Errors produced while aggregating an order batch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InsightError {
    /// The batch has zero records. Expected whenever a store had no orders
    /// in the requested window; callers translate this into a friendly
    /// message instead of failing.
    #[error("no orders to aggregate")]
    EmptyInput,

    /// An `order_time` value does not start with a 2-digit hour in 0..=23.
    /// The whole batch fails so the summary never mixes metrics computed
    /// over different subsets of rows.
    #[error("order {order_id}: cannot derive an hour from order_time {value:?}")]
    MalformedTime { order_id: i64, value: String },
}

/// Fixed-shape statistical summary of one order batch.
///
/// Serialized field names follow the upstream reporting shape. All fields
/// are derived independently from the same batch; the struct is never
/// mutated after construction.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InsightSummary {
    /// Top 3 customers by order count, descending, first-seen on ties.
    #[serde(rename = "top_clientes")]
    pub top_clients: IndexMap<String, u64>,

    /// Mean of `subtotal_value`, rounded half-away-from-zero to 2 decimals.
    #[serde(rename = "ticket_medio_produtos")]
    pub average_ticket: f64,

    /// Top 3 products by unit frequency across all rows, descending,
    /// first-seen on ties.
    #[serde(rename = "produtos_mais_vendidos")]
    pub best_selling_products: Vec<(String, u64)>,

    /// Order count per hour of day, keyed 0..=23, ascending by hour.
    /// This is the one metric ordered by key instead of by count.
    #[serde(rename = "horas_com_mais_vendas")]
    pub sales_by_hour: BTreeMap<u8, u64>,

    /// Order count per weekday, descending by count, full table.
    #[serde(rename = "dias_com_mais_pedidos")]
    pub orders_by_weekday: IndexMap<String, u64>,

    /// Top 3 UTM campaigns by order count; rows without a campaign are
    /// excluded.
    #[serde(rename = "campanhas_mais_ativas")]
    pub top_campaigns: IndexMap<String, u64>,

    /// Order count per gender, descending by count; rows without a gender
    /// are skipped.
    #[serde(rename = "pedidos_por_genero")]
    pub orders_by_gender: IndexMap<String, u64>,
}

/// Frequency counter preserving first-seen order for deterministic ties.
#[derive(Debug, Default)]
struct FrequencyTable {
    counts: IndexMap<String, u64>,
}

impl FrequencyTable {
    fn add(&mut self, key: &str) {
        *self.counts.entry(key.to_string()).or_insert(0) += 1;
    }

    /// All entries sorted by count descending. The sort is stable, so keys
    /// with equal counts keep their first-seen order.
    fn ranked(self) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self.counts.into_iter().collect();
        entries.sort_by_key(|(_, count)| Reverse(*count));
        entries
    }

    fn ranked_map(self) -> IndexMap<String, u64> {
        self.ranked().into_iter().collect()
    }

    fn top_map(self, n: usize) -> IndexMap<String, u64> {
        self.ranked().into_iter().take(n).collect()
    }
}

/// Aggregate an order batch into an [`InsightSummary`].
///
/// Single pass over the records, no I/O, no shared state. Returns
/// [`InsightError::EmptyInput`] for a zero-length batch and
/// [`InsightError::MalformedTime`] when any row carries an unusable
/// `order_time` (the whole batch fails, see the error docs).
pub fn aggregate(records: &[OrderRecord]) -> Result<InsightSummary, InsightError> {
    if records.is_empty() {
        return Err(InsightError::EmptyInput);
    }

    let mut clients = FrequencyTable::default();
    let mut products = FrequencyTable::default();
    let mut weekdays = FrequencyTable::default();
    let mut campaigns = FrequencyTable::default();
    let mut genders = FrequencyTable::default();
    let mut sales_by_hour: BTreeMap<u8, u64> = BTreeMap::new();
    let mut subtotal_sum = 0.0;

    for record in records {
        clients.add(&record.customer_name);
        subtotal_sum += record.subtotal_value;

        // Empty tokens from malformed input are counted as-is; they are a
        // degenerate case of the format, not an error.
        for token in record.products.split(PRODUCT_SEPARATOR) {
            products.add(token);
        }

        let hour = parse_hour(record)?;
        *sales_by_hour.entry(hour).or_insert(0) += 1;

        weekdays.add(&record.weekday);

        if let Some(campaign) = &record.campaign {
            campaigns.add(campaign);
        }
        if let Some(gender) = &record.customer_gender {
            genders.add(gender);
        }
    }

    Ok(InsightSummary {
        top_clients: clients.top_map(TOP_N),
        average_ticket: round_to_cents(subtotal_sum / records.len() as f64),
        best_selling_products: products.ranked().into_iter().take(TOP_N).collect(),
        sales_by_hour,
        orders_by_weekday: weekdays.ranked_map(),
        top_campaigns: campaigns.top_map(TOP_N),
        orders_by_gender: genders.ranked_map(),
    })
}

/// Derive the hour of day from the first two characters of `order_time`.
fn parse_hour(record: &OrderRecord) -> Result<u8, InsightError> {
    let malformed = || InsightError::MalformedTime {
        order_id: record.order_id,
        value: record.order_time.clone(),
    };

    let prefix = record.order_time.get(0..2).ok_or_else(malformed)?;
    let hour: u8 = prefix.parse().map_err(|_| malformed())?;
    if hour > 23 {
        return Err(malformed());
    }
    Ok(hour)
}

/// Round half-away-from-zero to 2 fraction digits.
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
