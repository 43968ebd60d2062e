//! Deterministic sampling of example orders for the prompt.
//!
//! The prompt shows the model a handful of raw rows next to the summary.
//! The sample is seeded so the same batch always produces the same prompt;
//! downstream model calls are the only non-deterministic step.

use crate::models::OrderRecord;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Default seed, kept stable for reproducible prompts.
pub const DEFAULT_SAMPLE_SEED: u64 = 42;

/// How many example rows the prompt carries at most.
pub const SAMPLE_SIZE: usize = 5;

/// Pick `min(size, records.len())` rows without replacement.
///
/// Selection order is part of the output and is stable for a given seed.
pub fn sample_orders(records: &[OrderRecord], size: usize, seed: u64) -> Vec<&OrderRecord> {
    let take = size.min(records.len());
    if take == 0 {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    rand::seq::index::sample(&mut rng, records.len(), take)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders(n: usize) -> Vec<OrderRecord> {
        (0..n)
            .map(|i| OrderRecord {
                order_id: i as i64,
                customer_name: format!("Client {i}"),
                customer_gender: None,
                order_time: "09:00:00".to_string(),
                weekday: "Monday".to_string(),
                subtotal_value: 10.0,
                campaign: None,
                products: "Shirt".to_string(),
                order_date: None,
                discount_value: None,
                city: None,
                state: None,
                payment_method: None,
            })
            .collect()
    }

    #[test]
    fn test_sample_is_capped_by_batch_size() {
        let records = orders(3);
        assert_eq!(sample_orders(&records, SAMPLE_SIZE, 42).len(), 3);

        let records = orders(12);
        assert_eq!(sample_orders(&records, SAMPLE_SIZE, 42).len(), 5);
    }

    #[test]
    fn test_empty_batch_yields_empty_sample() {
        assert!(sample_orders(&[], SAMPLE_SIZE, 42).is_empty());
    }

    #[test]
    fn test_same_seed_same_sample() {
        let records = orders(50);
        let a: Vec<i64> = sample_orders(&records, 5, 42).iter().map(|r| r.order_id).collect();
        let b: Vec<i64> = sample_orders(&records, 5, 42).iter().map(|r| r.order_id).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_usually_differs() {
        let records = orders(200);
        let a: Vec<i64> = sample_orders(&records, 5, 1).iter().map(|r| r.order_id).collect();
        let b: Vec<i64> = sample_orders(&records, 5, 2).iter().map(|r| r.order_id).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_no_duplicate_rows() {
        let records = orders(10);
        let mut ids: Vec<i64> = sample_orders(&records, 10, 42).iter().map(|r| r.order_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }
}
