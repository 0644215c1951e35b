//! Client aggregator — per-client last activity, count and total.
//!
//! Recency is measured against the latest retained transaction, not the
//! wall clock: stale rows were already excluded by the lookback filter.

use crate::{normalizer::Transaction, types::ClientId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientRaw {
    pub client_id:         ClientId,
    pub last_activity:     NaiveDateTime,
    pub transaction_count: u32,
    pub total_amount:      f64,
    pub recency_days:      u32,
}

#[derive(Debug, Clone)]
pub struct Aggregation {
    pub reference_date: NaiveDateTime,
    pub clients:        Vec<ClientRaw>,
}

/// Latest `occurred_at` across the whole batch, `None` if it is empty.
pub fn reference_date(transactions: &[Transaction]) -> Option<NaiveDateTime> {
    transactions.iter().map(|t| t.occurred_at).max()
}

/// Group transactions by client in first-seen order.
/// Returns `None` for an empty batch.
pub fn aggregate_clients(transactions: &[Transaction]) -> Option<Aggregation> {
    let reference = reference_date(transactions)?;

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut clients: Vec<ClientRaw> = Vec::new();

    for txn in transactions {
        match index.get(txn.client_id.as_str()) {
            Some(&i) => {
                let c = &mut clients[i];
                c.last_activity = c.last_activity.max(txn.occurred_at);
                c.transaction_count += 1;
                c.total_amount += txn.amount;
            }
            None => {
                index.insert(txn.client_id.as_str(), clients.len());
                clients.push(ClientRaw {
                    client_id:         txn.client_id.clone(),
                    last_activity:     txn.occurred_at,
                    transaction_count: 1,
                    total_amount:      txn.amount,
                    recency_days:      0,
                });
            }
        }
    }

    for c in &mut clients {
        c.recency_days = recency_days(reference, c.last_activity);
    }

    log::debug!(
        "aggregator: {} transactions → {} clients, reference date {reference}",
        transactions.len(),
        clients.len()
    );

    Some(Aggregation {
        reference_date: reference,
        clients,
    })
}

/// Whole days between the two instants, rounded, absolute.
pub fn recency_days(reference: NaiveDateTime, last_activity: NaiveDateTime) -> u32 {
    let seconds = (reference - last_activity).num_seconds().abs() as f64;
    (seconds / SECONDS_PER_DAY).round() as u32
}
