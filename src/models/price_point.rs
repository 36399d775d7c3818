use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One checkpoint in an asset's derived price history. Exactly one is
/// produced per replayed transaction.
#[derive(Clone, Debug, Deserialize, Getters, PartialEq, Serialize, new)]
pub struct PricePoint {
    date: DateTime<Utc>,
    value: Decimal,
}
