use anyhow::Result;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One immutable financial event against an asset. Corrections are made by
/// deleting and re-adding, never by editing in place.
#[derive(Clone, Debug, Deserialize, Getters, PartialEq, Serialize, new)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    id: String,
    asset_id: String,
    ticker: String,
    #[serde(rename = "type")]
    kind: TransactionType,
    amount: Decimal,
    date: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Buy,
    Sell,
    Dividend,
    PriceUpdate,
}

impl TransactionType {
    pub fn parse_str(s: &str) -> Result<TransactionType> {
        match s {
            "BUY" => Ok(TransactionType::Buy),
            "SELL" => Ok(TransactionType::Sell),
            "DIVIDEND" => Ok(TransactionType::Dividend),
            "PRICE_UPDATE" => Ok(TransactionType::PriceUpdate),
            _ => Err(anyhow::anyhow!("Unknown transaction type '{}'", s)),
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
            TransactionType::Dividend => "DIVIDEND",
            TransactionType::PriceUpdate => "PRICE_UPDATE",
        }
    }
}
