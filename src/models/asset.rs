use anyhow::Result;
use derive_getters::Getters;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::ReplayOutcome;

use super::PricePoint;

/// A holding. Identity and display fields belong to the CRUD/UI layers;
/// `current_value`, `total_invested` and `price_history` are derived and are
/// only ever written by applying a [`ReplayOutcome`].
#[derive(Clone, Debug, Deserialize, Getters, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    id: String,
    ticker: String,
    name: String,
    category: AssetCategory,
    color: String,
    icon: Option<String>,
    group_id: Option<String>,
    order: usize,
    current_value: Decimal,
    total_invested: Decimal,
    price_history: Vec<PricePoint>,
}

impl Asset {
    pub fn new(
        id: String,
        ticker: String,
        name: String,
        category: AssetCategory,
        color: String,
        icon: Option<String>,
        group_id: Option<String>,
        order: usize,
    ) -> Self {
        Self {
            id,
            ticker,
            name,
            category,
            color,
            icon,
            group_id,
            order,
            current_value: Decimal::ZERO,
            total_invested: Decimal::ZERO,
            price_history: Vec::new(),
        }
    }

    /// Overwrites the derived fields with a freshly replayed outcome.
    pub fn apply_outcome(&mut self, outcome: ReplayOutcome) {
        let (current_value, total_invested, price_history) = outcome.into_parts();
        self.current_value = current_value;
        self.total_invested = total_invested;
        self.price_history = price_history;
    }

    pub fn update_details(&mut self, name: String, color: String, icon: Option<String>) {
        self.name = name;
        self.color = color;
        self.icon = icon;
    }

    pub fn set_group_id(&mut self, group_id: Option<String>) {
        self.group_id = group_id;
    }

    pub fn set_order(&mut self, order: usize) {
        self.order = order;
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum AssetCategory {
    Stock,
    #[serde(rename = "ETF")]
    Etf,
    Crypto,
    Cash,
}

impl AssetCategory {
    pub fn parse_str(s: &str) -> Result<AssetCategory> {
        match s {
            "Stock" => Ok(AssetCategory::Stock),
            "ETF" => Ok(AssetCategory::Etf),
            "Crypto" => Ok(AssetCategory::Crypto),
            "Cash" => Ok(AssetCategory::Cash),
            _ => Err(anyhow::anyhow!("Unknown asset category '{}'", s)),
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            AssetCategory::Stock => "Stock",
            AssetCategory::Etf => "ETF",
            AssetCategory::Crypto => "Crypto",
            AssetCategory::Cash => "Cash",
        }
    }
}
