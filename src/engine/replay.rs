use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;

use crate::models::{PricePoint, Transaction, TransactionType};

/// Derived state of one asset after replaying its full transaction log.
#[derive(Clone, Debug, Default, Getters, PartialEq, new)]
pub struct ReplayOutcome {
    current_value: Decimal,
    total_invested: Decimal,
    price_history: Vec<PricePoint>,
}

impl ReplayOutcome {
    pub fn into_parts(self) -> (Decimal, Decimal, Vec<PricePoint>) {
        (self.current_value, self.total_invested, self.price_history)
    }
}

/// Reconstructs an asset's valuation by replaying its ordered transaction
/// log. Filters `transactions` to the given asset, sorts chronologically
/// (the sort is stable, so same-instant entries keep their stored order) and
/// folds each event into a running value and running invested capital,
/// emitting one history checkpoint per transaction.
///
/// Pure and deterministic: the same transaction set always yields the same
/// outcome, and both running figures are floored at zero. An asset with no
/// transactions yields a zeroed outcome with an empty history.
pub fn replay(asset_id: &str, transactions: &[Transaction]) -> ReplayOutcome {
    let mut ledger: Vec<&Transaction> = transactions
        .iter()
        .filter(|transaction| transaction.asset_id() == asset_id)
        .collect();
    ledger.sort_by(|a, b| a.date().cmp(b.date()));

    let mut running_value = Decimal::ZERO;
    let mut running_invested = Decimal::ZERO;
    let mut history = Vec::with_capacity(ledger.len());

    for transaction in ledger {
        let amount = *transaction.amount();
        match transaction.kind() {
            TransactionType::Buy => {
                running_value += amount;
                running_invested += amount;
            }
            TransactionType::Sell => {
                // Over-sells clamp to zero instead of going negative.
                running_value = Decimal::ZERO.max(running_value - amount);
                running_invested = Decimal::ZERO.max(running_invested - amount);
            }
            TransactionType::Dividend => {
                running_value += amount;
            }
            TransactionType::PriceUpdate => {
                running_value = amount;
            }
        }
        history.push(PricePoint::new(*transaction.date(), running_value));
    }

    ReplayOutcome::new(running_value, running_invested, history)
}
