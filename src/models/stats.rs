use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;

/// Portfolio-wide totals over every asset's derived fields.
#[derive(Clone, Debug, Getters, PartialEq, new)]
pub struct PortfolioStats {
    total_value: Decimal,
    total_invested: Decimal,
    total_return: Decimal,
    total_return_percentage: Decimal,
}
