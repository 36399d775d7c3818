use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{Asset, PortfolioStats, TimelinePoint};

/// Sums the derived fields across all assets. A portfolio with zero invested
/// capital reports a 0% return rather than dividing by zero.
pub fn portfolio_stats(assets: &[Asset]) -> PortfolioStats {
    let total_value: Decimal = assets.iter().map(|asset| *asset.current_value()).sum();
    let total_invested: Decimal = assets.iter().map(|asset| *asset.total_invested()).sum();
    let total_return = total_value - total_invested;
    let total_return_percentage = if total_invested > Decimal::ZERO {
        (total_return / total_invested) * dec!(100)
    } else {
        Decimal::ZERO
    };

    PortfolioStats::new(
        total_value,
        total_invested,
        total_return,
        total_return_percentage,
    )
}

/// Merges every asset's checkpoints onto a common timeline, one point per
/// distinct calendar date. Each asset contributes the value of its latest
/// checkpoint at or before end of that day (last-known-value carry-forward),
/// or zero if it had no transactions yet by that date.
pub fn portfolio_history(assets: &[Asset]) -> Vec<TimelinePoint> {
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    for asset in assets {
        for point in asset.price_history() {
            dates.insert(point.date().date_naive());
        }
    }

    dates
        .into_iter()
        .map(|day| {
            let value = assets
                .iter()
                .map(|asset| value_as_of(asset, day))
                .sum::<Decimal>();
            TimelinePoint::new(day.format("%-m/%-d").to_string(), day, value)
        })
        .collect()
}

fn value_as_of(asset: &Asset, day: NaiveDate) -> Decimal {
    // Histories are chronological, so the last checkpoint on or before the
    // day is the latest known value.
    asset
        .price_history()
        .iter()
        .filter(|point| point.date().date_naive() <= day)
        .next_back()
        .map(|point| *point.value())
        .unwrap_or(Decimal::ZERO)
}
