use chrono::NaiveDate;
use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;

/// One point on the merged portfolio-wide series, one per distinct calendar
/// date present in any asset's history. `date` is the short display form of
/// `full_date`.
#[derive(Clone, Debug, Getters, PartialEq, new)]
pub struct TimelinePoint {
    date: String,
    full_date: NaiveDate,
    value: Decimal,
}
