use chrono::{DateTime, Local, Utc};
use ratatui::style::Color;
use rust_decimal::Decimal;

pub fn currency_symbol(currency: &str) -> &str {
    match currency {
        "USD" => "$",
        "MYR" => "RM",
        "EUR" => "€",
        other => other,
    }
}

pub fn format_money(value: &Decimal, currency: &str) -> String {
    format!("{}{:.2}", currency_symbol(currency), value)
}

pub fn format_signed_money(value: &Decimal, currency: &str) -> String {
    let sign = if *value < Decimal::ZERO { "-" } else { "+" };
    format!("{}{}{:.2}", sign, currency_symbol(currency), value.abs())
}

pub fn format_percent(value: &Decimal) -> String {
    let sign = if *value < Decimal::ZERO { "-" } else { "+" };
    format!("{}{:.2}%", sign, value.abs())
}

pub fn format_datetime(date: &DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub fn gain_color(value: &Decimal) -> Color {
    if *value >= Decimal::ZERO {
        Color::Green
    } else {
        Color::Red
    }
}
