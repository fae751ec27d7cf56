//! Display formatting for the dashboard's numbers.

use num_format::{Locale, ToFormattedString};

/// `£1,234.56`
pub fn currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let amount = format!(
        "{}.{:02}",
        (cents / 100).to_formatted_string(&Locale::en),
        cents % 100
    );
    if value < 0.0 && cents > 0 {
        format!("-£{amount}")
    } else {
        format!("£{amount}")
    }
}

/// `12,345` (rounded to a whole number).
pub fn count(value: f64) -> String {
    (value.round() as i64).to_formatted_string(&Locale::en)
}

/// `4.20%` for an already-scaled percentage.
pub fn percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// `2.50x`
pub fn multiple(value: f64) -> String {
    format!("{value:.2}x")
}
