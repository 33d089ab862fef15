//! Display formatting for command output and generated notes.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// `(555) 123-4567` for ten-digit numbers; anything else is returned as is.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 10 {
        format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..])
    } else {
        phone.to_string()
    }
}

/// US dollars with thousands separators, e.g. `$1,234.50` or `-$20.00`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{}", if negative { "-" } else { "" }, grouped, cents)
}

/// `Jan 5, 2026`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Whole days elapsed since `then`.
pub fn days_since(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - then).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn phone_formatting() {
        assert_eq!(format_phone("5551234567"), "(555) 123-4567");
        assert_eq!(format_phone("555-123-4567"), "(555) 123-4567");
        assert_eq!(format_phone("911"), "911");
        assert_eq!(format_phone(""), "");
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(Decimal::new(123450, 2)), "$1,234.50");
        assert_eq!(format_currency(Decimal::new(250, 0)), "$250.00");
        assert_eq!(format_currency(Decimal::new(1_000_000, 0)), "$1,000,000.00");
        assert_eq!(format_currency(Decimal::new(-2, 0)), "-$2.00");
        assert_eq!(format_currency(Decimal::new(5, 3)), "$0.01");
    }

    #[test]
    fn date_formatting() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(format_date(date), "Jan 5, 2026");
    }

    #[test]
    fn days_since_counts_whole_days() {
        let then = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 11, 0, 0).unwrap();
        assert_eq!(days_since(then, now), 30);
    }
}
