use crate::models::Cents;
use chrono::{DateTime, FixedOffset};

/// Formats an amount in cents as Brazilian reais
///
/// Examples:
/// - 1000: "R$ 10,00"
/// - 123456: "R$ 1.234,56"
/// - -250: "-R$ 2,50"
pub fn format_currency(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let reais = abs / 100;
    let centavos = abs % 100;
    format!("{}R$ {},{:02}", sign, group_thousands(reais), centavos)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// "dd/mm/yyyy hh:mm" in the timestamp's own offset
pub fn format_date_time(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.format("%d/%m/%Y %H:%M").to_string()
}

/// One decimal place, decimal comma: 33.333 -> "33,3%".
/// Halves round away from zero, so 28.75 shows as "28,8%".
pub fn format_percentage(percentage: f64) -> String {
    let rounded = (percentage * 10.0).round() / 10.0;
    format!("{:.1}%", rounded).replace('.', ",")
}

/// Parses a user-typed amount into cents.
///
/// Accepts either `.` or `,` as the decimal separator and at most two decimal
/// places. Thousands separators are not accepted.
pub fn parse_amount(input: &str) -> Result<Cents, String> {
    let trimmed = input.trim();
    let invalid = || format!("Invalid amount: '{}'", input);

    if trimmed.is_empty() || trimmed.starts_with('-') || trimmed.starts_with('+') {
        return Err(invalid());
    }

    let normalized = trimmed.replace(',', ".");
    let (whole, fraction) = match normalized.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (normalized.as_str(), ""),
    };

    if whole.is_empty()
        || fraction.len() > 2
        || !whole.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let whole: i64 = whole.parse().map_err(|_| invalid())?;
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse().map_err(|_| invalid())?,
    };

    whole
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(fraction))
        .ok_or_else(invalid)
}
