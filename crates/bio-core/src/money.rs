//! Currency scaling and `en-US` USD formatting used by the dashboards.

use rust_decimal::{Decimal, RoundingStrategy};

fn million() -> Decimal {
    Decimal::new(1_000_000, 0)
}

/// Scale a raw USD amount to millions.
///
/// Example:
/// assert_eq!(to_millions(Decimal::new(2_500_000, 0)), Decimal::new(25, 1));
pub fn to_millions(value: Decimal) -> Decimal {
    value / million()
}

/// Format a USD amount the way `Intl.NumberFormat("en-US", currency USD)`
/// does, with a fixed number of fraction digits.
///
/// Rounds half away from zero. Negative amounts render as `-$1,234.00`.
pub fn format_usd(value: Decimal, digits: u32) -> String {
    let rounded = value.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let plain = format!("{:.*}", digits as usize, rounded.abs());
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };
    let mut out = format!("{sign}${}", group_thousands(int_part));
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}

/// Axis/tooltip label for an amount in millions, e.g. `$1.25M`.
pub fn format_millions_axis(value: Decimal) -> String {
    let m = to_millions(value).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${:.2}M", m)
}

/// Label for a relative change: `+20%`, `-10%`, `0%`.
pub fn percentage_label(pct: i32) -> String {
    if pct > 0 {
        format!("+{pct}%")
    } else {
        format!("{pct}%")
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
