//! Display-currency conversion for the presentation edge.
//!
//! Everything past this module works in integer minor units (cents).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::str::FromStr;

/// Parses a loose or masked BRL string ("R$ 1.234,56", "1234,56", "10")
/// into integer cents. Dots are treated as thousands separators and the
/// comma as the decimal separator. Returns 0 for garbage or non-positive
/// input.
pub fn parse_brl_to_cents(raw: &str) -> i64 {
    let cleaned: String = raw
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .filter(|c| *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let value = match Decimal::from_str(&cleaned) {
        Ok(v) => v,
        Err(_) => return 0,
    };
    if value <= Decimal::ZERO {
        return 0;
    }

    (value * dec!(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// Formats integer cents as a BRL display string ("1.234,56").
pub fn format_cents_brl(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let reais = abs / 100;
    let frac = abs % 100;

    let digits = reais.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("{}{},{:02}", sign, grouped, frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_masked_brl() {
        assert_eq!(parse_brl_to_cents("R$ 1.234,56"), 123_456);
        assert_eq!(parse_brl_to_cents("1234,56"), 123_456);
        assert_eq!(parse_brl_to_cents("10"), 1_000);
        assert_eq!(parse_brl_to_cents("0,01"), 1);
    }

    #[test]
    fn garbage_and_non_positive_become_zero() {
        assert_eq!(parse_brl_to_cents(""), 0);
        assert_eq!(parse_brl_to_cents("abc"), 0);
        assert_eq!(parse_brl_to_cents("-5,00"), 0);
        assert_eq!(parse_brl_to_cents("0"), 0);
    }

    #[test]
    fn formats_cents() {
        assert_eq!(format_cents_brl(123_456), "1.234,56");
        assert_eq!(format_cents_brl(1), "0,01");
        assert_eq!(format_cents_brl(-5000), "-50,00");
        assert_eq!(format_cents_brl(100_000_000), "1.000.000,00");
    }
}
