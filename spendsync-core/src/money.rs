//! Amount token parsing.
//!
//! Statement amounts look like `₹1,960`, `+₹500.00` or a bare `350`. Lines may
//! carry other text around the token (`01Oct,2025 PaidtoMyGate ₹4,800`), in
//! which case the number right after the rupee sign is used.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

pub const RUPEE: char = '₹';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("no digits in amount token '{0}'")]
    NoDigits(String),
    #[error("amount '{0}' is not a number")]
    Invalid(String),
}

/// Parse the first amount in `text` into a non-negative decimal.
///
/// Thousands separators and sign prefixes are stripped. When the text contains
/// a rupee sign the digits must directly follow it.
pub fn parse_amount(text: &str) -> Result<Decimal, AmountError> {
    let token = match text.find(RUPEE) {
        Some(idx) => &text[idx + RUPEE.len_utf8()..],
        None => text,
    };

    let digits: String = token
        .trim_start_matches(|c: char| c.is_whitespace() || c == '+' || c == '-')
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .filter(|c| *c != ',')
        .collect();
    let digits = digits.trim_end_matches('.');

    if !digits.chars().any(|c| c.is_ascii_digit()) {
        return Err(AmountError::NoDigits(text.trim().to_string()));
    }

    Decimal::from_str(digits)
        .map(|d| d.abs())
        .map_err(|_| AmountError::Invalid(digits.to_string()))
}

/// True when the line carries a currency-amount token
pub fn has_amount_token(line: &str) -> bool {
    line.contains(RUPEE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_strips_symbol_and_separators() {
        assert_eq!(parse_amount("₹350").unwrap(), dec!(350));
        assert_eq!(parse_amount("₹1,960").unwrap(), dec!(1960));
        assert_eq!(parse_amount("₹ 1,23,456.50").unwrap(), dec!(123456.50));
        assert_eq!(parse_amount("+₹500.00").unwrap(), dec!(500.00));
        assert_eq!(parse_amount("350").unwrap(), dec!(350));
    }

    #[test]
    fn test_uses_number_after_rupee_sign() {
        let amt = parse_amount("01Oct,2025 PaidtoMyGate ₹4,800").unwrap();
        assert_eq!(amt, dec!(4800));
    }

    #[test]
    fn test_malformed_amounts() {
        assert!(matches!(parse_amount("₹abc"), Err(AmountError::NoDigits(_))));
        assert!(matches!(parse_amount("₹,"), Err(AmountError::NoDigits(_))));
        assert!(matches!(parse_amount(""), Err(AmountError::NoDigits(_))));
        assert!(matches!(parse_amount("₹1.2.3"), Err(AmountError::Invalid(_))));
    }

    #[test]
    fn test_trailing_dot() {
        assert_eq!(parse_amount("₹75.").unwrap(), dec!(75));
    }
}
