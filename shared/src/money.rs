//! Money parsing and formatting for the budgeting app.
//!
//! Amounts enter the system exactly once, through [`parse_amount`], and are
//! `Decimal` from then on. Form inputs may carry a rupee symbol, commas and
//! stray spaces; stored values never do. Display formatting follows the
//! en-IN numbering convention (last three digits, then groups of two).

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Errors produced at the amount-parsing boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum MoneyError {
    EmptyAmount,
    InvalidFormat(String),
    TooManyDecimalPlaces,
    AmountNotPositive,
}

impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyError::EmptyAmount => write!(f, "Amount is required"),
            MoneyError::InvalidFormat(msg) => write!(f, "Invalid amount: {}", msg),
            MoneyError::TooManyDecimalPlaces => {
                write!(f, "Amount can have at most 2 decimal places")
            }
            MoneyError::AmountNotPositive => write!(f, "Amount must be greater than 0"),
        }
    }
}

impl std::error::Error for MoneyError {}

/// Parse a raw amount string from a form input into an exact decimal.
///
/// Strips the rupee symbol, thousands separators and whitespace before
/// parsing. Rejects values with more than two significant decimal places;
/// currency amounts are decimals with two implied fractional digits.
pub fn parse_amount(input: &str) -> Result<Decimal, MoneyError> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| *c != '₹' && *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(MoneyError::EmptyAmount);
    }

    let amount =
        Decimal::from_str(&cleaned).map_err(|e| MoneyError::InvalidFormat(e.to_string()))?;

    // normalize() drops trailing zeros, so "1.230" is still two places.
    let amount = amount.normalize();
    if amount.scale() > 2 {
        return Err(MoneyError::TooManyDecimalPlaces);
    }

    Ok(amount)
}

/// Parse an amount that must be strictly positive (income, expenses,
/// category allocations).
pub fn parse_positive_amount(input: &str) -> Result<Decimal, MoneyError> {
    let amount = parse_amount(input)?;
    if amount <= Decimal::ZERO {
        return Err(MoneyError::AmountNotPositive);
    }
    Ok(amount)
}

/// Format a decimal amount with en-IN digit grouping and two decimal
/// places, e.g. `1234567.5` → `"12,34,567.50"`.
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative();
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (text, "00".to_string()),
    };

    let grouped = group_indian(&int_part);
    if negative {
        format!("-{}.{}", grouped, frac_part)
    } else {
        format!("{}.{}", grouped, frac_part)
    }
}

/// Group an unsigned integer string Indian-style: the last three digits
/// together, every two digits before that.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount_plain_and_decorated() {
        assert_eq!(parse_amount("10.50").unwrap(), dec!(10.50));
        assert_eq!(parse_amount("₹10.50").unwrap(), dec!(10.50));
        assert_eq!(parse_amount(" ₹1,234.56 ").unwrap(), dec!(1234.56));
        assert_eq!(parse_amount("5").unwrap(), dec!(5));
        assert_eq!(parse_amount("10000").unwrap(), dec!(10000));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount(""), Err(MoneyError::EmptyAmount));
        assert_eq!(parse_amount("   "), Err(MoneyError::EmptyAmount));
        assert!(matches!(
            parse_amount("abc"),
            Err(MoneyError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_amount("12.3.4"),
            Err(MoneyError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_amount_rejects_sub_paise_precision() {
        assert_eq!(parse_amount("1.234"), Err(MoneyError::TooManyDecimalPlaces));
        // Trailing zeros are not significant.
        assert_eq!(parse_amount("1.230").unwrap(), dec!(1.23));
    }

    #[test]
    fn test_parse_positive_amount() {
        assert_eq!(parse_positive_amount("3000").unwrap(), dec!(3000));
        assert_eq!(
            parse_positive_amount("0"),
            Err(MoneyError::AmountNotPositive)
        );
        assert_eq!(
            parse_positive_amount("-5.00"),
            Err(MoneyError::AmountNotPositive)
        );
    }

    #[test]
    fn test_format_inr_lakh_crore_grouping() {
        assert_eq!(format_inr(dec!(123)), "123.00");
        assert_eq!(format_inr(dec!(1000)), "1,000.00");
        assert_eq!(format_inr(dec!(123456)), "1,23,456.00");
        assert_eq!(format_inr(dec!(1234567.5)), "12,34,567.50");
        assert_eq!(format_inr(dec!(10000000)), "1,00,00,000.00");
    }

    #[test]
    fn test_format_inr_negative() {
        assert_eq!(format_inr(dec!(-1234)), "-1,234.00");
    }
}
