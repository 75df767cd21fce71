use thiserror::Error;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// For EUR/USD, 1 unit = 100 cents, so €50.00 = 5000 cents.
pub type Cents = i64;

/// Sums of many entries can leave the `Cents` range, so they are kept wider.
pub type CentsSum = i128;

/// Format cents as a human-readable amount.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    format_cents_sum(CentsSum::from(cents))
}

/// Same as [`format_cents`] for a wide sum.
pub fn format_cents_sum(cents: CentsSum) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Parse a signed decimal string into cents.
/// Example: "50.00" -> 5000, "-12.5" -> -1250, "100" -> 10000
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    let (units_str, decimal_str) = match digits.split_once('.') {
        Some((units, decimal)) => (units, decimal),
        None => (digits, ""),
    };

    // Also rejects a second '.'
    if (units_str.is_empty() && decimal_str.is_empty())
        || !units_str.chars().chain(decimal_str.chars()).all(|c| c.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat(input.to_string()));
    }
    if decimal_str.len() > 2 {
        return Err(ParseCentsError::TooPrecise(input.to_string()));
    }

    let out_of_range = || ParseCentsError::OutOfRange(input.to_string());

    let units: CentsSum = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| out_of_range())?
    };
    // "5" after the point means 50 cents
    let decimal_cents: CentsSum = match decimal_str.len() {
        0 => 0,
        1 => decimal_str.parse::<CentsSum>().unwrap_or(0) * 10,
        _ => decimal_str.parse().unwrap_or(0),
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimal_cents))
        .ok_or_else(out_of_range)?;
    let cents = if negative { -cents } else { cents };
    Cents::try_from(cents).map_err(|_| out_of_range())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCentsError {
    #[error("invalid money format: '{0}'")]
    InvalidFormat(String),

    #[error("at most two decimal places are allowed: '{0}'")]
    TooPrecise(String),

    #[error("amount out of range: '{0}'")]
    OutOfRange(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(5000), "50.00");
        assert_eq!(format_cents(1234), "12.34");
        assert_eq!(format_cents(1), "0.01");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-5000), "-50.00");
        assert_eq!(format_cents(-1), "-0.01");
        assert_eq!(format_cents(i64::MIN), "-92233720368547758.08");
        assert_eq!(format_cents_sum(i128::from(i64::MAX) + 1), "92233720368547758.08");
    }

    #[test]
    fn test_parse_cents_range_limits() {
        assert_eq!(parse_cents(&format_cents(i64::MIN)), Ok(i64::MIN));
        assert_eq!(parse_cents(&format_cents(i64::MAX)), Ok(i64::MAX));
        assert!(matches!(
            parse_cents("92233720368547758.08"),
            Err(ParseCentsError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_cents("-92233720368547758.09"),
            Err(ParseCentsError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("50.00"), Ok(5000));
        assert_eq!(parse_cents("50"), Ok(5000));
        assert_eq!(parse_cents("12.5"), Ok(1250));
        assert_eq!(parse_cents(".50"), Ok(50));
        assert_eq!(parse_cents("-30"), Ok(-3000));
        assert_eq!(parse_cents("+0.01"), Ok(1));
        assert_eq!(parse_cents(" 0 "), Ok(0));
    }

    #[test]
    fn test_parse_cents_invalid() {
        assert!(matches!(parse_cents("abc"), Err(ParseCentsError::InvalidFormat(_))));
        assert!(matches!(parse_cents("12.34.56"), Err(ParseCentsError::InvalidFormat(_))));
        assert!(matches!(parse_cents("1.2.3"), Err(ParseCentsError::InvalidFormat(_))));
        assert!(matches!(parse_cents("-"), Err(ParseCentsError::InvalidFormat(_))));
        assert!(matches!(parse_cents("1.005"), Err(ParseCentsError::TooPrecise(_))));
        assert!(matches!(
            parse_cents("99999999999999999999"),
            Err(ParseCentsError::OutOfRange(_))
        ));
    }
}
