//! Parsing of quantity tokens: integers, decimals, fractions, number words
//! and ranges.

use crate::preprocess::features::number_word;

/// Parses a single number: `"2"`, `"2.5"`, `"1/2"` or `"two"`.
pub fn parse_number(token: &str) -> Option<f64> {
    let token = token.trim();
    if let Some((num, den)) = token.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        return (den != 0.0).then(|| num / den);
    }
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .or_else(|| number_word(token))
}

/// Parses a quantity token into `(value, upper bound)`; the upper bound is
/// set only for ranges like `"1-2"`.
pub fn parse_quantity(token: &str) -> Option<(f64, Option<f64>)> {
    match token.split_once('-') {
        Some((lo, hi)) => {
            let lo = parse_number(lo)?;
            let hi = parse_number(hi)?;
            Some((lo.min(hi), Some(lo.max(hi))))
        }
        None => parse_number(token).map(|v| (v, None)),
    }
}

/// Returns `true` for fraction tokens below one, e.g. `"1/2"`, which
/// extend a preceding whole number.
pub fn is_proper_fraction(token: &str) -> bool {
    token.contains('/') && !token.contains('-') && parse_number(token).is_some_and(|v| v < 1.0)
}

/// Rounds to 4 decimal places.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("2"), Some(2.0));
        assert_eq!(parse_number("2.5"), Some(2.5));
        assert_eq!(parse_number("1/4"), Some(0.25));
        assert_eq!(parse_number("three"), Some(3.0));
        assert_eq!(parse_number("1/0"), None);
        assert_eq!(parse_number("flour"), None);
    }

    #[test]
    fn test_parse_quantity_range() {
        assert_eq!(parse_quantity("1-2"), Some((1.0, Some(2.0))));
        assert_eq!(parse_quantity("3-2"), Some((2.0, Some(3.0))));
        assert_eq!(parse_quantity("1/2-1"), Some((0.5, Some(1.0))));
        assert_eq!(parse_quantity("4"), Some((4.0, None)));
        assert_eq!(parse_quantity("a-b"), None);
    }

    #[test]
    fn test_is_proper_fraction() {
        assert!(is_proper_fraction("1/2"));
        assert!(!is_proper_fraction("3/2"));
        assert!(!is_proper_fraction("2"));
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(round4(1.0), 1.0);
    }
}
