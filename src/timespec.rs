//! Time-expression parsing.
//!
//! Converts human-readable time expressions into second counts. Two forms are
//! accepted, tried in this order:
//!
//! 1. **Unit-suffixed** — any combination of `h`, `m`, `s` markers
//!    (case-insensitive), each preceded by a numeric literal: `3m`, `1h30m`,
//!    `1h2m3.5s`. Units are always applied hours → minutes → seconds no
//!    matter the order they were written in.
//! 2. **Colon-delimited** — `h:m:s`, `m:s`, or bare seconds: `1:07:40`,
//!    `2:30`, `20`.
//!
//! A single regular-expression tokenizer handles the unit form in one pass, so
//! inputs that mix colons with unit letters (`1:30s`) are rejected as a parse
//! error rather than silently misread.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FramegrabError;

/// Matches an optional `(value, unit)` pair for each of h, m, and s, in that
/// fixed order. The anchors make anything else in the string a non-match.
static UNIT_EXPRESSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:([0-9]*\.?[0-9]+)h)?(?:([0-9]*\.?[0-9]+)m)?(?:([0-9]*\.?[0-9]+)s)?$")
        .expect("unit expression pattern is valid")
});

/// Parse a time expression into non-negative seconds.
///
/// # Errors
///
/// Returns [`FramegrabError::TimeParse`] for empty input, input without
/// digits, negative or non-finite values, and malformed unit or colon forms.
///
/// # Example
///
/// ```
/// assert_eq!(framegrab::timespec::parse("1h2m3s").unwrap(), 3723.0);
/// assert_eq!(framegrab::timespec::parse("2:30").unwrap(), 150.0);
/// ```
pub fn parse(text: &str) -> Result<f64, FramegrabError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(parse_error(text, "expression is empty"));
    }

    let has_unit_letters = trimmed
        .chars()
        .any(|c| matches!(c.to_ascii_lowercase(), 'h' | 'm' | 's'));

    if has_unit_letters {
        parse_unit_form(trimmed).ok_or_else(|| {
            parse_error(
                text,
                "expected a combination of <number>h, <number>m, <number>s",
            )
        })
    } else {
        parse_colon_form(text, trimmed)
    }
}

/// Parse the unit-suffixed form. Returns `None` when the expression does not
/// match the tokenizer or matches without consuming any unit.
fn parse_unit_form(trimmed: &str) -> Option<f64> {
    let captures = UNIT_EXPRESSION.captures(trimmed)?;

    let mut seconds = 0.0;
    let mut matched_any = false;
    for (group, multiplier) in [(1, 3600.0), (2, 60.0), (3, 1.0)] {
        if let Some(value) = captures.get(group) {
            let parsed: f64 = value.as_str().parse().ok()?;
            seconds += parsed * multiplier;
            matched_any = true;
        }
    }

    matched_any.then_some(seconds)
}

/// Parse the colon-delimited form: `h:m:s`, `m:s`, or bare seconds.
fn parse_colon_form(original: &str, trimmed: &str) -> Result<f64, FramegrabError> {
    let parts: Vec<&str> = trimmed.split(':').collect();
    let multipliers: &[f64] = match parts.len() {
        1 => &[1.0],
        2 => &[60.0, 1.0],
        3 => &[3600.0, 60.0, 1.0],
        _ => {
            return Err(parse_error(
                original,
                "expected at most three colon-separated fields",
            ));
        }
    };

    let mut seconds = 0.0;
    for (part, multiplier) in parts.iter().zip(multipliers) {
        let value: f64 = part
            .trim()
            .parse()
            .map_err(|_| parse_error(original, format!("{part:?} is not a number")))?;
        if !value.is_finite() || value < 0.0 {
            return Err(parse_error(
                original,
                format!("{part:?} must be a non-negative finite number"),
            ));
        }
        seconds += value * multiplier;
    }

    Ok(seconds)
}

fn parse_error(input: &str, reason: impl Into<String>) -> FramegrabError {
    FramegrabError::TimeParse {
        input: input.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::parse;

    #[test]
    fn colon_forms() {
        assert_eq!(parse("1:7:40").unwrap(), 4060.0);
        assert_eq!(parse("1:8").unwrap(), 68.0);
        assert_eq!(parse("30").unwrap(), 30.0);
        assert_eq!(parse("2:30").unwrap(), 150.0);
        assert_eq!(parse("0:0:1.5").unwrap(), 1.5);
    }

    #[test]
    fn unit_forms() {
        assert_eq!(parse("3m").unwrap(), 180.0);
        assert_eq!(parse("1h").unwrap(), 3600.0);
        assert_eq!(parse("1h2m3s").unwrap(), 3723.0);
        assert_eq!(parse("90m").unwrap(), 5400.0);
        assert_eq!(parse("2.5s").unwrap(), 2.5);
    }

    #[test]
    fn unit_forms_are_case_insensitive() {
        assert_eq!(parse("1H2M3S").unwrap(), 3723.0);
        assert_eq!(parse("5M").unwrap(), 300.0);
    }

    #[test]
    fn partial_units_contribute_zero_for_the_rest() {
        assert_eq!(parse("1h3s").unwrap(), 3603.0);
        assert_eq!(parse("45s").unwrap(), 45.0);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(parse("  20 ").unwrap(), 20.0);
        assert_eq!(parse(" 3m ").unwrap(), 180.0);
    }

    #[test]
    fn empty_and_digitless_inputs_fail() {
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
        assert!(parse("abc").is_err());
        assert!(parse("h").is_err());
        assert!(parse("::").is_err());
    }

    #[test]
    fn negative_values_fail() {
        assert!(parse("-5").is_err());
        assert!(parse("1:-30").is_err());
        assert!(parse("-3m").is_err());
    }

    #[test]
    fn non_finite_values_fail() {
        assert!(parse("nan").is_err());
        assert!(parse("inf").is_err());
    }

    #[test]
    fn mixing_colons_with_units_fails() {
        assert!(parse("1:30s").is_err());
        assert!(parse("1h:30").is_err());
    }

    #[test]
    fn too_many_colon_fields_fail() {
        assert!(parse("1:2:3:4").is_err());
    }

    #[test]
    fn units_in_the_wrong_order_fail() {
        // Fixed h → m → s evaluation order; out-of-order markers are malformed.
        assert!(parse("3s1h").is_err());
    }
}
