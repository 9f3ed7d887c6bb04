/// Placeholder printed wherever a value the service should have sent is missing.
pub const PLACEHOLDER: &str = "N/D";

/// Formats a number the way the web UI prints JSON numbers: integers
/// without decimals, anything else rounded to two decimals with trailing zeros
/// trimmed. Non-finite values print as the placeholder.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    if rounded.fract() == 0.0 {
        return format!("{rounded:.0}");
    }
    let text = format!("{rounded:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// `format_number` for optional values.
pub fn format_optional(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_else(|| PLACEHOLDER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_have_no_decimals() {
        assert_eq!(format_number(78.0), "78");
        assert_eq!(format_number(1450.0), "1450");
    }

    #[test]
    fn test_fractions_are_trimmed() {
        assert_eq!(format_number(45.5), "45.5");
        assert_eq!(format_number(1796.034), "1796.03");
        assert_eq!(format_number(12.999), "13");
    }

    #[test]
    fn test_negative_zero_and_non_finite() {
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), PLACEHOLDER);
        assert_eq!(format_optional(None), PLACEHOLDER);
    }
}
