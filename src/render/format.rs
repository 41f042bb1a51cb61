use serde_json::Value;
use std::fmt;

/// Placeholder for missing preview cells
pub const MISSING: &str = "N/A";

/// Preview cell text; missing and null cells become [`MISSING`]
pub fn format_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING.to_string(),
        Some(v) => format_scalar(v),
    }
}

/// Plain text of a JSON scalar
///
/// Integral floats print without a fractional part (`3.0` shows as `3`),
/// matching how the backend's numbers read in a browser.
pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if n.is_f64() {
                n.as_f64().map(format_float).unwrap_or_else(|| n.to_string())
            } else {
                n.to_string()
            }
        }
        other => other.to_string(),
    }
}

fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

/// Summary statistic text: numbers at four decimals, anything else verbatim
pub fn format_stat(value: &Value) -> String {
    match value.as_f64() {
        Some(v) => format!("{v:.4}"),
        None => format_scalar(value),
    }
}

/// Correlation cell text at two decimals
pub fn format_coefficient(value: f64) -> String {
    format!("{value:.2}")
}

/// Append a timestamp query parameter so a re-generated plot is refetched
pub fn cache_busted(url: &str, timestamp_millis: i64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}t={timestamp_millis}")
}

/// Color with straight alpha in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

pub const POSITIVE_TINT: (u8, u8, u8) = (76, 175, 80);
pub const NEGATIVE_TINT: (u8, u8, u8) = (244, 67, 54);

impl Rgba {
    pub fn new((r, g, b): (u8, u8, u8), a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Blend over an opaque background
    pub fn over(&self, (br, bg, bb): (u8, u8, u8)) -> (u8, u8, u8) {
        let a = self.a.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f64 * a + bg as f64 * (1.0 - a)).round() as u8;
        (mix(self.r, br), mix(self.g, bg), mix(self.b, bb))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Background encoding sign (green positive, red otherwise) and magnitude
/// (alpha) of a coefficient in `[-1, 1]`
pub fn correlation_color(value: f64) -> Rgba {
    let tint = if value > 0.0 { POSITIVE_TINT } else { NEGATIVE_TINT };
    Rgba::new(tint, value.abs().min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_placeholder() {
        assert_eq!(format_cell(None), "N/A");
        assert_eq!(format_cell(Some(&Value::Null)), "N/A");
        assert_eq!(format_cell(Some(&json!(""))), "");
        assert_eq!(format_cell(Some(&json!(0))), "0");
    }

    #[test]
    fn test_scalar_numbers() {
        assert_eq!(format_scalar(&json!(42)), "42");
        assert_eq!(format_scalar(&json!(3.0)), "3");
        assert_eq!(format_scalar(&json!(2.5)), "2.5");
        assert_eq!(format_scalar(&json!(-7)), "-7");
        assert_eq!(format_scalar(&json!(true)), "true");
        assert_eq!(format_scalar(&json!("text")), "text");
    }

    #[test]
    fn test_stat_formatting() {
        assert_eq!(format_stat(&json!(1234.5)), "1234.5000");
        assert_eq!(format_stat(&json!(8)), "8.0000");
        assert_eq!(format_stat(&json!("2024-01-01")), "2024-01-01");
        // Non-numbers pass through as the backend sent them
        assert_eq!(format_stat(&Value::Null), "null");
        assert_eq!(format_stat(&json!(false)), "false");
    }

    #[test]
    fn test_coefficient_formatting() {
        assert_eq!(format_coefficient(0.5), "0.50");
        assert_eq!(format_coefficient(-0.126), "-0.13");
        assert_eq!(format_coefficient(1.0), "1.00");
    }

    #[test]
    fn test_cache_busting() {
        assert_eq!(cache_busted("/static/a.png", 17), "/static/a.png?t=17");
        assert_eq!(cache_busted("/static/a.png?v=2", 17), "/static/a.png?v=2&t=17");
    }

    #[test]
    fn test_correlation_color() {
        let c = correlation_color(0.5);
        assert_eq!((c.r, c.g, c.b), POSITIVE_TINT);
        assert_eq!(c.a, 0.5);
        assert_eq!(c.to_string(), "rgba(76, 175, 80, 0.5)");

        let c = correlation_color(-0.25);
        assert_eq!((c.r, c.g, c.b), NEGATIVE_TINT);
        assert_eq!(c.a, 0.25);
    }

    #[test]
    fn test_blend_over_background() {
        let c = Rgba::new((200, 100, 0), 0.5);
        assert_eq!(c.over((0, 0, 0)), (100, 50, 0));
        assert_eq!(Rgba::new((200, 100, 0), 0.0).over((10, 20, 30)), (10, 20, 30));
    }
}
