//! Number formatting for the report table and chart labels

/// Format a standardized sensitivity score
pub fn format_score(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.3}")
    } else {
        "n/a".to_string()
    }
}

/// Format a confidence half-width, or a dash when none was computed
pub fn format_confidence(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("±{v:.3}"),
        Some(_) => "n/a".to_string(),
        None => "-".to_string(),
    }
}

/// Format a fraction as a percentage
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}
