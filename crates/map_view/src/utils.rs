use chrono::{DateTime, Datelike, NaiveDate};

/// Renders the year of an ISO-8601 date or timestamp. Empty for missing input.
pub fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return String::new();
    };
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.year().to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.year().to_string();
    }
    raw.split('-').next().unwrap_or(raw).to_string()
}

/// Shortens `text` to at most `max_len` characters, breaking at the last whitespace when
/// there is one, and marks the cut with ` ...`.
pub fn truncate(text: Option<&str>, max_len: usize) -> String {
    let Some(text) = text else {
        return String::new();
    };
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_len).collect();
    let kept = match cut.rfind(char::is_whitespace) {
        Some(boundary) if boundary > 0 => &cut[..boundary],
        _ => cut.as_str(),
    };
    format!("{} ...", kept.trim_end())
}
