use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

pub const SETTINGS_FILE: &str = "map.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub query_name: String,
    pub default_user_query: String,
    pub rows: u32,
    /// Clause appended to every user query so only located documents come back.
    pub location_filter: String,
    pub max_field_length: usize,
    pub force_start_location: bool,
    pub start_latitude: f64,
    pub start_longitude: f64,
    pub start_zoom: u8,
    pub show_messages: bool,
    pub show_errors: bool,
    pub solr_url: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            query_name: "defaultQuery".into(),
            default_user_query: "*:*".into(),
            rows: 5000,
            location_filter: "+location_0_coordinate:[* TO *]".into(),
            max_field_length: 250,
            force_start_location: false,
            start_latitude: -32.3456,
            start_longitude: 141.4346,
            start_zoom: 8,
            show_messages: true,
            show_errors: true,
            solr_url: None,
            request_timeout_secs: 10,
        }
    }
}

/// Reads `map.toml` from the working directory when present, then applies `APP__*`
/// environment overrides. An unreadable file falls back to defaults.
pub fn load_settings() -> MapSettings {
    let mut settings = if Path::new(SETTINGS_FILE).exists() {
        load_settings_from(SETTINGS_FILE).unwrap_or_else(|err| {
            tracing::warn!("ignoring {SETTINGS_FILE}: {err:#}");
            MapSettings::default()
        })
    } else {
        MapSettings::default()
    };
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings
}

pub fn load_settings_from(path: impl AsRef<Path>) -> anyhow::Result<MapSettings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn apply_env_overrides(settings: &mut MapSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("APP__QUERY_NAME") {
        settings.query_name = v;
    }
    if let Some(v) = lookup("APP__DEFAULT_USER_QUERY") {
        settings.default_user_query = v;
    }
    if let Some(v) = lookup("APP__ROWS").and_then(|v| v.parse().ok()) {
        settings.rows = v;
    }
    if let Some(v) = lookup("APP__LOCATION_FILTER") {
        settings.location_filter = v;
    }
    if let Some(v) = lookup("APP__MAX_FIELD_LENGTH").and_then(|v| v.parse().ok()) {
        settings.max_field_length = v;
    }
    if let Some(v) = lookup("APP__MAP_FORCE_START_LOCATION").and_then(|v| parse_flag(&v)) {
        settings.force_start_location = v;
    }
    if let Some(v) = lookup("APP__MAP_START_LATITUDE").and_then(|v| v.parse().ok()) {
        settings.start_latitude = v;
    }
    if let Some(v) = lookup("APP__MAP_START_LONGITUDE").and_then(|v| v.parse().ok()) {
        settings.start_longitude = v;
    }
    if let Some(v) = lookup("APP__MAP_START_ZOOM").and_then(|v| v.parse().ok()) {
        settings.start_zoom = v;
    }
    if let Some(v) = lookup("APP__SHOW_MESSAGES").and_then(|v| parse_flag(&v)) {
        settings.show_messages = v;
    }
    if let Some(v) = lookup("APP__SHOW_ERRORS").and_then(|v| parse_flag(&v)) {
        settings.show_errors = v;
    }
    if let Some(v) = lookup("APP__SOLR_URL") {
        settings.solr_url = Some(v);
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        settings.request_timeout_secs = v;
    }
}
