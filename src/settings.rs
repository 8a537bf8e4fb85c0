use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    CONFIG_FILE_NAME, CONFIG_PATH_ENV, DEFAULT_FETCH_TIMEOUT, DEFAULT_PLATES_SOURCE, DEFAULT_PORT,
    MAPBOX_TOKEN_ENV, PAST_HOUR_FEED_URL, PAST_HOUR_RADIUS_SCALE, PAST_WEEK_FEED_URL,
    PAST_WEEK_RADIUS_SCALE,
};
use crate::feed::FeedSource;
use crate::popup::PopupStyle;

/// The two page variants: a week of events with the plates overlay and
/// legend, or the last hour on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedVariant {
    #[default]
    PastWeek,
    PastHour,
}

impl FeedVariant {
    pub fn url(&self) -> &'static str {
        match self {
            FeedVariant::PastWeek => PAST_WEEK_FEED_URL,
            FeedVariant::PastHour => PAST_HOUR_FEED_URL,
        }
    }

    pub fn radius_scale(&self) -> f64 {
        match self {
            FeedVariant::PastWeek => PAST_WEEK_RADIUS_SCALE,
            FeedVariant::PastHour => PAST_HOUR_RADIUS_SCALE,
        }
    }

    fn extras_by_default(&self) -> bool {
        matches!(self, FeedVariant::PastWeek)
    }
}

impl FromStr for FeedVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "past_week" | "week" => Ok(FeedVariant::PastWeek),
            "past_hour" | "hour" => Ok(FeedVariant::PastHour),
            other => Err(format!("unknown feed '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub port: u16,
    pub feed: FeedVariant,
    pub feed_url: Option<String>,
    pub popup_style: PopupStyle,
    pub show_plates: Option<bool>,
    pub show_legend: Option<bool>,
    pub plates_source: String,
    pub fetch_timeout: Duration,
    pub mapbox_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            feed: FeedVariant::default(),
            feed_url: None,
            popup_style: PopupStyle::default(),
            show_plates: None,
            show_legend: None,
            plates_source: DEFAULT_PLATES_SOURCE.to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            mapbox_token: None,
        }
    }
}

impl Settings {
    /// Reads the config file if present, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
            tracing::info!(path = %config_path.display(), "Loaded configuration");
            Self::from_ini_str(&content)
        } else {
            tracing::info!(path = %config_path.display(), "No config file, using defaults");
            Settings::default()
        };

        if let Some(token) = token_from_env() {
            settings.mapbox_token = Some(token);
        }
        Ok(settings)
    }

    /// Parses `key = value` lines. Unknown keys are ignored; bad values keep
    /// the default and are logged.
    pub fn from_ini_str(content: &str) -> Self {
        let mut config_map = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('#') || line.starts_with(';') || line.is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(key.trim().to_string(), value.trim().trim_matches('"').to_string());
            }
        }

        let mut settings = Settings::default();

        if let Some(port) = parse_key::<u16>(&config_map, "port") {
            settings.port = port;
        }
        if let Some(feed) = parse_key::<FeedVariant>(&config_map, "feed") {
            settings.feed = feed;
        }
        if let Some(url) = config_map.get("feed_url").filter(|s| !s.is_empty()) {
            settings.feed_url = Some(url.clone());
        }
        if let Some(style) = parse_key::<PopupStyle>(&config_map, "popup_style") {
            settings.popup_style = style;
        }
        settings.show_plates = parse_key::<bool>(&config_map, "show_plates");
        settings.show_legend = parse_key::<bool>(&config_map, "show_legend");
        if let Some(source) = config_map.get("plates_source").filter(|s| !s.is_empty()) {
            settings.plates_source = source.clone();
        }
        if let Some(secs) = parse_key::<u64>(&config_map, "fetch_timeout_secs") {
            if secs == 0 {
                tracing::warn!("fetch_timeout_secs must be positive, keeping default");
            } else {
                settings.fetch_timeout = Duration::from_secs(secs);
            }
        }
        if let Some(token) = config_map.get("mapbox_token").filter(|s| !s.is_empty()) {
            settings.mapbox_token = Some(token.clone());
        }

        settings
    }

    pub fn feed_url(&self) -> &str {
        self.feed_url.as_deref().unwrap_or_else(|| self.feed.url())
    }

    pub fn radius_scale(&self) -> f64 {
        self.feed.radius_scale()
    }

    pub fn plates_enabled(&self) -> bool {
        self.show_plates.unwrap_or_else(|| self.feed.extras_by_default())
    }

    pub fn legend_enabled(&self) -> bool {
        self.show_legend.unwrap_or_else(|| self.feed.extras_by_default())
    }

    pub fn plates_source(&self) -> Result<FeedSource> {
        FeedSource::from_str(&self.plates_source)
            .map_err(anyhow::Error::msg)
            .context("Invalid plates_source")
    }

    /// `QUAKEMAP_CONFIG` if set, otherwise `quakemap.ini` next to the binary
    /// (the crate root when running from `target/`).
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        let mut path = std::env::current_exe()
            .unwrap_or_default()
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        if path.ends_with("target/debug") || path.ends_with("target/release") {
            path.pop();
            path.pop();
        }
        path.push(CONFIG_FILE_NAME);
        path
    }
}

fn parse_key<T: FromStr>(config_map: &HashMap<String, String>, key: &str) -> Option<T> {
    let raw = config_map.get(key)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring invalid config value");
            None
        }
    }
}

fn token_from_env() -> Option<String> {
    std::env::var(MAPBOX_TOKEN_ENV).ok().filter(|key| !key.is_empty())
}
