//! Popup HTML for earthquake markers.

use chrono::DateTime;
use std::str::FromStr;

use crate::geojson::EarthquakeFeature;

/// Which popup template a deployment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupStyle {
    /// Magnitude, location and a link to the event page.
    #[default]
    Details,
    /// Location heading with the event time below it.
    Timestamp,
}

impl PopupStyle {
    pub fn name(&self) -> &'static str {
        match self {
            PopupStyle::Details => "details",
            PopupStyle::Timestamp => "timestamp",
        }
    }

    pub fn render(&self, quake: &EarthquakeFeature) -> String {
        match self {
            PopupStyle::Details => details_popup(quake),
            PopupStyle::Timestamp => timestamp_popup(quake),
        }
    }
}

impl FromStr for PopupStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "details" => Ok(PopupStyle::Details),
            "timestamp" | "time" => Ok(PopupStyle::Timestamp),
            other => Err(format!("unknown popup style '{}'", other)),
        }
    }
}

fn details_popup(quake: &EarthquakeFeature) -> String {
    let mut html = format!(
        "<b>Magnitude:</b> {}<br><b>Location:</b> {}",
        quake.magnitude,
        escape_html(&quake.place)
    );
    if let Some(url) = &quake.detail_url {
        html.push_str(&format!("<br><a href='{}'>More info</a>", escape_html(url)));
    }
    html
}

fn timestamp_popup(quake: &EarthquakeFeature) -> String {
    format!(
        "<h3>{}</h3><hr><p>{}</p>",
        escape_html(&quake.place),
        format_event_time(quake.time_epoch_millis)
    )
}

/// Event time in UTC, e.g. `Mon May 20 2024 12:03:32 UTC`.
pub fn format_event_time(epoch_millis: Option<i64>) -> String {
    epoch_millis
        .and_then(DateTime::from_timestamp_millis)
        .map(|time| time.format("%a %b %d %Y %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Time unknown".to_string())
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
