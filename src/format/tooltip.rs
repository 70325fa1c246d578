use std::fmt;

use askama::Template;
use chrono::TimeZone;
use serde::{Deserialize, Serialize};

use super::{format_timestamp, format_timestamp_in, group_velocity, VisibilityIcons};
use crate::position::PositionSample;

const LOADING_HTML: &str = "<p>Loading data ...</p>";
const LOADING_PLAIN: &str = "Loading data ...";
const FETCH_FAILED_HTML: &str = "<p><span style=\"font-size: 20px\">&#9201;</span><br>There are too many data requests at present.<br>Try again later.</p>";
const FETCH_FAILED_PLAIN: &str =
    "\u{23F1} There are too many data requests at present. Try again later.";

/// Sample fields that may appear in the tooltip, in display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DisplayField {
    Id,
    Latitude,
    Longitude,
    Altitude,
    Velocity,
    Timestamp,
}

impl DisplayField {
    pub const ALL: [DisplayField; 6] = [
        DisplayField::Id,
        DisplayField::Latitude,
        DisplayField::Longitude,
        DisplayField::Altitude,
        DisplayField::Velocity,
        DisplayField::Timestamp,
    ];
}

/// Tooltip content in both renderings the map collaborators understand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct TooltipText {
    pub html: String,
    pub plain: String,
}

impl TooltipText {
    pub fn loading() -> Self {
        Self {
            html: LOADING_HTML.to_string(),
            plain: LOADING_PLAIN.to_string(),
        }
    }

    /// Shown whenever a fetch fails, whatever the cause.
    pub fn fetch_failed() -> Self {
        Self {
            html: FETCH_FAILED_HTML.to_string(),
            plain: FETCH_FAILED_PLAIN.to_string(),
        }
    }
}

/// Which fields to show and how to label them.
#[derive(Debug, Clone)]
pub struct TooltipFormat {
    pub label: String,
    pub fields: Vec<DisplayField>,
    pub icons: VisibilityIcons,
}

impl TooltipFormat {
    /// Render with timestamps in the host's local zone.
    pub fn render(&self, sample: &PositionSample) -> Tooltip {
        self.build(sample, format_timestamp)
    }

    pub fn render_in<Tz>(&self, sample: &PositionSample, tz: &Tz) -> Tooltip
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.build(sample, |epoch_seconds| format_timestamp_in(epoch_seconds, tz))
    }

    fn build(&self, sample: &PositionSample, stamp: impl Fn(i64) -> String) -> Tooltip {
        let mut lines = Vec::new();
        let mut timestamp = None;

        for field in &self.fields {
            match field {
                DisplayField::Id => lines.push((format!("{} id", self.label), sample.id.clone())),
                DisplayField::Latitude => {
                    lines.push(("latitude".into(), format!("{:.3}°", sample.latitude)))
                }
                DisplayField::Longitude => {
                    lines.push(("longitude".into(), format!("{:.3}°", sample.longitude)))
                }
                DisplayField::Altitude => {
                    lines.push(("altitude".into(), format!("{:.3} km", sample.altitude)))
                }
                DisplayField::Velocity => {
                    if let Some(v) = sample.velocity {
                        lines.push(("velocity".into(), format!("{} km/h", group_velocity(v))));
                    }
                }
                DisplayField::Timestamp => {
                    timestamp = Some(stamp(sample.timestamp));
                }
            }
        }

        Tooltip {
            icon: self.icons.icon(&sample.visibility).to_string(),
            lines: lines.into_iter().map(|(label, value)| TooltipLine { label, value }).collect(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct TooltipLine {
    label: String,
    value: String,
}

/// Display text for one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    icon: String,
    lines: Vec<TooltipLine>,
    timestamp: Option<String>,
}

#[derive(Template)]
#[template(path = "tooltip.html")]
struct TooltipHtml<'a> {
    icon: &'a str,
    lines: &'a [TooltipLine],
    timestamp: Option<&'a str>,
}

impl Tooltip {
    pub fn to_html(&self) -> Result<String, askama::Error> {
        TooltipHtml {
            icon: &self.icon,
            lines: &self.lines,
            timestamp: self.timestamp.as_deref(),
        }
        .render()
    }

    pub fn to_plain(&self) -> String {
        let mut parts: Vec<String> = self
            .lines
            .iter()
            .map(|line| format!("{}: {}", line.label, line.value))
            .collect();
        if let Some(ts) = &self.timestamp {
            parts.push(ts.clone());
        }
        if !self.icon.is_empty() {
            parts.insert(0, self.icon.clone());
        }
        parts.join(" | ")
    }

    pub fn text(&self) -> Result<TooltipText, askama::Error> {
        Ok(TooltipText {
            html: self.to_html()?,
            plain: self.to_plain(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn iss_sample() -> PositionSample {
        PositionSample {
            id: "25544".into(),
            latitude: 10.0,
            longitude: 20.0,
            footprint: 4500.0,
            altitude: 400.5,
            velocity: Some(27500.0),
            timestamp: 1609459200,
            visibility: "daylight".into(),
        }
    }

    fn iss_format() -> TooltipFormat {
        TooltipFormat {
            label: "ISS".into(),
            fields: DisplayField::ALL.to_vec(),
            icons: VisibilityIcons::default(),
        }
    }

    #[test]
    fn test_html_contains_all_fields() {
        let html = iss_format().render_in(&iss_sample(), &Utc).to_html().unwrap();
        assert!(html.starts_with("<p><span style=\"font-size: 20px\">\u{1F315}</span><br>"));
        assert!(html.contains("<strong>ISS id</strong>: 25544"));
        assert!(html.contains("<strong>latitude</strong>: 10.000°"));
        assert!(html.contains("<strong>longitude</strong>: 20.000°"));
        assert!(html.contains("<strong>altitude</strong>: 400.500 km"));
        assert!(html.contains("<strong>velocity</strong>: 27,500 km/h"));
        assert!(html.contains("1 January 2021 00:00:00 UTC"));
        assert!(html.ends_with("</p>"));
    }

    #[test]
    fn test_plain_rendering() {
        let plain = iss_format().render_in(&iss_sample(), &Utc).to_plain();
        assert_eq!(
            plain,
            "\u{1F315} | ISS id: 25544 | latitude: 10.000° | longitude: 20.000° | \
             altitude: 400.500 km | velocity: 27,500 km/h | 1 January 2021 00:00:00 UTC"
        );
    }

    #[test]
    fn test_missing_velocity_is_skipped() {
        let mut sample = iss_sample();
        sample.velocity = None;
        let html = iss_format().render_in(&sample, &Utc).to_html().unwrap();
        assert!(!html.contains("velocity"));
        assert!(html.contains("altitude"));
    }

    #[test]
    fn test_field_selection() {
        let format = TooltipFormat {
            fields: vec![DisplayField::Latitude, DisplayField::Longitude],
            ..iss_format()
        };
        let plain = format.render_in(&iss_sample(), &Utc).to_plain();
        assert_eq!(plain, "\u{1F315} | latitude: 10.000° | longitude: 20.000°");
    }

    #[test]
    fn test_unknown_visibility_has_no_icon() {
        let mut sample = iss_sample();
        sample.visibility = "unknown".into();
        let tooltip = iss_format().render_in(&sample, &Utc);
        assert!(tooltip.to_html().unwrap().starts_with("<p><strong>"));
        assert!(tooltip.to_plain().starts_with("ISS id"));
    }

    #[test]
    fn test_id_is_escaped() {
        let mut sample = iss_sample();
        sample.id = "<script>".into();
        let html = iss_format().render_in(&sample, &Utc).to_html().unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_configured_icon_is_escaped() {
        let format = TooltipFormat {
            icons: VisibilityIcons::from_pairs([("daylight", "<img src=x onerror=alert(1)>")]),
            ..iss_format()
        };
        let html = format.render_in(&iss_sample(), &Utc).to_html().unwrap();
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }

    #[test]
    fn test_text_carries_both_renderings() {
        let text = iss_format().render_in(&iss_sample(), &Utc).text().unwrap();
        assert!(text.html.starts_with("<p>"));
        assert!(text.plain.starts_with("\u{1F315} | ISS id: 25544"));
    }

    #[test]
    fn test_fixed_messages() {
        assert_eq!(TooltipText::loading().html, "<p>Loading data ...</p>");
        let failed = TooltipText::fetch_failed();
        assert!(failed.html.contains("too many data requests"));
        assert!(failed.plain.contains("Try again later."));
    }

    #[test]
    fn test_display_field_names() {
        assert_eq!(DisplayField::Timestamp.to_string(), "timestamp");
        let parsed: Vec<DisplayField> = serde_yaml::from_str("[id, velocity]").unwrap();
        assert_eq!(parsed, vec![DisplayField::Id, DisplayField::Velocity]);
    }
}
