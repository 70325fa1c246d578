//! Display formatting for position samples.
//!
//! Everything here is pure string building; the only environment input is
//! the local timezone used by [`format_timestamp`], taken from `TZ` or the
//! host's zone database entry.

mod icons;
mod tooltip;

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Local, TimeZone};
use chrono_tz::Tz;

pub use icons::VisibilityIcons;
pub use tooltip::{DisplayField, Tooltip, TooltipFormat, TooltipText};

const TIMESTAMP_LAYOUT: &str = "%-d %B %Y %H:%M:%S %Z";

/// Format epoch seconds as a local calendar date and time, e.g.
/// `1 January 2021 01:00:00 CET`.
///
/// When the host zone has no IANA name the label degrades to a numeric offset.
pub fn format_timestamp(epoch_seconds: i64) -> String {
    match local_zone() {
        Some(tz) => format_timestamp_in(epoch_seconds, &tz),
        None => format_timestamp_in(epoch_seconds, &Local),
    }
}

fn local_zone() -> Option<Tz> {
    static LOCAL_ZONE: OnceLock<Option<Tz>> = OnceLock::new();
    *LOCAL_ZONE.get_or_init(|| {
        let zone = std::env::var("TZ")
            .ok()
            .and_then(|name| parse_zone(&name))
            .or_else(|| {
                iana_time_zone::get_timezone()
                    .ok()
                    .and_then(|name| parse_zone(&name))
            });
        match zone {
            Some(tz) => log::debug!("Local timezone is {}", tz.name()),
            None => log::debug!("Local timezone has no IANA name, using numeric offsets"),
        }
        zone
    })
}

/// Parse an IANA zone name, accepting the `:Area/City` form of `TZ`.
fn parse_zone(name: &str) -> Option<Tz> {
    name.trim().trim_start_matches(':').parse().ok()
}

/// Like [`format_timestamp`] but in an explicit timezone.
///
/// Timestamps chrono cannot represent fall back to the raw number.
pub fn format_timestamp_in<Tz>(epoch_seconds: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match DateTime::from_timestamp(epoch_seconds, 0) {
        Some(utc) => utc.with_timezone(tz).format(TIMESTAMP_LAYOUT).to_string(),
        None => epoch_seconds.to_string(),
    }
}

/// Insert a comma every three digits from the right.
///
/// # Examples
/// ```ignore
/// assert_eq!(group_thousands(999), "999");
/// assert_eq!(group_thousands(27_600), "27,600");
/// ```
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

/// Whole km/h with thousands separators. The fraction is truncated.
pub fn group_velocity(velocity: f64) -> String {
    let whole = velocity.trunc();
    if whole.is_finite() && whole >= 0.0 && whole <= u64::MAX as f64 {
        group_thousands(whole as u64)
    } else {
        format!("{}", whole)
    }
}
