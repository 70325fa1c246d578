//! Day/night terminator for a world map.
//!
//! The sun's apparent position comes from the low-precision almanac
//! formulas; sidereal time from `sgp4`. Accuracy is well under a degree,
//! which is plenty for a shaded overlay.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::track::LatLng;

const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

const SUN_MEAN_LONGITUDE_DEG: f64 = 280.460;
const SUN_MEAN_LONGITUDE_RATE: f64 = 0.985_647_4;
const SUN_MEAN_ANOMALY_DEG: f64 = 357.528;
const SUN_MEAN_ANOMALY_RATE: f64 = 0.985_600_3;
const OBLIQUITY_DEG: f64 = 23.439;
const OBLIQUITY_RATE: f64 = 0.000_000_4;

const MIN_TAN_DECLINATION: f64 = 1e-9;

/// Night-side polygon at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct Terminator {
    pub computed_at: DateTime<Utc>,
    /// Point where the sun is at the zenith.
    pub subsolar: LatLng,
    /// Terminator line west to east, closed over the pole in darkness.
    pub polygon: Vec<LatLng>,
}

impl Terminator {
    pub fn at(time: DateTime<Utc>, resolution_deg: f64) -> Self {
        let julian_years = sgp4::julian_years_since_j2000(&time.naive_utc());
        let gmst_deg = sgp4::iau_epoch_to_sidereal_time(julian_years).to_degrees();
        let (right_ascension_deg, declination_deg) =
            sun_equatorial_position(julian_years * DAYS_PER_JULIAN_YEAR);

        let subsolar_lng = normalize_longitude(right_ascension_deg - gmst_deg);
        let steps = (360.0 / resolution_deg).ceil().max(1.0) as usize;

        let mut polygon: Vec<LatLng> = (0..=steps)
            .map(|i| {
                let lng = (-180.0 + i as f64 * resolution_deg).min(180.0);
                let lat = terminator_latitude(lng - subsolar_lng, declination_deg);
                LatLng::new(lat, lng)
            })
            .collect();

        let dark_pole = if declination_deg > 0.0 { -90.0 } else { 90.0 };
        polygon.push(LatLng::new(dark_pole, 180.0));
        polygon.push(LatLng::new(dark_pole, -180.0));

        Terminator {
            computed_at: time,
            subsolar: LatLng::new(declination_deg, subsolar_lng),
            polygon,
        }
    }
}

/// Right ascension and declination of the sun, degrees.
fn sun_equatorial_position(days_since_j2000: f64) -> (f64, f64) {
    let n = days_since_j2000;
    let mean_longitude = (SUN_MEAN_LONGITUDE_DEG + SUN_MEAN_LONGITUDE_RATE * n).rem_euclid(360.0);
    let mean_anomaly = (SUN_MEAN_ANOMALY_DEG + SUN_MEAN_ANOMALY_RATE * n)
        .rem_euclid(360.0)
        .to_radians();

    let ecliptic_longitude = (mean_longitude
        + 1.915 * mean_anomaly.sin()
        + 0.020 * (2.0 * mean_anomaly).sin())
    .to_radians();
    let obliquity = (OBLIQUITY_DEG - OBLIQUITY_RATE * n).to_radians();

    let right_ascension = (obliquity.cos() * ecliptic_longitude.sin())
        .atan2(ecliptic_longitude.cos())
        .to_degrees();
    let declination = (obliquity.sin() * ecliptic_longitude.sin())
        .asin()
        .to_degrees();

    (right_ascension, declination)
}

fn terminator_latitude(hour_angle_deg: f64, declination_deg: f64) -> f64 {
    let mut tan_dec = declination_deg.to_radians().tan();
    if tan_dec.abs() < MIN_TAN_DECLINATION {
        tan_dec = MIN_TAN_DECLINATION.copysign(tan_dec);
    }
    (-hour_angle_deg.to_radians().cos() / tan_dec)
        .atan()
        .to_degrees()
}

fn normalize_longitude(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}
