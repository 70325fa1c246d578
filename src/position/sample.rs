use serde::{Deserialize, Serialize};

use crate::track::LatLng;

/// One reading of the tracked object, as reported by the feed.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, utoipa::ToSchema)]
pub struct PositionSample {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Diameter of the visibility circle on the ground, km.
    pub footprint: f64,
    /// km
    pub altitude: f64,
    /// km/h, not reported by every feed.
    #[serde(default)]
    pub velocity: Option<f64>,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    pub visibility: String,
}

impl PositionSample {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

// The feed serves the NORAD id as a number; other feeds quote it.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}
