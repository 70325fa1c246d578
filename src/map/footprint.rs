use serde::{Deserialize, Serialize};

const DEFAULT_PIXEL_SCALE: f64 = 0.02;

/// How the reported footprint turns into a circle on the map.
///
/// The feed reports the footprint as a ground diameter in km. The two
/// renderings are not interchangeable: one is a geodesic circle that scales
/// with zoom, the other a fixed-size marker on screen.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FootprintScale {
    /// Geodesic circle with the true ground radius, in metres.
    #[default]
    GroundRadius,
    /// Circle marker with a radius of `footprint * scale` pixels.
    PixelRadius {
        #[serde(default = "default_pixel_scale")]
        scale: f64,
    },
}

fn default_pixel_scale() -> f64 {
    DEFAULT_PIXEL_SCALE
}

impl FootprintScale {
    pub fn radius(&self, footprint_km: f64) -> FootprintRadius {
        match self {
            FootprintScale::GroundRadius => FootprintRadius {
                unit: RadiusUnit::Meters,
                value: footprint_km / 2.0 * 1000.0,
            },
            FootprintScale::PixelRadius { scale } => FootprintRadius {
                unit: RadiusUnit::Pixels,
                value: footprint_km * scale,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RadiusUnit {
    Meters,
    Pixels,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, utoipa::ToSchema)]
pub struct FootprintRadius {
    pub unit: RadiusUnit,
    pub value: f64,
}
