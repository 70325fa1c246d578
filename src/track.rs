use serde::Serialize;

/// Geographic coordinate in degrees.
///
/// Serialized as `{"lat": .., "lng": ..}`, which Leaflet accepts wherever it
/// takes a `LatLng`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, utoipa::ToSchema)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Path travelled during this session, oldest point first.
///
/// Append-only: points are never removed, reordered or deduplicated.
#[derive(Debug, Default, Clone)]
pub struct TrackStore {
    points: Vec<LatLng>,
}

impl TrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, point: LatLng) {
        self.points.push(point);
    }

    pub fn as_slice(&self) -> &[LatLng] {
        &self.points
    }

    /// The path, once it has enough points to draw a line.
    pub fn drawable(&self) -> Option<&[LatLng]> {
        (self.points.len() >= 2).then_some(self.points.as_slice())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
