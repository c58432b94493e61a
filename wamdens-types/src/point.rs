use serde::{Deserialize, Serialize};

/// The 4-D point a single density lookup asks about.
///
/// Spatial coordinates follow the snapshot grid conventions: height in
/// kilometers, geodetic latitude in degrees within [-90, 90], longitude in
/// degrees within [0, 360). Time is an offset in minutes from the scenario
/// start, so the same point can be replayed against any scenario.
///
/// # Examples
///
/// ```
/// use wamdens_types::point::QueryPoint;
///
/// // A satellite position 85.3 minutes into the scenario
/// let query = QueryPoint::new(85.3, 150.0, 45.0, 195.0);
/// assert_eq!(query.height_km, 150.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryPoint {
    /// Offset from the scenario start, in minutes.
    pub epoch_minutes: f64,
    /// Altitude above the reference ellipsoid, in kilometers.
    pub height_km: f64,
    /// Geodetic latitude in degrees, [-90, 90].
    pub latitude_deg: f64,
    /// Longitude in degrees, [0, 360).
    pub longitude_deg: f64,
}

impl QueryPoint {
    /// Create a query point from its four components.
    pub fn new(epoch_minutes: f64, height_km: f64, latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            epoch_minutes,
            height_km,
            latitude_deg,
            longitude_deg,
        }
    }

    /// The spatial components as an `(height, lat, lon)` triple.
    pub fn spatial(&self) -> (f64, f64, f64) {
        (self.height_km, self.latitude_deg, self.longitude_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_point_accessors() {
        let q = QueryPoint::new(5.0, 150.0, 45.0, 195.0);
        assert_eq!(q.epoch_minutes, 5.0);
        assert_eq!(q.spatial(), (150.0, 45.0, 195.0));
    }

    #[test]
    fn test_query_point_serde_roundtrip() {
        let q = QueryPoint::new(85.3, 150.0, -12.5, 300.0);
        let json = serde_json::to_string(&q).unwrap();
        let back: QueryPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
    }
}
