//! Geographic coordinate type and spatial utilities ("GeoMath").
//!
//! `GeoPoint` uses `f64` latitude/longitude (degrees).  Routing-grade
//! distances are summed across many segments per query, so the extra
//! precision over `f32` keeps accumulated rounding error well under the
//! ≤1e-6 scalar-cost tolerance required of the search (§8).

/// A WGS-84 geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    ///
    /// `d = 2R · atan2(√a, √(1−a))`, `a = sin²(Δφ/2) + cosφ₁·cosφ₂·sin²(Δλ/2)`,
    /// `R = 6 371 000 m`. Deterministic and symmetric.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// Approximate bounding-box check — much cheaper than `distance_m` for
    /// quick rejection before a full geodesic comparison.
    #[inline]
    pub fn within_bbox(self, center: GeoPoint, half_deg: f64) -> bool {
        (self.lat - center.lat).abs() <= half_deg && (self.lon - center.lon).abs() <= half_deg
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Projection of a point onto a polyline: the index of the nearest vertex
/// and the cumulative distance from the polyline's start to that vertex.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PolylineProjection {
    pub segment_index: usize,
    pub cumulative_distance_m: f64,
}

/// Project `point` onto `polyline`, returning the nearest vertex and the
/// cumulative distance from the polyline's start to that vertex.
///
/// Ties break toward the earliest vertex. O(n) per call; `polyline` must be
/// non-empty.
pub fn project_point_onto_polyline(point: GeoPoint, polyline: &[GeoPoint]) -> Option<PolylineProjection> {
    if polyline.is_empty() {
        return None;
    }

    let mut best_index = 0;
    let mut best_dist = f64::INFINITY;
    let mut cumulative = vec![0.0_f64; polyline.len()];

    for i in 1..polyline.len() {
        cumulative[i] = cumulative[i - 1] + polyline[i - 1].distance_m(polyline[i]);
    }

    for (i, &vertex) in polyline.iter().enumerate() {
        let d = point.distance_m(vertex);
        if d < best_dist {
            best_dist = d;
            best_index = i;
        }
    }

    Some(PolylineProjection {
        segment_index: best_index,
        cumulative_distance_m: cumulative[best_index],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_symmetric_and_zero_at_same_point() {
        let a = GeoPoint::new(12.9, 77.6);
        let b = GeoPoint::new(13.0, 77.7);
        assert_eq!(a.distance_m(a), 0.0);
        assert!((a.distance_m(b) - b.distance_m(a)).abs() < 1e-9);
    }

    #[test]
    fn haversine_matches_known_scenario() {
        // A(0,0) -> B(0, 0.01): spec §8 scenario 1 expects ~1113.2 m.
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 0.01);
        let d = a.distance_m(b);
        assert!((d - 1113.2).abs() < 1.0, "got {d}");
    }

    #[test]
    fn polyline_projection_ties_toward_earliest_vertex() {
        let poly = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(0.0, 1.0), // duplicate vertex: tie with index 1
        ];
        let probe = GeoPoint::new(0.0, 1.0);
        let proj = project_point_onto_polyline(probe, &poly).unwrap();
        assert_eq!(proj.segment_index, 1);
    }

    #[test]
    fn polyline_projection_empty_returns_none() {
        assert!(project_point_onto_polyline(GeoPoint::new(0.0, 0.0), &[]).is_none());
    }
}
