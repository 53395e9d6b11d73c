//! Planar point distance.
//!
//! Mirrors the Postgres `point <-> point` operator: plain Euclidean distance
//! over the raw components, in degrees. It is only meaningful for ordering
//! nearby points, never as a travel distance.

use crate::Coordinate;

/// Euclidean distance between two coordinates, in coordinate units.
///
/// # Example
/// ```
/// use agrimap_geo::{planar_distance, Coordinate};
///
/// let a = Coordinate::new(0.0, 0.0);
/// let b = Coordinate::new(3.0, 4.0);
/// assert_eq!(planar_distance(&a, &b), 5.0);
/// ```
#[inline]
pub fn planar_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    let d_lat = to.latitude - from.latitude;
    let d_lng = to.longitude - from.longitude;
    d_lat.hypot(d_lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COPENHAGEN: Coordinate = Coordinate { latitude: 55.6761, longitude: 12.5683 };
    const AARHUS: Coordinate = Coordinate { latitude: 56.1629, longitude: 10.2039 };
    const ODENSE: Coordinate = Coordinate { latitude: 55.4038, longitude: 10.4024 };

    #[test]
    fn test_same_point_zero_distance() {
        assert!(planar_distance(&COPENHAGEN, &COPENHAGEN).abs() < f64::EPSILON);
    }

    #[test]
    fn test_symmetry() {
        let d1 = planar_distance(&COPENHAGEN, &AARHUS);
        let d2 = planar_distance(&AARHUS, &COPENHAGEN);
        assert!((d1 - d2).abs() < 1e-12);
    }

    #[test]
    fn test_orders_nearby_points() {
        // Odense sits closer to Copenhagen than Aarhus on the raw grid
        assert!(planar_distance(&COPENHAGEN, &ODENSE) < planar_distance(&COPENHAGEN, &AARHUS));
    }
}
