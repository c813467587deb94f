//! Radius filtering of located records.
//!
//! Records without a position never take part in a distance computation.
//! With the `parallel` feature distances are computed on the rayon pool; the
//! output keeps the input order either way.

use crate::{distance_km, Coordinate, GeoError, Result};
use serde::{Deserialize, Serialize};

/// Radius used by every proximity view when the caller has no preference.
pub const DEFAULT_RADIUS_KM: f64 = 50.0;

/// Anything that may carry a geographic position.
pub trait Located {
    /// The record's position, or `None` when the source had no location data.
    fn position(&self) -> Option<Coordinate>;
}

impl Located for Coordinate {
    fn position(&self) -> Option<Coordinate> {
        Some(*self)
    }
}

/// A record paired with its distance from the reference point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedRecord<T> {
    /// The matched record
    pub record: T,
    /// Great-circle distance from the reference point in kilometers
    pub distance_km: f64,
}

/// Returns the records within `radius_km` of `reference`, annotated with
/// their distance.
///
/// The boundary is inclusive. Output order is input order; call
/// [`sort_by_distance`] for nearest-first.
///
/// # Errors
/// - [`GeoError::InvalidRadius`] if `radius_km` is not positive and finite
/// - [`GeoError::InvalidCoordinate`] if the reference or any record position
///   is not finite
///
/// # Example
/// ```
/// use legends_geo::{filter_within, Coordinate};
///
/// let reference = Coordinate::new(-37.81, 144.96);
/// let places = vec![
///     Coordinate::new(-37.8136, 144.9631), // Melbourne CBD
///     Coordinate::new(-33.8688, 151.2093), // Sydney
/// ];
///
/// let nearby = filter_within(&reference, &places, 50.0).unwrap();
/// assert_eq!(nearby.len(), 1);
/// ```
pub fn filter_within<T>(
    reference: &Coordinate,
    records: &[T],
    radius_km: f64,
) -> Result<Vec<AnnotatedRecord<T>>>
where
    T: Located + Clone + Send + Sync,
{
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(GeoError::InvalidRadius(radius_km));
    }
    reference.ensure_finite()?;

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        records
            .par_iter()
            .filter_map(|record| annotate_within(reference, record, radius_km).transpose())
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        records
            .iter()
            .filter_map(|record| annotate_within(reference, record, radius_km).transpose())
            .collect()
    }
}

/// Sorts annotated records nearest-first. Equal distances keep their order.
pub fn sort_by_distance<T>(records: &mut [AnnotatedRecord<T>]) {
    records.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
}

#[inline]
fn annotate_within<T: Located + Clone>(
    reference: &Coordinate,
    record: &T,
    radius_km: f64,
) -> Result<Option<AnnotatedRecord<T>>> {
    let Some(position) = record.position() else {
        return Ok(None);
    };

    let distance = distance_km(reference, &position)?;
    Ok((distance <= radius_km).then(|| AnnotatedRecord {
        record: record.clone(),
        distance_km: distance,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haversine_distance;

    #[derive(Debug, Clone, PartialEq)]
    struct Place {
        id: &'static str,
        position: Option<Coordinate>,
    }

    impl Located for Place {
        fn position(&self) -> Option<Coordinate> {
            self.position
        }
    }

    const REFERENCE: Coordinate = Coordinate { latitude: -37.81, longitude: 144.96 };

    fn places() -> Vec<Place> {
        vec![
            // Geelong, ~64 km
            Place { id: "geelong", position: Some(Coordinate::new(-38.1499, 144.3617)) },
            // Melbourne CBD, <1 km
            Place { id: "cbd", position: Some(Coordinate::new(-37.8136, 144.9631)) },
            Place { id: "unlocated", position: None },
            // Frankston, ~40 km
            Place { id: "frankston", position: Some(Coordinate::new(-38.1413, 145.1225)) },
            // Sydney, ~700 km
            Place { id: "sydney", position: Some(Coordinate::new(-33.8688, 151.2093)) },
        ]
    }

    fn ids<T>(results: &[AnnotatedRecord<T>], id: impl Fn(&T) -> &'static str) -> Vec<&'static str> {
        results.iter().map(|r| id(&r.record)).collect()
    }

    #[test]
    fn test_empty_input() {
        let results = filter_within::<Place>(&REFERENCE, &[], 50.0).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_keeps_input_order() {
        let results = filter_within(&REFERENCE, &places(), 50.0).unwrap();
        assert_eq!(ids(&results, |p| p.id), vec!["cbd", "frankston"]);
    }

    #[test]
    fn test_excludes_unlocated_regardless_of_radius() {
        let results = filter_within(&REFERENCE, &places(), 25_000.0).unwrap();
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.record.position.is_some()));
    }

    #[test]
    fn test_matches_predicate_subset() {
        let input = places();
        let radius = 100.0;
        let results = filter_within(&REFERENCE, &input, radius).unwrap();

        let expected: Vec<&str> = input
            .iter()
            .filter(|p| {
                p.position
                    .is_some_and(|pos| haversine_distance(&REFERENCE, &pos) <= radius)
            })
            .map(|p| p.id)
            .collect();
        assert_eq!(ids(&results, |p| p.id), expected);
    }

    #[test]
    fn test_inclusive_boundary() {
        let target = Coordinate::new(-37.5, 144.96);
        let exact = haversine_distance(&REFERENCE, &target);
        let results = filter_within(&REFERENCE, &[target], exact).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].distance_km, exact);
    }

    #[test]
    fn test_annotation_matches_distance() {
        let results = filter_within(&REFERENCE, &places(), 50.0).unwrap();
        for annotated in &results {
            let pos = annotated.record.position.unwrap();
            assert_eq!(annotated.distance_km, haversine_distance(&REFERENCE, &pos));
            assert!(annotated.distance_km >= 0.0);
        }
    }

    #[test]
    fn test_deterministic() {
        let input = places();
        let first = filter_within(&REFERENCE, &input, 80.0).unwrap();
        let second = filter_within(&REFERENCE, &input, 80.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_radius_rejected() {
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                filter_within(&REFERENCE, &places(), radius),
                Err(GeoError::InvalidRadius(_))
            ));
        }
    }

    #[test]
    fn test_invalid_reference_rejected() {
        let reference = Coordinate::new(f64::NAN, 144.96);
        assert!(matches!(
            filter_within(&reference, &places(), 50.0),
            Err(GeoError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn test_non_finite_record_position_fails_fast() {
        let mut input = places();
        input.push(Place { id: "broken", position: Some(Coordinate::new(f64::NAN, 0.0)) });
        assert!(filter_within(&REFERENCE, &input, 50.0).is_err());
    }

    #[test]
    fn test_sort_by_distance() {
        let mut results = filter_within(&REFERENCE, &places(), 1000.0).unwrap();
        sort_by_distance(&mut results);
        assert_eq!(
            ids(&results, |p| p.id),
            vec!["cbd", "frankston", "geelong", "sydney"]
        );
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let same = Coordinate::new(-37.82, 144.97);
        let twins = vec![
            Place { id: "first", position: Some(same) },
            Place { id: "second", position: Some(same) },
        ];
        let mut results = filter_within(&REFERENCE, &twins, 50.0).unwrap();
        sort_by_distance(&mut results);
        assert_eq!(ids(&results, |p| p.id), vec!["first", "second"]);
    }
}
