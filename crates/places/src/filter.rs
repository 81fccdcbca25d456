//! Client-side filtering and ranking of the restroom list.

use crate::{Amenity, RestroomPoint};
use loofinder_geo::{distances_from, sort_by_distance, within_radius, GeoPoint};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Criteria a restroom must meet to be listed.
///
/// Unset criteria match everything. A restroom without a rating never
/// satisfies `min_rating`, and likewise for cleanliness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestroomFilter {
    /// Minimum average rating
    #[serde(default)]
    pub min_rating: Option<f64>,
    /// Minimum cleanliness score
    #[serde(default)]
    pub min_cleanliness: Option<f64>,
    /// Amenities that must all be present
    #[serde(default)]
    pub required_amenities: BTreeSet<Amenity>,
    /// Exact category, compared case-insensitively
    #[serde(default)]
    pub category: Option<String>,
    /// Maximum distance from the origin, inclusive
    #[serde(default)]
    pub max_distance_km: Option<f64>,
}

impl RestroomFilter {
    /// Returns true if `point`, lying `distance_km` from the origin, passes.
    pub fn matches(&self, point: &RestroomPoint, distance_km: f64) -> bool {
        let restroom = &point.payload;

        at_least(restroom.rating, self.min_rating)
            && at_least(restroom.cleanliness, self.min_cleanliness)
            && restroom.has_all(&self.required_amenities)
            && self.category.as_ref().is_none_or(|wanted| {
                restroom
                    .category
                    .as_ref()
                    .is_some_and(|category| category.eq_ignore_ascii_case(wanted))
            })
            && self.max_distance_km.is_none_or(|max| distance_km <= max)
    }
}

fn at_least(value: Option<f64>, min: Option<f64>) -> bool {
    match min {
        None => true,
        Some(min) => value.is_some_and(|v| v >= min),
    }
}

/// How ranked results are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Closest first
    #[default]
    Distance,
    /// Best rated first, unrated last
    Rating,
    /// Alphabetical by name
    Name,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" | "nearest" => Ok(SortOrder::Distance),
            "rating" | "best" => Ok(SortOrder::Rating),
            "name" => Ok(SortOrder::Name),
            other => Err(format!("Unknown sort order: {} (expected distance, rating or name)", other)),
        }
    }
}

/// A restroom that passed the filter, with its distance from the origin.
#[derive(Debug, Clone, Serialize)]
pub struct Ranked<'a> {
    /// The restroom
    pub point: &'a RestroomPoint,
    /// Distance from the origin in kilometers
    pub distance_km: f64,
}

/// Filter and order `points` as seen from `origin`.
///
/// Distance ties keep input order; rating and name ties fall back to
/// distance. Points with a NaN distance sort last and never pass a
/// `max_distance_km` filter. `limit` caps the number of results.
///
/// # Example
/// ```
/// use loofinder_geo::{GeoPoint, PointOfInterest};
/// use loofinder_places::{rank, Restroom, RestroomFilter, SortOrder};
///
/// let points = vec![
///     PointOfInterest::new("far", GeoPoint::new(42.7500, 23.4000), Restroom::named("Mladost")),
///     PointOfInterest::new("near", GeoPoint::new(42.6980, 23.3222), Restroom::named("Market")),
/// ];
/// let origin = GeoPoint::new(42.6977, 23.3219);
/// let ranked = rank(&points, &origin, &RestroomFilter::default(), SortOrder::Distance, None);
/// assert_eq!(ranked[0].point.id, "near");
/// ```
pub fn rank<'a>(
    points: &'a [RestroomPoint],
    origin: &GeoPoint,
    filter: &RestroomFilter,
    order: SortOrder,
    limit: Option<usize>,
) -> Vec<Ranked<'a>> {
    // Closest first from here on; later sorts are stable.
    let mut candidates = match filter.max_distance_km {
        Some(max) => within_radius(origin, points, max),
        None => {
            let mut all = distances_from(origin, points);
            sort_by_distance(&mut all);
            all
        }
    };
    candidates.retain(|d| filter.matches(&points[d.index], d.distance_km));

    let mut ranked: Vec<Ranked<'a>> = candidates
        .into_iter()
        .map(|d| Ranked {
            point: &points[d.index],
            distance_km: d.distance_km,
        })
        .collect();

    match order {
        SortOrder::Distance => {}
        SortOrder::Rating => ranked.sort_by(|a, b| {
            let (ra, rb) = (&a.point.payload, &b.point.payload);
            cmp_rating(ra.rating, rb.rating).then_with(|| rb.review_count.cmp(&ra.review_count))
        }),
        SortOrder::Name => ranked.sort_by_cached_key(|r| r.point.payload.name.to_lowercase()),
    }

    if let Some(limit) = limit {
        ranked.truncate(limit);
    }

    tracing::debug!(candidates = points.len(), listed = ranked.len(), ?order, "Ranked restrooms");

    ranked
}

/// The closest restroom to `origin`, if any.
pub fn nearest<'a>(points: &'a [RestroomPoint], origin: &GeoPoint) -> Option<Ranked<'a>> {
    rank(points, origin, &RestroomFilter::default(), SortOrder::Distance, Some(1))
        .into_iter()
        .next()
}

/// Descending; `None` and NaN last.
fn cmp_rating(a: Option<f64>, b: Option<f64>) -> Ordering {
    let known = |score: Option<f64>| score.filter(|s| !s.is_nan());
    match (known(a), known(b)) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
