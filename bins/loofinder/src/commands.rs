//! Subcommand implementations

use crate::config::Config;
use crate::output::{format_count, format_distance, format_score, Status};
use anyhow::{bail, Context, Result};
use loofinder_geo::{haversine_distance, ClusterCache, ClusterResult, GeoPoint};
use loofinder_places::{normalize_json, rank, Amenity, Normalized, Restroom, RestroomFilter, SortOrder};
use loofinder_telemetry::{metrics, timed_span, Timer};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Read records from a file, or stdin for `None` / `-`.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read_to_string(p).with_context(|| format!("Failed to read {}", p.display()))
        }
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read records from stdin")?;
            Ok(buffer)
        }
    }
}

fn load_points(path: Option<&Path>) -> Result<Normalized> {
    let text = read_input(path)?;
    let normalized = normalize_json(&text).context("Input is not a JSON array of restroom records")?;

    metrics().increment_by("records_accepted", normalized.points.len() as u64);

    for rejected in &normalized.rejected {
        metrics().increment("records_rejected");
        Status::warning(&format!("Skipped record #{}: {}", rejected.index, rejected.reason));
    }

    Ok(normalized)
}

struct ClusterReport {
    radius_km: f64,
    groups: Arc<Vec<ClusterResult<Restroom>>>,
}

#[derive(Serialize)]
struct ClusterReportJson<'a> {
    radius_km: f64,
    groups: &'a [ClusterResult<Restroom>],
}

pub fn cluster(config: &Config, input: Option<&Path>, radii: Vec<f64>, json: bool) -> Result<()> {
    let radii = if radii.is_empty() {
        vec![config.cluster.radius_km]
    } else {
        radii
    };
    if let Some(bad) = radii.iter().find(|r| !r.is_finite()) {
        bail!("Radius must be a finite number, got {}", bad);
    }
    timed_span!("cluster_command", zoom_levels = radii.len());

    let normalized = load_points(input)?;
    let cache = ClusterCache::new(config.cluster.cache_capacity);

    let reports: Vec<ClusterReport> = radii
        .into_iter()
        .map(|radius_km| {
            let timer = Timer::start("cluster_ms");
            let groups = cache.get_or_compute(&normalized.points, radius_km);
            timer.stop();
            ClusterReport { radius_km, groups }
        })
        .collect();

    metrics().increment_by("cluster_cache_hits", cache.hits());
    metrics().increment_by("cluster_cache_misses", cache.misses());
    if let Some(stats) = metrics().histogram_stats("cluster_ms") {
        tracing::debug!(
            runs = stats.count,
            mean_ms = stats.mean,
            max_ms = stats.max,
            "Clustering timings"
        );
    }

    if json {
        let view: Vec<ClusterReportJson<'_>> = reports
            .iter()
            .map(|r| ClusterReportJson {
                radius_km: r.radius_km,
                groups: r.groups.as_slice(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    for report in &reports {
        print_cluster_report(report, normalized.points.len());
    }
    Ok(())
}

fn print_cluster_report(report: &ClusterReport, total: usize) {
    Status::header(&format!("Clusters within {}", format_distance(report.radius_km)));

    for group in report.groups.iter() {
        let at = group.coordinates();
        match group {
            ClusterResult::Cluster { members, count, .. } => {
                println!(
                    "{} {} around ({:.5}, {:.5})",
                    "●".cyan(),
                    format_count(*count, "restroom", "restrooms").bold(),
                    at.latitude,
                    at.longitude
                );
                for member in members {
                    println!("    {} {}", member.payload.name, format!("[{}]", member.id).dimmed());
                }
            }
            ClusterResult::Singleton { member, .. } => {
                println!(
                    "{} {} {} at ({:.5}, {:.5})",
                    "○".dimmed(),
                    member.payload.name,
                    format!("[{}]", member.id).dimmed(),
                    at.latitude,
                    at.longitude
                );
            }
        }
    }

    let clusters = report.groups.iter().filter(|g| g.is_cluster()).count();
    let singletons = report.groups.len() - clusters;
    Status::success(&format!(
        "{} → {}, {}",
        format_count(total, "restroom", "restrooms"),
        format_count(clusters, "cluster", "clusters"),
        format_count(singletons, "singleton", "singletons")
    ));
}

pub fn distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64, meters: bool) {
    let km = haversine_distance(&GeoPoint::new(lat1, lng1), &GeoPoint::new(lat2, lng2));
    if meters {
        println!("{:.1} m", km * 1000.0);
    } else {
        println!("{:.3} km", km);
    }
}

/// Options for the `nearby` subcommand
pub struct NearbyQuery {
    pub origin: Option<(f64, f64)>,
    pub radius_km: Option<f64>,
    pub min_rating: Option<f64>,
    pub min_cleanliness: Option<f64>,
    pub amenities: Vec<Amenity>,
    pub category: Option<String>,
    pub sort: SortOrder,
    pub limit: Option<usize>,
    pub json: bool,
}

pub fn nearby(config: &Config, input: Option<&Path>, query: NearbyQuery) -> Result<()> {
    timed_span!("nearby_command", sort = ?query.sort);

    let origin = match query.origin {
        Some((lat, lng)) => GeoPoint::new(lat, lng),
        None => {
            tracing::info!("No location given, using configured default");
            config.location.default_point()
        }
    };
    if !origin.is_valid() {
        bail!("({}, {}) is not a valid coordinate", origin.latitude, origin.longitude);
    }

    let filter = RestroomFilter {
        min_rating: query.min_rating.or(config.search.min_rating),
        min_cleanliness: query.min_cleanliness,
        required_amenities: query.amenities.into_iter().collect(),
        category: query.category,
        max_distance_km: Some(query.radius_km.unwrap_or(config.search.radius_km)),
    };

    let normalized = load_points(input)?;
    let ranked = rank(
        &normalized.points,
        &origin,
        &filter,
        query.sort,
        Some(query.limit.unwrap_or(config.search.limit)),
    );

    if query.json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    Status::header(&format!(
        "Restrooms within {} of ({:.5}, {:.5})",
        format_distance(filter.max_distance_km.unwrap_or_default()),
        origin.latitude,
        origin.longitude
    ));

    if ranked.is_empty() {
        Status::warning("Nothing matches these filters");
        return Ok(());
    }

    for (position, entry) in ranked.iter().enumerate() {
        let restroom = &entry.point.payload;
        let amenities: Vec<&str> = restroom.amenities.iter().map(Amenity::as_str).collect();
        println!(
            "{:>2}. {} {}  {}  {}",
            position + 1,
            restroom.name.bold(),
            format!("[{}]", entry.point.id).dimmed(),
            format_distance(entry.distance_km).cyan(),
            format_score(restroom.rating)
        );
        if !amenities.is_empty() {
            println!("    {}", amenities.join(", ").dimmed());
        }
    }
    Ok(())
}

pub fn parse_location(raw: &str) -> Result<()> {
    timed_span!("parse_location_command");
    let value = serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));

    match loofinder_geo::parse_location(&value) {
        Some(point) => {
            println!("{}", serde_json::to_string(&point)?);
            Ok(())
        }
        None => bail!("No valid location in {}", raw),
    }
}

pub fn show_config(config: &Config, path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => eprintln!("# loaded from {}", p.display()),
        None => eprintln!("# built-in defaults"),
    }
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
