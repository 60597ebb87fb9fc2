use std::collections::HashSet;

use serde::Serialize;

use crate::error::ApiError;
use crate::geo::{haversine_km, round2, GeoPoint};
use crate::model::Station;

#[derive(Debug, Clone, Copy)]
pub struct RangeFilterOptions {
    /// Maximum distance from a route point for a station to qualify, in km.
    pub max_distance_from_route_km: f64,
}

impl Default for RangeFilterOptions {
    fn default() -> Self {
        Self {
            max_distance_from_route_km: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeStation {
    #[serde(flatten)]
    pub station: Station,
    /// Distance from the qualifying route point, in km.
    pub distance_km: f64,
    /// Cumulative route distance at which the station first qualified, in km.
    pub distance_from_start_km: f64,
}

/// Stations reachable within the vehicle's fuel range along a route.
///
/// Walks the route point by point, accumulating traveled distance, and scans
/// the station set at every point still inside `max_range` (mileage times
/// tank capacity). A station keeps the cumulative distance of its first
/// qualifying point; later qualifications never re-add or update it. The
/// destination gets one extra scan even when it lies beyond the range, so
/// end-of-trip stations are not silently missed. Results are ordered by
/// distance from the start of the route.
pub fn filter_by_range(
    route: &[GeoPoint],
    stations: &[Station],
    mileage_per_unit: f64,
    tank_capacity_units: f64,
    opts: &RangeFilterOptions,
) -> Result<Vec<RangeStation>, ApiError> {
    if route.len() < 2 {
        return Err(ApiError::InvalidInput(
            "Invalid input. Provide routePoints with at least 2 points.".to_string(),
        ));
    }
    if mileage_per_unit <= 0.0 || tank_capacity_units <= 0.0 {
        return Err(ApiError::InvalidInput(
            "Invalid input. mileagePerUnit and tankCapacityUnits must be positive numbers."
                .to_string(),
        ));
    }

    let max_range_km = mileage_per_unit * tank_capacity_units;
    tracing::debug!(max_range_km, points = route.len(), "walking route within range");

    let mut found = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut cumulative_km = 0.0;

    for (index, point) in route.iter().enumerate() {
        if index > 0 {
            cumulative_km += haversine_km(route[index - 1], *point);
        }
        // points past the range still accumulate distance so the final
        // destination check reports the true trip length
        if cumulative_km > max_range_km {
            continue;
        }
        collect_near_point(*point, cumulative_km, stations, opts, &mut seen, &mut found);
    }

    // the destination is scanned unconditionally, even past max_range
    if let Some(destination) = route.last() {
        collect_near_point(
            *destination,
            cumulative_km,
            stations,
            opts,
            &mut seen,
            &mut found,
        );
    }

    found.sort_by(|a, b| {
        a.distance_from_start_km
            .partial_cmp(&b.distance_from_start_km)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(found)
}

fn collect_near_point(
    point: GeoPoint,
    cumulative_km: f64,
    stations: &[Station],
    opts: &RangeFilterOptions,
    seen: &mut HashSet<String>,
    found: &mut Vec<RangeStation>,
) {
    for station in stations {
        if seen.contains(&station.id) {
            continue;
        }
        let Some(position) = station.coords() else {
            continue;
        };
        let distance = haversine_km(point, position);
        if distance <= opts.max_distance_from_route_km {
            seen.insert(station.id.clone());
            found.push(RangeStation {
                station: station.clone(),
                distance_km: round2(distance),
                distance_from_start_km: round2(cumulative_km),
            });
        }
    }
}
