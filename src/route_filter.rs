use serde::Serialize;

use crate::geo::{haversine_km, round2, GeoPoint};
use crate::model::Station;

/// Thresholds for [`filter_along_route`]. All three must hold at once for a
/// station to be included.
#[derive(Debug, Clone, Copy)]
pub struct RouteFilterOptions {
    /// Maximum lateral distance from the route, in km.
    pub proximity_km: f64,
    /// Exclusion radius around the trip origin, in km.
    pub min_from_source_km: f64,
    /// Exclusion radius around the trip destination, in km.
    pub min_from_destination_km: f64,
}

impl Default for RouteFilterOptions {
    fn default() -> Self {
        Self {
            proximity_km: 5.0,
            min_from_source_km: 5.0,
            min_from_destination_km: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStation {
    #[serde(flatten)]
    pub station: Station,
    /// Index of the nearest route point, which is also the result order.
    pub closest_route_index: usize,
    pub distance_km: f64,
    pub distance_from_source_km: f64,
    pub distance_from_destination_km: f64,
}

/// Stations usefully positioned along a decoded route, ordered as a driver
/// would encounter them.
///
/// For each station the full route point sequence is scanned for the nearest
/// vertex; the first vertex holding the minimum wins ties, so the recorded
/// index follows route order. Stations inside the exclusion radius of either
/// endpoint are dropped as mid-trip refueling candidates. Results are sorted
/// by `closest_route_index`, not by raw distance.
pub fn filter_along_route(
    route: &[GeoPoint],
    stations: &[Station],
    source: GeoPoint,
    destination: GeoPoint,
    opts: &RouteFilterOptions,
) -> Vec<RouteStation> {
    let mut matched = Vec::new();

    for station in stations {
        let Some(position) = station.coords() else {
            continue;
        };

        let distance_from_source = haversine_km(source, position);
        let distance_from_destination = haversine_km(destination, position);

        // Nearest route vertex; strict < keeps the first index on ties.
        let mut min_distance = f64::INFINITY;
        let mut closest_index = None;
        for (index, point) in route.iter().enumerate() {
            let distance = haversine_km(*point, position);
            if distance < min_distance {
                min_distance = distance;
                closest_index = Some(index);
            }
        }
        // an empty route has no vertex to anchor to
        let Some(closest_route_index) = closest_index else {
            continue;
        };

        if min_distance <= opts.proximity_km
            && distance_from_source >= opts.min_from_source_km
            && distance_from_destination >= opts.min_from_destination_km
        {
            tracing::debug!(
                station = %station.id,
                distance_km = min_distance,
                closest_route_index,
                "station included along route"
            );
            matched.push(RouteStation {
                station: station.clone(),
                closest_route_index,
                distance_km: round2(min_distance),
                distance_from_source_km: round2(distance_from_source),
                distance_from_destination_km: round2(distance_from_destination),
            });
        } else {
            tracing::trace!(
                station = %station.id,
                distance_km = min_distance,
                from_source_km = distance_from_source,
                from_destination_km = distance_from_destination,
                "station excluded"
            );
        }
    }

    matched.sort_by_key(|entry| entry.closest_route_index);
    matched
}
