use serde::Serialize;

use crate::geo::{haversine_km, GeoPoint};
use crate::model::Station;

pub const RESULTS_PER_PAGE: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct NearestStation {
    #[serde(flatten)]
    pub station: Station,
    /// Direct distance from the query point, in km.
    pub distance: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestPage {
    pub stations: Vec<NearestStation>,
    pub total_results: usize,
    pub page: usize,
    pub results_per_page: usize,
    pub total_pages: usize,
}

/// Ranks every valid station by direct distance from `origin` and returns
/// the requested page.
///
/// The sort is stable, so equidistant stations keep their fetch order. A
/// page past the end yields an empty slice, while the reported `page` is
/// clamped to the last populated page.
pub fn rank_nearest(
    stations: &[Station],
    origin: GeoPoint,
    page: usize,
    page_size: usize,
) -> NearestPage {
    let mut ranked: Vec<NearestStation> = stations
        .iter()
        .filter_map(|station| {
            station.coords().map(|position| NearestStation {
                station: station.clone(),
                distance: haversine_km(origin, position),
            })
        })
        .collect();
    ranked.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total_results = ranked.len();
    let total_pages = total_results.div_ceil(page_size);
    let start = page.saturating_sub(1) * page_size;
    let stations: Vec<NearestStation> = ranked.into_iter().skip(start).take(page_size).collect();

    NearestPage {
        stations,
        total_results,
        page: page.min(total_pages),
        results_per_page: page_size,
        total_pages,
    }
}
