use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::directions::DirectionsClient;
use crate::error::ApiError;
use crate::geo::GeoPoint;
use crate::model::Station;
use crate::nearest::{self, NearestPage};
use crate::news::{self, NewsItem};
use crate::polyline;
use crate::range_filter::{self, RangeFilterOptions, RangeStation};
use crate::route_filter::{self, RouteFilterOptions, RouteStation};
use crate::store::StationStore;

pub struct AppState {
    pub store: StationStore,
    pub directions: DirectionsClient,
    pub http: reqwest::Client,
    pub news_source_url: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl LatLng {
    fn resolve(self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.lat?, self.lng?))
    }
}

/* -------------------- nearest stations -------------------- */

#[derive(Debug, Deserialize)]
pub struct NearestRequest {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub page: Option<i64>,
}

impl NearestRequest {
    fn validate(&self) -> Result<(GeoPoint, usize), ApiError> {
        match (self.lat, self.lng, self.page) {
            (Some(lat), Some(lng), Some(page)) if page >= 1 => {
                Ok((GeoPoint::new(lat, lng), page as usize))
            }
            _ => Err(ApiError::InvalidInput(
                "Invalid input. Provide lat, lng (numbers) and page (number >= 1).".to_string(),
            )),
        }
    }
}

pub async fn nearest_stations(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NearestRequest>,
) -> Result<Json<NearestPage>, ApiError> {
    let (origin, page) = request.validate()?;
    let stations = state.store.fetch_all().await?;
    Ok(Json(nearest::rank_nearest(
        &stations,
        origin,
        page,
        nearest::RESULTS_PER_PAGE,
    )))
}

/* -------------------- stations along a route -------------------- */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub source: Option<LatLng>,
    pub destination: Option<LatLng>,
    pub proximity_km: Option<f64>,
    pub min_from_source_km: Option<f64>,
    pub min_from_destination_km: Option<f64>,
}

impl RouteRequest {
    fn validate(&self) -> Result<(GeoPoint, GeoPoint, RouteFilterOptions), ApiError> {
        let endpoints = self
            .source
            .and_then(LatLng::resolve)
            .zip(self.destination.and_then(LatLng::resolve));
        let (source, destination) = endpoints.ok_or_else(|| {
            ApiError::InvalidInput(
                "Invalid input. Provide source and destination with lat and lng as numbers."
                    .to_string(),
            )
        })?;

        let defaults = RouteFilterOptions::default();
        let opts = RouteFilterOptions {
            proximity_km: self.proximity_km.unwrap_or(defaults.proximity_km),
            min_from_source_km: self.min_from_source_km.unwrap_or(defaults.min_from_source_km),
            min_from_destination_km: self
                .min_from_destination_km
                .unwrap_or(defaults.min_from_destination_km),
        };
        Ok((source, destination, opts))
    }
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub stations: Vec<RouteStation>,
}

pub async fn stations_along_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, ApiError> {
    let (source, destination, opts) = request.validate()?;

    let encoded = state.directions.route(source, destination).await?;
    let route = polyline::decode(&encoded).map_err(|err| {
        tracing::warn!(%err, "discarding undecodable route geometry");
        ApiError::NoRouteFound
    })?;
    tracing::debug!(points = route.len(), "route decoded");

    let stations = state.store.fetch_all().await?;
    let matched = route_filter::filter_along_route(&route, &stations, source, destination, &opts);
    Ok(Json(RouteResponse { stations: matched }))
}

/* -------------------- stations within fuel range -------------------- */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeRequest {
    pub route_points: Option<Vec<LatLng>>,
    pub mileage_per_unit: Option<f64>,
    pub tank_capacity_units: Option<f64>,
    pub max_distance_from_route_km: Option<f64>,
}

impl RangeRequest {
    fn validate(&self) -> Result<(Vec<GeoPoint>, f64, f64, RangeFilterOptions), ApiError> {
        let points = self.route_points.as_deref().unwrap_or_default();
        let route: Vec<GeoPoint> = points.iter().filter_map(|p| p.resolve()).collect();
        if route.len() < points.len() || route.len() < 2 {
            return Err(ApiError::InvalidInput(
                "Invalid input. Provide routePoints with at least 2 points.".to_string(),
            ));
        }
        let (mileage, tank) = self
            .mileage_per_unit
            .zip(self.tank_capacity_units)
            .filter(|(m, t)| *m > 0.0 && *t > 0.0)
            .ok_or_else(|| {
                ApiError::InvalidInput(
                    "Invalid input. mileagePerUnit and tankCapacityUnits must be positive numbers."
                        .to_string(),
                )
            })?;
        let opts = RangeFilterOptions {
            max_distance_from_route_km: self
                .max_distance_from_route_km
                .unwrap_or(RangeFilterOptions::default().max_distance_from_route_km),
        };
        Ok((route, mileage, tank, opts))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeResponse {
    pub stations: Vec<RangeStation>,
    pub total_results: usize,
}

pub async fn stations_within_range(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RangeRequest>,
) -> Result<Json<RangeResponse>, ApiError> {
    let (route, mileage, tank, opts) = request.validate()?;
    let stations = state.store.fetch_all().await?;
    let matched = range_filter::filter_by_range(&route, &stations, mileage, tank, &opts)?;
    Ok(Json(RangeResponse {
        total_results: matched.len(),
        stations: matched,
    }))
}

/* -------------------- stations by city -------------------- */

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    pub city: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CityResponse {
    pub success: bool,
    pub count: usize,
    pub stations: Vec<Station>,
}

pub async fn stations_by_city(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CityQuery>,
) -> Result<Json<CityResponse>, ApiError> {
    let city = query
        .city
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| {
            ApiError::InvalidInput(
                "Please provide a valid city name as query parameter, e.g., ?city=Delhi"
                    .to_string(),
            )
        })?;

    let stations = state.store.fetch_all().await?;
    let matched: Vec<Station> = stations
        .into_iter()
        .filter(|station| {
            station
                .city
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(&city))
        })
        .collect();
    Ok(Json(CityResponse {
        success: true,
        count: matched.len(),
        stations: matched,
    }))
}

/* -------------------- automotive news -------------------- */

#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub success: bool,
    pub count: usize,
    pub news: Vec<NewsItem>,
}

#[derive(Debug, Serialize)]
pub struct NewsErrorResponse {
    pub success: bool,
    pub message: String,
    pub news: Vec<NewsItem>,
}

pub async fn car_travel_news(State(state): State<Arc<AppState>>) -> Response {
    match news::fetch_news(&state.http, &state.news_source_url).await {
        Ok(items) => Json(NewsResponse {
            success: true,
            count: items.len(),
            news: items,
        })
        .into_response(),
        Err(err) => {
            tracing::error!(%err, "news scrape failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(NewsErrorResponse {
                    success: false,
                    message: err.to_string(),
                    news: Vec::new(),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_request_requires_all_fields() {
        let bad = NearestRequest {
            lat: Some(28.6),
            lng: None,
            page: Some(1),
        };
        assert!(bad.validate().is_err());

        let bad_page = NearestRequest {
            lat: Some(28.6),
            lng: Some(77.2),
            page: Some(0),
        };
        assert!(bad_page.validate().is_err());

        let ok = NearestRequest {
            lat: Some(28.6),
            lng: Some(77.2),
            page: Some(3),
        };
        let (origin, page) = ok.validate().unwrap();
        assert_eq!(origin, GeoPoint::new(28.6, 77.2));
        assert_eq!(page, 3);
    }

    #[test]
    fn route_request_requires_both_endpoints() {
        let request: RouteRequest = serde_json::from_str(r#"{"source": {"lat": 1.0}}"#).unwrap();
        assert!(request.validate().is_err());

        let request: RouteRequest = serde_json::from_str(
            r#"{"source": {"lat": 1.0, "lng": 2.0}, "destination": {"lat": 3.0, "lng": 4.0}}"#,
        )
        .unwrap();
        let (source, destination, opts) = request.validate().unwrap();
        assert_eq!(source, GeoPoint::new(1.0, 2.0));
        assert_eq!(destination, GeoPoint::new(3.0, 4.0));
        assert_eq!(opts.proximity_km, 5.0);
        assert_eq!(opts.min_from_source_km, 5.0);
        assert_eq!(opts.min_from_destination_km, 5.0);
    }

    #[test]
    fn route_request_thresholds_are_overridable() {
        let request: RouteRequest = serde_json::from_str(
            r#"{
                "source": {"lat": 1.0, "lng": 2.0},
                "destination": {"lat": 3.0, "lng": 4.0},
                "proximityKm": 10.0,
                "minFromSourceKm": 0.0
            }"#,
        )
        .unwrap();
        let (_, _, opts) = request.validate().unwrap();
        assert_eq!(opts.proximity_km, 10.0);
        assert_eq!(opts.min_from_source_km, 0.0);
        assert_eq!(opts.min_from_destination_km, 5.0);
    }

    #[test]
    fn range_request_rejects_incomplete_points() {
        let request: RangeRequest = serde_json::from_str(
            r#"{
                "routePoints": [{"lat": 1.0, "lng": 2.0}, {"lat": 3.0}],
                "mileagePerUnit": 15.0,
                "tankCapacityUnits": 10.0
            }"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn range_request_rejects_missing_fuel_parameters() {
        let request: RangeRequest = serde_json::from_str(
            r#"{"routePoints": [{"lat": 1.0, "lng": 2.0}, {"lat": 3.0, "lng": 4.0}]}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn range_request_accepts_a_complete_body() {
        let request: RangeRequest = serde_json::from_str(
            r#"{
                "routePoints": [{"lat": 1.0, "lng": 2.0}, {"lat": 3.0, "lng": 4.0}],
                "mileagePerUnit": 15.0,
                "tankCapacityUnits": 10.0,
                "maxDistanceFromRouteKm": 2.5
            }"#,
        )
        .unwrap();
        let (route, mileage, tank, opts) = request.validate().unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!(mileage, 15.0);
        assert_eq!(tank, 10.0);
        assert_eq!(opts.max_distance_from_route_km, 2.5);
    }
}
