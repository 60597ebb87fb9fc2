use reqwest::Client;
use serde_json::Value;

use crate::error::ApiError;
use crate::geo::GeoPoint;

const DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Client for the Google Directions API. Only the overview polyline of the
/// first returned route is used.
pub struct DirectionsClient {
    client: Client,
    api_key: String,
}

impl DirectionsClient {
    pub fn new(client: Client, api_key: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
        }
    }

    /// Resolves a driving route and returns its encoded overview polyline.
    pub async fn route(&self, origin: GeoPoint, destination: GeoPoint) -> Result<String, ApiError> {
        let response = self
            .client
            .get(DIRECTIONS_URL)
            .query(&[
                ("origin", format!("{},{}", origin.lat, origin.lng)),
                ("destination", format!("{},{}", destination.lat, destination.lng)),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|err| ApiError::from_upstream("directions provider", err))?
            .error_for_status()
            .map_err(|err| ApiError::from_upstream("directions provider", err))?;
        let body: Value = response
            .json()
            .await
            .map_err(|err| ApiError::from_upstream("directions provider", err))?;

        let status = body["status"].as_str().unwrap_or("UNKNOWN");
        tracing::debug!(status, "directions response");

        extract_overview_polyline(&body).ok_or(ApiError::NoRouteFound)
    }
}

/// Pulls `routes[0].overview_polyline.points` out of a directions response.
pub fn extract_overview_polyline(body: &Value) -> Option<String> {
    body.get("routes")?
        .get(0)?
        .get("overview_polyline")?
        .get("points")?
        .as_str()
        .map(str::to_string)
}
