use reqwest::Client;
use serde_json::Value;

use crate::error::ApiError;
use crate::model::Station;

const STATION_COLLECTION: &str = "CNG_Stations";

/// Read-only client for the station dataset, a Firebase Realtime Database
/// collection keyed by station id.
pub struct StationStore {
    client: Client,
    base_url: String,
}

impl StationStore {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches the full station snapshot.
    ///
    /// A missing collection yields an empty list. Individual records that
    /// fail to parse are skipped; one bad record must not break queries for
    /// all the others.
    pub async fn fetch_all(&self) -> Result<Vec<Station>, ApiError> {
        let url = format!("{}/{}.json", self.base_url, STATION_COLLECTION);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| ApiError::from_upstream("station store", err))?
            .error_for_status()
            .map_err(|err| ApiError::from_upstream("station store", err))?;
        let snapshot: Value = response
            .json()
            .await
            .map_err(|err| ApiError::from_upstream("station store", err))?;

        let stations = parse_station_map(snapshot);
        tracing::debug!(count = stations.len(), "fetched station snapshot");
        Ok(stations)
    }
}

/// Turns the raw snapshot (a map of station id to record) into station
/// records, merging each child key in as the station's id.
pub fn parse_station_map(snapshot: Value) -> Vec<Station> {
    let Value::Object(map) = snapshot else {
        return Vec::new();
    };
    let mut stations = Vec::with_capacity(map.len());
    for (key, record) in map {
        match serde_json::from_value::<Station>(record) {
            Ok(mut station) => {
                station.id = key;
                stations.push(station);
            }
            Err(err) => {
                tracing::warn!(station = %key, %err, "skipping malformed station record");
            }
        }
    }
    stations
}
