use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::directions::DirectionsClient;
use crate::handlers::AppState;
use crate::store::StationStore;

mod config;
mod directions;
mod error;
mod geo;
mod handlers;
mod model;
mod nearest;
mod news;
mod polyline;
mod range_filter;
mod route_filter;
mod store;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "configuration error");
            std::process::exit(1);
        }
    };

    let http = reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .build()
        .unwrap();

    let state = Arc::new(AppState {
        store: StationStore::new(http.clone(), &config.firebase_db_url),
        directions: DirectionsClient::new(http.clone(), &config.google_api_key),
        http,
        news_source_url: config.news_source_url.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/nearest-cng", post(handlers::nearest_stations))
        .route("/stations-along-route", post(handlers::stations_along_route))
        .route("/stations-within-range", post(handlers::stations_within_range))
        .route("/stations-by-city", get(handlers::stations_by_city))
        .route("/car-travel-news", get(handlers::car_travel_news))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .unwrap();

    tracing::info!(port = config.port, "server listening");
    axum::serve(listener, app).await.unwrap();
}
