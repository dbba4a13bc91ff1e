mod routes;
mod controllers;
mod services;
mod models;
mod api_docs;
mod shared_state;
mod session;
mod config;

use std::net::SocketAddr;
use std::path::Path;
use axum::{Router, routing::get, response::Html};
use crate::routes::estimate_routes::api_routes;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;
use crate::api_docs::ApiDoc;
use crate::config::Config;
use crate::services::prediction_service::PredictionClient;
use crate::shared_state::{AppState, SharedState};

use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

#[tokio::main]
async fn main() {
    // 1. Load configuration
    let config = match Config::load("config.json") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config.json: {}", e);
            return;
        }
    };
    println!("Configuration loaded: prediction endpoint {}", config.prediction.endpoint);

    // 2. Load the regional solar dataset
    let dataset = match services::dataset::load(Path::new(&config.dataset.path)) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Failed to load dataset {}: {}", config.dataset.path, e);
            return;
        }
    };

    // 3. Initialize shared state
    let state = AppState::new(dataset);
    let predictor = PredictionClient::new(&config.prediction);
    let shared = SharedState {
        app: state,
        config: config.clone(),
        predictor,
    };

    // 4. Start Axum HTTP server
    let server_port = config.server.port;
    let app = Router::new()
        .nest("/api", api_routes(shared))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .fallback_service(ServeDir::new("static"))
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    println!("API Server listening on http://{}", addr);
    println!("Scalar UI: http://{}/scalar", addr);

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
