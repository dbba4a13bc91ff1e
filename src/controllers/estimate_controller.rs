use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::config::Config;
use crate::models::solar::{
    HealthStatus, PlaceView, RegionRecord, RegionSummary, SavingsView, SessionCreated,
    SessionView, SystemConfig, UiEvent,
};
use crate::services::dataset;
use crate::services::prediction_service::PredictionClient;
use crate::services::savings;
use crate::session::{Event, SessionState};
use crate::shared_state::AppState;

/// POST /api/sessions
/// Create a new widget session
///
/// Allocates a fresh session with the initial snapshot (May, no place, empty
/// calculator inputs) and returns its ID together with the first view.
#[utoipa::path(
    post,
    path = "/api/sessions",
    responses(
        (status = 201, description = "Session created", body = SessionCreated),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let session_id = Uuid::new_v4().to_string();
    let snapshot = SessionState::default();
    let view = build_view(&snapshot, &state.dataset);
    state.insert_session(&session_id, snapshot);
    println!("[SESSION] Created {}", session_id);
    (StatusCode::CREATED, Json(SessionCreated { session_id, view })).into_response()
}

/// GET /api/sessions/{id}
/// Get the current view of a session
///
/// Returns the render-ready snapshot: selected place, active month, latest
/// prediction, calculator inputs, derived savings and the regional panel.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(
        ("id" = String, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Current session view", body = SessionView),
        (status = 404, description = "Session not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_session(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    if let Some(snapshot) = state.get_session(&id) {
        (StatusCode::OK, Json(build_view(&snapshot, &state.dataset))).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(serde_json::json!({"error": "Session not found"}))).into_response()
    }
}

/// DELETE /api/sessions/{id}
/// Discard a session
#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(
        ("id" = String, Path, description = "Session ID")
    ),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Session not found")
    )
)]
pub async fn delete_session(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    if state.remove_session(&id) {
        println!("[SESSION] Deleted {}", id);
        StatusCode::NO_CONTENT.into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(serde_json::json!({"error": "Session not found"}))).into_response()
    }
}

/// POST /api/sessions/{id}/events
/// Apply one UI event to a session
///
/// Reduces the event against the stored snapshot and returns the updated
/// view. Place and month changes trigger a background prediction call; its
/// result lands in the session asynchronously, so the view returned here may
/// still carry the previous prediction (poll GET to observe the update).
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/events",
    params(
        ("id" = String, Path, description = "Session ID")
    ),
    request_body = UiEvent,
    responses(
        (status = 200, description = "Updated session view", body = SessionView),
        (status = 404, description = "Session not found"),
        (status = 422, description = "Malformed event payload"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn post_event(
    Path(id): Path<String>,
    State(state): State<AppState>,
    State(predictor): State<PredictionClient>,
    Json(event): Json<UiEvent>,
) -> impl IntoResponse {
    let event = match event {
        UiEvent::PlaceSelected { place } => Event::PlaceSelected(place),
        UiEvent::MonthChanged { month } => Event::MonthChanged(month),
        UiEvent::PanelAreaChanged { value } => Event::PanelAreaChanged(value),
        UiEvent::MonthlyBillChanged { value } => Event::MonthlyBillChanged(value),
    };

    let Some(transition) = state.apply_event(&id, event) else {
        return (StatusCode::NOT_FOUND, Json(serde_json::json!({"error": "Session not found"})))
            .into_response();
    };

    if let Some(request) = transition.request {
        let state = state.clone();
        let session_id = id.clone();
        tokio::spawn(async move {
            let result = predictor
                .fetch_or_none(request.latitude, request.longitude, request.features)
                .await;
            state.apply_event(
                &session_id,
                Event::PredictionReceived { seq: request.seq, result },
            );
        });
    }

    (StatusCode::OK, Json(build_view(&transition.next, &state.dataset))).into_response()
}

/// GET /api/regions
/// List region names available in the dataset
#[utoipa::path(
    get,
    path = "/api/regions",
    responses(
        (status = 200, description = "Region names", body = Vec<String>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_regions(State(state): State<AppState>) -> impl IntoResponse {
    let names: Vec<String> = state
        .dataset
        .iter()
        .map(|r| r.region_name.clone())
        .collect();
    Json(names).into_response()
}

/// GET /api/regions/{name}
/// Get the solar-potential summary for one region
///
/// Name matching is case-insensitive and ignores surrounding whitespace,
/// same as the locality match applied to selected places.
#[utoipa::path(
    get,
    path = "/api/regions/{name}",
    params(
        ("name" = String, Path, description = "Region name, e.g. \"Chicago\"")
    ),
    responses(
        (status = 200, description = "Regional solar potential", body = RegionSummary),
        (status = 404, description = "No dataset row for this region"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_region(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    if let Some(record) = dataset::match_region(&name, &state.dataset) {
        (StatusCode::OK, Json(region_summary(record))).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(serde_json::json!({"error": "Region not found"}))).into_response()
    }
}

/// GET /api/system/config
/// Get the effective runtime configuration
#[utoipa::path(
    get,
    path = "/api/system/config",
    responses(
        (status = 200, description = "Runtime configuration", body = SystemConfig),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_system_config(State(config): State<Config>) -> impl IntoResponse {
    let response = SystemConfig {
        server_port: config.server.port,
        prediction_endpoint: config.prediction.endpoint.clone(),
        allsky_kt: config.prediction.allsky_kt,
        allsky_sfc_lw_dwn: config.prediction.allsky_sfc_lw_dwn,
        dataset_path: config.dataset.path.clone(),
    };
    Json(response).into_response()
}

/// GET /api/health
/// Liveness probe with basic runtime counters
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthStatus)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        regions_loaded: state.dataset.len(),
        sessions_active: state.session_count(),
    };
    Json(response).into_response()
}

// ─── View assembly ───────────────────────────────────────────────────────────

/// Project a session snapshot into the render-ready view. All display
/// rounding happens here; the snapshot itself stays full precision.
fn build_view(snapshot: &SessionState, dataset: &[RegionRecord]) -> SessionView {
    let place = snapshot.place.as_ref().map(|p| PlaceView {
        name: p.name.clone().unwrap_or_else(|| "No name".to_string()),
        address: p.address.clone().unwrap_or_else(|| "No address".to_string()),
        latitude: round4(p.latitude),
        longitude: round4(p.longitude),
    });

    let savings = savings::compute(
        snapshot.panel_area_m2,
        snapshot.monthly_bill_usd,
        snapshot.prediction,
    )
    .map(|e| SavingsView {
        annual_energy_kwh: savings::round2(e.annual_energy_kwh),
        carbon_offset_tons: savings::round2(e.carbon_offset_tons),
        tree_equivalent: e.tree_equivalent,
        monthly_saving_kwh: savings::round2(e.monthly_saving_kwh),
        monthly_saving_usd: savings::round2(e.monthly_saving_usd),
    });

    let region = snapshot
        .place
        .as_ref()
        .and_then(|p| p.locality.as_deref())
        .and_then(|locality| dataset::match_region(locality, dataset))
        .map(region_summary);

    SessionView {
        timestamp: chrono::Utc::now(),
        month: snapshot.month,
        place,
        predicted_daily_energy: snapshot.prediction.map(savings::round2),
        panel_area_m2: snapshot.panel_area_m2,
        monthly_bill_usd: snapshot.monthly_bill_usd,
        savings,
        region,
    }
}

fn region_summary(record: &RegionRecord) -> RegionSummary {
    RegionSummary {
        region_name: record.region_name.clone(),
        percent_qualified: record.percent_qualified,
        count_qualified: record.count_qualified,
        total_area_sqft: record.total_area_sqft,
        kw_total: record.kw_total,
        yearly_sunlight_kwh_total: record.yearly_sunlight_kwh_total,
        yearly_sunlight_kwh_f: record.yearly_sunlight_kwh_f,
        yearly_sunlight_kwh_s: record.yearly_sunlight_kwh_s,
        yearly_sunlight_kwh_w: record.yearly_sunlight_kwh_w,
        yearly_sunlight_kwh_e: record.yearly_sunlight_kwh_e,
        yearly_sunlight_kwh_n: record.yearly_sunlight_kwh_n,
        carbon_offset_metric_tons: record.carbon_offset_metric_tons,
        install_size_buckets: dataset::decode_buckets(&record.install_size_kw_buckets_json),
    }
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}
