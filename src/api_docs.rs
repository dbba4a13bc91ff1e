use utoipa::OpenApi;
use crate::controllers::estimate_controller;
use crate::models::solar;

#[derive(OpenApi)]
#[openapi(
    paths(
        estimate_controller::create_session,
        estimate_controller::get_session,
        estimate_controller::delete_session,
        estimate_controller::post_event,
        estimate_controller::list_regions,
        estimate_controller::get_region,
        estimate_controller::get_system_config,
        estimate_controller::health
    ),
    components(
        schemas(
            solar::Month,
            solar::Place,
            solar::UiEvent,
            solar::SessionCreated,
            solar::SessionView,
            solar::PlaceView,
            solar::SavingsView,
            solar::RegionSummary,
            solar::SizeBucket,
            solar::SystemConfig,
            solar::HealthStatus
        )
    ),
    tags(
        (name = "solar-estimator", description = "Solar Savings Estimation API")
    )
)]
pub struct ApiDoc;
