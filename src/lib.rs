pub mod auth;
pub mod cancellation;
pub mod client;
pub mod clock;
pub mod dates;
pub mod error;
pub mod handlers;
pub mod ical;
pub mod models;
pub mod openapi;
pub mod schedule;
pub mod settings;
pub mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use chrono_tz::Tz;
use handlers::{
    cancel_booking, get_auto_bookings, get_auto_bookings_ical, get_bookings, get_overview,
    healthz_live, healthz_ready, root,
};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::client::BookingBackendClient;
use crate::clock::Clock;
use crate::ical::OccurrenceExporter;
use crate::openapi::ApiDoc;
use crate::settings::Settings;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub client: Arc<BookingBackendClient>,
    pub exporter: Arc<OccurrenceExporter>,
    pub clock: Clock,
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let timezone: Tz = settings.timezone.parse()?;

    let state = AppState {
        client: Arc::new(BookingBackendClient::new(
            settings.backend_base_url.clone(),
            settings.backend_session_token.clone(),
        )),
        exporter: Arc::new(OccurrenceExporter::new(settings.class_duration_min)),
        clock: Clock::System(timezone),
        settings,
    };

    let app = build_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    info!("Starting Gym Booking Assistant API on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .route("/auto-bookings", get(get_auto_bookings))
        .route("/auto-bookings.ical", get(get_auto_bookings_ical))
        .route("/bookings", get(get_bookings))
        .route("/bookings/cancel", post(cancel_booking))
        .route("/overview", get(get_overview))
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router.layer(trace_layer)
}
