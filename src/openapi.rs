use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::cancellation::{CancellationState, CancellationStatus};
use crate::handlers::CancelBookingRequest;
use crate::models::{
    AutoBookingRecord, AutoBookingView, BookingRecord, BookingView, OverviewResponse,
};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("Token")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "query_token",
            SecurityScheme::ApiKey(ApiKey::Query(ApiKeyValue::new("token"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::get_auto_bookings,
        crate::handlers::get_auto_bookings_ical,
        crate::handlers::get_bookings,
        crate::handlers::cancel_booking,
        crate::handlers::get_overview
    ),
    components(schemas(
        AutoBookingRecord,
        BookingRecord,
        AutoBookingView,
        BookingView,
        OverviewResponse,
        CancellationState,
        CancellationStatus,
        CancelBookingRequest
    )),
    tags(
        (name = "assistant", description = "Gym booking assistant operations")
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;
