//! OpenAPI documentation.

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::availability_handler::{
    CalendarRequest, CalendarResponse, PatchSlotsRequest, SlotPatchResponse,
};
use crate::handlers::health_handler::HealthResponse;
use crate::handlers::reservation_handler::CreateReservationRequest;
use crate::middleware::{ACTOR_ID_HEADER, ACTOR_ROLE_HEADER};
use domain::{
    ActorRole, DayScheduleResponse, ReservationResponse, ReservationStatus, SessionType,
    SlotResponse,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health_handler::health_check,
        crate::handlers::availability_handler::generate_calendar,
        crate::handlers::availability_handler::extend_calendar,
        crate::handlers::availability_handler::get_availability,
        crate::handlers::availability_handler::patch_provider_slots,
        crate::handlers::reservation_handler::create_reservation,
        crate::handlers::reservation_handler::list_reservations,
        crate::handlers::reservation_handler::get_reservation,
        crate::handlers::reservation_handler::cancel_reservation,
        crate::handlers::reservation_handler::complete_reservation,
        crate::handlers::reservation_handler::submit_report,
    ),
    components(
        schemas(
            HealthResponse,
            CalendarRequest,
            CalendarResponse,
            PatchSlotsRequest,
            SlotPatchResponse,
            CreateReservationRequest,
            DayScheduleResponse,
            SlotResponse,
            ReservationResponse,
            ReservationStatus,
            SessionType,
            ActorRole,
        )
    ),
    modifiers(&ActorHeaders),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Availability", description = "Provider calendars and slots"),
        (name = "Reservations", description = "Booking and reservation lifecycle"),
    )
)]
pub struct ApiDoc;

/// Identity header security schemes.
struct ActorHeaders;

impl Modify for ActorHeaders {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "actor_id",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ACTOR_ID_HEADER))),
            );
            components.add_security_scheme(
                "actor_role",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ACTOR_ROLE_HEADER))),
            );
        }
    }
}
