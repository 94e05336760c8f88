//! Provider calendar and availability handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::AppResult;
use domain::DayScheduleResponse;

use crate::extractors::ValidatedJson;
use crate::middleware::CurrentActor;
use crate::state::AppState;

/// Calendar generation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CalendarRequest {
    /// First date of the generated range
    #[schema(value_type = String, example = "2024-06-01")]
    pub anchor: NaiveDate,
    /// Number of days to cover; defaults to the configured horizon
    #[validate(range(min = 1, max = 366, message = "must be between 1 and 366 days"))]
    #[schema(example = 30)]
    pub horizon_days: Option<u32>,
}

/// Dates written by a calendar request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CalendarResponse {
    pub provider_id: Uuid,
    #[schema(value_type = Vec<String>)]
    pub dates: Vec<NaiveDate>,
}

/// Full list of start times the provider wants to offer on a date
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PatchSlotsRequest {
    #[validate(length(max = 24, message = "at most 24 start times per day"))]
    #[schema(value_type = Vec<String>, example = json!(["09:00:00", "10:00:00"]))]
    pub start_times: Vec<NaiveTime>,
}

/// Start times added and removed by a patch
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SlotPatchResponse {
    #[schema(value_type = Vec<String>)]
    pub added: Vec<NaiveTime>,
    #[schema(value_type = Vec<String>)]
    pub removed: Vec<NaiveTime>,
}

/// Routes open to anyone
pub fn availability_routes() -> Router<AppState> {
    Router::new().route("/:id/availability/:date", get(get_availability))
}

/// Routes acting on behalf of the provider (actor required)
pub fn calendar_routes() -> Router<AppState> {
    Router::new()
        .route("/:id/calendar", post(generate_calendar))
        .route("/:id/calendar/extend", post(extend_calendar))
        .route("/:id/availability/:date", put(patch_provider_slots))
}

/// Generate the provider's default calendar
#[utoipa::path(
    post,
    path = "/providers/{id}/calendar",
    tag = "Availability",
    security(("actor_id" = []), ("actor_role" = [])),
    params(
        ("id" = Uuid, Path, description = "Provider ID")
    ),
    request_body = CalendarRequest,
    responses(
        (status = 201, description = "Calendar generated", body = CalendarResponse),
        (status = 400, description = "Invalid horizon"),
        (status = 401, description = "Missing identity headers"),
        (status = 403, description = "Not this provider"),
        (status = 409, description = "A date in the range is already scheduled")
    )
)]
pub async fn generate_calendar(
    Extension(CurrentActor(actor)): Extension<CurrentActor>,
    State(state): State<AppState>,
    Path(provider_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CalendarRequest>,
) -> AppResult<(StatusCode, Json<CalendarResponse>)> {
    let dates = state.scheduler.generate_calendar(
        &actor,
        provider_id,
        payload.anchor,
        payload.horizon_days,
    )?;

    Ok((StatusCode::CREATED, Json(CalendarResponse { provider_id, dates })))
}

/// Add default days for unscheduled dates in the range
#[utoipa::path(
    post,
    path = "/providers/{id}/calendar/extend",
    tag = "Availability",
    security(("actor_id" = []), ("actor_role" = [])),
    params(
        ("id" = Uuid, Path, description = "Provider ID")
    ),
    request_body = CalendarRequest,
    responses(
        (status = 200, description = "Newly scheduled dates", body = CalendarResponse),
        (status = 400, description = "Invalid horizon"),
        (status = 401, description = "Missing identity headers"),
        (status = 403, description = "Not this provider")
    )
)]
pub async fn extend_calendar(
    Extension(CurrentActor(actor)): Extension<CurrentActor>,
    State(state): State<AppState>,
    Path(provider_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CalendarRequest>,
) -> AppResult<Json<CalendarResponse>> {
    let dates = state.scheduler.extend_calendar(
        &actor,
        provider_id,
        payload.anchor,
        payload.horizon_days,
    )?;

    Ok(Json(CalendarResponse { provider_id, dates }))
}

/// Slots of a provider on a date
#[utoipa::path(
    get,
    path = "/providers/{id}/availability/{date}",
    tag = "Availability",
    params(
        ("id" = Uuid, Path, description = "Provider ID"),
        ("date" = String, Path, description = "Date (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Day schedule", body = DayScheduleResponse),
        (status = 404, description = "No schedule on this date")
    )
)]
pub async fn get_availability(
    State(state): State<AppState>,
    Path((provider_id, date)): Path<(Uuid, NaiveDate)>,
) -> AppResult<Json<DayScheduleResponse>> {
    let day = state.scheduler.get_availability(provider_id, date)?;
    Ok(Json(DayScheduleResponse::from(day)))
}

/// Replace the start times offered on a date
#[utoipa::path(
    put,
    path = "/providers/{id}/availability/{date}",
    tag = "Availability",
    security(("actor_id" = []), ("actor_role" = [])),
    params(
        ("id" = Uuid, Path, description = "Provider ID"),
        ("date" = String, Path, description = "Date (YYYY-MM-DD)")
    ),
    request_body = PatchSlotsRequest,
    responses(
        (status = 200, description = "Slots updated", body = SlotPatchResponse),
        (status = 400, description = "Start time not on the hour"),
        (status = 401, description = "Missing identity headers"),
        (status = 403, description = "Not this provider, or a removed slot is booked"),
        (status = 404, description = "No schedule on this date")
    )
)]
pub async fn patch_provider_slots(
    Extension(CurrentActor(actor)): Extension<CurrentActor>,
    State(state): State<AppState>,
    Path((provider_id, date)): Path<(Uuid, NaiveDate)>,
    ValidatedJson(payload): ValidatedJson<PatchSlotsRequest>,
) -> AppResult<Json<SlotPatchResponse>> {
    let patch = state
        .scheduler
        .patch_provider_slots(&actor, provider_id, date, &payload.start_times)?;

    Ok(Json(SlotPatchResponse {
        added: patch.added,
        removed: patch.removed,
    }))
}
