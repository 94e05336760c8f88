//! Reservation handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::AppResult;
use domain::{ReservationId, ReservationResponse, SessionType};
use scheduling_service_lib::service::ReservationRequest;

use crate::extractors::ValidatedJson;
use crate::middleware::CurrentActor;
use crate::state::AppState;

/// Booking request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    /// Counselor to book
    pub provider_id: Uuid,
    /// Client the booking is for; defaults to the caller
    pub client_id: Option<Uuid>,
    /// Session date
    #[schema(value_type = String, example = "2024-06-01")]
    pub date: NaiveDate,
    /// Contiguous slot start times, in any order
    #[validate(length(min = 1, max = 15, message = "between 1 and 15 start times required"))]
    #[schema(value_type = Vec<String>, example = json!(["09:00:00", "10:00:00"]))]
    pub start_times: Vec<NaiveTime>,
    pub session_type: SessionType,
}

/// Create reservation routes (actor required)
pub fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reservations).post(create_reservation))
        .route("/:id", get(get_reservation))
        .route("/:id/cancel", post(cancel_reservation))
        .route("/:id/complete", post(complete_reservation))
        .route("/:id/report", post(submit_report))
}

/// Book a block of slots
#[utoipa::path(
    post,
    path = "/reservations",
    tag = "Reservations",
    security(("actor_id" = []), ("actor_role" = [])),
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ReservationResponse),
        (status = 400, description = "Empty, duplicate or non-contiguous start times"),
        (status = 401, description = "Missing identity headers"),
        (status = 403, description = "Caller is not the client"),
        (status = 404, description = "Date or time not offered"),
        (status = 409, description = "A requested slot is already reserved")
    )
)]
pub async fn create_reservation(
    Extension(CurrentActor(actor)): Extension<CurrentActor>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    let request = ReservationRequest {
        provider_id: payload.provider_id,
        client_id: payload.client_id.unwrap_or(actor.id),
        date: payload.date,
        start_times: payload.start_times,
        session_type: payload.session_type,
    };

    let reservation = state.scheduler.create_reservation(&actor, request)?;
    Ok((StatusCode::CREATED, Json(ReservationResponse::from(reservation))))
}

/// Reservations the caller is a party to
#[utoipa::path(
    get,
    path = "/reservations",
    tag = "Reservations",
    security(("actor_id" = []), ("actor_role" = [])),
    responses(
        (status = 200, description = "Reservations in session order", body = Vec<ReservationResponse>),
        (status = 401, description = "Missing identity headers")
    )
)]
pub async fn list_reservations(
    Extension(CurrentActor(actor)): Extension<CurrentActor>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ReservationResponse>>> {
    let reservations = state.scheduler.list_reservations(&actor)?;
    Ok(Json(
        reservations.into_iter().map(ReservationResponse::from).collect(),
    ))
}

/// Get reservation by ID
#[utoipa::path(
    get,
    path = "/reservations/{id}",
    tag = "Reservations",
    security(("actor_id" = []), ("actor_role" = [])),
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation", body = ReservationResponse),
        (status = 401, description = "Missing identity headers"),
        (status = 403, description = "Caller is not a party to the reservation"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn get_reservation(
    Extension(CurrentActor(actor)): Extension<CurrentActor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReservationResponse>> {
    let reservation = state
        .scheduler
        .get_reservation(ReservationId::from(id), &actor)?;
    Ok(Json(ReservationResponse::from(reservation)))
}

/// Cancel a pending reservation
#[utoipa::path(
    post,
    path = "/reservations/{id}/cancel",
    tag = "Reservations",
    security(("actor_id" = []), ("actor_role" = [])),
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation cancelled, slots freed", body = ReservationResponse),
        (status = 401, description = "Missing identity headers"),
        (status = 403, description = "Not a party, or the reservation is no longer pending"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn cancel_reservation(
    Extension(CurrentActor(actor)): Extension<CurrentActor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReservationResponse>> {
    let reservation = state
        .scheduler
        .cancel_reservation(ReservationId::from(id), &actor)?;
    Ok(Json(ReservationResponse::from(reservation)))
}

/// Mark the session as held (counselor only)
#[utoipa::path(
    post,
    path = "/reservations/{id}/complete",
    tag = "Reservations",
    security(("actor_id" = []), ("actor_role" = [])),
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation completed", body = ReservationResponse),
        (status = 401, description = "Missing identity headers"),
        (status = 403, description = "Not the counselor, or the reservation is not pending"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn complete_reservation(
    Extension(CurrentActor(actor)): Extension<CurrentActor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReservationResponse>> {
    let reservation = state
        .scheduler
        .complete_reservation(ReservationId::from(id), &actor)?;
    Ok(Json(ReservationResponse::from(reservation)))
}

/// File the session report (counselor only)
#[utoipa::path(
    post,
    path = "/reservations/{id}/report",
    tag = "Reservations",
    security(("actor_id" = []), ("actor_role" = [])),
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Report recorded", body = ReservationResponse),
        (status = 401, description = "Missing identity headers"),
        (status = 403, description = "Not the counselor, or the session is not completed"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn submit_report(
    Extension(CurrentActor(actor)): Extension<CurrentActor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReservationResponse>> {
    let reservation = state
        .scheduler
        .submit_report(ReservationId::from(id), &actor)?;
    Ok(Json(ReservationResponse::from(reservation)))
}
