//! Scheduling service - Handles availability and reservation use cases.
//!
//! Every operation touching a day's slots runs while holding that day's lock,
//! including the reservation write, so booking and cancelling the same
//! reservation can never interleave. Notifications go out after the lock is
//! released.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info, warn};

use common::AppResult;
use domain::time::{compare, is_on_hour};
use domain::{
    Actor, ActorRole, CalendarGenerator, ClientId, DaySchedule, DomainError, DomainResult,
    ProviderId, Reservation, ReservationId, SessionType,
};

use super::allocator::SlotAllocator;
use super::lifecycle::ReservationLifecycle;
use crate::notification::{Notifier, SchedulingEvent};
use crate::repository::{CalendarRepository, ReservationRepository};

/// Booking request for a block of slots on one date
#[derive(Debug, Clone)]
pub struct ReservationRequest {
    pub provider_id: ProviderId,
    pub client_id: ClientId,
    pub date: NaiveDate,
    /// Slot start times in the order the client picked them
    pub start_times: Vec<NaiveTime>,
    pub session_type: SessionType,
}

/// Outcome of editing a provider's offered slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotPatch {
    pub added: Vec<NaiveTime>,
    pub removed: Vec<NaiveTime>,
}

/// Scheduling service trait for dependency injection.
pub trait SchedulingService: Send + Sync {
    /// Create the provider's default calendar; fails if any date already exists
    fn generate_calendar(
        &self,
        actor: &Actor,
        provider_id: ProviderId,
        anchor: NaiveDate,
        horizon_days: Option<u32>,
    ) -> AppResult<Vec<NaiveDate>>;

    /// Add default days for the dates of the range that are still missing
    fn extend_calendar(
        &self,
        actor: &Actor,
        provider_id: ProviderId,
        anchor: NaiveDate,
        horizon_days: Option<u32>,
    ) -> AppResult<Vec<NaiveDate>>;

    /// Current slots of a provider on a date
    fn get_availability(&self, provider_id: ProviderId, date: NaiveDate) -> AppResult<DaySchedule>;

    /// Replace the offered start times of a day
    fn patch_provider_slots(
        &self,
        actor: &Actor,
        provider_id: ProviderId,
        date: NaiveDate,
        start_times: &[NaiveTime],
    ) -> AppResult<SlotPatch>;

    /// Book a contiguous block of slots
    fn create_reservation(&self, actor: &Actor, request: ReservationRequest) -> AppResult<Reservation>;

    /// Cancel a pending reservation and free its slots
    fn cancel_reservation(&self, reservation_id: ReservationId, actor: &Actor) -> AppResult<Reservation>;

    /// Counselor marks the session as held
    fn complete_reservation(&self, reservation_id: ReservationId, actor: &Actor)
        -> AppResult<Reservation>;

    /// Counselor files the session report
    fn submit_report(&self, reservation_id: ReservationId, actor: &Actor) -> AppResult<Reservation>;

    /// Reservation visible to one of its parties
    fn get_reservation(&self, reservation_id: ReservationId, actor: &Actor) -> AppResult<Reservation>;

    /// Reservations the actor is a party to
    fn list_reservations(&self, actor: &Actor) -> AppResult<Vec<Reservation>>;
}

/// Concrete implementation of SchedulingService.
pub struct Scheduler {
    calendar: Arc<dyn CalendarRepository>,
    reservations: Arc<dyn ReservationRepository>,
    notifier: Arc<dyn Notifier>,
    generator: CalendarGenerator,
    allocator: SlotAllocator,
    lifecycle: ReservationLifecycle,
    default_horizon_days: u32,
}

impl Scheduler {
    /// Create new scheduling service instance
    pub fn new(
        calendar: Arc<dyn CalendarRepository>,
        reservations: Arc<dyn ReservationRepository>,
        notifier: Arc<dyn Notifier>,
        default_horizon_days: u32,
    ) -> Self {
        let allocator = SlotAllocator::new();
        Self {
            calendar,
            reservations,
            notifier,
            generator: CalendarGenerator::default(),
            allocator,
            lifecycle: ReservationLifecycle::new(allocator),
            default_horizon_days,
        }
    }

    fn notify(&self, event: SchedulingEvent) {
        let reservation_id = event.reservation_id();
        if let Err(e) = self.notifier.notify(event) {
            warn!(%reservation_id, error = %e, "Failed to dispatch scheduling notification");
        }
    }

    fn find(&self, reservation_id: ReservationId) -> AppResult<Reservation> {
        self.reservations
            .find_by_id(reservation_id)?
            .ok_or_else(|| DomainError::ReservationNotFound.into())
    }

    /// Apply a lifecycle step under the reservation's day lock.
    ///
    /// If persisting the new status fails, the day is put back as it was.
    fn change_status<F>(
        &self,
        reservation_id: ReservationId,
        actor: &Actor,
        step: F,
    ) -> AppResult<Reservation>
    where
        F: FnOnce(&ReservationLifecycle, &mut Reservation, &mut DaySchedule) -> DomainResult<()>,
    {
        let snapshot = self.find(reservation_id)?;
        if !actor.is_party_to(&snapshot) {
            return Err(DomainError::Forbidden.into());
        }

        let handle = self.calendar.day_handle(snapshot.provider_id, snapshot.date)?;
        let reservation = {
            let mut day = handle.lock();
            // Re-read under the lock; the snapshot may be stale
            let mut reservation = self.find(reservation_id)?;
            let day_before = day.clone();

            step(&self.lifecycle, &mut reservation, &mut day)?;

            if let Err(e) = self.reservations.update(reservation.clone()) {
                *day = day_before;
                return Err(e);
            }
            reservation
        };

        info!(
            reservation_id = %reservation.id,
            status = %reservation.status,
            actor_role = %actor.role,
            "Reservation status changed"
        );
        self.notify(SchedulingEvent::status_changed(&reservation));

        Ok(reservation)
    }
}

impl SchedulingService for Scheduler {
    fn generate_calendar(
        &self,
        actor: &Actor,
        provider_id: ProviderId,
        anchor: NaiveDate,
        horizon_days: Option<u32>,
    ) -> AppResult<Vec<NaiveDate>> {
        actor.require_counselor(provider_id)?;

        let horizon = horizon_days.unwrap_or(self.default_horizon_days);
        let days = self.generator.generate(provider_id, anchor, horizon)?;
        let dates = self.calendar.put_day_schedules(provider_id, days)?;

        info!(%provider_id, %anchor, days = dates.len(), "Calendar generated");
        Ok(dates)
    }

    fn extend_calendar(
        &self,
        actor: &Actor,
        provider_id: ProviderId,
        anchor: NaiveDate,
        horizon_days: Option<u32>,
    ) -> AppResult<Vec<NaiveDate>> {
        actor.require_counselor(provider_id)?;

        let horizon = horizon_days.unwrap_or(self.default_horizon_days);
        let days = self.generator.generate(provider_id, anchor, horizon)?;
        let dates = self.calendar.insert_missing(provider_id, days)?;

        info!(%provider_id, %anchor, days = dates.len(), "Calendar extended");
        Ok(dates)
    }

    fn get_availability(&self, provider_id: ProviderId, date: NaiveDate) -> AppResult<DaySchedule> {
        self.calendar.get_day_schedule(provider_id, date)
    }

    fn patch_provider_slots(
        &self,
        actor: &Actor,
        provider_id: ProviderId,
        date: NaiveDate,
        start_times: &[NaiveTime],
    ) -> AppResult<SlotPatch> {
        actor.require_counselor(provider_id)?;

        if let Some(off_grid) = start_times.iter().find(|t| !is_on_hour(**t)) {
            return Err(DomainError::invalid_times(format!("{} is not on the hour", off_grid)).into());
        }
        let requested: BTreeSet<NaiveTime> = start_times.iter().copied().collect();

        let handle = self.calendar.day_handle(provider_id, date)?;
        let patch = {
            let mut day = handle.lock();
            let diff = compare(&day.start_times(), &requested);
            if diff.is_noop() {
                debug!(%provider_id, %date, "Slot patch changes nothing");
                return Ok(SlotPatch::default());
            }

            let booked = diff
                .removed
                .iter()
                .filter_map(|t| day.slot(*t))
                .find(|slot| slot.is_occupied())
                .map(|slot| slot.start_time);
            if let Some(start_time) = booked {
                debug!(%provider_id, %date, %start_time, "Refusing to delete booked slot");
                return Err(DomainError::SlotDeletionDenied(start_time).into());
            }

            for start_time in &diff.removed {
                day.remove_slot(*start_time);
            }
            for start_time in &diff.additions {
                day.add_slot(*start_time)?;
            }

            SlotPatch {
                added: diff.additions.into_iter().collect(),
                removed: diff.removed.into_iter().collect(),
            }
        };

        info!(
            %provider_id,
            %date,
            added = patch.added.len(),
            removed = patch.removed.len(),
            "Provider slots updated"
        );
        Ok(patch)
    }

    fn create_reservation(&self, actor: &Actor, request: ReservationRequest) -> AppResult<Reservation> {
        actor.require_client(request.client_id)?;

        let handle = self.calendar.day_handle(request.provider_id, request.date)?;
        let reservation = {
            let mut day = handle.lock();
            let mut reservation = Reservation::new(
                request.provider_id,
                request.client_id,
                request.date,
                request.session_type,
            );

            if let Err(e) = self
                .allocator
                .reserve(&mut day, &request.start_times, &mut reservation)
            {
                debug!(
                    provider_id = %request.provider_id,
                    date = %request.date,
                    code = e.code(),
                    "Reservation rejected"
                );
                return Err(e.into());
            }

            if let Err(e) = self.reservations.insert(reservation.clone()) {
                self.allocator.release(&mut day, &reservation);
                return Err(e);
            }
            reservation
        };

        info!(
            reservation_id = %reservation.id,
            provider_id = %reservation.provider_id,
            date = %reservation.date,
            slots = reservation.slots.len(),
            "Reservation created"
        );
        self.notify(SchedulingEvent::created(&reservation));

        Ok(reservation)
    }

    fn cancel_reservation(&self, reservation_id: ReservationId, actor: &Actor) -> AppResult<Reservation> {
        let role = actor.role;
        self.change_status(reservation_id, actor, move |lifecycle, reservation, day| {
            let before = reservation.clone();
            let freed = lifecycle.cancel(reservation, day, role)?;
            if freed != before.slots.len() {
                warn!(
                    reservation_id = %before.id,
                    freed,
                    held = before.slots.len(),
                    "Cancelled reservation held fewer slots than granted"
                );
            }
            Ok(())
        })
    }

    fn complete_reservation(
        &self,
        reservation_id: ReservationId,
        actor: &Actor,
    ) -> AppResult<Reservation> {
        if actor.role != ActorRole::Counselor {
            return Err(DomainError::Forbidden.into());
        }
        self.change_status(reservation_id, actor, |lifecycle, reservation, day| {
            lifecycle.complete(reservation, day)
        })
    }

    fn submit_report(&self, reservation_id: ReservationId, actor: &Actor) -> AppResult<Reservation> {
        if actor.role != ActorRole::Counselor {
            return Err(DomainError::Forbidden.into());
        }
        self.change_status(reservation_id, actor, |lifecycle, reservation, day| {
            lifecycle.submit_report(reservation, day)
        })
    }

    fn get_reservation(&self, reservation_id: ReservationId, actor: &Actor) -> AppResult<Reservation> {
        let reservation = self.find(reservation_id)?;
        if !actor.is_party_to(&reservation) {
            return Err(DomainError::Forbidden.into());
        }
        Ok(reservation)
    }

    fn list_reservations(&self, actor: &Actor) -> AppResult<Vec<Reservation>> {
        match actor.role {
            ActorRole::Client => self.reservations.list_by_client(actor.id),
            ActorRole::Counselor => self.reservations.list_by_provider(actor.id),
        }
    }
}
