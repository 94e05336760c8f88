//! Reservation repository.
//!
//! Reservations are never physically deleted; a terminal status marks the end
//! of their life.

use dashmap::DashMap;

use common::AppResult;
use domain::{ClientId, DomainError, ProviderId, Reservation, ReservationId};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Reservation repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ReservationRepository: Send + Sync {
    /// Find reservation by ID
    fn find_by_id(&self, id: ReservationId) -> AppResult<Option<Reservation>>;

    /// Store a new reservation
    fn insert(&self, reservation: Reservation) -> AppResult<()>;

    /// Overwrite an existing reservation
    fn update(&self, reservation: Reservation) -> AppResult<()>;

    /// Reservations booked by a client, oldest session first
    fn list_by_client(&self, client_id: ClientId) -> AppResult<Vec<Reservation>>;

    /// Reservations held with a provider, oldest session first
    fn list_by_provider(&self, provider_id: ProviderId) -> AppResult<Vec<Reservation>>;
}

/// In-memory reservation store
#[derive(Default)]
pub struct ReservationStore {
    reservations: DashMap<ReservationId, Reservation>,
}

impl ReservationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn collect<F>(&self, keep: F) -> Vec<Reservation>
    where
        F: Fn(&Reservation) -> bool,
    {
        let mut found: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        found.sort_by(|a, b| {
            (a.date, a.slots.first().map(|s| s.start_time), a.created_at).cmp(&(
                b.date,
                b.slots.first().map(|s| s.start_time),
                b.created_at,
            ))
        });
        found
    }
}

impl ReservationRepository for ReservationStore {
    fn find_by_id(&self, id: ReservationId) -> AppResult<Option<Reservation>> {
        Ok(self.reservations.get(&id).map(|entry| entry.value().clone()))
    }

    fn insert(&self, reservation: Reservation) -> AppResult<()> {
        if self.reservations.contains_key(&reservation.id) {
            return Err(DomainError::internal(format!(
                "reservation {} already stored",
                reservation.id
            ))
            .into());
        }
        self.reservations.insert(reservation.id, reservation);
        Ok(())
    }

    fn update(&self, reservation: Reservation) -> AppResult<()> {
        match self.reservations.get_mut(&reservation.id) {
            Some(mut entry) => {
                *entry = reservation;
                Ok(())
            }
            None => Err(DomainError::ReservationNotFound.into()),
        }
    }

    fn list_by_client(&self, client_id: ClientId) -> AppResult<Vec<Reservation>> {
        Ok(self.collect(|r| r.client_id == client_id))
    }

    fn list_by_provider(&self, provider_id: ProviderId) -> AppResult<Vec<Reservation>> {
        Ok(self.collect(|r| r.provider_id == provider_id))
    }
}
