//! Acting party of a scheduling operation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{ROLE_CLIENT, ROLE_COUNSELOR};
use crate::error::{DomainError, DomainResult};
use crate::reservation::{Reservation, ReservationStatus};

/// Actor roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ActorRole {
    Client,
    Counselor,
}

impl ActorRole {
    /// Cancellation status produced when this role cancels a reservation
    pub fn cancellation_status(&self) -> ReservationStatus {
        match self {
            ActorRole::Client => ReservationStatus::CancelledByClient,
            ActorRole::Counselor => ReservationStatus::CancelledByCounselor,
        }
    }
}

impl std::str::FromStr for ActorRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_CLIENT => Ok(ActorRole::Client),
            ROLE_COUNSELOR => Ok(ActorRole::Counselor),
            other => Err(DomainError::validation(format!("Unknown role '{}'", other))),
        }
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorRole::Client => write!(f, "{}", ROLE_CLIENT),
            ActorRole::Counselor => write!(f, "{}", ROLE_COUNSELOR),
        }
    }
}

/// Identity supplied with every scheduling operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: ActorRole,
}

impl Actor {
    pub fn client(id: Uuid) -> Self {
        Self {
            id,
            role: ActorRole::Client,
        }
    }

    pub fn counselor(id: Uuid) -> Self {
        Self {
            id,
            role: ActorRole::Counselor,
        }
    }

    /// Require the actor to be the given client
    pub fn require_client(&self, client_id: Uuid) -> DomainResult<()> {
        if self.role == ActorRole::Client && self.id == client_id {
            Ok(())
        } else {
            Err(DomainError::Forbidden)
        }
    }

    /// Require the actor to be the given counselor
    pub fn require_counselor(&self, provider_id: Uuid) -> DomainResult<()> {
        if self.role == ActorRole::Counselor && self.id == provider_id {
            Ok(())
        } else {
            Err(DomainError::Forbidden)
        }
    }

    /// Check whether the actor is a party to the reservation
    pub fn is_party_to(&self, reservation: &Reservation) -> bool {
        match self.role {
            ActorRole::Client => reservation.client_id == self.id,
            ActorRole::Counselor => reservation.provider_id == self.id,
        }
    }
}
