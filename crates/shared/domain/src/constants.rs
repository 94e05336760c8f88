//! Domain-level constants.
//!
//! These constants define the shape of a provider's bookable day.

// =============================================================================
// Actor Roles
// =============================================================================

/// Role of an actor booking sessions
pub const ROLE_CLIENT: &str = "client";

/// Role of an actor offering sessions
pub const ROLE_COUNSELOR: &str = "counselor";

// =============================================================================
// Calendar
// =============================================================================

/// Hour of the first slot in a generated day
pub const FIRST_SLOT_HOUR: u32 = 9;

/// Hour of the last slot in a generated day (inclusive)
pub const LAST_SLOT_HOUR: u32 = 23;

/// Length of a single session slot
pub const SLOT_DURATION_MINUTES: i64 = 50;

/// Number of days generated at onboarding
pub const DEFAULT_HORIZON_DAYS: u32 = 30;

/// Upper bound for a single generation request
pub const MAX_HORIZON_DAYS: u32 = 366;
