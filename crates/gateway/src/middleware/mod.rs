//! Middleware for resolving the acting party.

mod actor;

pub use actor::{actor_middleware, CurrentActor, ACTOR_ID_HEADER, ACTOR_ROLE_HEADER};
