//! Service layer - slot allocation, reservation lifecycle and the scheduling facade.

mod allocator;
mod lifecycle;
mod scheduler;

pub use allocator::SlotAllocator;
pub use lifecycle::ReservationLifecycle;
pub use scheduler::{ReservationRequest, Scheduler, SchedulingService, SlotPatch};
