//! Appointment scheduling core.
//!
//! The scheduling rules live here: trainer availability (interval containment
//! plus half-open overlap detection), the full validation rule chain for a
//! proposed appointment, role-aware booking mutations, the admin approval
//! toggle, and the read-side discovery queries backing the booking forms.

pub mod approval;
pub mod authz;
pub mod availability;
pub mod booking;
pub mod directory;
pub mod domain;
pub mod router;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use approval::ApprovalService;
pub use authz::{capabilities_for, Capabilities};
pub use availability::{
    overlaps, window_contains, Availability, AvailabilityEngine, UnavailabilityReason,
};
pub use booking::{BookingError, BookingService};
pub use directory::{
    AppointmentView, ScheduleDirectory, SelectionOption, SelectionOptions,
    TrainerAvailabilityView,
};
pub use domain::{
    Actor, Appointment, AppointmentDraft, AppointmentId, AppointmentRecord, Member, MemberId,
    Role, ServiceId, ServiceOffering, Trainer, TrainerId, Venue, VenueId,
};
pub use router::{scheduling_router, CurrentActor, SchedulingState};
pub use store::{EntityStore, InMemoryEntityStore, StoreError};
pub use validation::{AppointmentValidator, ScheduleViolation, ValidationReport};
