use std::sync::Arc;

use super::authz::capabilities_for;
use super::booking::BookingError;
use super::domain::{Actor, AppointmentId, AppointmentRecord};
use super::store::EntityStore;

/// Admin-only transitions toggling an appointment between pending and
/// approved. Transitions touch only the approved flag; scheduling rules are
/// not re-checked once an appointment has been accepted.
pub struct ApprovalService<S> {
    store: Arc<S>,
}

impl<S: EntityStore> ApprovalService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn approve(
        &self,
        id: AppointmentId,
        actor: &Actor,
    ) -> Result<AppointmentRecord, BookingError> {
        self.set_approval(id, actor, true)
    }

    pub fn revoke(
        &self,
        id: AppointmentId,
        actor: &Actor,
    ) -> Result<AppointmentRecord, BookingError> {
        self.set_approval(id, actor, false)
    }

    fn set_approval(
        &self,
        id: AppointmentId,
        actor: &Actor,
        approved: bool,
    ) -> Result<AppointmentRecord, BookingError> {
        if !capabilities_for(actor.role).can_set_approval {
            return Err(BookingError::AccessDenied(
                "approval transitions require the admin role",
            ));
        }

        let mut record = self.store.appointment(id)?.ok_or(BookingError::NotFound)?;

        // Idempotent: re-applying the current state is a no-op success.
        if record.appointment.approved == approved {
            return Ok(record);
        }

        record.appointment.approved = approved;
        let stored = self.store.update_appointment(record)?;
        tracing::info!(appointment = id.0, approved, "approval state changed");
        Ok(stored)
    }
}
