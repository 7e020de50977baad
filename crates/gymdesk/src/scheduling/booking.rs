use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::authz::capabilities_for;
use super::domain::{
    Actor, Appointment, AppointmentDraft, AppointmentId, AppointmentRecord, TrainerId,
};
use super::store::{EntityStore, StoreError};
use super::validation::{AppointmentValidator, ValidationReport};

/// Error raised by the booking service.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("appointment rejected: {0}")]
    Rejected(ValidationReport),
    #[error("access denied: {0}")]
    AccessDenied(&'static str),
    #[error("appointment not found")]
    NotFound,
    #[error("appointment was modified concurrently; re-fetch and retry")]
    ConcurrentModification,
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => BookingError::NotFound,
            StoreError::VersionMismatch => BookingError::ConcurrentModification,
            other => BookingError::Store(other),
        }
    }
}

/// Applies role-based field protection and commits appointments through the
/// validator.
///
/// The conflict check and the commit are serialized per trainer: without the
/// lock, two concurrent requests could both pass the overlap scan and then
/// both insert, double-booking the trainer.
pub struct BookingService<S> {
    store: Arc<S>,
    validator: AppointmentValidator<S>,
    trainer_locks: Mutex<HashMap<TrainerId, Arc<Mutex<()>>>>,
}

impl<S: EntityStore> BookingService<S> {
    pub fn new(store: Arc<S>) -> Self {
        let validator = AppointmentValidator::new(store.clone());
        Self {
            store,
            validator,
            trainer_locks: Mutex::new(HashMap::new()),
        }
    }

    fn trainer_lock(&self, trainer: TrainerId) -> Arc<Mutex<()>> {
        let mut table = self
            .trainer_locks
            .lock()
            .expect("trainer lock table poisoned");
        table.entry(trainer).or_default().clone()
    }

    /// Create an appointment for the actor, validating the full rule chain.
    pub fn create(
        &self,
        mut draft: AppointmentDraft,
        actor: &Actor,
    ) -> Result<AppointmentRecord, BookingError> {
        let caps = capabilities_for(actor.role);
        if !caps.can_set_arbitrary_owner {
            draft.member_id = actor.member_id;
        }
        if !caps.can_set_approval {
            draft.approved = false;
        }

        let slot = self.trainer_lock(draft.trainer_id);
        let _guard = slot.lock().expect("trainer slot lock poisoned");

        let report = self.validator.validate(&draft, None)?;
        if !report.is_ok() {
            return Err(BookingError::Rejected(report));
        }

        // The validator guarantees the service resolves; the fee is always
        // taken from it, never from the client.
        let service = self
            .store
            .service(draft.service_id)?
            .ok_or(BookingError::NotFound)?;

        let appointment = Appointment {
            member_id: draft.member_id,
            trainer_id: draft.trainer_id,
            service_id: draft.service_id,
            venue_id: draft.venue_id,
            date: draft.date,
            start: draft.start,
            end: draft.end,
            fee: service.fee,
            approved: draft.approved,
            note: draft.note,
            created_at: Utc::now(),
        };

        let record = self.store.insert_appointment(appointment)?;
        tracing::info!(
            appointment = record.id.0,
            trainer = record.appointment.trainer_id.0,
            member = record.appointment.member_id.0,
            "appointment booked"
        );
        Ok(record)
    }

    /// Update an appointment, excluding its own record from the conflict scan.
    ///
    /// Non-admins may only touch their own appointments and cannot flip the
    /// approved flag; the stored value is preserved for them. The draft's
    /// version token must match the stored record or the update is rejected
    /// as a concurrent modification.
    pub fn update(
        &self,
        id: AppointmentId,
        mut draft: AppointmentDraft,
        actor: &Actor,
    ) -> Result<AppointmentRecord, BookingError> {
        let existing = self.store.appointment(id)?.ok_or(BookingError::NotFound)?;

        let caps = capabilities_for(actor.role);
        if !caps.can_set_arbitrary_owner {
            if existing.appointment.member_id != actor.member_id {
                return Err(BookingError::AccessDenied(
                    "appointment belongs to another member",
                ));
            }
            draft.member_id = actor.member_id;
        }
        if !caps.can_set_approval {
            draft.approved = existing.appointment.approved;
        }

        if let Some(version) = draft.version {
            if version != existing.version {
                return Err(BookingError::ConcurrentModification);
            }
        }

        let slot = self.trainer_lock(draft.trainer_id);
        let _guard = slot.lock().expect("trainer slot lock poisoned");

        let report = self.validator.validate(&draft, Some(id))?;
        if !report.is_ok() {
            return Err(BookingError::Rejected(report));
        }

        let service = self
            .store
            .service(draft.service_id)?
            .ok_or(BookingError::NotFound)?;

        let updated = AppointmentRecord {
            id,
            version: existing.version,
            appointment: Appointment {
                member_id: draft.member_id,
                trainer_id: draft.trainer_id,
                service_id: draft.service_id,
                venue_id: draft.venue_id,
                date: draft.date,
                start: draft.start,
                end: draft.end,
                fee: service.fee,
                approved: draft.approved,
                note: draft.note,
                created_at: existing.appointment.created_at,
            },
        };

        Ok(self.store.update_appointment(updated)?)
    }

    /// Delete an appointment. Owners and admins only.
    pub fn delete(&self, id: AppointmentId, actor: &Actor) -> Result<(), BookingError> {
        let existing = self.store.appointment(id)?.ok_or(BookingError::NotFound)?;

        let caps = capabilities_for(actor.role);
        if !caps.can_set_arbitrary_owner && existing.appointment.member_id != actor.member_id {
            return Err(BookingError::AccessDenied(
                "appointment belongs to another member",
            ));
        }

        self.store.delete_appointment(id)?;
        tracing::info!(appointment = id.0, "appointment deleted");
        Ok(())
    }
}
