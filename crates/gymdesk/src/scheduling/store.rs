use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use super::domain::{
    Appointment, AppointmentId, AppointmentRecord, Member, MemberId, ServiceId, ServiceOffering,
    Trainer, TrainerId, Venue, VenueId,
};

/// Storage abstraction over the relational store so the scheduling services
/// can be exercised in isolation.
///
/// Implementations must provide point lookups and the appointment scans the
/// availability and conflict checks rely on. `update_appointment` checks the
/// record's version against the stored one and bumps it on success; a stale
/// version is the optimistic-concurrency failure signal.
pub trait EntityStore: Send + Sync {
    fn venue(&self, id: VenueId) -> Result<Option<Venue>, StoreError>;
    fn trainer(&self, id: TrainerId) -> Result<Option<Trainer>, StoreError>;
    fn service(&self, id: ServiceId) -> Result<Option<ServiceOffering>, StoreError>;
    fn member(&self, id: MemberId) -> Result<Option<Member>, StoreError>;
    fn appointment(&self, id: AppointmentId) -> Result<Option<AppointmentRecord>, StoreError>;

    fn trainers(&self) -> Result<Vec<Trainer>, StoreError>;
    fn trainers_by_venue(&self, venue: VenueId) -> Result<Vec<Trainer>, StoreError>;
    fn services_by_venue(&self, venue: VenueId) -> Result<Vec<ServiceOffering>, StoreError>;

    fn appointments(&self) -> Result<Vec<AppointmentRecord>, StoreError>;
    fn appointments_for_trainer_on(
        &self,
        trainer: TrainerId,
        date: NaiveDate,
    ) -> Result<Vec<AppointmentRecord>, StoreError>;
    fn appointments_on(&self, date: NaiveDate) -> Result<Vec<AppointmentRecord>, StoreError>;
    fn appointments_for_member(
        &self,
        member: MemberId,
    ) -> Result<Vec<AppointmentRecord>, StoreError>;
    fn pending_appointments(&self) -> Result<Vec<AppointmentRecord>, StoreError>;

    fn insert_appointment(
        &self,
        appointment: Appointment,
    ) -> Result<AppointmentRecord, StoreError>;
    fn update_appointment(
        &self,
        record: AppointmentRecord,
    ) -> Result<AppointmentRecord, StoreError>;
    fn delete_appointment(&self, id: AppointmentId) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record changed since it was read")]
    VersionMismatch,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Default)]
struct StoreState {
    venues: HashMap<VenueId, Venue>,
    trainers: HashMap<TrainerId, Trainer>,
    services: HashMap<ServiceId, ServiceOffering>,
    members: HashMap<MemberId, Member>,
    appointments: HashMap<AppointmentId, AppointmentRecord>,
    next_appointment_id: i64,
}

/// In-memory entity store backing development, the demo CLI, and tests.
#[derive(Default, Clone)]
pub struct InMemoryEntityStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_venue(&self, venue: Venue) {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.venues.insert(venue.id, venue);
    }

    pub fn add_trainer(&self, trainer: Trainer) {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.trainers.insert(trainer.id, trainer);
    }

    pub fn add_service(&self, service: ServiceOffering) {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.services.insert(service.id, service);
    }

    pub fn add_member(&self, member: Member) {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.members.insert(member.id, member);
    }
}

impl EntityStore for InMemoryEntityStore {
    fn venue(&self, id: VenueId) -> Result<Option<Venue>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.venues.get(&id).cloned())
    }

    fn trainer(&self, id: TrainerId) -> Result<Option<Trainer>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.trainers.get(&id).cloned())
    }

    fn service(&self, id: ServiceId) -> Result<Option<ServiceOffering>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.services.get(&id).cloned())
    }

    fn member(&self, id: MemberId) -> Result<Option<Member>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.members.get(&id).cloned())
    }

    fn appointment(&self, id: AppointmentId) -> Result<Option<AppointmentRecord>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.appointments.get(&id).cloned())
    }

    fn trainers(&self) -> Result<Vec<Trainer>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.trainers.values().cloned().collect())
    }

    fn trainers_by_venue(&self, venue: VenueId) -> Result<Vec<Trainer>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .trainers
            .values()
            .filter(|trainer| trainer.venue_id == venue)
            .cloned()
            .collect())
    }

    fn services_by_venue(&self, venue: VenueId) -> Result<Vec<ServiceOffering>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .services
            .values()
            .filter(|service| service.venue_id == venue)
            .cloned()
            .collect())
    }

    fn appointments(&self) -> Result<Vec<AppointmentRecord>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.appointments.values().cloned().collect())
    }

    fn appointments_for_trainer_on(
        &self,
        trainer: TrainerId,
        date: NaiveDate,
    ) -> Result<Vec<AppointmentRecord>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .appointments
            .values()
            .filter(|record| {
                record.appointment.trainer_id == trainer && record.appointment.date == date
            })
            .cloned()
            .collect())
    }

    fn appointments_on(&self, date: NaiveDate) -> Result<Vec<AppointmentRecord>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .appointments
            .values()
            .filter(|record| record.appointment.date == date)
            .cloned()
            .collect())
    }

    fn appointments_for_member(
        &self,
        member: MemberId,
    ) -> Result<Vec<AppointmentRecord>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .appointments
            .values()
            .filter(|record| record.appointment.member_id == member)
            .cloned()
            .collect())
    }

    fn pending_appointments(&self) -> Result<Vec<AppointmentRecord>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .appointments
            .values()
            .filter(|record| !record.appointment.approved)
            .cloned()
            .collect())
    }

    fn insert_appointment(
        &self,
        appointment: Appointment,
    ) -> Result<AppointmentRecord, StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.next_appointment_id += 1;
        let record = AppointmentRecord {
            id: AppointmentId(state.next_appointment_id),
            version: 1,
            appointment,
        };
        state.appointments.insert(record.id, record.clone());
        Ok(record)
    }

    fn update_appointment(
        &self,
        record: AppointmentRecord,
    ) -> Result<AppointmentRecord, StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        let stored = state
            .appointments
            .get(&record.id)
            .ok_or(StoreError::NotFound)?;
        if stored.version != record.version {
            return Err(StoreError::VersionMismatch);
        }
        let updated = AppointmentRecord {
            id: record.id,
            version: record.version + 1,
            appointment: record.appointment,
        };
        state.appointments.insert(updated.id, updated.clone());
        Ok(updated)
    }

    fn delete_appointment(&self, id: AppointmentId) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state
            .appointments
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
