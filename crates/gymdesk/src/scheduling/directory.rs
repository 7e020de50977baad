use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use super::availability::AvailabilityEngine;
use super::domain::{Actor, AppointmentRecord, TrainerId, VenueId};
use super::store::{EntityStore, StoreError};

/// Flattened appointment row for listings: display names resolved, dates and
/// times pre-formatted the way the booking screens show them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentView {
    pub id: i64,
    pub member_name: Option<String>,
    pub trainer_name: Option<String>,
    pub service_name: Option<String>,
    pub venue_name: Option<String>,
    pub date: String,
    pub start: String,
    pub end: String,
    pub fee: u32,
    pub approved: bool,
    pub note: Option<String>,
    pub version: u64,
}

/// An id/name pair for dependent-selection dropdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionOption {
    pub id: i64,
    pub name: String,
}

/// Dependent-selection payload: pick a trainer and get its venue plus that
/// venue's services; pick a venue and get its trainers plus services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct SelectionOptions {
    pub venues: Vec<SelectionOption>,
    pub trainers: Vec<SelectionOption>,
    pub services: Vec<SelectionOption>,
}

/// Trainer row returned by the availability discovery query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainerAvailabilityView {
    pub id: i64,
    pub name: String,
    pub specialties: String,
    pub venue_id: i64,
    pub venue_name: Option<String>,
    pub avail_start: String,
    pub avail_end: String,
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Read-only query surface for the booking screens. Role filtering happens
/// here, at the boundary; the engines below it are role-agnostic.
pub struct ScheduleDirectory<S> {
    store: Arc<S>,
    availability: Arc<AvailabilityEngine<S>>,
}

impl<S: EntityStore> ScheduleDirectory<S> {
    pub fn new(store: Arc<S>, availability: Arc<AvailabilityEngine<S>>) -> Self {
        Self {
            store,
            availability,
        }
    }

    /// All appointments for admins, own appointments for members, newest date
    /// first and earliest start first within a date.
    pub fn appointments_for(&self, actor: &Actor) -> Result<Vec<AppointmentView>, StoreError> {
        let mut records = if actor.is_admin() {
            self.store.appointments()?
        } else {
            self.store.appointments_for_member(actor.member_id)?
        };

        records.sort_by(|a, b| {
            b.appointment
                .date
                .cmp(&a.appointment.date)
                .then(a.appointment.start.cmp(&b.appointment.start))
        });

        records.iter().map(|record| self.view(record)).collect()
    }

    /// Appointments on an exact date, member-filtered for non-admins, ordered
    /// by start time.
    pub fn appointments_on(
        &self,
        date: NaiveDate,
        actor: &Actor,
    ) -> Result<Vec<AppointmentView>, StoreError> {
        let mut records = self.store.appointments_on(date)?;
        if !actor.is_admin() {
            records.retain(|record| record.appointment.member_id == actor.member_id);
        }
        records.sort_by(|a, b| a.appointment.start.cmp(&b.appointment.start));

        records.iter().map(|record| self.view(record)).collect()
    }

    /// Unapproved appointments for the admin review queue, oldest date first.
    pub fn pending_appointments(&self) -> Result<Vec<AppointmentView>, StoreError> {
        let mut records = self.store.pending_appointments()?;
        records.sort_by(|a, b| {
            a.appointment
                .date
                .cmp(&b.appointment.date)
                .then(a.appointment.start.cmp(&b.appointment.start))
        });

        records.iter().map(|record| self.view(record)).collect()
    }

    /// Trainers free for the requested slot, with their venue resolved.
    pub fn available_trainers(
        &self,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Vec<TrainerAvailabilityView>, StoreError> {
        let trainers = self.availability.find_available_trainers(date, start, end)?;
        trainers
            .iter()
            .map(|trainer| {
                let venue_name = self.store.venue(trainer.venue_id)?.map(|venue| venue.name);
                Ok(TrainerAvailabilityView {
                    id: trainer.id.0,
                    name: trainer.name.clone(),
                    specialties: trainer.specialties.clone(),
                    venue_id: trainer.venue_id.0,
                    venue_name,
                    avail_start: format_time(trainer.avail_start),
                    avail_end: format_time(trainer.avail_end),
                })
            })
            .collect()
    }

    /// Trainer selected: its venue, that venue's services, and the trainer
    /// itself. Unknown trainers produce empty option sets.
    pub fn options_by_trainer(
        &self,
        trainer_id: TrainerId,
    ) -> Result<SelectionOptions, StoreError> {
        let Some(trainer) = self.store.trainer(trainer_id)? else {
            return Ok(SelectionOptions::default());
        };

        let venues = self
            .store
            .venue(trainer.venue_id)?
            .map(|venue| {
                vec![SelectionOption {
                    id: venue.id.0,
                    name: venue.name,
                }]
            })
            .unwrap_or_default();

        Ok(SelectionOptions {
            venues,
            trainers: vec![SelectionOption {
                id: trainer.id.0,
                name: trainer.name,
            }],
            services: self.service_options(trainer.venue_id)?,
        })
    }

    /// Venue selected: its trainers and its services, names sorted.
    pub fn options_by_venue(&self, venue_id: VenueId) -> Result<SelectionOptions, StoreError> {
        let venues = self
            .store
            .venue(venue_id)?
            .map(|venue| {
                vec![SelectionOption {
                    id: venue.id.0,
                    name: venue.name,
                }]
            })
            .unwrap_or_default();

        let mut trainers: Vec<SelectionOption> = self
            .store
            .trainers_by_venue(venue_id)?
            .into_iter()
            .map(|trainer| SelectionOption {
                id: trainer.id.0,
                name: trainer.name,
            })
            .collect();
        trainers.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(SelectionOptions {
            venues,
            trainers,
            services: self.service_options(venue_id)?,
        })
    }

    fn service_options(&self, venue_id: VenueId) -> Result<Vec<SelectionOption>, StoreError> {
        let mut services: Vec<SelectionOption> = self
            .store
            .services_by_venue(venue_id)?
            .into_iter()
            .map(|service| SelectionOption {
                id: service.id.0,
                name: service.name,
            })
            .collect();
        services.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(services)
    }

    fn view(&self, record: &AppointmentRecord) -> Result<AppointmentView, StoreError> {
        let appointment = &record.appointment;
        let member_name = self
            .store
            .member(appointment.member_id)?
            .map(|member| member.name);
        let trainer_name = self
            .store
            .trainer(appointment.trainer_id)?
            .map(|trainer| trainer.name);
        let service_name = self
            .store
            .service(appointment.service_id)?
            .map(|service| service.name);
        let venue_name = self
            .store
            .venue(appointment.venue_id)?
            .map(|venue| venue.name);

        Ok(AppointmentView {
            id: record.id.0,
            member_name,
            trainer_name,
            service_name,
            venue_name,
            date: format_date(appointment.date),
            start: format_time(appointment.start),
            end: format_time(appointment.end),
            fee: appointment.fee,
            approved: appointment.approved,
            note: appointment.note.clone(),
            version: record.version,
        })
    }
}
