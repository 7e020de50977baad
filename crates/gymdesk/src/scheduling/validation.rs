use std::fmt;
use std::sync::Arc;

use chrono::NaiveTime;
use serde::Serialize;

use super::availability::{overlaps, window_contains};
use super::domain::{AppointmentDraft, AppointmentId, ServiceId, TrainerId, VenueId};
use super::store::{EntityStore, StoreError};

/// A single broken scheduling rule. Business-rule failures are reported, not
/// thrown; the Display text is what callers show to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum ScheduleViolation {
    #[error("start time must come before end time")]
    StartNotBeforeEnd,
    #[error("selected service was not found")]
    UnknownService(ServiceId),
    #[error("selected trainer was not found")]
    UnknownTrainer(TrainerId),
    #[error("selected trainer does not work at the selected venue")]
    TrainerVenueMismatch { trainer: TrainerId, venue: VenueId },
    #[error("selected service is not offered at the selected venue")]
    ServiceVenueMismatch { service: ServiceId, venue: VenueId },
    #[error("requested time range falls outside the trainer's availability window {avail_start}-{avail_end}")]
    OutsideAvailability {
        avail_start: NaiveTime,
        avail_end: NaiveTime,
    },
    #[error("trainer already has an appointment from {start} to {end} that day")]
    Conflict { start: NaiveTime, end: NaiveTime },
}

/// Result of running the full rule chain over a candidate appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ValidationReport {
    pub violations: Vec<ScheduleViolation>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.violations
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

/// Runs the scheduling rule chain over a proposed appointment.
///
/// Every rule is evaluated so the caller gets the complete violation list in
/// one pass; only the rules that depend on a missing trainer or service are
/// skipped. On edit, `exclude` removes the appointment's own record from the
/// conflict scan.
pub struct AppointmentValidator<S> {
    store: Arc<S>,
}

impl<S: EntityStore> AppointmentValidator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn validate(
        &self,
        draft: &AppointmentDraft,
        exclude: Option<AppointmentId>,
    ) -> Result<ValidationReport, StoreError> {
        let mut violations = Vec::new();

        if draft.start >= draft.end {
            violations.push(ScheduleViolation::StartNotBeforeEnd);
        }

        let service = self.store.service(draft.service_id)?;
        let trainer = self.store.trainer(draft.trainer_id)?;

        if service.is_none() {
            violations.push(ScheduleViolation::UnknownService(draft.service_id));
        }
        if trainer.is_none() {
            violations.push(ScheduleViolation::UnknownTrainer(draft.trainer_id));
        }

        // The venue rules only apply when a venue was actually selected.
        if let Some(trainer) = &trainer {
            if draft.venue_id.0 > 0 && trainer.venue_id != draft.venue_id {
                violations.push(ScheduleViolation::TrainerVenueMismatch {
                    trainer: trainer.id,
                    venue: draft.venue_id,
                });
            }
        }
        if let Some(service) = &service {
            if draft.venue_id.0 > 0 && service.venue_id != draft.venue_id {
                violations.push(ScheduleViolation::ServiceVenueMismatch {
                    service: service.id,
                    venue: draft.venue_id,
                });
            }
        }

        if let Some(trainer) = &trainer {
            if !window_contains(
                trainer.avail_start,
                trainer.avail_end,
                draft.start,
                draft.end,
            ) {
                violations.push(ScheduleViolation::OutsideAvailability {
                    avail_start: trainer.avail_start,
                    avail_end: trainer.avail_end,
                });
            }

            for record in self
                .store
                .appointments_for_trainer_on(draft.trainer_id, draft.date)?
            {
                if exclude == Some(record.id) {
                    continue;
                }
                if overlaps(
                    draft.start,
                    draft.end,
                    record.appointment.start,
                    record.appointment.end,
                ) {
                    violations.push(ScheduleViolation::Conflict {
                        start: record.appointment.start,
                        end: record.appointment.end,
                    });
                    break;
                }
            }
        }

        Ok(ValidationReport { violations })
    }
}
