use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use super::domain::{Trainer, TrainerId};
use super::store::{EntityStore, StoreError};

/// Half-open interval overlap: `[a_start, a_end)` against `[b_start, b_end)`.
/// Touching at a boundary is not overlap.
pub fn overlaps(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Whether `[start, end)` lies within the window `[window_start, window_end)`.
pub fn window_contains(
    window_start: NaiveTime,
    window_end: NaiveTime,
    start: NaiveTime,
    end: NaiveTime,
) -> bool {
    window_start <= start && end <= window_end
}

/// Why a trainer is not bookable for a requested slot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnavailabilityReason {
    #[error("trainer {} was not found", (.0).0)]
    UnknownTrainer(TrainerId),
    #[error("start time must come before end time")]
    InvertedRange,
    #[error("requested range falls outside the trainer's availability window {avail_start}-{avail_end}")]
    OutsideWindow {
        avail_start: NaiveTime,
        avail_end: NaiveTime,
    },
    #[error("trainer already booked {start}-{end} that day")]
    Booked { start: NaiveTime, end: NaiveTime },
}

/// Outcome of an availability probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub available: bool,
    pub reason: Option<UnavailabilityReason>,
}

impl Availability {
    fn free() -> Self {
        Self {
            available: true,
            reason: None,
        }
    }

    fn blocked(reason: UnavailabilityReason) -> Self {
        Self {
            available: false,
            reason: Some(reason),
        }
    }
}

/// Read-only engine answering "is this trainer free" and "who is free".
pub struct AvailabilityEngine<S> {
    store: Arc<S>,
}

impl<S: EntityStore> AvailabilityEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Probe a single trainer for a date and half-open time range.
    ///
    /// Fails closed: an unknown trainer is reported as unavailable, not an
    /// error. Date comparison is exact (date-only, no time component).
    pub fn is_available(
        &self,
        trainer_id: TrainerId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Availability, StoreError> {
        if start >= end {
            return Ok(Availability::blocked(UnavailabilityReason::InvertedRange));
        }

        let Some(trainer) = self.store.trainer(trainer_id)? else {
            return Ok(Availability::blocked(UnavailabilityReason::UnknownTrainer(
                trainer_id,
            )));
        };

        if !window_contains(trainer.avail_start, trainer.avail_end, start, end) {
            return Ok(Availability::blocked(UnavailabilityReason::OutsideWindow {
                avail_start: trainer.avail_start,
                avail_end: trainer.avail_end,
            }));
        }

        for record in self.store.appointments_for_trainer_on(trainer_id, date)? {
            if overlaps(start, end, record.appointment.start, record.appointment.end) {
                return Ok(Availability::blocked(UnavailabilityReason::Booked {
                    start: record.appointment.start,
                    end: record.appointment.end,
                }));
            }
        }

        Ok(Availability::free())
    }

    /// All trainers whose window contains the range and who have no
    /// overlapping appointment on that date, sorted by name.
    pub fn find_available_trainers(
        &self,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Vec<Trainer>, StoreError> {
        if start >= end {
            return Ok(Vec::new());
        }

        let mut free = Vec::new();
        for trainer in self.store.trainers()? {
            if !window_contains(trainer.avail_start, trainer.avail_end, start, end) {
                continue;
            }

            let booked = self
                .store
                .appointments_for_trainer_on(trainer.id, date)?
                .iter()
                .any(|record| {
                    overlaps(start, end, record.appointment.start, record.appointment.end)
                });

            if !booked {
                free.push(trainer);
            }
        }

        free.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(free)
    }
}
