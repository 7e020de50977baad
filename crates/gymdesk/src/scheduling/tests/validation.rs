use super::common::*;

use crate::scheduling::domain::{ServiceId, TrainerId, VenueId};
use crate::scheduling::validation::ScheduleViolation;

#[test]
fn clean_draft_produces_empty_report() {
    let store = seeded_store();
    let report = validator(&store)
        .validate(&draft(d(2025, 6, 2), t(10, 0), t(11, 0)), None)
        .unwrap();
    assert!(report.is_ok());
}

#[test]
fn inverted_and_zero_length_ranges_are_violations() {
    let store = seeded_store();
    let checker = validator(&store);

    let report = checker
        .validate(&draft(d(2025, 6, 2), t(11, 0), t(10, 0)), None)
        .unwrap();
    assert!(report
        .violations
        .contains(&ScheduleViolation::StartNotBeforeEnd));

    let report = checker
        .validate(&draft(d(2025, 6, 2), t(10, 0), t(10, 0)), None)
        .unwrap();
    assert!(report
        .violations
        .contains(&ScheduleViolation::StartNotBeforeEnd));
}

#[test]
fn all_rules_are_reported_together() {
    let store = seeded_store();
    let mut candidate = draft(d(2025, 6, 2), t(11, 0), t(10, 0));
    candidate.service_id = ServiceId(99);
    candidate.trainer_id = TrainerId(99);

    let report = validator(&store).validate(&candidate, None).unwrap();
    assert_eq!(report.violations.len(), 3);
    assert!(report
        .violations
        .contains(&ScheduleViolation::StartNotBeforeEnd));
    assert!(report
        .violations
        .contains(&ScheduleViolation::UnknownService(ServiceId(99))));
    assert!(report
        .violations
        .contains(&ScheduleViolation::UnknownTrainer(TrainerId(99))));
}

#[test]
fn venue_mismatches_are_flagged() {
    let store = seeded_store();
    // Trainer 1 and service 1 both belong to venue 1.
    let mut candidate = draft(d(2025, 6, 2), t(10, 0), t(11, 0));
    candidate.venue_id = VenueId(2);

    let report = validator(&store).validate(&candidate, None).unwrap();
    assert!(report.violations.contains(&ScheduleViolation::TrainerVenueMismatch {
        trainer: TrainerId(1),
        venue: VenueId(2),
    }));
    assert!(report.violations.contains(&ScheduleViolation::ServiceVenueMismatch {
        service: ServiceId(1),
        venue: VenueId(2),
    }));
}

#[test]
fn unselected_venue_skips_the_venue_rules() {
    let store = seeded_store();
    let mut candidate = draft(d(2025, 6, 2), t(10, 0), t(11, 0));
    candidate.venue_id = VenueId(0);

    let report = validator(&store).validate(&candidate, None).unwrap();
    assert!(report.is_ok());
}

#[test]
fn range_outside_trainer_window_is_flagged() {
    let store = seeded_store();
    let report = validator(&store)
        .validate(&draft(d(2025, 6, 2), t(8, 0), t(9, 0)), None)
        .unwrap();
    assert_eq!(
        report.violations,
        vec![ScheduleViolation::OutsideAvailability {
            avail_start: t(9, 0),
            avail_end: t(17, 0),
        }]
    );
}

#[test]
fn overlapping_booking_is_flagged_with_the_blocking_slot() {
    let store = seeded_store();
    booking(&store)
        .create(draft(d(2025, 6, 2), t(10, 0), t(11, 0)), &member(2))
        .unwrap();

    let report = validator(&store)
        .validate(&draft(d(2025, 6, 2), t(10, 30), t(11, 30)), None)
        .unwrap();
    assert_eq!(
        report.violations,
        vec![ScheduleViolation::Conflict {
            start: t(10, 0),
            end: t(11, 0),
        }]
    );
}

#[test]
fn boundary_touch_is_not_a_conflict() {
    let store = seeded_store();
    booking(&store)
        .create(draft(d(2025, 6, 2), t(10, 0), t(11, 0)), &member(2))
        .unwrap();

    let report = validator(&store)
        .validate(&draft(d(2025, 6, 2), t(11, 0), t(12, 0)), None)
        .unwrap();
    assert!(report.is_ok());
}

#[test]
fn excluded_record_does_not_conflict_with_itself() {
    let store = seeded_store();
    let record = booking(&store)
        .create(draft(d(2025, 6, 2), t(10, 0), t(11, 0)), &member(2))
        .unwrap();

    // Same slot, but the scan skips the appointment being edited.
    let report = validator(&store)
        .validate(&draft(d(2025, 6, 2), t(10, 0), t(11, 0)), Some(record.id))
        .unwrap();
    assert!(report.is_ok());
}

#[test]
fn report_display_joins_the_violation_messages() {
    let store = seeded_store();
    let mut candidate = draft(d(2025, 6, 2), t(11, 0), t(10, 0));
    candidate.service_id = ServiceId(99);

    let report = validator(&store).validate(&candidate, None).unwrap();
    let text = report.to_string();
    assert!(text.contains("start time must come before end time"));
    assert!(text.contains("; "));
    assert!(text.contains("selected service was not found"));
}
