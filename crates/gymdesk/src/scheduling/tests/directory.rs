use super::common::*;

use crate::scheduling::domain::{ServiceId, TrainerId, VenueId};

fn seed_three_bookings(store: &std::sync::Arc<crate::scheduling::store::InMemoryEntityStore>) {
    let service = booking(store);
    service
        .create(draft(d(2025, 6, 2), t(10, 0), t(11, 0)), &member(2))
        .unwrap();
    service
        .create(draft(d(2025, 6, 2), t(11, 0), t(12, 0)), &member(3))
        .unwrap();
    service
        .create(draft(d(2025, 6, 3), t(9, 0), t(10, 0)), &member(2))
        .unwrap();
}

#[test]
fn admin_listing_covers_everyone_newest_date_first() {
    let store = seeded_store();
    seed_three_bookings(&store);

    let views = directory(&store).appointments_for(&admin()).unwrap();
    assert_eq!(views.len(), 3);
    assert_eq!(views[0].date, "2025-06-03");
    assert_eq!(views[1].date, "2025-06-02");
    assert_eq!(views[1].start, "10:00");
    assert_eq!(views[2].start, "11:00");
}

#[test]
fn member_listing_is_scoped_to_their_own_bookings() {
    let store = seeded_store();
    seed_three_bookings(&store);

    let views = directory(&store).appointments_for(&member(2)).unwrap();
    assert_eq!(views.len(), 2);
    assert!(views
        .iter()
        .all(|view| view.member_name.as_deref() == Some("Deniz Kaya")));
}

#[test]
fn listing_rows_resolve_display_names() {
    let store = seeded_store();
    seed_three_bookings(&store);

    let views = directory(&store).appointments_for(&admin()).unwrap();
    let row = &views[1];
    assert_eq!(row.trainer_name.as_deref(), Some("Aylin Demir"));
    assert_eq!(row.service_name.as_deref(), Some("Personal Training"));
    assert_eq!(row.venue_name.as_deref(), Some("Downtown"));
    assert_eq!(row.fee, 400);
    assert_eq!(row.version, 1);
}

#[test]
fn date_listing_filters_and_orders_by_start() {
    let store = seeded_store();
    seed_three_bookings(&store);

    let views = directory(&store)
        .appointments_on(d(2025, 6, 2), &admin())
        .unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].start, "10:00");
    assert_eq!(views[1].start, "11:00");

    let own = directory(&store)
        .appointments_on(d(2025, 6, 2), &member(3))
        .unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].start, "11:00");
}

#[test]
fn pending_queue_lists_unapproved_oldest_first() {
    let store = seeded_store();
    seed_three_bookings(&store);

    let dir = directory(&store);
    let pending = dir.pending_appointments().unwrap();
    assert_eq!(pending.len(), 3);
    assert_eq!(pending[0].date, "2025-06-02");
    assert_eq!(pending[2].date, "2025-06-03");

    // Approve one and it leaves the queue.
    let approvals =
        crate::scheduling::approval::ApprovalService::new(store.clone());
    approvals
        .approve(crate::scheduling::domain::AppointmentId(pending[0].id), &admin())
        .unwrap();
    assert_eq!(dir.pending_appointments().unwrap().len(), 2);
}

#[test]
fn trainer_selection_yields_their_venue_and_its_services() {
    let store = seeded_store();
    let options = directory(&store).options_by_trainer(TrainerId(1)).unwrap();

    assert_eq!(options.venues.len(), 1);
    assert_eq!(options.venues[0].name, "Downtown");
    assert_eq!(options.trainers.len(), 1);
    assert_eq!(options.trainers[0].name, "Aylin Demir");

    let service_names: Vec<&str> = options
        .services
        .iter()
        .map(|option| option.name.as_str())
        .collect();
    assert_eq!(service_names, vec!["Personal Training", "Pilates"]);
}

#[test]
fn venue_selection_yields_its_trainers_and_services_sorted() {
    let store = seeded_store();
    let options = directory(&store).options_by_venue(VenueId(1)).unwrap();

    let trainer_names: Vec<&str> = options
        .trainers
        .iter()
        .map(|option| option.name.as_str())
        .collect();
    assert_eq!(trainer_names, vec!["Aylin Demir", "Burak Sahin"]);
    assert_eq!(options.services.len(), 2);
}

#[test]
fn unknown_selections_yield_empty_option_sets() {
    let store = seeded_store();
    let dir = directory(&store);

    let by_trainer = dir.options_by_trainer(TrainerId(99)).unwrap();
    assert!(by_trainer.venues.is_empty());
    assert!(by_trainer.trainers.is_empty());
    assert!(by_trainer.services.is_empty());

    let by_venue = dir.options_by_venue(VenueId(99)).unwrap();
    assert!(by_venue.venues.is_empty());
    assert!(by_venue.trainers.is_empty());
    assert!(by_venue.services.is_empty());
}

#[test]
fn available_trainer_rows_carry_their_venue() {
    let store = seeded_store();
    booking(&store)
        .create(draft(d(2025, 6, 2), t(10, 0), t(11, 0)), &member(2))
        .unwrap();

    let rows = directory(&store)
        .available_trainers(d(2025, 6, 2), t(10, 0), t(11, 0))
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Burak Sahin");
    assert_eq!(rows[0].venue_name.as_deref(), Some("Downtown"));
    assert_eq!(rows[1].name, "Cem Yildiz");
    assert_eq!(rows[1].venue_name.as_deref(), Some("Riverside"));
    assert_eq!(rows[1].avail_start, "10:00");
}

#[test]
fn deleted_lookup_targets_render_as_missing_names() {
    let store = seeded_store();
    // An appointment referencing entities the store no longer knows.
    use crate::scheduling::store::EntityStore as _;
    store
        .insert_appointment(crate::scheduling::domain::Appointment {
            member_id: crate::scheduling::domain::MemberId(2),
            trainer_id: TrainerId(42),
            service_id: ServiceId(42),
            venue_id: VenueId(42),
            date: d(2025, 6, 2),
            start: t(10, 0),
            end: t(11, 0),
            fee: 400,
            approved: false,
            note: None,
            created_at: chrono::Utc::now(),
        })
        .unwrap();

    let views = directory(&store).appointments_for(&admin()).unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].member_name.as_deref(), Some("Deniz Kaya"));
    assert!(views[0].trainer_name.is_none());
    assert!(views[0].service_name.is_none());
    assert!(views[0].venue_name.is_none());
}
