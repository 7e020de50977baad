use std::sync::Arc;

use axum::response::Response;
use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;

use crate::scheduling::availability::AvailabilityEngine;
use crate::scheduling::booking::BookingService;
use crate::scheduling::directory::ScheduleDirectory;
use crate::scheduling::domain::{
    Actor, AppointmentDraft, Member, MemberId, Role, ServiceId, ServiceOffering, Trainer,
    TrainerId, Venue, VenueId,
};
use crate::scheduling::router::{scheduling_router, SchedulingState};
use crate::scheduling::store::InMemoryEntityStore;
use crate::scheduling::validation::AppointmentValidator;

pub(super) fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

pub(super) fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Two venues, three trainers, three services, one admin and two members.
/// Trainers 1 and 2 work at venue 1 from 09:00 to 17:00; trainer 3 works at
/// venue 2 from 10:00 to 18:00.
pub(super) fn seeded_store() -> Arc<InMemoryEntityStore> {
    let store = InMemoryEntityStore::new();

    store.add_venue(Venue {
        id: VenueId(1),
        name: "Downtown".to_string(),
        address: "1 Main St".to_string(),
        opens_at: t(8, 0),
        closes_at: t(22, 0),
        description: None,
    });
    store.add_venue(Venue {
        id: VenueId(2),
        name: "Riverside".to_string(),
        address: "14 Quay Rd".to_string(),
        opens_at: t(7, 0),
        closes_at: t(21, 0),
        description: Some("Pool on site".to_string()),
    });

    store.add_trainer(Trainer {
        id: TrainerId(1),
        name: "Aylin Demir".to_string(),
        specialties: "strength, conditioning".to_string(),
        phone: Some("+90 555 000 0001".to_string()),
        email: None,
        avail_start: t(9, 0),
        avail_end: t(17, 0),
        venue_id: VenueId(1),
        service_ids: vec![ServiceId(1), ServiceId(2)],
    });
    store.add_trainer(Trainer {
        id: TrainerId(2),
        name: "Burak Sahin".to_string(),
        specialties: "pilates".to_string(),
        phone: None,
        email: Some("burak@example.com".to_string()),
        avail_start: t(9, 0),
        avail_end: t(17, 0),
        venue_id: VenueId(1),
        service_ids: vec![ServiceId(2)],
    });
    store.add_trainer(Trainer {
        id: TrainerId(3),
        name: "Cem Yildiz".to_string(),
        specialties: "swimming".to_string(),
        phone: None,
        email: None,
        avail_start: t(10, 0),
        avail_end: t(18, 0),
        venue_id: VenueId(2),
        service_ids: vec![ServiceId(3)],
    });

    store.add_service(ServiceOffering {
        id: ServiceId(1),
        name: "Personal Training".to_string(),
        duration_minutes: 60,
        fee: 400,
        description: None,
        venue_id: VenueId(1),
    });
    store.add_service(ServiceOffering {
        id: ServiceId(2),
        name: "Pilates".to_string(),
        duration_minutes: 50,
        fee: 300,
        description: None,
        venue_id: VenueId(1),
    });
    store.add_service(ServiceOffering {
        id: ServiceId(3),
        name: "Swimming Lesson".to_string(),
        duration_minutes: 45,
        fee: 350,
        description: None,
        venue_id: VenueId(2),
    });

    store.add_member(Member {
        id: MemberId(1),
        name: "Gym Admin".to_string(),
        email: "admin@example.com".to_string(),
        phone: None,
        registered_on: d(2024, 1, 10),
        role: Role::Admin,
    });
    store.add_member(Member {
        id: MemberId(2),
        name: "Deniz Kaya".to_string(),
        email: "deniz@example.com".to_string(),
        phone: Some("+90 555 000 0002".to_string()),
        registered_on: d(2025, 3, 1),
        role: Role::Member,
    });
    store.add_member(Member {
        id: MemberId(3),
        name: "Ece Aydin".to_string(),
        email: "ece@example.com".to_string(),
        phone: None,
        registered_on: d(2025, 4, 15),
        role: Role::Member,
    });

    Arc::new(store)
}

pub(super) fn admin() -> Actor {
    Actor {
        member_id: MemberId(1),
        role: Role::Admin,
    }
}

pub(super) fn member(id: i64) -> Actor {
    Actor {
        member_id: MemberId(id),
        role: Role::Member,
    }
}

/// A draft for trainer 1 / service 1 / venue 1 owned by member 2, with the
/// slot left to the caller.
pub(super) fn draft(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> AppointmentDraft {
    AppointmentDraft {
        member_id: MemberId(2),
        trainer_id: TrainerId(1),
        service_id: ServiceId(1),
        venue_id: VenueId(1),
        date,
        start,
        end,
        fee: 0,
        approved: false,
        note: None,
        version: None,
    }
}

pub(super) fn booking(store: &Arc<InMemoryEntityStore>) -> BookingService<InMemoryEntityStore> {
    BookingService::new(store.clone())
}

pub(super) fn validator(
    store: &Arc<InMemoryEntityStore>,
) -> AppointmentValidator<InMemoryEntityStore> {
    AppointmentValidator::new(store.clone())
}

pub(super) fn engine(
    store: &Arc<InMemoryEntityStore>,
) -> AvailabilityEngine<InMemoryEntityStore> {
    AvailabilityEngine::new(store.clone())
}

pub(super) fn directory(
    store: &Arc<InMemoryEntityStore>,
) -> ScheduleDirectory<InMemoryEntityStore> {
    ScheduleDirectory::new(store.clone(), Arc::new(AvailabilityEngine::new(store.clone())))
}

pub(super) fn router_for(store: &Arc<InMemoryEntityStore>) -> axum::Router {
    scheduling_router(SchedulingState::new(store.clone()))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
