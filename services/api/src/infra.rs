use chrono::{NaiveDate, NaiveTime};
use gymdesk::advisor::gemini::GeminiClient;
use gymdesk::advisor::{GenerationError, TextGenerator};
use gymdesk::scheduling::{
    InMemoryEntityStore, Member, MemberId, Role, ServiceId, ServiceOffering, Trainer, TrainerId,
    Venue, VenueId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Suggestion backend selected at startup: Gemini when an API key is
/// configured, otherwise a stub whose failure triggers the advisor's
/// degraded fallback text.
pub(crate) enum SuggestionBackend {
    Gemini(GeminiClient),
    Disabled,
}

impl TextGenerator for SuggestionBackend {
    fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GenerationError> {
        match self {
            SuggestionBackend::Gemini(client) => client.generate(system_prompt, user_prompt),
            SuggestionBackend::Disabled => Err(GenerationError::Backend(
                "no generation api key configured".to_string(),
            )),
        }
    }
}

fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("static seed time")
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("static seed date")
}

/// Development fixture: two venues with their trainers, services, an admin
/// account, and two members. Replaced by a relational store in deployment.
pub(crate) fn seed_demo_data(store: &InMemoryEntityStore) {
    store.add_venue(Venue {
        id: VenueId(1),
        name: "Gymdesk Downtown".to_string(),
        address: "1 Main Street".to_string(),
        opens_at: t(8, 0),
        closes_at: t(22, 0),
        description: Some("Flagship venue with full equipment floor".to_string()),
    });
    store.add_venue(Venue {
        id: VenueId(2),
        name: "Gymdesk Riverside".to_string(),
        address: "14 Quay Road".to_string(),
        opens_at: t(7, 0),
        closes_at: t(21, 0),
        description: Some("Pool and studio classes".to_string()),
    });

    store.add_trainer(Trainer {
        id: TrainerId(1),
        name: "Aylin Demir".to_string(),
        specialties: "strength, conditioning".to_string(),
        phone: Some("+90 555 000 0001".to_string()),
        email: Some("aylin@gymdesk.example".to_string()),
        avail_start: t(9, 0),
        avail_end: t(17, 0),
        venue_id: VenueId(1),
        service_ids: vec![ServiceId(1), ServiceId(2)],
    });
    store.add_trainer(Trainer {
        id: TrainerId(2),
        name: "Burak Sahin".to_string(),
        specialties: "pilates, mobility".to_string(),
        phone: None,
        email: Some("burak@gymdesk.example".to_string()),
        avail_start: t(12, 0),
        avail_end: t(20, 0),
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
        description: Some("One-on-one strength session".to_string()),
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
        email: "admin@gymdesk.example".to_string(),
        phone: None,
        registered_on: date(2024, 1, 10),
        role: Role::Admin,
    });
    store.add_member(Member {
        id: MemberId(2),
        name: "Deniz Kaya".to_string(),
        email: "deniz@gymdesk.example".to_string(),
        phone: Some("+90 555 000 0002".to_string()),
        registered_on: date(2025, 3, 1),
        role: Role::Member,
    });
    store.add_member(Member {
        id: MemberId(3),
        name: "Ece Aydin".to_string(),
        email: "ece@gymdesk.example".to_string(),
        phone: None,
        registered_on: date(2025, 4, 15),
        role: Role::Member,
    });
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|err| format!("failed to parse '{raw}' as HH:MM ({err})"))
}
