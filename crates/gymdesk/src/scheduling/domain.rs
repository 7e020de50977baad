use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for gym venues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VenueId(pub i64);

/// Identifier wrapper for trainers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrainerId(pub i64);

/// Identifier wrapper for bookable services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceId(pub i64);

/// Identifier wrapper for registered members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(pub i64);

/// Identifier wrapper for appointments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AppointmentId(pub i64);

/// Physical gym location owning trainers and services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    pub address: String,
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
    pub description: Option<String>,
}

/// Staff member bound to one venue with a daily availability window.
///
/// The window is time-of-day only; it applies to every date. `[avail_start,
/// avail_end)` is half-open, so an appointment ending exactly at `avail_end`
/// is legal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trainer {
    pub id: TrainerId,
    pub name: String,
    pub specialties: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub avail_start: NaiveTime,
    pub avail_end: NaiveTime,
    pub venue_id: VenueId,
    pub service_ids: Vec<ServiceId>,
}

/// Bookable offering tied to the venue where it is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub id: ServiceId,
    pub name: String,
    pub duration_minutes: u16,
    pub fee: u32,
    pub description: Option<String>,
    pub venue_id: VenueId,
}

/// Access role attached to a member account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "member" => Some(Role::Member),
            _ => None,
        }
    }

    pub const fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Registered gym member. Credentials live with the identity provider, not
/// here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub registered_on: NaiveDate,
    pub role: Role,
}

/// The acting user for a mutating operation, as reported by the identity
/// provider. The core trusts this value completely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub member_id: MemberId,
    pub role: Role,
}

impl Actor {
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// A committed appointment. `fee` is always server-derived from the service;
/// `approved` starts false and is only toggled by the approval transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub member_id: MemberId,
    pub trainer_id: TrainerId,
    pub service_id: ServiceId,
    pub venue_id: VenueId,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub fee: u32,
    pub approved: bool,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Stored appointment plus its identity and optimistic-concurrency token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: AppointmentId,
    pub version: u64,
    pub appointment: Appointment,
}

/// Client-submitted appointment fields.
///
/// `fee` and `approved` are accepted on the wire but overridden by the
/// booking service according to the actor's capabilities. `version` carries
/// the token the client read, checked on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub member_id: MemberId,
    pub trainer_id: TrainerId,
    pub service_id: ServiceId,
    pub venue_id: VenueId,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    #[serde(default)]
    pub fee: u32,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub version: Option<u64>,
}
