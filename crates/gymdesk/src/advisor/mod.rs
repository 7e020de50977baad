//! AI coaching suggestions.
//!
//! Builds a prompt from the member's profile and recent appointment history,
//! hands it to a pluggable text generator, and degrades to a static message
//! when the backend is unavailable so the booking flow never breaks on it.

pub mod gemini;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::scheduling::store::{EntityStore, StoreError};
use crate::scheduling::{CurrentActor, MemberId};

/// Error raised by a text generation backend.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation backend failed: {0}")]
    Backend(String),
    #[error("generation runtime unavailable: {0}")]
    Runtime(String),
}

/// Synchronous text generation seam. Implementations own whatever async
/// machinery they need internally.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, GenerationError>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionRequest {
    pub goal: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub text: String,
    /// True when the backend failed and the text is the static fallback.
    pub degraded: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("a goal is required to generate a suggestion")]
    MissingGoal,
    #[error("member not found")]
    MemberNotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

const SYSTEM_PROMPT: &str = "You are a professional fitness coach and dietitian \
working for a gym. Using the member profile and appointment history provided, \
produce a personalised recommendation with these sections: 1) a short assessment \
of the member's current routine, 2) a weekly training plan, 3) nutrition guidance, \
4) recovery advice, 5) one concrete next step. Keep the tone encouraging and \
practical. Do not give medical diagnoses; advise seeing a doctor where relevant.";

const FALLBACK_MESSAGE: &str = "The coaching assistant is unavailable right now. \
Your trainer can put together a plan at your next appointment.";

/// Assembles member context and requests a coaching suggestion.
pub struct CoachAdvisor<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
}

impl<S: EntityStore, G: TextGenerator> CoachAdvisor<S, G> {
    pub fn new(store: Arc<S>, generator: Arc<G>) -> Self {
        Self { store, generator }
    }

    pub fn suggest(
        &self,
        member_id: MemberId,
        request: &SuggestionRequest,
    ) -> Result<Suggestion, AdvisorError> {
        let goal = request.goal.trim();
        if goal.is_empty() {
            return Err(AdvisorError::MissingGoal);
        }

        let member = self
            .store
            .member(member_id)?
            .ok_or(AdvisorError::MemberNotFound)?;

        let mut history = self.store.appointments_for_member(member_id)?;
        history.sort_by(|a, b| b.appointment.date.cmp(&a.appointment.date));
        history.truncate(10);

        let mut summary = String::new();
        summary.push_str(&format!("Member: {}\n", member.name));
        summary.push_str(&format!("Email: {}\n", member.email));
        summary.push_str(&format!(
            "Phone: {}\n",
            member.phone.as_deref().unwrap_or("not provided")
        ));
        summary.push_str(&format!(
            "Registered: {}\n",
            member.registered_on.format("%Y-%m-%d")
        ));
        summary.push_str("Appointment history:\n");
        if history.is_empty() {
            summary.push_str("- no appointments on record.\n");
        }
        for record in &history {
            let service = self
                .store
                .service(record.appointment.service_id)?
                .map(|service| service.name);
            let trainer = self
                .store
                .trainer(record.appointment.trainer_id)?
                .map(|trainer| trainer.name);
            summary.push_str(&format!(
                "- {} | {} | Trainer: {}\n",
                record.appointment.date.format("%Y-%m-%d"),
                service.as_deref().unwrap_or("unspecified"),
                trainer.as_deref().unwrap_or("unspecified"),
            ));
        }
        summary.push_str(&format!("Goal: {goal}\n"));
        summary.push_str(&format!(
            "Note: {}\n",
            request.note.as_deref().unwrap_or("none")
        ));

        match self.generator.generate(SYSTEM_PROMPT, &summary) {
            Ok(text) => Ok(Suggestion {
                text,
                degraded: false,
            }),
            Err(err) => {
                tracing::warn!(error = %err, member = member_id.0, "suggestion backend failed");
                Ok(Suggestion {
                    text: FALLBACK_MESSAGE.to_string(),
                    degraded: true,
                })
            }
        }
    }
}

/// Shared advisor handle for the HTTP handler.
pub struct AdvisorState<S, G> {
    pub advisor: Arc<CoachAdvisor<S, G>>,
}

impl<S, G> Clone for AdvisorState<S, G> {
    fn clone(&self) -> Self {
        Self {
            advisor: self.advisor.clone(),
        }
    }
}

pub fn advisor_router<S, G>(state: AdvisorState<S, G>) -> Router
where
    S: EntityStore + 'static,
    G: TextGenerator + 'static,
{
    Router::new()
        .route(
            "/api/v1/advisor/suggestions",
            post(suggestion_handler::<S, G>),
        )
        .with_state(state)
}

async fn suggestion_handler<S, G>(
    State(state): State<AdvisorState<S, G>>,
    CurrentActor(actor): CurrentActor,
    Json(request): Json<SuggestionRequest>,
) -> Response
where
    S: EntityStore + 'static,
    G: TextGenerator + 'static,
{
    let advisor = state.advisor.clone();
    // The generator blocks on its own runtime; keep it off the async workers.
    let result = tokio::task::spawn_blocking(move || {
        advisor.suggest(actor.member_id, &request)
    })
    .await;

    let result = match result {
        Ok(result) => result,
        Err(err) => {
            tracing::error!(error = %err, "suggestion task panicked");
            let payload = json!({ "error": "internal error" });
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
        }
    };

    match result {
        Ok(suggestion) => (StatusCode::OK, Json(suggestion)).into_response(),
        Err(AdvisorError::MissingGoal) => {
            let payload = json!({ "error": AdvisorError::MissingGoal.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(AdvisorError::MemberNotFound) => {
            let payload = json!({ "error": AdvisorError::MemberNotFound.to_string() });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(AdvisorError::Store(err)) => {
            tracing::error!(error = %err, "entity store failure");
            let payload = json!({ "error": "internal error" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
