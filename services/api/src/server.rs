use crate::cli::ServeArgs;
use crate::infra::{seed_demo_data, AppState, SuggestionBackend};
use crate::routes::with_scheduling_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use gymdesk::advisor::gemini::GeminiClient;
use gymdesk::advisor::{AdvisorState, CoachAdvisor};
use gymdesk::config::AppConfig;
use gymdesk::error::AppError;
use gymdesk::scheduling::{InMemoryEntityStore, SchedulingState};
use gymdesk::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryEntityStore::new());
    seed_demo_data(&store);

    let backend = match config.advisor.gemini_api_key.clone() {
        Some(key) => SuggestionBackend::Gemini(GeminiClient::with_runtime(
            key,
            config.advisor.gemini_model.clone(),
        )?),
        None => {
            info!("no gemini api key configured; coaching suggestions will degrade");
            SuggestionBackend::Disabled
        }
    };
    let advisor = AdvisorState {
        advisor: Arc::new(CoachAdvisor::new(store.clone(), Arc::new(backend))),
    };

    let app = with_scheduling_routes(SchedulingState::new(store), advisor)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "gym scheduling service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
