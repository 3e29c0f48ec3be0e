use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryStore};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use scheme_eligibility::config::AppConfig;
use scheme_eligibility::eligibility::{ApplicationService, EligibilityService};
use scheme_eligibility::error::AppError;
use scheme_eligibility::seed::SeedData;
use scheme_eligibility::telemetry;
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
    if let Some(seed) = args.seed.take() {
        config.store.seed_path = Some(seed);
    }

    telemetry::init(&config.telemetry)?;

    let seed = match &config.store.seed_path {
        Some(path) => {
            info!(path = %path.display(), "loading seed data");
            SeedData::from_path(path)?
        }
        None => SeedData::default(),
    };

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryStore::from_seed(seed));
    let (applicants, schemes) = store.counts();
    let eligibility = Arc::new(EligibilityService::new(store.clone(), store.clone()));
    let applications = Arc::new(ApplicationService::new(eligibility.clone(), store));

    let app = with_service_routes(eligibility, applications)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, applicants, schemes, "scheme eligibility service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
