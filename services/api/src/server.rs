use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySnapshotStore};
use crate::routes::with_dashboard_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use bizpulse::config::AppConfig;
use bizpulse::dashboard::{DashboardEngine, DashboardService, EngineConfig};
use bizpulse::error::AppError;
use bizpulse::telemetry;
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

    let engine_config = EngineConfig::load(&config.scoring)?;
    info!(
        metrics = engine_config.metrics.len(),
        verticals = engine_config.questions.verticals().len(),
        dead_zone = engine_config.trend.dead_zone,
        "scoring catalogs loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = Arc::new(DashboardEngine::new(engine_config));
    let store = Arc::new(InMemorySnapshotStore::default());
    let service = Arc::new(DashboardService::new(engine, store));

    let app = with_dashboard_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "business health service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
