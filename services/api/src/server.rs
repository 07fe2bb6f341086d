use crate::cli::ServeArgs;
use crate::infra::{load_directory, AppState, InMemoryRequirementRepository};
use crate::routes::with_platform_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use bench_match::config::AppConfig;
use bench_match::error::AppError;
use bench_match::matching::{CandidateDirectory, MatchingService};
use bench_match::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let directory = Arc::new(load_directory(config.matching.bench_data_dir.as_deref())?);
    let candidates = directory.candidate_ids()?.len();
    let matching_service = Arc::new(MatchingService::new(
        Arc::new(InMemoryRequirementRepository::default()),
        directory,
        config.matching.scoring.clone(),
    ));

    let app = with_platform_routes(matching_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, candidates, "bench match service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
