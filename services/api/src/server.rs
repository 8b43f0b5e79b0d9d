use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAllocationStore};
use crate::routes::with_allocation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use optima::config::AppConfig;
use optima::error::AppError;
use optima::telemetry;
use optima::workflows::allocation::AllocationService;
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

    let store = Arc::new(InMemoryAllocationStore::default());
    let allocation_config = config.allocation.allocation_config();
    info!(
        min_score = allocation_config.min_score,
        "allocation threshold configured"
    );
    let service = Arc::new(AllocationService::new(store, allocation_config));

    let app = with_allocation_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "internship allocation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
