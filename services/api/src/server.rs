use crate::cli::ServeArgs;
use crate::infra::{AppState, Backoffice};
use crate::routes::with_backoffice_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use writerdesk::config::AppConfig;
use writerdesk::error::AppError;
use writerdesk::telemetry;

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
    let backoffice = Backoffice::in_memory(config.ledger.clone());
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        backoffice: backoffice.clone(),
    };

    let app = with_backoffice_routes(&backoffice)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        records_per_page = config.ledger.records_per_page,
        "writer desk back office ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
