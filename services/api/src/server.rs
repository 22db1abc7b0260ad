use crate::cli::ServeArgs;
use crate::demo::demo_reference_provider;
use crate::infra::{default_engine_config, AppState, InMemoryCaseRepository};
use crate::routes::with_case_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hiperfaturometro::analysis::CaseService;
use hiperfaturometro::config::AppConfig;
use hiperfaturometro::error::AppError;
use hiperfaturometro::telemetry;
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

    let provider = Arc::new(demo_reference_provider());
    let repository = Arc::new(InMemoryCaseRepository::default());
    let case_service = Arc::new(CaseService::new(
        provider,
        repository,
        default_engine_config(),
    )?);

    let app = with_case_routes(case_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "overpricing risk service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
