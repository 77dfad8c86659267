use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryIdentifierRepository, InMemoryNotificationPublisher};
use crate::routes::with_admission_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use nu_admissions::config::AppConfig;
use nu_admissions::error::AppError;
use nu_admissions::telemetry;
use nu_admissions::workflows::admissions::{AdmissionsService, InMemorySequenceSource};
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

    let catalog = Arc::new(config.catalog.load()?);
    info!(
        programs = catalog.programs.len(),
        policies = catalog.policies.len(),
        source = ?config.catalog.path,
        "catalog loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let admissions_service = Arc::new(AdmissionsService::new(
        catalog,
        Arc::new(InMemorySequenceSource::default()),
        Arc::new(InMemoryIdentifierRepository::default()),
        Arc::new(InMemoryNotificationPublisher::default()),
    ));

    let app = with_admission_routes(admissions_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "admissions engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}
