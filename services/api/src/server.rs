use crate::cli::ServeArgs;
use crate::infra::{AppState, ArtifactStatus};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fair_lending::config::AppConfig;
use fair_lending::error::AppError;
use fair_lending::lending::LoanScoringService;
use fair_lending::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(dir) = args.model_dir.take() {
        config.artifacts = config.artifacts.in_dir(dir);
    }

    telemetry::init(&config.telemetry)?;

    let service = match LoanScoringService::load(&config.artifacts) {
        Ok(service) => service.with_fairness_config(config.fairness.clone()),
        Err(err) => {
            error!(
                error = %err,
                model = %config.artifacts.model_path.display(),
                preprocessor = %config.artifacts.preprocessor_path.display(),
                "failed to load scoring artifacts"
            );
            return Err(err.into());
        }
    };
    info!(
        columns = service.transformer().columns().map(|c| c.len()).unwrap_or_default(),
        baseline = service.baseline().is_some(),
        "scoring artifacts loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        artifacts: ArtifactStatus::of(&service),
    };

    let app = with_service_routes(Arc::new(service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loan scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
