use crate::cli::ServeArgs;
use crate::infra::{load_directory, AppState, LabelingContext};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use medfit::config::AppConfig;
use medfit::error::AppError;
use medfit::telemetry;
use medfit::workflows::diagnosis::{DiagnosisService, InMemorySessionStore};
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
    if let Some(companies) = args.companies.take() {
        config.data.companies_csv = companies;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let labeling = Arc::new(LabelingContext::from_config(&config.data)?);
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        labeling: labeling.clone(),
    };

    let directory = Arc::new(load_directory(&config.data.companies_csv, &labeling)?);
    let sessions = Arc::new(InMemorySessionStore::default());
    let diagnosis_service = Arc::new(DiagnosisService::new(sessions, directory.clone()));

    let app = with_service_routes(diagnosis_service, config.data.survey_callback_token.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        companies = directory.len(),
        rule_set = %labeling.rule_set.version,
        match_mode = %config.data.match_mode,
        "career fit service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
