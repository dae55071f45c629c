use crate::cli::ServeArgs;
use crate::infra::{
    default_workflow_config, load_directory, AppState, InMemoryApprovalRepository,
    RecordingGateway, RecordingNotifier,
};
use crate::routes::with_credit_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use credit_flow::config::AppConfig;
use credit_flow::error::AppError;
use credit_flow::telemetry;
use credit_flow::workflows::credit::approvals::DirectorApprovalService;
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

    let directory = load_directory(args.roster_csv.take())?;
    info!(signatories = directory.len(), "signatory roster loaded");

    let repository = Arc::new(InMemoryApprovalRepository::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let gateway = Arc::new(RecordingGateway::default());
    let approval_service = Arc::new(DirectorApprovalService::new(
        repository,
        notifier,
        gateway,
        directory,
        default_workflow_config(config.approvals.signature_policy()),
    ));

    let app = with_credit_routes(approval_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "credit application service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
