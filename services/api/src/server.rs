use crate::cli::ServeArgs;
use crate::infra::{AppState, LogMailer};
use crate::routes::with_portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use jobworks::config::AppConfig;
use jobworks::telemetry;
use jobworks::{AppError, MemoryStore, Portal, PortalStores};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub(crate) async fn run(args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::from_env()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (metrics_layer, metrics_handle) = PrometheusMetricLayer::pair();
    let state = AppState::new(metrics_handle);

    let store = Arc::new(MemoryStore::default());
    let portal = Arc::new(Portal::new(
        PortalStores::from_memory(&store),
        Arc::new(LogMailer),
        config.mail.from_address.clone(),
    ));

    let app = with_portal_routes(portal)
        .layer(Extension(state.clone()))
        .layer(metrics_layer);

    let addr = config.server.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    state.mark_ready();

    info!(?config.environment, %addr, "job board portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
