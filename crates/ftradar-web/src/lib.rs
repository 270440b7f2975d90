use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router, middleware,
    routing::{get, post},
};

use ftradar_core::subsidy::ProgramCatalog;
use ftradar_core::{ItemStore, RadarConfig};

mod csv;
mod dto;
mod error;
mod handlers;
mod pages;
mod security;
mod session;


use session::SessionRegistry;

#[derive(Clone)]
pub(crate) struct WebState {
    pub(crate) config: Arc<RadarConfig>,
    pub(crate) store: ItemStore,
    pub(crate) catalog: Arc<ProgramCatalog>,
    pub(crate) sessions: SessionRegistry,
}

impl WebState {
    fn new(config: RadarConfig) -> ftradar_core::Result<Self> {
        let store = ItemStore::open(&config.db_path)?;
        let catalog = ProgramCatalog::resolve(config.programs_path.as_deref())?;
        Ok(Self {
            config: Arc::new(config),
            store,
            catalog: Arc::new(catalog),
            sessions: SessionRegistry::default(),
        })
    }
}

/// Start the dashboard server and block until shutdown.
///
/// # Errors
/// Returns an error when the item store or program catalog cannot be opened,
/// the runtime cannot be created, the socket cannot be bound, or the server
/// exits with a runtime failure.
pub fn serve_web(config: RadarConfig, host: &str, port: u16) -> Result<()> {
    if !config.access.allow_public && config.access.access_code.is_none() {
        tracing::warn!("no access code configured and public access disabled; login will always fail");
    }
    let state = WebState::new(config).context("failed to prepare dashboard state")?;
    let bind_addr = format!("{host}:{port}");
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build web runtime")?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind web server at {bind_addr}"))?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "dashboard listening");
        println!("dashboard listening on http://{local_addr}");

        axum::serve(listener, app_router(state))
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
            .context("web server failed")
    })
}

pub(crate) fn app_router(state: WebState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/assets/radar.css", get(handlers::stylesheet))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/radar", get(handlers::radar))
        .route("/radar/export.csv", get(handlers::radar_csv))
        .route("/pricing", get(handlers::pricing))
        .route("/subsidies", get(handlers::subsidies))
        .route("/subsidies/export.csv", get(handlers::subsidies_csv))
        .layer(middleware::from_fn(security::security_headers_middleware))
        .with_state(state)
}
