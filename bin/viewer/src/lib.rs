mod background_tasks;
mod catalog_state;
mod consts;
mod http_utils;
mod logger;
mod pipeline;
mod sources;

use std::sync::Arc;

use aztier_viewer_config::load_config;
use ntex::web;
use tracing::info;

use crate::{
    background_tasks::BackgroundTasksManager,
    consts::VIEWER_VERSION,
    http_utils::probes::{health_check_handler, readiness_check_handler},
    logger::configure_logging,
    pipeline::{entries_handler, index_handler, view_handler},
};

pub use crate::catalog_state::{Catalog, CatalogState};

pub async fn viewer_entrypoint() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("VIEWER_CONFIG_FILE_PATH").ok();
    let viewer_config = load_config(config_path)?;
    configure_logging(&viewer_config.log);
    info!("aztier-viewer@{} starting...", VIEWER_VERSION);

    let addr = viewer_config.http.address();
    let mut bg_tasks_manager = BackgroundTasksManager::new();
    let catalog_state = Arc::new(CatalogState::new_from_config(
        &mut bg_tasks_manager,
        &viewer_config.catalog,
    )?);

    let maybe_error = web::HttpServer::new(async move || {
        web::App::new()
            .state(catalog_state.clone())
            .configure(configure_ntex_app)
            .default_service(web::to(index_handler))
    })
    .bind(addr)?
    .run()
    .await
    .map_err(|err| err.into());

    info!("server stopped, cleaning up background tasks");
    bg_tasks_manager.shutdown().await;

    maybe_error
}

pub fn configure_ntex_app(service_config: &mut web::ServiceConfig) {
    service_config
        .route("/", web::to(index_handler))
        .route("/view/{fragment}", web::to(view_handler))
        .route("/view/{fragment}/entries", web::to(entries_handler))
        .route("/health", web::to(health_check_handler))
        .route("/readiness", web::to(readiness_check_handler));
}
