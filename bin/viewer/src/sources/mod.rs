use aztier_viewer_config::catalog::CatalogSource;
use tracing::debug;

use crate::sources::{
    base::{CatalogLoader, LoadCatalogError},
    dir::DirCatalogLoader,
    http::HttpCatalogLoader,
};

pub mod base;
pub mod dir;
pub mod http;
pub mod untiered;

pub fn resolve_from_config(
    config: &CatalogSource,
) -> Result<Box<dyn CatalogLoader + Send + Sync>, LoadCatalogError> {
    match config {
        CatalogSource::Http {
            endpoints,
            connect_timeout,
            request_timeout,
            retry,
        } => {
            debug!("Creating catalog loader over HTTP");
            Ok(HttpCatalogLoader::new(
                endpoints.clone(),
                *connect_timeout,
                *request_timeout,
                retry.into(),
            )?)
        }
        CatalogSource::Dir { path } => {
            debug!(path, "Creating catalog loader from a local directory");
            Ok(DirCatalogLoader::new(path))
        }
    }
}
