use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use crate::sources::base::{CatalogLoader, LoadCatalogError, RawFeeds};

/// Loads the catalog documents from a local directory, using the same
/// file names the upstream repository publishes.
pub struct DirCatalogLoader {
    dir: PathBuf,
}

impl DirCatalogLoader {
    pub const AZURE_ROLES_FILE: &'static str = "tiered-azure-roles.json";
    pub const ENTRA_ROLES_FILE: &'static str = "tiered-entra-roles.json";
    pub const MSGRAPH_PERMISSIONS_FILE: &'static str = "tiered-msgraph-app-permissions.json";
    pub const UNTIERED_ENTRA_FILE: &'static str = "untiered-entra-roles.md";
    pub const UNTIERED_MSGRAPH_FILE: &'static str = "untiered-msgraph-app-permissions.md";

    pub fn new(dir: &str) -> Box<Self> {
        Box::new(Self {
            dir: PathBuf::from(dir),
        })
    }

    async fn read_file(&self, name: &str) -> Result<String, LoadCatalogError> {
        debug!(dir = ?self.dir, name, "Reading catalog document");
        Ok(fs::read_to_string(self.dir.join(name)).await?)
    }

    async fn read_optional(&self, name: &str) -> Option<String> {
        match self.read_file(name).await {
            Ok(text) => Some(text),
            Err(err) => {
                warn!(name, "Failed to read untiered tracker: {}", err);
                None
            }
        }
    }
}

#[async_trait]
impl CatalogLoader for DirCatalogLoader {
    async fn load(&self) -> Result<RawFeeds, LoadCatalogError> {
        Ok(RawFeeds {
            azure_roles: self.read_file(Self::AZURE_ROLES_FILE).await?,
            entra_roles: self.read_file(Self::ENTRA_ROLES_FILE).await?,
            msgraph_permissions: self.read_file(Self::MSGRAPH_PERMISSIONS_FILE).await?,
            untiered_entra: self.read_optional(Self::UNTIERED_ENTRA_FILE).await,
            untiered_msgraph: self.read_optional(Self::UNTIERED_MSGRAPH_FILE).await,
        })
    }
}
