use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum LoadCatalogError {
    #[error("Failed to read catalog document: {0}")]
    ReadFileError(#[from] std::io::Error),
    #[error("Failed to fetch catalog feed: {0}")]
    NetworkError(#[from] reqwest_middleware::Error),
    #[error("Failed to read catalog feed response: {0}")]
    NetworkResponseError(#[from] reqwest::Error),
    #[error("Failed to create the HTTP client: {0}")]
    ClientCreationError(reqwest::Error),
    #[error("Failed to parse the {partition} dataset: {error}")]
    DatasetParseError {
        partition: &'static str,
        error: serde_json::Error,
    },
}

/// The five raw feed documents of one catalog load. The untiered trackers
/// are optional: a failed count fetch degrades to a missing document and
/// later to a count of zero, never to a failed load.
#[derive(Debug, Default)]
pub struct RawFeeds {
    pub azure_roles: String,
    pub entra_roles: String,
    pub msgraph_permissions: String,
    pub untiered_entra: Option<String>,
    pub untiered_msgraph: Option<String>,
}

#[async_trait]
pub trait CatalogLoader {
    async fn load(&self) -> Result<RawFeeds, LoadCatalogError>;
}
