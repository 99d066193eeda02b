use std::time::Duration;

use async_trait::async_trait;
use aztier_viewer_config::catalog::FeedEndpoints;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::RetryTransientMiddleware;
use retry_policies::policies::ExponentialBackoff;
use tracing::{debug, warn};

use crate::{
    consts::VIEWER_VERSION,
    sources::base::{CatalogLoader, LoadCatalogError, RawFeeds},
};

pub struct HttpCatalogLoader {
    client: ClientWithMiddleware,
    endpoints: FeedEndpoints,
}

impl HttpCatalogLoader {
    pub fn new(
        endpoints: FeedEndpoints,
        connect_timeout: Duration,
        request_timeout: Duration,
        retry_policy: ExponentialBackoff,
    ) -> Result<Box<Self>, LoadCatalogError> {
        let reqwest_client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .user_agent(format!("aztier-viewer/{}", VIEWER_VERSION))
            .build()
            .map_err(LoadCatalogError::ClientCreationError)?;
        let client = ClientBuilder::new(reqwest_client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Box::new(Self { client, endpoints }))
    }

    async fn fetch_text(&self, endpoint: &str) -> Result<String, LoadCatalogError> {
        debug!(endpoint, "Fetching catalog feed");
        let response = self.client.get(endpoint).send().await?;
        Ok(response.error_for_status()?.text().await?)
    }

    /// A missing untiered tracker must not fail the whole catalog load.
    async fn fetch_optional(&self, endpoint: &str) -> Option<String> {
        match self.fetch_text(endpoint).await {
            Ok(text) => Some(text),
            Err(err) => {
                warn!(endpoint, "Failed to fetch untiered tracker: {}", err);
                None
            }
        }
    }
}

#[async_trait]
impl CatalogLoader for HttpCatalogLoader {
    async fn load(&self) -> Result<RawFeeds, LoadCatalogError> {
        Ok(RawFeeds {
            azure_roles: self.fetch_text(&self.endpoints.azure_roles).await?,
            entra_roles: self.fetch_text(&self.endpoints.entra_roles).await?,
            msgraph_permissions: self.fetch_text(&self.endpoints.msgraph_permissions).await?,
            untiered_entra: self.fetch_optional(&self.endpoints.untiered_entra).await,
            untiered_msgraph: self.fetch_optional(&self.endpoints.untiered_msgraph).await,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints_for(server: &mockito::ServerGuard) -> FeedEndpoints {
        FeedEndpoints {
            azure_roles: format!("{}/azure.json", server.url()),
            entra_roles: format!("{}/entra.json", server.url()),
            msgraph_permissions: format!("{}/msgraph.json", server.url()),
            untiered_entra: format!("{}/untiered-entra.md", server.url()),
            untiered_msgraph: format!("{}/untiered-msgraph.md", server.url()),
        }
    }

    fn loader_for(server: &mockito::ServerGuard) -> Box<HttpCatalogLoader> {
        HttpCatalogLoader::new(
            endpoints_for(server),
            Duration::from_secs(1),
            Duration::from_secs(2),
            ExponentialBackoff::builder().build_with_max_retries(0),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn loads_all_five_documents() {
        let mut server = mockito::Server::new_async().await;
        let mocks = vec![
            server.mock("GET", "/azure.json").with_body("[]").create_async().await,
            server.mock("GET", "/entra.json").with_body("[]").create_async().await,
            server.mock("GET", "/msgraph.json").with_body("[]").create_async().await,
            server.mock("GET", "/untiered-entra.md").with_body("md").create_async().await,
            server.mock("GET", "/untiered-msgraph.md").with_body("md").create_async().await,
        ];

        let feeds = loader_for(&server).load().await.unwrap();
        assert_eq!(feeds.azure_roles, "[]");
        assert_eq!(feeds.untiered_entra.as_deref(), Some("md"));
        for mock in mocks {
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn dataset_fetch_failure_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/azure.json")
            .with_status(404)
            .create_async()
            .await;

        let result = loader_for(&server).load().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn untiered_fetch_failure_degrades_to_absent() {
        let mut server = mockito::Server::new_async().await;
        for path in ["/azure.json", "/entra.json", "/msgraph.json"] {
            server.mock("GET", path).with_body("[]").create_async().await;
        }
        server
            .mock("GET", "/untiered-entra.md")
            .with_status(500)
            .create_async()
            .await;
        server
            .mock("GET", "/untiered-msgraph.md")
            .with_body("md")
            .create_async()
            .await;

        let feeds = loader_for(&server).load().await.unwrap();
        assert_eq!(feeds.untiered_entra, None);
        assert_eq!(feeds.untiered_msgraph.as_deref(), Some("md"));
    }
}
