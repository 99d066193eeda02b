use std::sync::Arc;
use std::time::Duration;

use arc_swap::{ArcSwap, Guard};
use async_trait::async_trait;
use aztier_tiering::model::{Dataset, Partition, PerPartition};
use aztier_viewer_config::catalog::CatalogConfig;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::{
    background_tasks::{BackgroundTask, BackgroundTasksManager},
    sources::{
        base::{CatalogLoader, LoadCatalogError, RawFeeds},
        resolve_from_config, untiered,
    },
};

/// One consistent load of all feeds: the three datasets plus the untiered
/// counts. Swapped in atomically, never mutated in place.
#[derive(Debug, Default)]
pub struct Catalog {
    pub datasets: PerPartition<Dataset>,
    pub untiered: PerPartition<usize>,
}

impl Catalog {
    pub fn from_feeds(feeds: RawFeeds) -> Result<Self, LoadCatalogError> {
        let mut datasets = PerPartition::<Dataset>::default();
        datasets[Partition::Azure] = parse_dataset("azure", &feeds.azure_roles)?;
        datasets[Partition::Entra] = parse_dataset("entra", &feeds.entra_roles)?;
        datasets[Partition::MsGraph] = parse_dataset("msgraph", &feeds.msgraph_permissions)?;

        let mut untiered = PerPartition::<usize>::default();
        untiered[Partition::Entra] = feeds
            .untiered_entra
            .as_deref()
            .map(untiered::additions_count)
            .unwrap_or(0);
        untiered[Partition::MsGraph] = feeds
            .untiered_msgraph
            .as_deref()
            .map(untiered::additions_count)
            .unwrap_or(0);

        Ok(Self { datasets, untiered })
    }
}

fn parse_dataset(partition: &'static str, raw: &str) -> Result<Dataset, LoadCatalogError> {
    serde_json::from_str(raw).map_err(|error| LoadCatalogError::DatasetParseError {
        partition,
        error,
    })
}

/// The in-memory store of the loaded catalog, refreshed in the background
/// and read lock-free by the request handlers.
pub struct CatalogState {
    current_swapable: Arc<ArcSwap<Option<Catalog>>>,
}

impl CatalogState {
    pub fn current(&self) -> Guard<Arc<Option<Catalog>>> {
        self.current_swapable.load()
    }

    pub fn is_ready(&self) -> bool {
        self.current().is_some()
    }

    pub fn new_from_config(
        bg_tasks_manager: &mut BackgroundTasksManager,
        config: &CatalogConfig,
    ) -> Result<Self, LoadCatalogError> {
        let loader = resolve_from_config(&config.source)?;
        let swappable_data = Arc::new(ArcSwap::from(Arc::new(None)));

        bg_tasks_manager.register_task(Arc::new(CatalogRefreshTask {
            loader,
            poll_interval: config.poll_interval,
            target: swappable_data.clone(),
        }));

        Ok(Self {
            current_swapable: swappable_data,
        })
    }

    /// A pre-loaded state, bypassing sources. Used by handler tests.
    #[cfg(test)]
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            current_swapable: Arc::new(ArcSwap::from(Arc::new(Some(catalog)))),
        }
    }

    /// The state before the first successful load. Used by handler tests.
    #[cfg(test)]
    pub fn unloaded() -> Self {
        Self {
            current_swapable: Arc::new(ArcSwap::from(Arc::new(None))),
        }
    }
}

struct CatalogRefreshTask {
    loader: Box<dyn CatalogLoader + Send + Sync>,
    poll_interval: Duration,
    target: Arc<ArcSwap<Option<Catalog>>>,
}

#[async_trait]
impl BackgroundTask for CatalogRefreshTask {
    fn id(&self) -> &str {
        "catalog-refresh"
    }

    async fn run(&self, token: CancellationToken) {
        loop {
            if token.is_cancelled() {
                trace!("Background task cancelled");

                break;
            }

            match self.loader.load().await {
                Ok(feeds) => match Catalog::from_feeds(feeds) {
                    Ok(catalog) => {
                        info!(
                            azure = catalog.datasets[Partition::Azure].records().len(),
                            entra = catalog.datasets[Partition::Entra].records().len(),
                            msgraph = catalog.datasets[Partition::MsGraph].records().len(),
                            "Catalog refreshed successfully"
                        );
                        self.target.store(Arc::new(Some(catalog)));
                    }
                    // The last good catalog keeps serving on a bad refresh.
                    Err(err) => {
                        error!("Failed to parse the fetched catalog: {}", err);
                    }
                },
                Err(err) => {
                    error!("Failed to load the catalog: {}", err);
                }
            }

            debug!(
                "waiting for {:?}ms before refreshing the catalog",
                self.poll_interval.as_millis()
            );

            ntex::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feeds() -> RawFeeds {
        RawFeeds {
            azure_roles: r#"[{"name": "Owner", "tier": 0}, {"name": "Untracked"}]"#.to_string(),
            entra_roles: r#"[{"assetName": "Global Admin", "id": "62e9", "tier": "0"}]"#
                .to_string(),
            msgraph_permissions: "[]".to_string(),
            untiered_entra: Some(
                "### \u{2795} Additions\n| Detected on | Role |\n|---|---|\n| 2024 | X |\n"
                    .to_string(),
            ),
            untiered_msgraph: None,
        }
    }

    #[test]
    fn builds_a_catalog_from_raw_feeds() {
        let catalog = Catalog::from_feeds(feeds()).unwrap();
        assert_eq!(catalog.datasets[Partition::Azure].records().len(), 2);
        assert_eq!(catalog.datasets[Partition::Entra].records().len(), 1);
        assert_eq!(catalog.untiered[Partition::Entra], 1);
        // A missing tracker degrades to zero, not to a failed load.
        assert_eq!(catalog.untiered[Partition::MsGraph], 0);
    }

    #[test]
    fn malformed_dataset_fails_the_load() {
        let mut bad = feeds();
        bad.entra_roles = "{not json".to_string();
        let err = Catalog::from_feeds(bad).unwrap_err();
        assert!(matches!(
            err,
            LoadCatalogError::DatasetParseError {
                partition: "entra",
                ..
            }
        ));
    }
}
