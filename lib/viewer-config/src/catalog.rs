use std::time::Duration;

use retry_policies::policies::ExponentialBackoff;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Where the five feed documents (three tiered JSON datasets, two
    /// untiered Markdown trackers) are loaded from.
    #[serde(default)]
    pub source: CatalogSource,

    /// How often the catalog is re-fetched. The last good catalog keeps
    /// serving while a refresh fails.
    #[serde(
        default = "default_poll_interval",
        deserialize_with = "humantime_serde::deserialize",
        serialize_with = "humantime_serde::serialize"
    )]
    #[schemars(with = "String")]
    pub poll_interval: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: CatalogSource::default(),
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_poll_interval() -> Duration {
    // The upstream dataset changes a few times a month.
    Duration::from_secs(15 * 60)
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "type")]
pub enum CatalogSource {
    /// Fetches the feed documents over HTTP. Defaults point at the public
    /// AzTier repository on GitHub.
    #[serde(rename = "http")]
    Http {
        #[serde(default)]
        endpoints: FeedEndpoints,

        /// Connection timeout for feed requests.
        #[serde(
            default = "default_connect_timeout",
            deserialize_with = "humantime_serde::deserialize",
            serialize_with = "humantime_serde::serialize"
        )]
        #[schemars(with = "String")]
        connect_timeout: Duration,

        /// Total request timeout for feed requests.
        #[serde(
            default = "default_request_timeout",
            deserialize_with = "humantime_serde::deserialize",
            serialize_with = "humantime_serde::serialize"
        )]
        #[schemars(with = "String")]
        request_timeout: Duration,

        #[serde(default)]
        retry: RetryPolicyConfig,
    },
    /// Loads the same documents from a local directory (fixtures, offline
    /// development). Expected file names: `tiered-azure-roles.json`,
    /// `tiered-entra-roles.json`, `tiered-msgraph-app-permissions.json`,
    /// `untiered-entra-roles.md`, `untiered-msgraph-app-permissions.md`.
    #[serde(rename = "dir")]
    Dir { path: String },
}

impl Default for CatalogSource {
    fn default() -> Self {
        CatalogSource::Http {
            endpoints: FeedEndpoints::default(),
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            retry: RetryPolicyConfig::default(),
        }
    }
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FeedEndpoints {
    #[serde(default = "default_azure_roles_url")]
    pub azure_roles: String,
    #[serde(default = "default_entra_roles_url")]
    pub entra_roles: String,
    #[serde(default = "default_msgraph_permissions_url")]
    pub msgraph_permissions: String,
    #[serde(default = "default_untiered_entra_url")]
    pub untiered_entra: String,
    #[serde(default = "default_untiered_msgraph_url")]
    pub untiered_msgraph: String,
}

impl Default for FeedEndpoints {
    fn default() -> Self {
        Self {
            azure_roles: default_azure_roles_url(),
            entra_roles: default_entra_roles_url(),
            msgraph_permissions: default_msgraph_permissions_url(),
            untiered_entra: default_untiered_entra_url(),
            untiered_msgraph: default_untiered_msgraph_url(),
        }
    }
}

fn default_azure_roles_url() -> String {
    "https://raw.githubusercontent.com/emiliensocchi/azure-tiering/main/Azure%20roles/tiered-azure-roles.json".to_string()
}

fn default_entra_roles_url() -> String {
    "https://raw.githubusercontent.com/emiliensocchi/azure-tiering/main/Entra%20roles/tiered-entra-roles.json".to_string()
}

fn default_msgraph_permissions_url() -> String {
    "https://raw.githubusercontent.com/emiliensocchi/azure-tiering/main/Microsoft%20Graph%20application%20permissions/tiered-msgraph-app-permissions.json".to_string()
}

fn default_untiered_entra_url() -> String {
    "https://raw.githubusercontent.com/emiliensocchi/azure-tiering/main/Entra%20roles/Untiered%20Entra%20roles.md".to_string()
}

fn default_untiered_msgraph_url() -> String {
    "https://raw.githubusercontent.com/emiliensocchi/azure-tiering/main/Microsoft%20Graph%20application%20permissions/Untiered%20MSGraph%20application%20permissions.md".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct RetryPolicyConfig {
    /// The maximum number of retries to attempt.
    ///
    /// The retry mechanism is based on exponential backoff, see
    /// https://docs.rs/retry-policies/latest/retry_policies/policies/struct.ExponentialBackoff.html
    /// for additional details.
    pub max_retries: u32,
}

impl Default for RetryPolicyConfig {
    fn default() -> Self {
        Self { max_retries: 3 }
    }
}

impl From<&RetryPolicyConfig> for ExponentialBackoff {
    fn from(config: &RetryPolicyConfig) -> Self {
        ExponentialBackoff::builder().build_with_max_retries(config.max_retries)
    }
}
