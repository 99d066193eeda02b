use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// One of the three asset categories of the AzTier dataset.
/// Each partition has its own tier range and detail-field semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Partition {
    #[default]
    Azure,
    Entra,
    MsGraph,
}

impl Partition {
    pub const ALL: [Partition; 3] = [Partition::Azure, Partition::Entra, Partition::MsGraph];

    /// Highest valid tier for this partition. Azure roles are tiered 0-3,
    /// Entra roles and MS Graph application permissions 0-2.
    pub fn max_tier(&self) -> u8 {
        match self {
            Partition::Azure => 3,
            Partition::Entra | Partition::MsGraph => 2,
        }
    }

    pub fn contains_tier(&self, tier: Tier) -> bool {
        tier.0 <= self.max_tier()
    }

    pub fn tiers(&self) -> impl Iterator<Item = Tier> {
        (0..=self.max_tier()).map(Tier)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Azure => "azure",
            Partition::Entra => "entra",
            Partition::MsGraph => "msgraph",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Partition::Azure => "Azure Roles",
            Partition::Entra => "Entra Roles",
            Partition::MsGraph => "MS Graph Application Permissions",
        }
    }
}

impl FromStr for Partition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "azure" => Ok(Partition::Azure),
            "entra" => Ok(Partition::Entra),
            "msgraph" => Ok(Partition::MsGraph),
            _ => Err(format!("Unknown partition: {}", s)),
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal risk classification of a role or permission. Lower number means
/// higher privilege. Normalized to an integer at the ingestion boundary;
/// the upstream feeds carry tiers as numbers or their string forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tier(pub u8);

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn deserialize_tier<'de, D>(deserializer: D) -> Result<Option<Tier>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTier {
        Number(i64),
        Text(String),
    }

    // An unparseable or negative tier is treated as "not yet tiered",
    // never as a deserialization failure.
    Ok(match Option::<RawTier>::deserialize(deserializer)? {
        None => None,
        Some(RawTier::Number(n)) => u8::try_from(n).ok().map(Tier),
        Some(RawTier::Text(s)) => s.trim().parse::<u8>().ok().map(Tier),
    })
}

/// One role or permission entry of a dataset, as published by the feed.
/// Immutable once fetched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// The feeds use `assetName` in newer revisions and `name` in older ones.
    #[serde(alias = "assetName", default)]
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_tier")]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub path_type: Option<String>,
    #[serde(default)]
    pub shortest_path: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub worst_case_scenario: Option<String>,
    #[serde(default)]
    pub provides_full_access_to: Option<String>,
    #[serde(default)]
    pub documentation_uri: Option<String>,
}

impl Record {
    pub fn has_direct_path(&self) -> bool {
        self.path_type
            .as_deref()
            .is_some_and(|p| p.eq_ignore_ascii_case("direct"))
    }
}

/// An ordered sequence of records for one partition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Dataset(pub Vec<Record>);

impl Dataset {
    pub fn records(&self) -> &[Record] {
        &self.0
    }

    /// Number of classified entries, used as the denominator base of the
    /// "currently untiered" ratio: entries carrying a non-empty id.
    pub fn identified_count(&self) -> usize {
        self.0
            .iter()
            .filter(|r| r.id.as_deref().is_some_and(|id| !id.is_empty()))
            .count()
    }
}

/// A value per partition, indexable by `Partition`.
#[derive(Debug, Clone, Default)]
pub struct PerPartition<T> {
    azure: T,
    entra: T,
    msgraph: T,
}

impl<T> Index<Partition> for PerPartition<T> {
    type Output = T;

    fn index(&self, partition: Partition) -> &T {
        match partition {
            Partition::Azure => &self.azure,
            Partition::Entra => &self.entra,
            Partition::MsGraph => &self.msgraph,
        }
    }
}

impl<T> IndexMut<Partition> for PerPartition<T> {
    fn index_mut(&mut self, partition: Partition) -> &mut T {
        match partition {
            Partition::Azure => &mut self.azure,
            Partition::Entra => &mut self.entra,
            Partition::MsGraph => &mut self.msgraph,
        }
    }
}

/// Badge style class for a tier. Entra and MS Graph reuse the green
/// `tier-3` style for their lowest tier, an upstream styling decision kept
/// as-is. Out-of-range tiers fall back to the neutral `tier-x`.
pub fn badge_class(partition: Partition, tier: Tier) -> &'static str {
    match (partition, tier.0) {
        (Partition::Azure, 0) | (Partition::Entra, 0) | (Partition::MsGraph, 0) => "tier-0",
        (Partition::Azure, 1) | (Partition::Entra, 1) | (Partition::MsGraph, 1) => "tier-1",
        (Partition::Azure, 2) => "tier-2",
        (Partition::Azure, 3) | (Partition::Entra, 2) | (Partition::MsGraph, 2) => "tier-3",
        _ => "tier-x",
    }
}

pub fn tier_label(partition: Partition, tier: Tier) -> String {
    if partition.contains_tier(tier) {
        format!("Tier {}", tier)
    } else {
        "Tier ?".to_string()
    }
}

/// The fixed definition sentence shown at the top of every detail block.
pub fn tier_definition(partition: Partition, tier: Tier) -> &'static str {
    match (partition, tier.0) {
        (Partition::Azure, 0) => {
            "Roles with a risk of privilege escalation via one or multiple resource types in scope."
        }
        (Partition::Azure, 1) => {
            "Roles with a risk of lateral movement via data-plane access to a specific resource type in scope, but with a limited risk for privilege escalation."
        }
        (Partition::Azure, 2) => {
            "Roles with data-plane access to a specific resource type in scope, but with a limited risk for lateral movement and without a risk for privilege escalation."
        }
        (Partition::Azure, 3) => "Roles with little to no security implications.",
        (Partition::Entra, 0) => {
            "Roles with a risk of having a direct or indirect path to Global Admin and full tenant takeover."
        }
        (Partition::Entra, 1) => {
            "Roles with full access to individual Microsoft 365 services, limited administrative access to Entra ID, or global read access across services, but without a known path to Global Admin."
        }
        (Partition::Entra, 2) => "Roles with little to no security implications.",
        (Partition::MsGraph, 0) => {
            "Permissions with a risk of having a direct or indirect path to Global Admin and full tenant takeover."
        }
        (Partition::MsGraph, 1) => {
            "Permissions with write access to MS Graph scopes or read access to sensitive scopes (e.g. email content), but without a known path to Global Admin."
        }
        (Partition::MsGraph, 2) => {
            "Permissions with read access to MS Graph scopes and little to no security implications."
        }
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_and_string_tiers_alike() {
        let numeric: Record = serde_json::from_str(r#"{"name": "Owner", "tier": 0}"#).unwrap();
        let stringy: Record = serde_json::from_str(r#"{"name": "Owner", "tier": "0"}"#).unwrap();
        assert_eq!(numeric.tier, Some(Tier(0)));
        assert_eq!(stringy.tier, Some(Tier(0)));
    }

    #[test]
    fn unparseable_tier_is_treated_as_untiered() {
        let garbage: Record = serde_json::from_str(r#"{"name": "X", "tier": "n/a"}"#).unwrap();
        let negative: Record = serde_json::from_str(r#"{"name": "X", "tier": -1}"#).unwrap();
        let missing: Record = serde_json::from_str(r#"{"name": "X"}"#).unwrap();
        assert_eq!(garbage.tier, None);
        assert_eq!(negative.tier, None);
        assert_eq!(missing.tier, None);
    }

    #[test]
    fn accepts_asset_name_alias() {
        let record: Record =
            serde_json::from_str(r#"{"assetName": "Global Reader", "tier": 2}"#).unwrap();
        assert_eq!(record.name, "Global Reader");
    }

    #[test]
    fn ignores_unknown_feed_fields() {
        let record: Record = serde_json::from_str(
            r#"{"name": "Owner", "tier": 0, "detectedOn": "2024-01-01"}"#,
        )
        .unwrap();
        assert_eq!(record.name, "Owner");
    }

    #[test]
    fn direct_path_detection_is_case_insensitive() {
        let record = Record {
            path_type: Some("Direct".to_string()),
            ..Record::default()
        };
        assert!(record.has_direct_path());

        let indirect = Record {
            path_type: Some("Indirect".to_string()),
            ..Record::default()
        };
        assert!(!indirect.has_direct_path());
    }

    #[test]
    fn entra_lowest_tier_reuses_the_green_badge() {
        assert_eq!(badge_class(Partition::Entra, Tier(2)), "tier-3");
        assert_eq!(badge_class(Partition::MsGraph, Tier(2)), "tier-3");
        assert_eq!(badge_class(Partition::Azure, Tier(2)), "tier-2");
        assert_eq!(badge_class(Partition::Entra, Tier(3)), "tier-x");
    }

    #[test]
    fn out_of_range_tier_labels_as_unknown() {
        assert_eq!(tier_label(Partition::Azure, Tier(3)), "Tier 3");
        assert_eq!(tier_label(Partition::Entra, Tier(3)), "Tier ?");
    }

    #[test]
    fn identified_count_skips_entries_without_id() {
        let dataset: Dataset = serde_json::from_str(
            r#"[{"name": "A", "id": "1"}, {"name": "B"}, {"name": "C", "id": ""}]"#,
        )
        .unwrap();
        assert_eq!(dataset.identified_count(), 1);
    }
}
