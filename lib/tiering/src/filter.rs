//! The filter engine: a stable, order-preserving selection of records by
//! tier and case-insensitive substring search.

use crate::model::{Partition, Record};
use crate::state::TierSelection;

/// Filters `records` down to the ones matching the tier selection and the
/// search text, preserving feed order.
///
/// The tier gate keeps records whose tier is present, within the
/// partition's range, and either in the selection or the selection is
/// empty (no filter). The text gate matches `search` case-insensitively
/// against the record's name and id concatenated without a separator.
pub fn filter<'a>(
    partition: Partition,
    records: &'a [Record],
    selection: &TierSelection,
    search: &str,
) -> Vec<&'a Record> {
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|record| {
            record.tier.is_some_and(|tier| {
                partition.contains_tier(tier) && (selection.is_empty() || selection.contains(tier))
            })
        })
        .filter(|record| matches_search(record, &needle))
        .collect()
}

fn matches_search(record: &Record, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let mut haystack = record.name.to_lowercase();
    if let Some(id) = &record.id {
        haystack.push_str(&id.to_lowercase());
    }
    haystack.contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tier;

    fn record(name: &str, id: Option<&str>, tier: Option<u8>) -> Record {
        Record {
            name: name.to_string(),
            id: id.map(str::to_string),
            tier: tier.map(Tier),
            ..Record::default()
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            record("Owner", Some("8e3af657"), Some(0)),
            record("Contributor", Some("b24988ac"), Some(1)),
            record("Reader", None, Some(2)),
            record("Tag Contributor", None, Some(3)),
            record("Unclassified Thing", None, None),
        ]
    }

    #[test]
    fn undefined_tier_is_never_shown() {
        let records = sample();
        let matched = filter(Partition::Azure, &records, &TierSelection::default(), "");
        assert_eq!(matched.len(), 4);
        assert!(matched.iter().all(|r| r.tier.is_some()));
    }

    #[test]
    fn empty_selection_equals_full_tier_range() {
        let records = sample();
        for partition in Partition::ALL {
            let all: TierSelection = partition.tiers().collect();
            let with_filter = filter(partition, &records, &all, "");
            let without_filter = filter(partition, &records, &TierSelection::default(), "");
            let names: Vec<&str> = with_filter.iter().map(|r| r.name.as_str()).collect();
            let names_unfiltered: Vec<&str> =
                without_filter.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, names_unfiltered);
        }
    }

    #[test]
    fn tier_out_of_partition_range_is_excluded_even_unfiltered() {
        let records = sample();
        // Tier 3 exists in the azure range only.
        let matched = filter(Partition::Entra, &records, &TierSelection::default(), "");
        assert!(matched.iter().all(|r| r.name != "Tag Contributor"));
    }

    #[test]
    fn search_matches_name_and_id_concatenation() {
        let records = sample();
        let selection = TierSelection::default();
        let by_name = filter(Partition::Azure, &records, &selection, "contrib");
        assert_eq!(by_name.len(), 2);
        let by_id = filter(Partition::Azure, &records, &selection, "B24988");
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].name, "Contributor");
        // The haystack is name+id with no separator in between.
        let across = filter(Partition::Azure, &records, &selection, "owner8e3");
        assert_eq!(across.len(), 1);
    }

    #[test]
    fn search_is_idempotent() {
        let records = sample();
        let selection = TierSelection::default();
        let once = filter(Partition::Azure, &records, &selection, "er");
        let owned: Vec<Record> = once.iter().map(|r| (*r).clone()).collect();
        let twice = filter(Partition::Azure, &owned, &selection, "er");
        let names_once: Vec<&str> = once.iter().map(|r| r.name.as_str()).collect();
        let names_twice: Vec<&str> = twice.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names_once, names_twice);
    }

    #[test]
    fn selected_tiers_gate_records() {
        let records = sample();
        let selection: TierSelection = [Tier(0), Tier(3)].into_iter().collect();
        let matched = filter(Partition::Azure, &records, &selection, "");
        let names: Vec<&str> = matched.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Owner", "Tag Contributor"]);
    }

    #[test]
    fn order_is_preserved_from_the_feed() {
        let records = sample();
        let matched = filter(Partition::Azure, &records, &TierSelection::default(), "o");
        let names: Vec<&str> = matched.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Owner", "Contributor", "Tag Contributor"]);
    }

    #[test]
    fn no_match_yields_empty_subsequence() {
        let records = sample();
        let matched = filter(
            Partition::Azure,
            &records,
            &TierSelection::default(),
            "zzz-no-match",
        );
        assert!(matched.is_empty());
    }
}
