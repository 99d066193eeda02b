//! Pure markup builders for the content region: untiered note, tier
//! filter bar, search field and the filterable entry cards. All feed text
//! is HTML-escaped on the way out.

use std::fmt::Write;

use crate::filter;
use crate::model::{self, Dataset, Partition, Record, Tier};
use crate::state::TierSelection;

const UNTIERED_ENTRA_INFO_URL: &str =
    "https://github.com/emiliensocchi/azure-tiering/blob/main/Entra%20roles/Untiered%20Entra%20roles.md";
const UNTIERED_MSGRAPH_INFO_URL: &str =
    "https://github.com/emiliensocchi/azure-tiering/blob/main/Microsoft%20Graph%20application%20permissions/Untiered%20MSGraph%20application%20permissions.md";

const DIRECT_PATH_MARKER: &str = "<span class=\"crown-emoji\">\u{1F48E}</span>";

/// Which detail fields a record's collapsed block carries, decided by tab
/// and tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailLayout {
    /// Worst-case scenario only (azure tiers 2-3).
    WorstCase,
    /// "Provides full access to" only (entra tier 1).
    FullAccess,
    /// Path type, attack path and example (everything else).
    AttackPath,
}

fn detail_layout(partition: Partition, tier: Tier) -> DetailLayout {
    match (partition, tier.0) {
        (Partition::Azure, 2..) => DetailLayout::WorstCase,
        (Partition::Azure, _) => DetailLayout::AttackPath,
        (Partition::Entra, 1) => DetailLayout::FullAccess,
        (Partition::Entra, _) => DetailLayout::AttackPath,
        (Partition::MsGraph, _) => DetailLayout::AttackPath,
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

fn escaped(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

/// The complete content region: untiered note, filter bar, search field
/// and the filtered entries.
pub fn content_region(
    partition: Partition,
    dataset: &Dataset,
    selection: &TierSelection,
    search: &str,
    untiered_count: usize,
) -> String {
    let mut out = String::new();
    out.push_str(&untiered_note(partition, dataset, untiered_count));
    out.push_str(&tier_filter_bar(partition, selection));
    out.push_str(&search_field(search));
    let matched = filter::filter(partition, dataset.records(), selection, search);
    out.push_str(&entries(partition, &matched));
    out
}

/// The "Currently untiered" line. Azure tracks only common roles upstream,
/// so it has no count feed; the other partitions show untiered/total with
/// a link to the tracking document.
pub fn untiered_note(partition: Partition, dataset: &Dataset, untiered_count: usize) -> String {
    let mut out = String::from("<div class=\"section-label has-text-grey is-size-7\">");
    match partition {
        Partition::Azure => {
            out.push_str("Currently untiered: n/a (supports only common roles)");
        }
        Partition::Entra | Partition::MsGraph => {
            let total = untiered_count + dataset.identified_count();
            let info_url = match partition {
                Partition::Entra => UNTIERED_ENTRA_INFO_URL,
                _ => UNTIERED_MSGRAPH_INFO_URL,
            };
            let _ = write!(
                out,
                "Currently untiered: {}/{} (<a href=\"{}\">more info</a>)",
                untiered_count, total, info_url
            );
        }
    }
    out.push_str("</div>");
    out
}

/// One toggle button per tier in the partition's range. Selected tiers get
/// `is-selected`, the rest are faded; with no filter active every button
/// is faded.
pub fn tier_filter_bar(partition: Partition, selection: &TierSelection) -> String {
    let mut out =
        String::from("<div class=\"tier-filter-group\" id=\"tier-filter-group\"><span class=\"tier-filter-label\">Filter:</span>");
    for tier in partition.tiers() {
        let state_class = if selection.contains(tier) {
            "is-selected"
        } else {
            "faded-tier"
        };
        let _ = write!(
            out,
            "<button class=\"button tier-filter-segment tier-badge {} {}\" data-tier=\"{}\" type=\"button\">Tier {}</button>",
            model::badge_class(partition, tier),
            state_class,
            tier,
            tier
        );
    }
    out.push_str("</div>");
    out
}

/// The search input with its magnifier icon and clear button. The clear
/// button is only visible while there is text to clear.
pub fn search_field(search: &str) -> String {
    let clear_class = if search.is_empty() {
        "icon is-right"
    } else {
        "icon is-right visible"
    };
    format!(
        concat!(
            "<div class=\"field search-field\"><div class=\"control has-icons-left has-icons-right\">",
            "<input class=\"input is-medium\" type=\"text\" id=\"search-input\" value=\"{}\" placeholder=\"Search by name or Id\">",
            "<span class=\"icon is-left\"><i class=\"fas fa-search\"></i></span>",
            "<span class=\"{}\" id=\"search-clear-btn\"><i class=\"fas fa-times\"></i></span>",
            "</div></div>"
        ),
        escaped(search),
        clear_class
    )
}

/// The entry cards for an already-filtered record list, or the placeholder
/// when nothing matched.
pub fn entries(partition: Partition, records: &[&Record]) -> String {
    if records.is_empty() {
        return "<p>No results found.</p>".to_string();
    }
    let mut out = String::new();
    for (idx, record) in records.iter().enumerate() {
        out.push_str(&entry(partition, record, idx));
    }
    out
}

/// One collapsed entry card: summary line plus a hidden detail block.
pub fn entry(partition: Partition, record: &Record, idx: usize) -> String {
    // Records without a tier never reach the renderer; the filter engine
    // drops them. Fall back to the unknown badge if one slips through.
    let tier = record.tier.unwrap_or(Tier(u8::MAX));

    let mut out = format!(
        "<div class=\"card role-entry\" data-idx=\"{}\"><div class=\"card-content\">",
        idx
    );
    let _ = write!(
        out,
        "<span class=\"tier-badge {}\">{}</span> <strong>{}</strong>",
        model::badge_class(partition, tier),
        model::tier_label(partition, tier),
        escaped(&record.name)
    );
    if let Some(id) = record.id.as_deref().filter(|id| !id.is_empty()) {
        let id_label = match partition {
            Partition::MsGraph => "App Id",
            _ => "Role Id",
        };
        let _ = write!(
            out,
            " <span class=\"has-text-grey is-size-7\">{}: {}</span>",
            id_label,
            escaped(id)
        );
    }
    if let Some(uri) = record.documentation_uri.as_deref().filter(|u| !u.is_empty()) {
        let _ = write!(
            out,
            " <a class=\"doc-link\" href=\"{}\" target=\"_blank\" rel=\"noopener\">docs</a>",
            escaped(uri)
        );
    }
    out.push_str("<span class=\"icon is-pulled-right\"><i class=\"fas fa-chevron-down\"></i></span>");
    if record.has_direct_path() {
        out.push_str("<span class=\"crown-emoji-entry\">\u{1F48E}</span>");
    }
    out.push_str("<div class=\"role-details\" style=\"display:none\">");
    out.push_str(&detail_block(partition, record, tier));
    out.push_str("</div></div></div>");
    out
}

fn detail_block(partition: Partition, record: &Record, tier: Tier) -> String {
    let mut out = format!(
        "<div class=\"tier-definition faded-tier\"><span class=\"is-size-7\"><strong>Tier definition:</strong> {}</span></div>",
        model::tier_definition(partition, tier)
    );
    match detail_layout(partition, tier) {
        DetailLayout::WorstCase => {
            if let Some(scenario) = &record.worst_case_scenario {
                out.push_str(&popup_section(
                    "\u{26A0}\u{FE0F}",
                    "Worst-case scenario:",
                    escaped(scenario),
                ));
            }
        }
        DetailLayout::FullAccess => {
            if let Some(target) = &record.provides_full_access_to {
                out.push_str(&popup_section(
                    "\u{1F513}",
                    "Provides full access to:",
                    escaped(target),
                ));
            }
        }
        DetailLayout::AttackPath => {
            if let Some(path_type) = record.path_type.as_deref().filter(|p| !p.is_empty()) {
                let mut value = escaped(path_type);
                if record.has_direct_path() {
                    value.push(' ');
                    value.push_str(DIRECT_PATH_MARKER);
                }
                out.push_str(&popup_section("\u{1F6E1}\u{FE0F}", "Path Type:", value));
            }
            if let Some(path) = &record.shortest_path {
                out.push_str(&popup_section("\u{1F5E1}\u{FE0F}", "Attack Path:", escaped(path)));
            }
            if let Some(example) = &record.example {
                out.push_str(&popup_section("\u{1F4A1}", "Example:", escaped(example)));
            }
        }
    }
    out
}

fn popup_section(icon: &str, title: &str, value_html: String) -> String {
    format!(
        concat!(
            "<div class=\"popup-section\">",
            "<span class=\"popup-section-title\"><span class=\"icon\">{}</span> <strong>{}</strong></span> ",
            "<span class=\"popup-section-value\">{}</span>",
            "</div>"
        ),
        icon, title, value_html
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TierSelection;

    fn azure_owner() -> Record {
        Record {
            name: "Owner".to_string(),
            tier: Some(Tier(0)),
            path_type: Some("Direct".to_string()),
            ..Record::default()
        }
    }

    #[test]
    fn direct_tier0_record_renders_marker_and_path_type_block() {
        let dataset = Dataset(vec![azure_owner()]);
        let selection: TierSelection = [Tier(0)].into_iter().collect();
        let html = content_region(Partition::Azure, &dataset, &selection, "", 0);

        assert!(html.contains("<strong>Owner</strong>"));
        assert!(html.contains("crown-emoji-entry"));
        assert!(html.contains("Path Type:"));
        // Example was not provided, so its block is absent entirely.
        assert!(!html.contains("Example:"));
        assert!(!html.contains("No results found."));
    }

    #[test]
    fn entra_record_without_optional_fields_shows_only_the_definition() {
        let record = Record {
            name: "Global Reader".to_string(),
            tier: Some(Tier(2)),
            ..Record::default()
        };
        let dataset = Dataset(vec![record]);
        let html = content_region(
            Partition::Entra,
            &dataset,
            &TierSelection::default(),
            "global",
            0,
        );

        assert!(html.contains("<strong>Global Reader</strong>"));
        assert!(html.contains("Tier definition:"));
        assert!(!html.contains("popup-section"));
    }

    #[test]
    fn msgraph_record_with_only_shortest_path_omits_the_path_type_block() {
        let record = Record {
            name: "Mail.Read".to_string(),
            tier: Some(Tier(2)),
            shortest_path: Some("Direct read access".to_string()),
            ..Record::default()
        };
        let html = entry(Partition::MsGraph, &record, 0);

        assert!(html.contains("Attack Path:"));
        assert!(!html.contains("Path Type:"));
    }

    #[test]
    fn azure_high_tier_shows_only_the_worst_case_scenario() {
        let record = Record {
            name: "Tag Contributor".to_string(),
            tier: Some(Tier(3)),
            worst_case_scenario: Some("Mess with tags".to_string()),
            path_type: Some("Indirect".to_string()),
            shortest_path: Some("should not appear".to_string()),
            ..Record::default()
        };
        let html = entry(Partition::Azure, &record, 0);

        assert!(html.contains("Worst-case scenario:"));
        assert!(!html.contains("Attack Path:"));
        assert!(!html.contains("Path Type:"));
    }

    #[test]
    fn entra_tier1_shows_only_full_access_target() {
        let record = Record {
            name: "Exchange Administrator".to_string(),
            tier: Some(Tier(1)),
            provides_full_access_to: Some("Exchange Online".to_string()),
            example: Some("should not appear".to_string()),
            ..Record::default()
        };
        let html = entry(Partition::Entra, &record, 0);

        assert!(html.contains("Provides full access to:"));
        assert!(html.contains("Exchange Online"));
        assert!(!html.contains("Example:"));
    }

    #[test]
    fn unmatched_search_renders_the_placeholder() {
        let dataset = Dataset(vec![azure_owner()]);
        let html = content_region(
            Partition::Azure,
            &dataset,
            &TierSelection::default(),
            "zzz-no-match",
            0,
        );
        assert!(html.contains("<p>No results found.</p>"));
        assert!(!html.contains("role-entry"));
    }

    #[test]
    fn feed_text_is_escaped() {
        let record = Record {
            name: "<script>alert(1)</script>".to_string(),
            tier: Some(Tier(0)),
            ..Record::default()
        };
        let html = entry(Partition::Azure, &record, 0);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn untiered_note_shapes() {
        let dataset: Dataset = serde_json::from_str(
            r#"[{"name": "A", "id": "1", "tier": 0}, {"name": "B", "id": "2", "tier": 1}]"#,
        )
        .unwrap();

        insta::assert_snapshot!(
            untiered_note(Partition::Azure, &dataset, 0),
            @r#"<div class="section-label has-text-grey is-size-7">Currently untiered: n/a (supports only common roles)</div>"#
        );
        insta::assert_snapshot!(
            untiered_note(Partition::Entra, &dataset, 3),
            @r#"<div class="section-label has-text-grey is-size-7">Currently untiered: 3/5 (<a href="https://github.com/emiliensocchi/azure-tiering/blob/main/Entra%20roles/Untiered%20Entra%20roles.md">more info</a>)</div>"#
        );
    }

    #[test]
    fn filter_bar_marks_selected_tiers() {
        let selection: TierSelection = [Tier(1)].into_iter().collect();
        let html = tier_filter_bar(Partition::Azure, &selection);
        assert_eq!(html.matches("tier-filter-segment").count(), 4);
        assert_eq!(html.matches("is-selected").count(), 1);
        assert_eq!(html.matches("faded-tier").count(), 3);
        assert!(html.contains("data-tier=\"3\""));

        let entra = tier_filter_bar(Partition::Entra, &TierSelection::default());
        assert_eq!(entra.matches("tier-filter-segment").count(), 3);
        assert_eq!(entra.matches("is-selected").count(), 0);
    }

    #[test]
    fn search_field_seeds_value_and_clear_button_visibility() {
        let empty = search_field("");
        assert!(empty.contains("value=\"\""));
        assert!(!empty.contains("visible"));

        let seeded = search_field("own\"er");
        assert!(seeded.contains("value=\"own&quot;er\""));
        assert!(seeded.contains("icon is-right visible"));
    }
}
