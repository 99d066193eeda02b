//! Counting of not-yet-tiered entries from the upstream Markdown trackers.
//!
//! Each tracker document lists new, unclassified roles or permissions as a
//! Markdown table under a `### ➕ Additions` heading. The untiered count is
//! the number of data rows in that table.

/// Counts the data rows of the Additions table. Header and separator rows
/// are skipped; a document without the heading counts as zero.
pub fn additions_count(markdown: &str) -> usize {
    let Some(after_heading) = markdown.split("### \u{2795} Additions").nth(1) else {
        return 0;
    };
    let section = after_heading.split("###").next().unwrap_or("");
    section
        .lines()
        .filter(|line| {
            line.starts_with('|') && !line.starts_with("|---") && !line.starts_with("| Detected on")
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACKER: &str = "\
# Untiered Entra roles

Some intro text.

### \u{2795} Additions

| Detected on | Role name | Description |
|---|---|---|
| 2024-05-01 | AI Administrator | Manages AI stuff |
| 2024-05-02 | Fabric Administrator | Manages Fabric |

### \u{2796} Removals

| Detected on | Role name |
|---|---|
| 2024-04-01 | Old Role |
";

    #[test]
    fn counts_only_addition_data_rows() {
        assert_eq!(additions_count(TRACKER), 2);
    }

    #[test]
    fn missing_heading_counts_as_zero() {
        assert_eq!(additions_count("# Nothing to see"), 0);
        assert_eq!(additions_count(""), 0);
    }

    #[test]
    fn empty_additions_table_counts_as_zero() {
        let doc = "### \u{2795} Additions\n\n| Detected on | Role name |\n|---|---|\n";
        assert_eq!(additions_count(doc), 0);
    }
}
