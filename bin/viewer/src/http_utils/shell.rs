use aztier_tiering::model::Partition;

static SHELL_HTML: &str = include_str!("../../static/shell.html");

const MAIN_TITLE: &str = "\u{1f329}\u{fe0f} Azure Administrative Tiering (AzTier)";

/// Fills the page shell with the tab bar and the rendered content region.
pub fn render_page(active: Partition, content: &str) -> String {
    SHELL_HTML
        .replace("__MAIN_TITLE__", MAIN_TITLE)
        .replace("__TAB_LINKS__", &tab_links(active))
        .replace("__CONTENT__", content)
}

fn tab_links(active: Partition) -> String {
    let mut html = String::new();
    for partition in Partition::ALL {
        let state = if partition == active { " is-active" } else { "" };
        html.push_str(&format!(
            "<a class=\"button tab-toggle-btn{state}\" href=\"/view/{slug}\">{name}</a>",
            slug = partition.as_str(),
            name = partition.display_name(),
        ));
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_only_the_active_tab() {
        let page = render_page(Partition::Entra, "<p>body</p>");
        assert_eq!(page.matches("is-active").count(), 1);
        assert!(page.contains("tab-toggle-btn is-active\" href=\"/view/entra\""));
        assert!(page.contains("<p>body</p>"));
    }

    #[test]
    fn links_every_partition() {
        let page = render_page(Partition::Azure, "");
        for slug in ["/view/azure", "/view/entra", "/view/msgraph"] {
            assert!(page.contains(slug), "missing tab link {slug}");
        }
    }
}
