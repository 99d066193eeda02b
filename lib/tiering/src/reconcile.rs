//! Reconciliation of renderer output with the mounted content region.
//!
//! The region is modeled as an ordered list of identity-tracked nodes with
//! explicit handler registration per render cycle, instead of re-rendered
//! innerHTML and listener-stripping node clones. Two update paths exist:
//! a full rebuild (tab switch, tier toggle, dataset load) and a partial
//! splice for search changes that keeps the search field's node, and the
//! user's focus in it, alive.

use crate::filter;
use crate::model::Dataset;
use crate::render;
use crate::state::{Refresh, ViewState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    UntieredNote,
    FilterBar,
    SearchField,
    /// Index into the filtered record list of the last entry render.
    Entry { record_idx: usize },
    /// The "No results found." paragraph. Spliced like an entry but it is
    /// not one: the accordion never applies to it.
    Placeholder,
}

/// One mounted node. `id` is stable for the node's lifetime; a node that
/// survives a partial render keeps its id. `handler_generation` records
/// the render cycle whose handlers are currently attached to it.
#[derive(Debug, Clone)]
pub struct Node {
    id: u64,
    kind: NodeKind,
    markup: String,
    expanded: bool,
    handler_generation: u64,
}

impl Node {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn handler_generation(&self) -> u64 {
        self.handler_generation
    }

    /// Chevron direction of an entry card, in lockstep with expansion.
    pub fn chevron(&self) -> &'static str {
        if self.expanded {
            "fa-chevron-up"
        } else {
            "fa-chevron-down"
        }
    }

    fn is_entry(&self) -> bool {
        matches!(self.kind, NodeKind::Entry { .. })
    }
}

/// The live content region.
#[derive(Debug, Default)]
pub struct ContentRegion {
    nodes: Vec<Node>,
    next_node_id: u64,
    render_generation: u64,
    focused: Option<u64>,
}

impl ContentRegion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn render_generation(&self) -> u64 {
        self.render_generation
    }

    /// The node currently holding input focus, if any.
    pub fn focused(&self) -> Option<u64> {
        self.focused
    }

    pub fn search_node_id(&self) -> Option<u64> {
        self.nodes
            .iter()
            .find(|n| n.kind == NodeKind::SearchField)
            .map(|n| n.id)
    }

    pub fn expanded_entry(&self) -> Option<u64> {
        self.nodes
            .iter()
            .find(|n| n.is_entry() && n.expanded)
            .map(|n| n.id)
    }

    /// Applies a reducer outcome to the region.
    pub fn apply(&mut self, state: &ViewState, dataset: &Dataset, refresh: Refresh) {
        match refresh {
            Refresh::None => {}
            Refresh::Entries => self.render_entries(state, dataset),
            Refresh::Full => self.render_full(state, dataset),
        }
    }

    /// Full re-render: every node is rebuilt and every handler re-attached.
    /// Focus does not survive, all entries start collapsed.
    pub fn render_full(&mut self, state: &ViewState, dataset: &Dataset) {
        self.render_generation += 1;
        self.focused = None;
        self.nodes.clear();

        let partition = state.active();
        let note = render::untiered_note(partition, dataset, state.untiered_count(partition));
        self.push_node(NodeKind::UntieredNote, note);
        let bar = render::tier_filter_bar(partition, state.selection());
        self.push_node(NodeKind::FilterBar, bar);
        let field = render::search_field(state.search());
        self.push_node(NodeKind::SearchField, field);
        self.append_entries(state, dataset);
    }

    /// Partial re-render for a search change: every sibling after the
    /// search field is dropped and fresh entries are spliced in. The
    /// search field's node identity and focus state are preserved; only
    /// the new entries get handlers attached.
    pub fn render_entries(&mut self, state: &ViewState, dataset: &Dataset) {
        let Some(search_pos) = self
            .nodes
            .iter()
            .position(|n| n.kind == NodeKind::SearchField)
        else {
            // Nothing mounted yet; fall back to a full render.
            self.render_full(state, dataset);
            return;
        };

        self.render_generation += 1;
        self.nodes.truncate(search_pos + 1);
        self.append_entries(state, dataset);
    }

    /// Accordion toggle for an entry card: opening one collapses all
    /// others, toggling an open one collapses it. Returns the expansion
    /// state of the clicked entry, or `None` for an unknown node id.
    pub fn toggle_entry(&mut self, node_id: u64) -> Option<bool> {
        let clicked = self
            .nodes
            .iter()
            .position(|n| n.id == node_id && n.is_entry())?;

        let now_expanded = !self.nodes[clicked].expanded;
        for node in self.nodes.iter_mut().filter(|n| n.is_entry()) {
            node.expanded = false;
        }
        self.nodes[clicked].expanded = now_expanded;
        Some(now_expanded)
    }

    /// Marks the search field as focused (the clear button refocuses it).
    pub fn focus_search(&mut self) {
        self.focused = self.search_node_id();
    }

    fn append_entries(&mut self, state: &ViewState, dataset: &Dataset) {
        let partition = state.active();
        let matched = filter::filter(
            partition,
            dataset.records(),
            state.selection(),
            state.search(),
        );
        if matched.is_empty() {
            self.push_node(NodeKind::Placeholder, "<p>No results found.</p>".to_string());
            return;
        }
        for (idx, record) in matched.iter().enumerate() {
            let markup = render::entry(partition, record, idx);
            self.push_node(NodeKind::Entry { record_idx: idx }, markup);
        }
    }

    fn push_node(&mut self, kind: NodeKind, markup: String) {
        self.next_node_id += 1;
        self.nodes.push(Node {
            id: self.next_node_id,
            kind,
            markup,
            expanded: false,
            handler_generation: self.render_generation,
        });
    }
}
