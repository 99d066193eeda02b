use crate::fragment;
use crate::model::{Partition, PerPartition, Tier};

/// Tiers selected in the filter bar, kept in toggle order so the encoded
/// fragment reflects the order the user clicked them in.
///
/// An empty selection means "no filter", which shows every tier of the
/// partition. It is never "show nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierSelection {
    tiers: Vec<Tier>,
}

impl TierSelection {
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn contains(&self, tier: Tier) -> bool {
        self.tiers.contains(&tier)
    }

    pub fn iter(&self) -> impl Iterator<Item = Tier> + '_ {
        self.tiers.iter().copied()
    }

    /// Adds the tier if absent, removes it if present.
    pub fn toggle(&mut self, tier: Tier) {
        match self.tiers.iter().position(|t| *t == tier) {
            Some(idx) => {
                self.tiers.remove(idx);
            }
            None => self.tiers.push(tier),
        }
    }

    /// Adds the tier if absent, keeping existing membership untouched.
    pub fn insert(&mut self, tier: Tier) {
        if !self.contains(tier) {
            self.tiers.push(tier);
        }
    }
}

impl FromIterator<Tier> for TierSelection {
    fn from_iter<I: IntoIterator<Item = Tier>>(iter: I) -> Self {
        let mut selection = TierSelection::default();
        for tier in iter {
            selection.insert(tier);
        }
        selection
    }
}

/// A user interaction or navigation event mutating the view state.
#[derive(Debug, Clone)]
pub enum Action {
    SwitchTab(Partition),
    ToggleTier(Tier),
    SearchChanged(String),
    ClearSearch,
    /// The address fragment, read once at load.
    Navigate(String),
    UntieredCountLoaded { partition: Partition, count: usize },
}

/// How much of the content region must be re-rendered after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// State unchanged, nothing to do.
    None,
    /// Only the entry list below the search field changed.
    Entries,
    /// The whole content region, filter bar and search field included.
    Full,
}

/// The complete mutable view state: active tab, per-tab tier selections,
/// search text and per-tab untiered counts. All mutation goes through
/// [`ViewState::apply`], which reports the required re-render scope.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    active: Partition,
    selected: PerPartition<TierSelection>,
    search: String,
    untiered: PerPartition<usize>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Partition {
        self.active
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// The tier selection of the active tab.
    pub fn selection(&self) -> &TierSelection {
        &self.selected[self.active]
    }

    pub fn selection_for(&self, partition: Partition) -> &TierSelection {
        &self.selected[partition]
    }

    pub fn untiered_count(&self, partition: Partition) -> usize {
        self.untiered[partition]
    }

    /// The address-fragment encoding of the current tab and its selection.
    /// Written with a history replace, not a new navigable entry.
    pub fn fragment(&self) -> String {
        fragment::encode(self.active, self.selection())
    }

    pub fn apply(&mut self, action: Action) -> Refresh {
        match action {
            Action::SwitchTab(partition) => {
                self.active = partition;
                Refresh::Full
            }
            Action::ToggleTier(tier) => {
                if !self.active.contains_tier(tier) {
                    return Refresh::None;
                }
                self.selected[self.active].toggle(tier);
                Refresh::Full
            }
            Action::SearchChanged(text) => {
                self.search = text;
                Refresh::Entries
            }
            Action::ClearSearch => {
                self.search.clear();
                Refresh::Entries
            }
            Action::Navigate(raw) => match fragment::decode(&raw) {
                // No fragment, or an unknown tab: prior state stays untouched.
                None => Refresh::None,
                Some((partition, selection)) => {
                    self.active = partition;
                    self.selected[partition] = selection;
                    Refresh::Full
                }
            },
            Action::UntieredCountLoaded { partition, count } => {
                self.untiered[partition] = count;
                Refresh::Full
            }
        }
    }
}
