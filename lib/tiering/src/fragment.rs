//! Address-fragment codec for deep-linkable view state.
//!
//! The grammar is `#<tab>` for an unfiltered tab and
//! `#<tab>-tier-<t1>-<t2>-...` with tiers in toggle order. Decoding is
//! lenient: unknown tabs invalidate the whole fragment, while individual
//! tier tokens that are non-numeric or outside the tab's range are dropped.

use std::fmt::Write;

use crate::model::{Partition, Tier};
use crate::state::TierSelection;

pub fn encode(partition: Partition, selection: &TierSelection) -> String {
    let mut out = format!("#{}", partition.as_str());
    if !selection.is_empty() {
        out.push_str("-tier");
        for tier in selection.iter() {
            // Writing a u8 into a String is infallible.
            let _ = write!(out, "-{}", tier);
        }
    }
    out
}

/// Decodes a fragment into a tab and its tier selection.
///
/// Returns `None` for an absent fragment or an unknown tab, meaning the
/// caller keeps its prior state. A known tab followed by anything other
/// than a `tier` token yields an explicitly empty selection, which is a
/// different thing: it resets that tab's filter to "show all".
pub fn decode(raw: &str) -> Option<(Partition, TierSelection)> {
    let raw = raw.strip_prefix('#').unwrap_or(raw);
    let mut tokens = raw.split('-');
    let partition: Partition = tokens.next()?.parse().ok()?;

    let mut selection = TierSelection::default();
    if tokens.next() == Some("tier") {
        for token in tokens {
            if let Ok(value) = token.parse::<u8>() {
                let tier = Tier(value);
                if partition.contains_tier(tier) {
                    selection.insert(tier);
                }
            }
        }
    }

    Some((partition, selection))
}
