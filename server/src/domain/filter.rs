//! Item filtering and search
//!
//! Category/bag/packed act as exact-match chips; the search text ranks items
//! by where and how well it matches.

use serde::{Deserialize, Serialize};
use super::item::Item;

/// Filter chips plus a free-text search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFilter {
    pub category_id: Option<u32>,
    pub bag: Option<u32>,
    pub packed: Option<bool>,
    pub search: Option<String>,
}

/// How well an item matched the search, lower is better
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchRank {
    NameSubstring,
    DescriptionSubstring,
    NameFuzzy,
    DescriptionFuzzy,
}

impl ItemFilter {
    pub fn matches_chips(&self, item: &Item) -> bool {
        self.category_id.map_or(true, |c| item.category_id == c)
            && self.bag.map_or(true, |b| item.bag == b)
            && self.packed.map_or(true, |p| item.packed == p)
    }

    fn query(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
    }

    /// Apply chips and search. Without a search query the input order is kept;
    /// with one, items are ordered by [`MatchRank`] and ties keep input order.
    pub fn apply(&self, items: Vec<Item>) -> Vec<Item> {
        let chipped = items.into_iter().filter(|item| self.matches_chips(item));

        let Some(query) = self.query() else {
            return chipped.collect();
        };

        let mut ranked: Vec<(MatchRank, Item)> = chipped
            .filter_map(|item| rank(&query, &item).map(|r| (r, item)))
            .collect();
        // sort_by_key is stable
        ranked.sort_by_key(|(r, _)| *r);
        ranked.into_iter().map(|(_, item)| item).collect()
    }
}

/// Rank an item against an already-lowercased query
pub fn rank(query: &str, item: &Item) -> Option<MatchRank> {
    let name = item.name.to_lowercase();
    let description = item.description.to_lowercase();

    if name.contains(query) {
        Some(MatchRank::NameSubstring)
    } else if description.contains(query) {
        Some(MatchRank::DescriptionSubstring)
    } else if is_subsequence(query, &name) {
        Some(MatchRank::NameFuzzy)
    } else if is_subsequence(query, &description) {
        Some(MatchRank::DescriptionFuzzy)
    } else {
        None
    }
}

/// True if every non-space char of `needle` appears in `haystack` in order
fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut hay = haystack.chars();
    needle
        .chars()
        .filter(|c| !c.is_whitespace())
        .all(|n| hay.any(|h| h == n))
}
