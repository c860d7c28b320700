// 🔎 Sort/Filter Engine - derives the displayed subset from the catalogue
// Pure: same entries + query + criterion always give the same list

use crate::model::Entry;
use crate::render::format_id;
use std::cmp::Ordering;

// ============================================================================
// SORT CRITERION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortCriterion {
    #[default]
    IdAsc,
    IdDesc,
    NameAsc,
    NameDesc,

    /// Anything we don't recognise: keep filter-pass order
    Unsorted,
}

impl SortCriterion {
    /// The four selectable criteria, in selector order
    pub const ALL: [SortCriterion; 4] = [
        SortCriterion::IdAsc,
        SortCriterion::IdDesc,
        SortCriterion::NameAsc,
        SortCriterion::NameDesc,
    ];

    /// Lenient parse: unknown values map to `Unsorted`
    pub fn parse(value: &str) -> Self {
        match value {
            "id-asc" => SortCriterion::IdAsc,
            "id-desc" => SortCriterion::IdDesc,
            "name-asc" => SortCriterion::NameAsc,
            "name-desc" => SortCriterion::NameDesc,
            _ => SortCriterion::Unsorted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortCriterion::IdAsc => "id-asc",
            SortCriterion::IdDesc => "id-desc",
            SortCriterion::NameAsc => "name-asc",
            SortCriterion::NameDesc => "name-desc",
            SortCriterion::Unsorted => "unsorted",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortCriterion::IdAsc => "ID ↑",
            SortCriterion::IdDesc => "ID ↓",
            SortCriterion::NameAsc => "Name A-Z",
            SortCriterion::NameDesc => "Name Z-A",
            SortCriterion::Unsorted => "Unsorted",
        }
    }

    /// Next selector value, wrapping. `Unsorted` re-enters at the start.
    pub fn cycle(&self) -> Self {
        match self {
            SortCriterion::IdAsc => SortCriterion::IdDesc,
            SortCriterion::IdDesc => SortCriterion::NameAsc,
            SortCriterion::NameAsc => SortCriterion::NameDesc,
            SortCriterion::NameDesc | SortCriterion::Unsorted => SortCriterion::IdAsc,
        }
    }
}

// ============================================================================
// FILTER + SORT
// ============================================================================

/// Case-insensitive name match, or raw substring of the zero-padded id.
/// The id side is not case-folded; an empty query matches everything.
pub fn matches(entry: &Entry, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    entry.name.to_lowercase().contains(&query.to_lowercase()) || format_id(entry.id).contains(query)
}

fn compare_names(a: &Entry, b: &Entry) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

/// Recompute the displayed subset. Never touches `entries`.
///
/// Surrounding whitespace in the query is ignored. Sorting is stable, so
/// entries whose names fold to the same string keep their filter-pass order.
pub fn recompute(entries: &[Entry], query: &str, criterion: SortCriterion) -> Vec<Entry> {
    let query = query.trim();

    let mut shown: Vec<Entry> = entries
        .iter()
        .filter(|entry| matches(entry, query))
        .cloned()
        .collect();

    match criterion {
        SortCriterion::IdAsc => shown.sort_by(|a, b| a.id.cmp(&b.id)),
        SortCriterion::IdDesc => shown.sort_by(|a, b| b.id.cmp(&a.id)),
        SortCriterion::NameAsc => shown.sort_by(compare_names),
        SortCriterion::NameDesc => shown.sort_by(|a, b| compare_names(b, a)),
        SortCriterion::Unsorted => {}
    }

    shown
}
