// 🖼️ Catalogue Renderer - what a card and an overlay show
// Drawing is the TUI's job; this module only decides the content

use crate::model::{Entry, EntryDetail};

/// Message shown instead of cards when nothing matches
pub const NO_RESULTS: &str = "No results found!";

/// Message shown in the catalogue area after a failed page load
pub const LOAD_FAILED: &str = "Failed to load catalogue";

/// Notice shown when the detail overlay cannot be loaded
pub const OVERLAY_FAILED: &str = "Failed to load data";

/// Identifier as shown to users: at least three digits, zero-padded
pub fn format_id(id: u32) -> String {
    format!("{:03}", id)
}

/// Upper-case the first character, leave the rest alone
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn format_stat_name(stat: &str) -> String {
    match stat {
        "hp" => "HP".to_string(),
        "special-attack" => "Special Attack".to_string(),
        "special-defense" => "Special Defense".to_string(),
        other => capitalize(other),
    }
}

pub fn image_url(image_base: &str, id: u32) -> String {
    format!("{}/{}.png", image_base.trim_end_matches('/'), format_id(id))
}

// ============================================================================
// CATALOGUE CARDS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Identifier to hand back to the overlay when the card is activated
    pub id: u32,
    pub image_url: String,
    pub display_name: String,
    pub id_label: String,
    pub types_label: String,
}

impl Card {
    pub fn from_entry(entry: &Entry, image_base: &str) -> Self {
        Self {
            id: entry.id,
            image_url: image_url(image_base, entry.id),
            display_name: capitalize(&entry.name),
            id_label: format!("ID No: {}", format_id(entry.id)),
            types_label: format!("Type: {}", entry.type_names().join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogueView {
    Cards(Vec<Card>),
    NoResults,
}

impl CatalogueView {
    /// One card per displayed entry, or the no-results indicator
    pub fn build(shown: &[Entry], image_base: &str) -> Self {
        if shown.is_empty() {
            return CatalogueView::NoResults;
        }
        CatalogueView::Cards(shown.iter().map(|e| Card::from_entry(e, image_base)).collect())
    }

    /// Plain-text rendering, one line per card
    pub fn lines(&self) -> Vec<String> {
        match self {
            CatalogueView::NoResults => vec![NO_RESULTS.to_string()],
            CatalogueView::Cards(cards) => cards
                .iter()
                .map(|c| format!("{} | {} | {} | {}", c.id_label, c.display_name, c.types_label, c.image_url))
                .collect(),
        }
    }
}

// ============================================================================
// DETAIL OVERLAY
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayView {
    pub id: u32,
    pub image_url: String,
    pub display_name: String,
    pub id_label: String,
    pub types: String,
    pub abilities: String,
    pub categories: String,
    pub weaknesses: String,
    pub height: String,
    pub weight: String,

    /// (formatted stat name, base value) in source order
    pub stats: Vec<(String, u32)>,
}

impl OverlayView {
    pub fn build(detail: &EntryDetail, image_base: &str) -> Self {
        let entry = &detail.entry;
        Self {
            id: entry.id,
            image_url: image_url(image_base, entry.id),
            display_name: capitalize(&entry.name),
            id_label: format!("ID No: {}", format_id(entry.id)),
            types: format!("Type: {}", entry.type_names().join(", ")),
            abilities: format!("Abilities: {}", entry.abilities.join(", ")),
            categories: format!("Categories: {}", detail.categories.join(", ")),
            weaknesses: format!("Weaknesses: {}", detail.weaknesses.join(", ")),
            height: format!("Height: {}", entry.height),
            weight: format!("Weight: {}", entry.weight),
            stats: entry
                .stats
                .iter()
                .map(|s| (format_stat_name(&s.name), s.base_value))
                .collect(),
        }
    }

    /// Plain-text rendering for headless output
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            self.display_name.clone(),
            self.id_label.clone(),
            self.image_url.clone(),
            self.types.clone(),
            self.abilities.clone(),
            self.categories.clone(),
            self.weaknesses.clone(),
            self.height.clone(),
            self.weight.clone(),
            String::new(),
            format!("{:<16} {}", "Stats", "Value"),
        ];
        lines.extend(self.stats.iter().map(|(name, value)| format!("{:<16} {}", name, value)));
        lines
    }
}
