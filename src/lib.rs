// Dex Viewer - Core Library
// Catalogue pipeline: remote source → accumulator → sort/filter → renderer,
// plus the detail overlay state machine. Used by the TUI, the headless CLI and tests.

pub mod error;
pub mod model;
pub mod client;
pub mod catalogue;
pub mod filter;
pub mod render;
pub mod overlay;
pub mod config;
pub mod logging;

// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
pub mod ui;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use error::{FetchError, FetchResult};
pub use model::{Entry, EntryDetail, Stat, Summary, TypeSlot};
pub use client::{CatalogueSource, PokeApiClient};
pub use catalogue::{fetch_page, Catalogue, PageCursor, PageRequest, DEFAULT_PAGE_SIZE};
pub use filter::{matches, recompute, SortCriterion};
pub use render::{
    capitalize, format_id, format_stat_name, image_url,
    Card, CatalogueView, OverlayView,
};
pub use overlay::{
    load_detail, navigation_target, step, weaknesses,
    Direction, FetchRequest, OverlayController, OverlayEvent, OverlayState, Ticket,
};
pub use config::{Cli, Command, Config};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
