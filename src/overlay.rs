// 🪟 Detail Overlay Controller - Closed / Loading / Open / Error
//
// `step` is the whole state machine as a pure function. `OverlayController`
// owns the current state and hands out tickets so a response that arrives
// after the overlay has moved on is recognised and dropped.

use crate::client::CatalogueSource;
use crate::error::FetchResult;
use crate::model::{EntryDetail, TypeSlot};
use futures::future::try_join_all;
use indexmap::IndexSet;
use tracing::{debug, info, warn};

/// Identifies one overlay load; only the latest one may land
pub type Ticket = u64;

// ============================================================================
// STATES + EVENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayState {
    Closed,
    Loading { id: u32, ticket: Ticket },
    Open { detail: Box<EntryDetail> },
    Error { id: u32, message: String },
}

impl OverlayState {
    pub fn is_closed(&self) -> bool {
        matches!(self, OverlayState::Closed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    /// Card activated (or any other request to show an identifier)
    Open(u32),
    Next,
    Previous,
    /// Close control or click outside the overlay; also dismisses an error
    Close,
    Loaded { ticket: Ticket, detail: Box<EntryDetail> },
    Failed { ticket: Ticket, message: String },
}

impl OverlayEvent {
    fn response_ticket(&self) -> Option<Ticket> {
        match self {
            OverlayEvent::Loaded { ticket, .. } | OverlayEvent::Failed { ticket, .. } => Some(*ticket),
            _ => None,
        }
    }
}

/// Side effect requested by a transition: load this identifier under this ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub id: u32,
    pub ticket: Ticket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Where next/previous lands. Walks the numeric id space, wrapping at
/// 1 and at the size of the accumulated collection.
pub fn navigation_target(current: u32, direction: Direction, collection_len: usize) -> u32 {
    let last = u32::try_from(collection_len).unwrap_or(u32::MAX).max(1);

    match direction {
        Direction::Previous if current <= 1 => last,
        Direction::Previous => current - 1,
        Direction::Next if current >= last => 1,
        Direction::Next => current + 1,
    }
}

/// Apply one event. `ticket` is used only if the transition starts a load.
pub fn step(
    state: OverlayState,
    event: OverlayEvent,
    collection_len: usize,
    ticket: Ticket,
) -> (OverlayState, Option<FetchRequest>) {
    let load = |id: u32| {
        (
            OverlayState::Loading { id, ticket },
            Some(FetchRequest { id, ticket }),
        )
    };

    match (state, event) {
        // Opening always supersedes whatever was showing or loading
        (_, OverlayEvent::Open(id)) => load(id),

        (OverlayState::Open { detail }, OverlayEvent::Next) => {
            load(navigation_target(detail.entry.id, Direction::Next, collection_len))
        }
        (OverlayState::Open { detail }, OverlayEvent::Previous) => {
            load(navigation_target(detail.entry.id, Direction::Previous, collection_len))
        }

        (_, OverlayEvent::Close) => (OverlayState::Closed, None),

        (OverlayState::Loading { ticket: current, .. }, OverlayEvent::Loaded { ticket: arrived, detail })
            if current == arrived =>
        {
            (OverlayState::Open { detail }, None)
        }
        (OverlayState::Loading { id, ticket: current }, OverlayEvent::Failed { ticket: arrived, message })
            if current == arrived =>
        {
            (OverlayState::Error { id, message }, None)
        }

        // Stale responses and navigation outside Open change nothing
        (state, _) => (state, None),
    }
}

// ============================================================================
// CONTROLLER
// ============================================================================

#[derive(Debug)]
pub struct OverlayController {
    state: OverlayState,
    last_ticket: Ticket,
}

impl Default for OverlayController {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayController {
    pub fn new() -> Self {
        Self {
            state: OverlayState::Closed,
            last_ticket: 0,
        }
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    /// Feed one event; returns the load to start, if any
    pub fn handle(&mut self, event: OverlayEvent, collection_len: usize) -> Option<FetchRequest> {
        if let Some(arrived) = event.response_ticket() {
            let current = matches!(self.state, OverlayState::Loading { ticket, .. } if ticket == arrived);
            if !current {
                debug!(ticket = arrived, "dropping stale overlay response");
            }
        }

        let ticket = self.last_ticket + 1;
        let state = std::mem::replace(&mut self.state, OverlayState::Closed);
        let (next, fetch) = step(state, event, collection_len, ticket);

        if let Some(request) = fetch {
            self.last_ticket = request.ticket;
            info!(id = request.id, ticket = request.ticket, "opening overlay");
        }
        if let OverlayState::Error { id, message } = &next {
            warn!(id, message = %message, "overlay load failed");
        }

        self.state = next;
        fetch
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Everything the overlay needs for `id`: the entry, then its categories and
/// weaknesses side by side. Any failure fails the whole load.
pub async fn load_detail(source: &dyn CatalogueSource, id: u32) -> FetchResult<EntryDetail> {
    let entry = source.entry_by_id(id).await?;

    let (categories, weaknesses) =
        futures::try_join!(source.categories(id), weaknesses(source, &entry.types))?;

    Ok(EntryDetail {
        entry,
        categories,
        weaknesses,
    })
}

/// One lookup per distinct type, concurrently, reduced to a set of names
pub async fn weaknesses(source: &dyn CatalogueSource, types: &[TypeSlot]) -> FetchResult<Vec<String>> {
    let urls: IndexSet<&str> = types.iter().map(|t| t.url.as_str()).collect();

    let relations = try_join_all(urls.into_iter().map(|url| source.double_damage_from(url))).await?;

    Ok(union_weaknesses(relations))
}

/// Union of per-type weakness lists, first occurrence wins
pub fn union_weaknesses(relations: Vec<Vec<String>>) -> Vec<String> {
    relations
        .into_iter()
        .flatten()
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}
