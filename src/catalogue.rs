// 📚 Catalogue Accumulator - page-by-page, append-only entry collection
//
// A page is committed whole or not at all: the summary request and every
// detail request must succeed before anything is appended or the cursor moves.

use crate::client::CatalogueSource;
use crate::error::FetchResult;
use crate::model::Entry;
use futures::future::try_join_all;
use tracing::{info, warn};

/// Page size used by the original catalogue
pub const DEFAULT_PAGE_SIZE: usize = 10;

// ============================================================================
// PAGINATION
// ============================================================================

/// Offset + fixed page size. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    offset: usize,
    page_size: usize,
}

impl PageCursor {
    pub fn new(page_size: usize) -> Self {
        Self {
            offset: 0,
            page_size,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn request(&self) -> PageRequest {
        PageRequest {
            offset: self.offset,
            limit: self.page_size,
        }
    }

    fn advance(&mut self) {
        self.offset += self.page_size;
    }
}

/// What a single page load asks the source for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

// ============================================================================
// ACCUMULATED COLLECTION
// ============================================================================

#[derive(Debug, Clone)]
pub struct Catalogue {
    entries: Vec<Entry>,
    cursor: PageCursor,
}

impl Catalogue {
    pub fn new(page_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: PageCursor::new(page_size),
        }
    }

    /// Everything fetched so far, in fetch order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn next_request(&self) -> PageRequest {
        self.cursor.request()
    }

    /// Append a fully resolved page and move the cursor by one page.
    ///
    /// No de-duplication: committing an overlapping page appends its
    /// entries a second time.
    pub fn commit_page(&mut self, request: PageRequest, page: Vec<Entry>) {
        info!(
            offset = request.offset,
            fetched = page.len(),
            total = self.entries.len() + page.len(),
            "page committed"
        );
        self.entries.extend(page);
        self.cursor.advance();
    }

    /// Fetch and commit the page at the current cursor.
    /// Returns the number of entries appended.
    pub async fn fetch_next_page(&mut self, source: &dyn CatalogueSource) -> FetchResult<usize> {
        let request = self.next_request();

        match fetch_page(source, request).await {
            Ok(page) => {
                let count = page.len();
                self.commit_page(request, page);
                Ok(count)
            }
            Err(e) => {
                warn!(offset = request.offset, error = %e, "page load failed");
                Err(e)
            }
        }
    }
}

/// Resolve one page: the summary list, then every detail concurrently.
/// Entries come back in summary order; any failure fails the whole page.
pub async fn fetch_page(source: &dyn CatalogueSource, request: PageRequest) -> FetchResult<Vec<Entry>> {
    let summaries = source.list_page(request.offset, request.limit).await?;

    try_join_all(summaries.iter().map(|summary| source.entry_at(&summary.url))).await
}
