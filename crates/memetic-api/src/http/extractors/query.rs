//! Query parameter extractors for list endpoints.

use memetic_types::history::{DEFAULT_PAGE_LIMIT, Page};
use serde::Deserialize;

/// Pagination query parameters shared by every list endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    /// Maximum results (clamped to the hard cap).
    pub limit: Option<i64>,
    /// Offset for pagination.
    pub offset: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> Page {
        page_from(self.limit, self.offset)
    }
}

/// Query parameters for persona list endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct PersonaListQuery {
    /// Filter by creator wallet address.
    pub creator: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PersonaListQuery {
    pub fn page(&self) -> Page {
        page_from(self.limit, self.offset)
    }
}

/// Query parameters for image history endpoints.
#[derive(Debug, Deserialize, Default)]
pub struct ImageListQuery {
    /// Scope to one agent.
    pub agent_id: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ImageListQuery {
    pub fn page(&self) -> Page {
        page_from(self.limit, self.offset)
    }
}

fn page_from(limit: Option<i64>, offset: Option<i64>) -> Page {
    Page::new(limit.unwrap_or(DEFAULT_PAGE_LIMIT), offset.unwrap_or(0))
}
