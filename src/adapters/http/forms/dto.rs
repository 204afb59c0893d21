//! Request shapes for form and submission endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ports::Page;

/// Pagination query string: `?page=2&limit=50`.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl From<PageQuery> for Page {
    fn from(query: PageQuery) -> Self {
        let defaults = Page::default();
        Page::new(
            query.page.unwrap_or(defaults.page),
            query.limit.unwrap_or(defaults.limit),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}
