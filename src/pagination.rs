use serde::Serialize;

/// Page size used by listing endpoints when the client does not choose one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Page number and page size applied to a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Requested page (1-based).
    pub page: usize,
    /// Number of items per page.
    pub per_page: usize,
}

/// A single page of results together with paging metadata.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: usize, total_pages: usize) -> Self {
        Self {
            items,
            page,
            total_pages,
        }
    }
}
