//! Page envelope returned by listing endpoints.

use serde::{Deserialize, Serialize};

use crate::PageRequest;

/// A slice of records together with the paging metadata clients need to
/// request neighbouring pages.
///
/// Serialises with camelCase keys:
/// `{content, page, size, totalElements, totalPages, first, last}`.
///
/// # Examples
/// ```
/// use pagination::{Page, PageRequest};
///
/// let request = PageRequest::new(1, 2).expect("valid page");
/// let page = Page::new(vec!["c", "d"], request, 5);
/// assert_eq!(page.total_pages, 3);
/// assert!(!page.first);
/// assert!(!page.last);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records on this page.
    pub content: Vec<T>,
    /// Zero-based page index.
    pub page: u32,
    /// Requested page size.
    pub size: u32,
    /// Number of records across all pages.
    pub total_elements: u64,
    /// Number of pages needed to hold every record.
    pub total_pages: u64,
    /// Whether this is the first page.
    pub first: bool,
    /// Whether no page follows this one.
    pub last: bool,
}

impl<T> Page<T> {
    /// Build the envelope for `content` fetched with `request`.
    #[must_use]
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        let total_pages = total_elements.div_ceil(u64::from(request.size()));
        let page = request.page();
        Self {
            content,
            page,
            size: request.size(),
            total_elements,
            total_pages,
            first: page == 0,
            last: u64::from(page).saturating_add(1) >= total_pages,
        }
    }

    /// Transform every record while keeping the paging metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
        }
    }
}
