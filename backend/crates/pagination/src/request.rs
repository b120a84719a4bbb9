//! Validated page coordinates.

use thiserror::Error;

/// Page size applied when the client does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Errors raised while validating page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// The page index was negative.
    #[error("page index must not be negative")]
    NegativePage,
    /// The page size was zero or negative.
    #[error("page size must be at least 1")]
    NonPositiveSize,
    /// The requested window starts beyond the addressable range.
    #[error("page offset exceeds the supported range")]
    OffsetOverflow,
}

/// Zero-based page index paired with a positive page size.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(2, 25).expect("valid page");
/// assert_eq!(request.offset(), 50);
/// assert_eq!(request.limit(), 25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
    offset: i64,
}

impl PageRequest {
    /// Validate client supplied coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when the page is negative, the size is
    /// not positive, or either value exceeds the supported range.
    pub fn new(page: i64, size: i64) -> Result<Self, PageRequestError> {
        if page < 0 {
            return Err(PageRequestError::NegativePage);
        }
        if size < 1 {
            return Err(PageRequestError::NonPositiveSize);
        }
        let page = u32::try_from(page).map_err(|_| PageRequestError::OffsetOverflow)?;
        let size = u32::try_from(size).map_err(|_| PageRequestError::OffsetOverflow)?;
        let offset = i64::from(page)
            .checked_mul(i64::from(size))
            .ok_or(PageRequestError::OffsetOverflow)?;
        Ok(Self { page, size, offset })
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of records per page.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Number of records skipped before this page.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// Maximum number of records on this page, as a SQL `LIMIT` value.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, 0)]
    #[case(3, 10, 30)]
    #[case(1, 1, 1)]
    fn computes_offset(#[case] page: i64, #[case] size: i64, #[case] expected: i64) {
        let request = PageRequest::new(page, size).expect("valid coordinates");
        assert_eq!(request.offset(), expected);
    }

    #[rstest]
    #[case(-1, 10, PageRequestError::NegativePage)]
    #[case(0, 0, PageRequestError::NonPositiveSize)]
    #[case(0, -5, PageRequestError::NonPositiveSize)]
    #[case(i64::MAX, 10, PageRequestError::OffsetOverflow)]
    fn rejects_invalid_coordinates(
        #[case] page: i64,
        #[case] size: i64,
        #[case] expected: PageRequestError,
    ) {
        assert_eq!(PageRequest::new(page, size), Err(expected));
    }

    #[rstest]
    fn default_is_first_page_of_ten() {
        let request = PageRequest::default();
        assert_eq!(request.page(), 0);
        assert_eq!(request.size(), DEFAULT_PAGE_SIZE);
        assert_eq!(request.offset(), 0);
    }
}
