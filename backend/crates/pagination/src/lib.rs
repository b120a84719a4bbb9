//! Offset pagination primitives shared by product service endpoints.
//!
//! The crate keeps paging arithmetic out of HTTP handlers and repositories:
//! [`PageRequest`] validates the zero-based page index and page size supplied
//! by clients, [`SortDirection`] parses the ordering keyword, and [`Page`] is
//! the envelope returned to callers once a slice of records and the total
//! count are known.

mod page;
mod request;
mod sort;

pub use page::Page;
pub use request::{DEFAULT_PAGE_SIZE, PageRequest, PageRequestError};
pub use sort::{SortDirection, SortDirectionParseError};
