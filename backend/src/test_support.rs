//! Test utilities for the product service crate.
//!
//! Compiled with the `test-support` feature so integration tests in
//! `tests/` can drive the full HTTP stack without PostgreSQL.

mod clock;
mod product_repository;

pub use clock::MutableClock;
pub use product_repository::InMemoryProductRepository;
