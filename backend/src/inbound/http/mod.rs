//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod info;
pub mod products;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
