//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides the concrete implementation of the product
//! repository port backed by PostgreSQL via the Diesel ORM with async support
//! through `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! The persistence layer follows these principles:
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Async-safe pooling**: Connections are managed via `bb8` pools with
//!   proper async integration through `diesel-async`.
//! - **Strongly typed errors**: All database errors are mapped to domain
//!   persistence error types.
//!
//! # Example
//!
//! ```ignore
//! use product_service::outbound::persistence::{DbPool, PoolConfig, DieselProductRepository};
//!
//! let config = PoolConfig::new("postgres://localhost/products");
//! let pool = DbPool::new(config).await?;
//! let repo = DieselProductRepository::new(pool);
//! ```

mod diesel_product_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_product_repository::DieselProductRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
