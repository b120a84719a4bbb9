//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Product catalogue table.
    ///
    /// Rows are never deleted; `active = false` marks a soft-deleted product.
    products (id) {
        /// Surrogate primary key, never exposed outside the adapter.
        id -> Int8,
        /// External identifier used by every API operation.
        product_uuid -> Uuid,
        /// Display title (2-100 characters).
        title -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Unit price, `NUMERIC(10, 2)`.
        price -> Numeric,
        /// Owning store identifier.
        store_id -> Varchar,
        /// Catalogue category.
        category -> Varchar,
        /// Units on hand (0-10000).
        stock -> Int4,
        /// Soft-delete flag.
        active -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}
