//! Product data model.
//!
//! A product is identified externally by a [`ProductId`] (UUID v4) that is
//! assigned once at creation and never changes. Records are never removed:
//! soft deletion flips `active` to `false` and keeps the row.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod validation;

pub use validation::{
    DESCRIPTION_MAX_CHARS, PRICE_MAX, PRICE_MIN, PRICE_SCALE, STOCK_MAX, STOCK_MIN,
    TITLE_MAX_CHARS, TITLE_MIN_CHARS, messages,
};
pub(crate) use validation::{Presence, Violations};

/// Violations collected while validating product fields.
///
/// Every failed constraint contributes one message, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductValidationError {
    violations: Vec<String>,
}

impl ProductValidationError {
    pub(crate) fn new(violations: Vec<String>) -> Self {
        Self { violations }
    }

    /// Messages describing each violated constraint.
    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// Consume the error, yielding the messages.
    pub fn into_violations(self) -> Vec<String> {
        self.violations
    }
}

impl fmt::Display for ProductValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid product: {}", self.violations.join("; "))
    }
}

impl std::error::Error for ProductValidationError {}

/// External product identifier.
///
/// # Examples
/// ```
/// use product_service::domain::ProductId;
///
/// let id: ProductId = "3fa85f64-5717-4562-b3fc-2c963f66afa6".parse().expect("uuid");
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ProductId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Unvalidated product state used to construct a [`Product`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub id: ProductId,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub store_id: String,
    pub category: String,
    pub stock: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated product record.
///
/// ## Invariants
/// - `title` is not blank and holds 2 to 100 characters.
/// - `description`, when present, holds at most 1000 characters.
/// - `price` lies in `0.01..=99999.99` with at most two fractional digits.
/// - `store_id` matches `^[A-Z0-9-]+$`; `category` is not blank.
/// - `stock` lies in `0..=10000`.
/// - `updated_at` is never earlier than `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    title: String,
    description: Option<String>,
    price: Decimal,
    store_id: String,
    category: String,
    stock: i32,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Field changes applied by a partial update. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
}

impl ProductChanges {
    /// Validate every present field, collecting all violations.
    ///
    /// # Errors
    ///
    /// Returns [`ProductValidationError`] listing each violated constraint.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        let mut violations = Violations::default();
        violations.check_title(self.title.as_deref(), Presence::Optional);
        violations.check_description(self.description.as_deref());
        violations.check_price(self.price, Presence::Optional);
        violations.check_stock(self.stock.map(i64::from), Presence::Optional);
        violations.finish()
    }
}

impl Product {
    /// Validate a draft and construct the product.
    ///
    /// # Errors
    ///
    /// Returns [`ProductValidationError`] listing every violated constraint.
    pub fn new(draft: ProductDraft) -> Result<Self, ProductValidationError> {
        let mut violations = Violations::default();
        violations.check_title(Some(&draft.title), Presence::Required);
        violations.check_description(draft.description.as_deref());
        violations.check_price(Some(draft.price), Presence::Required);
        violations.check_store_id(Some(&draft.store_id));
        violations.check_category(Some(&draft.category));
        violations.check_stock(Some(i64::from(draft.stock)), Presence::Required);
        if draft.updated_at < draft.created_at {
            violations.push(messages::UPDATED_BEFORE_CREATED);
        }
        violations.finish()?;

        Ok(Self {
            id: draft.id,
            title: draft.title,
            description: draft.description,
            price: draft.price,
            store_id: draft.store_id,
            category: draft.category,
            stock: draft.stock,
            active: draft.active,
            created_at: draft.created_at,
            updated_at: draft.updated_at,
        })
    }

    /// External identifier.
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// Display title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Optional long-form description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Unit price.
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Owning store identifier.
    pub fn store_id(&self) -> &str {
        self.store_id.as_str()
    }

    /// Free-text category.
    pub fn category(&self) -> &str {
        self.category.as_str()
    }

    /// Units available.
    pub fn stock(&self) -> i32 {
        self.stock
    }

    /// `false` once the product has been soft-deleted.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the most recent mutation.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply validated changes, skipping unset fields, and stamp `at`.
    ///
    /// # Errors
    ///
    /// Returns [`ProductValidationError`] when any present field is invalid;
    /// the product is left untouched in that case.
    pub fn apply(
        &mut self,
        changes: ProductChanges,
        at: DateTime<Utc>,
    ) -> Result<(), ProductValidationError> {
        changes.validate()?;
        let ProductChanges {
            title,
            description,
            price,
            stock,
        } = changes;
        if let Some(title) = title {
            self.title = title;
        }
        if description.is_some() {
            self.description = description;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(stock) = stock {
            self.stock = stock;
        }
        self.touch(at);
        Ok(())
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at.max(self.created_at);
    }
}
