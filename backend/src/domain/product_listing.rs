//! Listing parameters: sort columns and price windows.

use std::fmt;
use std::str::FromStr;

use pagination::SortDirection;
use rust_decimal::Decimal;
use thiserror::Error;

/// Column used to order the paged product listing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    Price,
    Stock,
    Category,
    StoreId,
    Active,
    ProductUuid,
}

impl ProductSortField {
    /// Every accepted keyword, in the casing clients send.
    pub const KEYWORDS: [&'static str; 9] = [
        "createdAt",
        "updatedAt",
        "title",
        "price",
        "stock",
        "category",
        "storeId",
        "active",
        "productUuid",
    ];

    /// Client-facing keyword for the column.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
            Self::Title => "title",
            Self::Price => "price",
            Self::Stock => "stock",
            Self::Category => "category",
            Self::StoreId => "storeId",
            Self::Active => "active",
            Self::ProductUuid => "productUuid",
        }
    }
}

/// Raised for sort keywords that do not name a sortable column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot sort by '{0}'")]
pub struct ProductSortFieldParseError(pub String);

impl FromStr for ProductSortField {
    type Err = ProductSortFieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(Self::CreatedAt),
            "updatedAt" => Ok(Self::UpdatedAt),
            "title" => Ok(Self::Title),
            "price" => Ok(Self::Price),
            "stock" => Ok(Self::Stock),
            "category" => Ok(Self::Category),
            "storeId" => Ok(Self::StoreId),
            "active" => Ok(Self::Active),
            "productUuid" => Ok(Self::ProductUuid),
            other => Err(ProductSortFieldParseError(other.to_owned())),
        }
    }
}

impl fmt::Display for ProductSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering for the paged listing. Defaults to newest first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProductSort {
    pub field: ProductSortField,
    pub direction: SortDirection,
}

impl ProductSort {
    /// Pair a column with a direction.
    pub const fn new(field: ProductSortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// Inclusive price window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    min: Decimal,
    max: Decimal,
}

/// Raised when the lower price bound exceeds the upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Minimum price cannot be greater than maximum price")]
pub struct PriceRangeError;

impl PriceRange {
    /// Build a window, rejecting inverted bounds.
    ///
    /// # Errors
    ///
    /// Returns [`PriceRangeError`] when `min > max`.
    pub fn new(min: Decimal, max: Decimal) -> Result<Self, PriceRangeError> {
        if min > max {
            return Err(PriceRangeError);
        }
        Ok(Self { min, max })
    }

    /// Lower bound, inclusive.
    pub const fn min(&self) -> Decimal {
        self.min
    }

    /// Upper bound, inclusive.
    pub const fn max(&self) -> Decimal {
        self.max
    }

    /// Whether `price` falls inside the window.
    pub fn contains(&self, price: Decimal) -> bool {
        (self.min..=self.max).contains(&price)
    }
}
