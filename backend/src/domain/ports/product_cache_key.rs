//! Cache key type shared by product cache adapters.
use thiserror::Error;

use crate::domain::ProductId;

/// Namespace prefixed to every product entry. Bump the version to orphan
/// entries written with an incompatible payload shape.
pub const PRODUCT_CACHE_NAMESPACE: &str = "product:v1";

/// Cache key used to store and retrieve product representations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductCacheKey(String);

impl ProductCacheKey {
    /// Construct a cache key after validating that it is non-empty and trimmed.
    pub fn new(value: impl Into<String>) -> Result<Self, ProductCacheKeyValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(ProductCacheKeyValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(ProductCacheKeyValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Key under which the product with `id` is cached.
    pub fn for_product(id: &ProductId) -> Self {
        Self(format!("{PRODUCT_CACHE_NAMESPACE}:{id}"))
    }

    /// Borrow the underlying key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for ProductCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ProductCacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`ProductCacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductCacheKeyValidationError {
    /// Key is empty after trimming whitespace.
    #[error("product cache key must not be empty")]
    Empty,
    /// Key contains leading or trailing whitespace.
    #[error("product cache key must not contain surrounding whitespace")]
    ContainsWhitespace,
}

#[cfg(test)]
mod tests {
    //! Validates cache key parsing and namespacing.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn cache_key_rejects_blank(#[case] value: &str) {
        let err = ProductCacheKey::new(value).expect_err("blank keys rejected");
        assert_eq!(err, ProductCacheKeyValidationError::Empty);
    }

    #[rstest]
    #[case(" product:v1:x")]
    #[case("product:v1:x ")]
    fn cache_key_rejects_whitespace_padding(#[case] value: &str) {
        let err = ProductCacheKey::new(value).expect_err("padded key rejected");
        assert_eq!(err, ProductCacheKeyValidationError::ContainsWhitespace);
    }

    #[rstest]
    fn product_keys_are_namespaced_by_id() {
        let id: ProductId = "3fa85f64-5717-4562-b3fc-2c963f66afa6"
            .parse()
            .expect("valid uuid");
        let key = ProductCacheKey::for_product(&id);
        assert_eq!(
            key.as_str(),
            "product:v1:3fa85f64-5717-4562-b3fc-2c963f66afa6"
        );
        assert_eq!(ProductCacheKey::new(key.to_string()), Ok(key));
    }
}
