//! Field constraints shared by product construction and partial updates.

use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

use super::ProductValidationError;

/// Minimum title length in characters.
pub const TITLE_MIN_CHARS: usize = 2;
/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
/// Lowest accepted price.
pub const PRICE_MIN: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
/// Highest accepted price.
pub const PRICE_MAX: Decimal = Decimal::from_parts(9_999_999, 0, 0, false, 2);
/// Maximum number of fractional price digits.
pub const PRICE_SCALE: u32 = 2;
/// Lowest accepted stock level.
pub const STOCK_MIN: i32 = 0;
/// Highest accepted stock level.
pub const STOCK_MAX: i32 = 10_000;

/// Client-facing constraint messages.
pub mod messages {
    pub const TITLE_REQUIRED: &str = "Product title is required";
    pub const TITLE_LENGTH: &str = "Title must be between 2 and 100 characters";
    pub const DESCRIPTION_LENGTH: &str = "Description cannot exceed 1000 characters";
    pub const PRICE_REQUIRED: &str = "Price is required";
    pub const PRICE_TOO_LOW: &str = "Price must be greater than 0";
    pub const PRICE_TOO_HIGH: &str = "Price is too high";
    pub const PRICE_SCALE: &str = "Price cannot have more than 2 decimal places";
    pub const STORE_ID_REQUIRED: &str = "Store ID is required";
    pub const STORE_ID_PATTERN: &str =
        "Store ID must contain only uppercase letters, numbers, and hyphens";
    pub const CATEGORY_REQUIRED: &str = "Category is required";
    pub const STOCK_REQUIRED: &str = "Stock quantity is required";
    pub const STOCK_NEGATIVE: &str = "Stock cannot be negative";
    pub const STOCK_MAX: &str = "Stock quantity is too high";
    pub const UPDATED_BEFORE_CREATED: &str = "updated_at must not precede created_at";
}

static STORE_ID_RE: OnceLock<Regex> = OnceLock::new();

fn store_id_regex() -> &'static Regex {
    STORE_ID_RE.get_or_init(|| {
        Regex::new("^[A-Z0-9-]+$")
            .unwrap_or_else(|error| panic!("store id regex failed to compile: {error}"))
    })
}

/// Whether a missing value is itself a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Presence {
    Required,
    Optional,
}

/// Accumulates constraint messages so callers can report every failure at
/// once instead of stopping at the first.
#[derive(Debug, Default)]
pub(crate) struct Violations {
    messages: Vec<String>,
}

impl Violations {
    pub(crate) fn push(&mut self, message: &str) {
        self.messages.push(message.to_owned());
    }

    pub(crate) fn check_title(&mut self, title: Option<&str>, presence: Presence) {
        let Some(title) = title else {
            if presence == Presence::Required {
                self.push(messages::TITLE_REQUIRED);
            }
            return;
        };
        // Blank titles are never stored, even through a partial update.
        if title.trim().is_empty() {
            self.push(messages::TITLE_REQUIRED);
        }
        let chars = title.chars().count();
        if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&chars) {
            self.push(messages::TITLE_LENGTH);
        }
    }

    pub(crate) fn check_description(&mut self, description: Option<&str>) {
        if description.is_some_and(|text| text.chars().count() > DESCRIPTION_MAX_CHARS) {
            self.push(messages::DESCRIPTION_LENGTH);
        }
    }

    pub(crate) fn check_price(&mut self, price: Option<Decimal>, presence: Presence) {
        let Some(price) = price else {
            if presence == Presence::Required {
                self.push(messages::PRICE_REQUIRED);
            }
            return;
        };
        if price < PRICE_MIN {
            self.push(messages::PRICE_TOO_LOW);
        }
        if price > PRICE_MAX {
            self.push(messages::PRICE_TOO_HIGH);
        }
        if price.normalize().scale() > PRICE_SCALE {
            self.push(messages::PRICE_SCALE);
        }
    }

    pub(crate) fn check_store_id(&mut self, store_id: Option<&str>) {
        match store_id {
            None => self.push(messages::STORE_ID_REQUIRED),
            Some(store_id) => {
                if store_id.trim().is_empty() {
                    self.push(messages::STORE_ID_REQUIRED);
                }
                if !store_id_regex().is_match(store_id) {
                    self.push(messages::STORE_ID_PATTERN);
                }
            }
        }
    }

    pub(crate) fn check_category(&mut self, category: Option<&str>) {
        if category.is_none_or(|text| text.trim().is_empty()) {
            self.push(messages::CATEGORY_REQUIRED);
        }
    }

    pub(crate) fn check_stock(&mut self, stock: Option<i64>, presence: Presence) {
        let Some(stock) = stock else {
            if presence == Presence::Required {
                self.push(messages::STOCK_REQUIRED);
            }
            return;
        };
        if stock < i64::from(STOCK_MIN) {
            self.push(messages::STOCK_NEGATIVE);
        }
        if stock > i64::from(STOCK_MAX) {
            self.push(messages::STOCK_MAX);
        }
    }

    pub(crate) fn finish(self) -> Result<(), ProductValidationError> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(ProductValidationError::new(self.messages))
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn collect(check: impl FnOnce(&mut Violations)) -> Vec<String> {
        let mut violations = Violations::default();
        check(&mut violations);
        match violations.finish() {
            Ok(()) => Vec::new(),
            Err(err) => err.into_violations(),
        }
    }

    #[rstest]
    #[case(None, Presence::Required, vec![messages::TITLE_REQUIRED])]
    #[case(None, Presence::Optional, vec![])]
    #[case(Some(""), Presence::Required, vec![messages::TITLE_REQUIRED, messages::TITLE_LENGTH])]
    #[case(Some("   "), Presence::Optional, vec![messages::TITLE_REQUIRED])]
    #[case(Some("A"), Presence::Required, vec![messages::TITLE_LENGTH])]
    #[case(Some("Ab"), Presence::Required, vec![])]
    #[case(Some("Ünïcødé"), Presence::Required, vec![])]
    fn title_rules(
        #[case] title: Option<&str>,
        #[case] presence: Presence,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(collect(|v| v.check_title(title, presence)), expected);
    }

    #[rstest]
    fn title_length_counts_characters_not_bytes() {
        let title = "é".repeat(TITLE_MAX_CHARS);
        assert!(collect(|v| v.check_title(Some(&title), Presence::Required)).is_empty());
        let too_long = "é".repeat(TITLE_MAX_CHARS + 1);
        assert_eq!(
            collect(|v| v.check_title(Some(&too_long), Presence::Required)),
            vec![messages::TITLE_LENGTH]
        );
    }

    #[rstest]
    fn description_limit_is_inclusive() {
        let at_limit = "d".repeat(DESCRIPTION_MAX_CHARS);
        let over = "d".repeat(DESCRIPTION_MAX_CHARS + 1);
        assert!(collect(|v| v.check_description(Some(&at_limit))).is_empty());
        assert_eq!(
            collect(|v| v.check_description(Some(&over))),
            vec![messages::DESCRIPTION_LENGTH]
        );
        assert!(collect(|v| v.check_description(None)).is_empty());
    }

    #[rstest]
    #[case(None, Presence::Required, vec![messages::PRICE_REQUIRED])]
    #[case(Some(Decimal::ZERO), Presence::Required, vec![messages::PRICE_TOO_LOW])]
    #[case(Some(Decimal::new(1, 2)), Presence::Required, vec![])]
    #[case(Some(Decimal::new(9_999_999, 2)), Presence::Required, vec![])]
    #[case(Some(Decimal::new(10_000_000, 2)), Presence::Optional, vec![messages::PRICE_TOO_HIGH])]
    #[case(Some(Decimal::new(-5, 0)), Presence::Optional, vec![messages::PRICE_TOO_LOW])]
    #[case(Some(Decimal::new(10_001, 3)), Presence::Required, vec![messages::PRICE_SCALE])]
    #[case(Some(Decimal::new(10_000, 3)), Presence::Required, vec![])]
    fn price_rules(
        #[case] price: Option<Decimal>,
        #[case] presence: Presence,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(collect(|v| v.check_price(price, presence)), expected);
    }

    #[rstest]
    #[case(None, vec![messages::STORE_ID_REQUIRED])]
    #[case(Some(""), vec![messages::STORE_ID_REQUIRED, messages::STORE_ID_PATTERN])]
    #[case(Some("store-1"), vec![messages::STORE_ID_PATTERN])]
    #[case(Some("STORE 1"), vec![messages::STORE_ID_PATTERN])]
    #[case(Some("STORE-001"), vec![])]
    fn store_id_rules(#[case] store_id: Option<&str>, #[case] expected: Vec<&str>) {
        assert_eq!(collect(|v| v.check_store_id(store_id)), expected);
    }

    #[rstest]
    #[case(None, vec![messages::CATEGORY_REQUIRED])]
    #[case(Some(" "), vec![messages::CATEGORY_REQUIRED])]
    #[case(Some("Electronics"), vec![])]
    fn category_rules(#[case] category: Option<&str>, #[case] expected: Vec<&str>) {
        assert_eq!(collect(|v| v.check_category(category)), expected);
    }

    #[rstest]
    #[case(None, Presence::Required, vec![messages::STOCK_REQUIRED])]
    #[case(None, Presence::Optional, vec![])]
    #[case(Some(-1), Presence::Required, vec![messages::STOCK_NEGATIVE])]
    #[case(Some(0), Presence::Required, vec![])]
    #[case(Some(10_000), Presence::Required, vec![])]
    #[case(Some(10_001), Presence::Optional, vec![messages::STOCK_MAX])]
    #[case(Some(i64::MAX), Presence::Optional, vec![messages::STOCK_MAX])]
    fn stock_rules(
        #[case] stock: Option<i64>,
        #[case] presence: Presence,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(collect(|v| v.check_stock(stock, presence)), expected);
    }
}
