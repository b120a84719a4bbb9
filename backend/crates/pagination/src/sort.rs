//! Sort direction keyword parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordering applied to the sort column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest value first.
    Asc,
    /// Largest value first.
    #[default]
    Desc,
}

/// Raised when a direction keyword is neither `asc` nor `desc`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("sort direction must be 'asc' or 'desc', got '{0}'")]
pub struct SortDirectionParseError(pub String);

impl FromStr for SortDirection {
    type Err = SortDirectionParseError;

    /// Parse `asc` or `desc`, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(SortDirectionParseError(s.to_owned()))
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("asc", SortDirection::Asc)]
    #[case("ASC", SortDirection::Asc)]
    #[case("Desc", SortDirection::Desc)]
    #[case("desc", SortDirection::Desc)]
    fn parses_keywords_case_insensitively(#[case] raw: &str, #[case] expected: SortDirection) {
        assert_eq!(raw.parse::<SortDirection>(), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("up")]
    #[case("ascending")]
    fn rejects_unknown_keywords(#[case] raw: &str) {
        let error = raw.parse::<SortDirection>().expect_err("unknown keyword");
        assert_eq!(error.0, raw);
    }

    #[rstest]
    fn defaults_to_descending() {
        assert_eq!(SortDirection::default(), SortDirection::Desc);
    }
}
