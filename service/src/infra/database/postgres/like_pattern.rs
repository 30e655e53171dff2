//! [`LikePattern`] definition.

use derive_more::Display;
use postgres_types::{FromSql, ToSql};

/// `LIKE`/`ILIKE` pattern matching any text containing the given input
/// literally.
///
/// Must be used with the `ESCAPE '\'` clause.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct LikePattern(String);

impl LikePattern {
    /// Creates a new [`LikePattern`] matching a substring equal to `input`.
    #[must_use]
    pub fn containing(input: &str) -> Self {
        let mut pattern = String::with_capacity(input.len() + 2);
        pattern.push('%');
        for c in input.chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        Self(pattern)
    }
}

#[cfg(test)]
mod spec {
    use super::LikePattern;

    #[test]
    fn escapes_wildcards() {
        assert_eq!(LikePattern::containing("lamp").to_string(), "%lamp%");
        assert_eq!(LikePattern::containing("100%").to_string(), r"%100\%%");
        assert_eq!(LikePattern::containing("a_b").to_string(), r"%a\_b%");
        assert_eq!(LikePattern::containing(r"c:\d").to_string(), r"%c:\\d%");
    }
}
