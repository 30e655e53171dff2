//! Abstractions for offset pagination.

/// Offset pagination arguments.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Arguments {
    /// Maximum number of items to return.
    limit: usize,

    /// Number of leading items to skip.
    skip: usize,
}

impl Arguments {
    /// Number of items returned when no limit is requested.
    pub const DEFAULT_LIMIT: usize = 20;

    /// Creates new [`Arguments`], substituting the defaults for the missing
    /// values.
    ///
    /// [`None`] is returned if any of the provided values is negative or
    /// doesn't fit into [`usize`].
    pub fn new<Num>(limit: Option<Num>, skip: Option<Num>) -> Option<Self>
    where
        Num: TryInto<usize>,
    {
        Some(Self {
            limit: limit.map_or(Some(Self::DEFAULT_LIMIT), |l| l.try_into().ok())?,
            skip: skip.map_or(Some(0), |s| s.try_into().ok())?,
        })
    }

    /// Returns the maximum number of items requested by these [`Arguments`].
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the number of leading items skipped by these [`Arguments`].
    #[must_use]
    pub const fn skip(&self) -> usize {
        self.skip
    }

    /// Cuts the page requested by these [`Arguments`] out of already ordered
    /// `items`.
    pub fn page<I: IntoIterator>(&self, items: I) -> impl Iterator<Item = I::Item> {
        items.into_iter().skip(self.skip).take(self.limit)
    }
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            skip: 0,
        }
    }
}

/// Pagination selector.
#[derive(Clone, Debug, Default)]
pub struct Selector<F, O> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments,

    /// Filter being applied before paginating.
    pub filter: F,

    /// Order the items are paginated in.
    pub order: O,
}

#[cfg(test)]
mod spec {
    use super::Arguments;

    #[test]
    fn defaults() {
        let args = Arguments::new::<i32>(None, None).unwrap();

        assert_eq!(args, Arguments::default());
        assert_eq!(args.limit(), 20);
        assert_eq!(args.skip(), 0);
    }

    #[test]
    fn rejects_negatives() {
        assert!(Arguments::new(Some(-1), None).is_none());
        assert!(Arguments::new(None, Some(-5)).is_none());
        assert!(Arguments::new(Some(0), Some(0)).is_some());
    }

    #[test]
    fn cuts_page() {
        let args = Arguments::new(Some(2), Some(3)).unwrap();

        assert_eq!(args.page(0..10).collect::<Vec<_>>(), [3, 4]);
        assert_eq!(args.page(0..4).collect::<Vec<_>>(), [3]);
        assert_eq!(args.page(0..2).count(), 0);
    }
}
