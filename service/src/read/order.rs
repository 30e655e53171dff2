//! [`Order`] read model definition.
//!
//! [`Order`]: crate::domain::Order

pub mod list {
    //! [`Order`]s list definitions.

    use common::Money;
    use derive_more::{From, Into};

    #[cfg(doc)]
    use crate::domain::{order::PaymentStatus, Order};

    /// Selector of the newest [`Order`]s.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Selector {
        /// Maximum number of [`Order`]s to select, if limited.
        pub limit: Option<usize>,
    }

    /// Total count of [`Order`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i64);

    /// Sum of totals of all the [`PaymentStatus::Paid`] [`Order`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Into, PartialEq)]
    pub struct Revenue(Money);
}
