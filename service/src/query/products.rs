//! [`Query`] collection related to the multiple [`Product`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{domain::Product, read};

use super::DatabaseQuery;

/// Queries a page of [`Product`]s.
pub type List =
    DatabaseQuery<By<Vec<Product>, read::product::list::Selector>>;

/// Queries total count of [`Product`]s matching a filter.
pub type TotalCount = DatabaseQuery<
    By<read::product::list::TotalCount, read::product::list::Filter>,
>;
