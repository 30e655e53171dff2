//! [`Query`] collection related to the multiple [`Order`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{domain::Order, read};

use super::DatabaseQuery;

/// Queries a list of [`Order`]s, newest first.
pub type List = DatabaseQuery<By<Vec<Order>, read::order::list::Selector>>;

/// Queries total count of [`Order`]s.
pub type TotalCount = DatabaseQuery<By<read::order::list::TotalCount, ()>>;

/// Queries total revenue of paid [`Order`]s.
pub type Revenue = DatabaseQuery<By<read::order::list::Revenue, ()>>;
