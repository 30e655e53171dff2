//! [`Query`] collection related to a single [`Cart`].

use common::operations::By;

use crate::domain::{cart, Cart};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a stored [`Cart`] by its [`cart::Id`].
///
/// A [`Cart`] that has never been modified is not stored.
pub type ById = DatabaseQuery<By<Option<Cart>, cart::Id>>;
