//! In-memory [`Database`] implementation.
//!
//! Every operation is atomic on its own, while [`Transact`], [`Commit`] and
//! [`Lock`]s are no-ops, so it fits single-client scenarios (like tests) only.
//!
//! [`Lock`]: common::operations::Lock

mod cart;
mod catalog;
mod order;
mod user;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use common::operations::{Commit, Transact};
use tracerr::Traced;

use crate::{
    domain::{cart as cart_domain, Cart, Category, Order, Product, User},
    infra::{database, Database},
};

/// In-memory [`Database`].
#[derive(Clone, Debug, Default)]
pub struct Memory(Arc<Mutex<State>>);

/// Stored entities of a [`Memory`] database.
#[derive(Debug, Default)]
struct State {
    /// Stored [`User`]s.
    users: Vec<User>,

    /// Stored [`Product`]s.
    products: Vec<Product>,

    /// Stored [`Category`]s.
    categories: Vec<Category>,

    /// Stored [`Order`]s.
    orders: Vec<Order>,

    /// Stored [`Cart`]s.
    carts: HashMap<cart_domain::Id, Cart>,
}

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the [`State`] of this [`Memory`] database.
    fn state(&self) -> MutexGuard<'_, State> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}
