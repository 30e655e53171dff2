//! Abstract operations executed by [`Handler`]s.
//!
//! Operations are pure markers: their meaning is defined by the [`Handler`]
//! implementing them for a concrete backend.

use std::marker::PhantomData;

use crate::Handler;

/// Operation to insert a new entity.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Operation to store the new state of an existing entity.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Operation to delete entities.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Operation to read entities.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Operation to lock an entity until the end of the current transaction.
#[derive(Clone, Copy, Debug)]
pub struct Lock<T>(pub T);

/// Operation to start a background job.
#[derive(Clone, Copy, Debug)]
pub struct Start<T>(pub T);

/// Operation to perform a single run of a job.
#[derive(Clone, Copy, Debug)]
pub struct Perform<T>(pub T);

/// Operation to begin a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Transact;

/// [`Transact`]ed value.
pub type Transacted<T> = <T as Handler<Transact>>::Ok;

/// Operation to commit a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Commit;

/// Selector of `W` by `B`.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the value to select.
    _what: PhantomData<W>,

    /// Value to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] with the given value.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Consumes this [`By`] and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
