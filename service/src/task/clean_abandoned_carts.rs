//! [`CleanAbandonedCarts`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Delete, Perform, Start};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{cart, Cart},
    infra::{database, Database},
    Service,
};

use super::Task;

/// Configuration for [`CleanAbandonedCarts`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between abandoned [`Cart`]s cleanings.
    pub interval: time::Duration,

    /// Time since the last modification after which a [`Cart`] is
    /// considered abandoned.
    pub timeout: time::Duration,
}

/// [`Task`] for deleting abandoned [`Cart`]s.
#[derive(Clone, Copy, Debug)]
pub struct CleanAbandonedCarts<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db> Task<Start<By<CleanAbandonedCarts<Self>, Config>>> for Service<Db>
where
    CleanAbandonedCarts<Service<Db>>:
        Task<Perform<()>, Ok = (), Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<CleanAbandonedCarts<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = CleanAbandonedCarts {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::error!("`task::CleanAbandonedCarts` failed: {e}");
            });
        }
    }
}

impl<Db> Task<Perform<()>> for CleanAbandonedCarts<Service<Db>>
where
    Db: Database<
        Delete<By<Cart, cart::ModificationDateTime>>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let deadline = cart::ModificationDateTime::now() - self.config.timeout;
        log::debug!(
            "deleting `Cart`s untouched since {}",
            deadline.to_rfc3339(),
        );
        self.service
            .database()
            .execute(Delete(By::new(deadline)))
            .await
            .map_err(tracerr::map_from_and_wrap!())
    }
}

/// Error of [`CleanAbandonedCarts`] execution.
pub type ExecutionError = Traced<database::Error>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{
        operations::{By, Perform, Select, Update},
        DateTime,
    };

    use crate::{
        domain::{cart, Cart},
        infra::{Database as _, Memory},
        Service, Task as _,
    };

    use super::{CleanAbandonedCarts, Config};

    #[tokio::test]
    async fn deletes_only_abandoned_carts() {
        let db = Memory::new();
        let task = CleanAbandonedCarts {
            config: Config {
                interval: Duration::from_secs(60),
                timeout: Duration::from_secs(24 * 60 * 60),
            },
            service: Service::in_memory(db.clone()),
        };
        let (fresh, stale) = (cart::Id::new(), cart::Id::new());
        let now = DateTime::now();
        for (id, updated_at) in [
            (fresh, now - Duration::from_secs(60)),
            (stale, now - Duration::from_secs(2 * 24 * 60 * 60)),
        ] {
            let mut cart = Cart::empty(id);
            cart.updated_at = updated_at.coerce();
            db.execute(Update(cart)).await.unwrap();
        }

        task.execute(Perform(())).await.unwrap();

        let found = |id| db.execute(Select(By::<Option<Cart>, _>::new(id)));
        assert!(found(fresh).await.unwrap().is_some());
        assert!(found(stale).await.unwrap().is_none());
    }
}
