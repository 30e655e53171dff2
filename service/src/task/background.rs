//! [`Background`] environment of [`Task`]s.

use std::{
    error::Error,
    future::{Future, IntoFuture},
    iter,
};

use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task;

#[cfg(doc)]
use crate::Task;

/// Environment running long-living [`Task`]s of a [`Service`] on the current
/// thread.
///
/// Resolves once all the spawned [`Task`]s finish, or with the first error
/// any of them fails with.
///
/// [`Service`]: crate::Service
#[derive(Debug, Default)]
pub struct Background {
    /// Local set the [`Task`]s are spawned onto.
    set: task::LocalSet,

    /// Handles of the spawned [`Task`]s.
    handles: Vec<task::JoinHandle<Result<(), Box<dyn Error + 'static>>>>,
}

impl Background {
    /// Spawns the provided [`Task`] execution `future` inside this
    /// [`Background`] environment.
    pub fn spawn<F, E>(&mut self, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        self.handles.push(self.set.spawn_local(
            future.map_err(|e| Box::<dyn Error + 'static>::from(Box::new(e))),
        ));
    }
}

impl IntoFuture for Background {
    type Output = Result<(), Box<dyn Error>>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, handles } = self;
        future::try_join_all(iter::once(set.map(Ok).boxed_local()).chain(
            handles.into_iter().map(|h| {
                h.map(|r| match r {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(e)) => Err(e),
                    Err(e) => {
                        Err(Box::<dyn Error + 'static>::from(Box::new(e)))
                    }
                })
                .boxed_local()
            }),
        ))
        .map_ok(drop)
        .boxed_local()
    }
}

#[cfg(test)]
mod spec {
    use std::io;

    use super::Background;

    #[tokio::test]
    async fn completes_when_tasks_complete() {
        let mut bg = Background::default();
        bg.spawn(async { Ok::<_, io::Error>(()) });
        bg.spawn(async { Ok::<_, io::Error>(()) });

        bg.await.unwrap();
    }

    #[tokio::test]
    async fn fails_with_task_error() {
        let mut bg = Background::default();
        bg.spawn(async { Ok::<_, io::Error>(()) });
        bg.spawn(async { Err(io::Error::other("cleaning failed")) });

        let err = bg.await.unwrap_err();

        assert_eq!(err.to_string(), "cleaning failed");
    }
}
