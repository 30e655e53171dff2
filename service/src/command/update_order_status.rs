//! [`Command`] for updating the [`order::Status`] of an [`Order`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{order, Order},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating the [`order::Status`] of an [`Order`].
#[derive(Clone, Copy, Debug)]
pub struct UpdateOrderStatus {
    /// ID of the [`Order`] to update.
    pub id: order::Id,

    /// New [`order::Status`] of the [`Order`].
    pub status: order::Status,
}

impl<Db> Command<UpdateOrderStatus> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Lock<By<Order, order::Id>>, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Order>, order::Id>>,
            Ok = Option<Order>,
            Err = Traced<database::Error>,
        > + Database<Update<Order>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Order;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateOrderStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateOrderStatus { id, status } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Lock(By::<Order, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut order = tx
            .execute(Select(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OrderNotExists(id))
            .map_err(tracerr::wrap!())?;
        order.status = status;
        order.updated_at = DateTime::now().coerce();

        tx.execute(Update(order.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(order)
    }
}

/// Error of [`UpdateOrderStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Order`] with the provided ID does not exist.
    #[display("`Order(id: {_0})` does not exist")]
    #[from(ignore)]
    OrderNotExists(#[error(not(source))] order::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::Insert;

    use crate::{
        command::Command as _,
        domain::order::{self, PaymentStatus, Status},
        infra::{Database as _, Memory},
        Service,
    };

    use super::{ExecutionError, UpdateOrderStatus};

    #[tokio::test]
    async fn updates_status_only() {
        let db = Memory::new();
        let svc = Service::in_memory(db.clone());
        let placed = order::spec::order("10", PaymentStatus::Paid);
        db.execute(Insert(placed.clone())).await.unwrap();

        let shipped = svc
            .execute(UpdateOrderStatus {
                id: placed.id,
                status: Status::Shipped,
            })
            .await
            .unwrap();

        assert_eq!(shipped.status, Status::Shipped);
        assert_eq!(shipped.payment_status, PaymentStatus::Paid);
        assert_eq!(shipped.total, placed.total);
        assert_eq!(shipped.created_at, placed.created_at);
    }

    #[tokio::test]
    async fn fails_on_unknown_order() {
        let svc = Service::in_memory(Memory::new());

        let err = svc
            .execute(UpdateOrderStatus {
                id: order::Id::new(),
                status: Status::Cancelled,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::OrderNotExists(_)));
    }
}
