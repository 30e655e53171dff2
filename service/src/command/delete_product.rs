//! [`Command`] for deleting a [`Product`].

use common::operations::{By, Commit, Delete, Lock, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{product, Product},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Product`].
///
/// [`Cart`]s and [`Order`]s keep their snapshots of the deleted [`Product`].
///
/// [`Cart`]: crate::domain::Cart
/// [`Order`]: crate::domain::Order
#[derive(Clone, Copy, Debug)]
pub struct DeleteProduct {
    /// ID of the [`Product`] to delete.
    pub id: product::Id,
}

impl<Db> Command<DeleteProduct> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Product, product::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Product>, product::Id>>,
            Ok = Option<Product>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Product, product::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Product;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteProduct,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteProduct { id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Lock(By::<Product, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let product = tx
            .execute(Select(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProductNotExists(id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Delete(By::<Product, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(product)
    }
}

/// Error of [`DeleteProduct`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Product`] with the provided ID does not exist.
    #[display("`Product(id: {_0})` does not exist")]
    #[from(ignore)]
    ProductNotExists(#[error(not(source))] product::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::Insert;

    use crate::{
        command::Command as _,
        domain::product,
        infra::{Database as _, Memory},
        query::{self, Query as _},
        Service,
    };

    use super::{DeleteProduct, ExecutionError};

    #[tokio::test]
    async fn deletes_existing_product_once() {
        let db = Memory::new();
        let svc = Service::in_memory(db.clone());
        let lamp = product::spec::product("Lamp", "10");
        db.execute(Insert(lamp.clone())).await.unwrap();

        let deleted = svc.execute(DeleteProduct { id: lamp.id }).await.unwrap();
        assert_eq!(deleted.id, lamp.id);
        assert!(svc
            .execute(query::product::ById::by(lamp.id))
            .await
            .unwrap()
            .is_none());

        let err = svc
            .execute(DeleteProduct { id: lamp.id })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::ProductNotExists(_)));
    }
}
