//! [`Command`] for updating an existing [`Product`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{product, Product},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`Product`].
#[derive(Clone, Debug)]
pub struct UpdateProduct {
    /// ID of the [`Product`] to update.
    pub id: product::Id,

    /// [`product::Patch`] to apply.
    pub patch: product::Patch,
}

impl<Db> Command<UpdateProduct> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Product, product::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Product>, product::Id>>,
            Ok = Option<Product>,
            Err = Traced<database::Error>,
        > + Database<Update<Product>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Product;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateProduct,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateProduct { id, patch } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Lock(By::<Product, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut product = tx
            .execute(Select(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProductNotExists(id))
            .map_err(tracerr::wrap!())?;
        product.apply(patch);
        product.updated_at = DateTime::now().coerce();

        tx.execute(Update(product.clone()))
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

/// Error of [`UpdateProduct`] [`Command`] execution.
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
    use std::str::FromStr as _;

    use common::Percent;

    use crate::{
        command::{Command as _, CreateProduct},
        domain::{
            category,
            product::{self, spec::money},
            Image,
        },
        infra::Memory,
        query::{self, Query as _},
        Service,
    };

    use super::{ExecutionError, UpdateProduct};

    fn lamp() -> CreateProduct {
        CreateProduct {
            name: product::Name::new("Desk Lamp").unwrap(),
            description: product::Description::new("Warm light").unwrap(),
            price: money("40"),
            category: category::Name::new("Lighting").unwrap(),
            images: product::Images::new(vec![Image::new(
                "https://cdn.example.com/lamp.png",
            )
            .unwrap()])
            .unwrap(),
            stock: 3,
            sale: false,
            sale_percentage: None,
            featured: false,
        }
    }

    #[tokio::test]
    async fn patches_only_provided_fields() {
        let svc = Service::in_memory(Memory::new());
        let created = svc.execute(lamp()).await.unwrap();

        let updated = svc
            .execute(UpdateProduct {
                id: created.id,
                patch: product::Patch {
                    sale: Some(true),
                    sale_percentage: Some(Percent::from_str("25").unwrap()),
                    stock: Some(0),
                    ..product::Patch::default()
                },
            })
            .await
            .unwrap();

        assert_eq!(updated.name, created.name);
        assert_eq!(updated.price, money("40"));
        assert_eq!(updated.stock, 0);
        assert_eq!(updated.sale_price(), Some(money("30")));
        assert!(updated.updated_at >= created.updated_at);

        let stored = svc
            .execute(query::product::ById::by(created.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.sale_price(), Some(money("30")));
    }

    #[tokio::test]
    async fn fails_on_unknown_product() {
        let svc = Service::in_memory(Memory::new());

        let err = svc
            .execute(UpdateProduct {
                id: product::Id::new(),
                patch: product::Patch::default(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::ProductNotExists(_)));
    }
}
