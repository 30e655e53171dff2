//! [`Command`] for creating a new [`Product`].

use common::{
    operations::{Commit, Insert, Transact, Transacted},
    DateTime, Money, Percent,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::product::{Description, Images, Name, Stock};
use crate::{
    domain::{category, product, Product},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Product`].
#[derive(Clone, Debug)]
pub struct CreateProduct {
    /// [`Name`] of a new [`Product`].
    pub name: product::Name,

    /// [`Description`] of a new [`Product`].
    pub description: product::Description,

    /// Regular price of a new [`Product`].
    pub price: Money,

    /// Name of the [`Category`] of a new [`Product`].
    ///
    /// [`Category`]: crate::domain::Category
    pub category: category::Name,

    /// [`Images`] of a new [`Product`].
    pub images: product::Images,

    /// [`Stock`] of a new [`Product`].
    pub stock: product::Stock,

    /// Indicator whether a new [`Product`] is on sale.
    pub sale: bool,

    /// Discount of a new [`Product`] while on sale.
    pub sale_percentage: Option<Percent>,

    /// Indicator whether a new [`Product`] is featured.
    pub featured: bool,
}

impl<Db> Command<CreateProduct> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Product>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Product;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateProduct,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateProduct {
            name,
            description,
            price,
            category,
            images,
            stock,
            sale,
            sale_percentage,
            featured,
        } = cmd;

        let now = DateTime::now();
        let product = Product {
            id: product::Id::new(),
            name,
            description,
            price,
            category,
            images,
            stock,
            sale,
            sale_percentage,
            featured,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(product.clone()))
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

/// Error of [`CreateProduct`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
