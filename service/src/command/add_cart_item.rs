//! [`Command`] for adding a [`Product`] into a [`Cart`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{cart, product, Cart, Product},
    infra::{database, Database},
    Service,
};

use super::{
    modify_cart::{self, ModifyCart, Operation},
    Command,
};

/// [`Command`] for adding a single item of a [`Product`] into a [`Cart`].
///
/// Adding a [`Product`] already present in the [`Cart`] increments its
/// quantity by one.
#[derive(Clone, Copy, Debug)]
pub struct AddCartItem {
    /// ID of the [`Cart`] to add the [`Product`] into.
    pub cart_id: cart::Id,

    /// ID of the [`Product`] to add.
    pub product_id: product::Id,
}

impl<Db> Command<AddCartItem> for Service<Db>
where
    Db: Database<
        Select<By<Option<Product>, product::Id>>,
        Ok = Option<Product>,
        Err = Traced<database::Error>,
    >,
    Self: Command<
        ModifyCart,
        Ok = Cart,
        Err = Traced<modify_cart::ExecutionError>,
    >,
{
    type Ok = Cart;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: AddCartItem) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AddCartItem {
            cart_id,
            product_id,
        } = cmd;

        let item = self
            .database()
            .execute(Select(By::new(product_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProductNotExists(product_id))
            .map_err(tracerr::wrap!())?
            .to_cart_item();

        self.execute(ModifyCart {
            cart_id,
            op: Operation::Add(item),
        })
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`AddCartItem`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Product`] with the provided ID does not exist.
    #[display("`Product(id: {_0})` does not exist")]
    #[from(ignore)]
    ProductNotExists(#[error(not(source))] product::Id),

    /// [`Cart`] total doesn't fit into [`Money`].
    ///
    /// [`Money`]: common::Money
    #[display("Failed to modify `Cart`: {_0}")]
    TotalOverflow(cart::TotalOverflow),
}

impl From<modify_cart::ExecutionError> for ExecutionError {
    fn from(e: modify_cart::ExecutionError) -> Self {
        use modify_cart::ExecutionError as E;

        match e {
            E::Db(e) => Self::Db(e),
            E::TotalOverflow(e) => Self::TotalOverflow(e),
        }
    }
}
