//! [`Command`] for removing a [`Product`] from a [`Cart`].

use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Product;
use crate::{
    domain::{cart, product, Cart},
    infra::database,
    Service,
};

use super::{
    modify_cart::{self, ModifyCart, Operation},
    Command,
};

/// [`Command`] for removing all the items of a [`Product`] from a [`Cart`].
///
/// Removing a [`Product`] absent in the [`Cart`] is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct RemoveCartItem {
    /// ID of the [`Cart`] to remove the [`Product`] from.
    pub cart_id: cart::Id,

    /// ID of the [`Product`] to remove.
    pub product_id: product::Id,
}

impl<Db> Command<RemoveCartItem> for Service<Db>
where
    Self: Command<
        ModifyCart,
        Ok = Cart,
        Err = Traced<modify_cart::ExecutionError>,
    >,
{
    type Ok = Cart;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RemoveCartItem,
    ) -> Result<Self::Ok, Self::Err> {
        let RemoveCartItem {
            cart_id,
            product_id,
        } = cmd;

        self.execute(ModifyCart {
            cart_id,
            op: Operation::Remove(product_id),
        })
        .await
        .map_err(tracerr::map_from_and_wrap!())
    }
}

/// Error of [`RemoveCartItem`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    ///
    /// [`Database`]: crate::infra::Database
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

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
