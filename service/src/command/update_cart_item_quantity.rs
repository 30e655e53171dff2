//! [`Command`] for updating the quantity of a [`Product`] in a [`Cart`].

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

/// [`Command`] for setting the quantity of a [`Product`] in a [`Cart`].
///
/// Non-positive `quantity` removes the [`Product`] from the [`Cart`], while a
/// [`Product`] absent in the [`Cart`] is left absent.
#[derive(Clone, Copy, Debug)]
pub struct UpdateCartItemQuantity {
    /// ID of the [`Cart`] to update.
    pub cart_id: cart::Id,

    /// ID of the [`Product`] to update the quantity of.
    pub product_id: product::Id,

    /// New quantity of the [`Product`].
    pub quantity: i32,
}

impl<Db> Command<UpdateCartItemQuantity> for Service<Db>
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
        cmd: UpdateCartItemQuantity,
    ) -> Result<Self::Ok, Self::Err> {
        let UpdateCartItemQuantity {
            cart_id,
            product_id,
            quantity,
        } = cmd;

        self.execute(ModifyCart {
            cart_id,
            op: Operation::UpdateQuantity(product_id, quantity),
        })
        .await
        .map_err(tracerr::map_from_and_wrap!())
    }
}

/// Error of [`UpdateCartItemQuantity`] [`Command`] execution.
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
