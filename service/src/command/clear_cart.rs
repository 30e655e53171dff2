//! [`Command`] for clearing a [`Cart`].

use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{cart, Cart},
    infra::database,
    Service,
};

use super::{
    modify_cart::{self, ModifyCart, Operation},
    Command,
};

/// [`Command`] for removing all the items from a [`Cart`].
#[derive(Clone, Copy, Debug)]
pub struct ClearCart {
    /// ID of the [`Cart`] to clear.
    pub cart_id: cart::Id,
}

impl<Db> Command<ClearCart> for Service<Db>
where
    Self: Command<
        ModifyCart,
        Ok = Cart,
        Err = Traced<modify_cart::ExecutionError>,
    >,
{
    type Ok = Cart;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: ClearCart) -> Result<Self::Ok, Self::Err> {
        let ClearCart { cart_id } = cmd;

        self.execute(ModifyCart {
            cart_id,
            op: Operation::Clear,
        })
        .await
        .map_err(tracerr::map_from_and_wrap!())
    }
}

/// Error of [`ClearCart`] [`Command`] execution.
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
