//! [`Cart`]-related [`Memory`] implementations.

use common::operations::{By, Delete, Lock, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{cart, Cart},
    infra::{database, Database},
};

use super::Memory;

impl Database<Select<By<Option<Cart>, cart::Id>>> for Memory {
    type Ok = Option<Cart>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Cart>, cart::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().carts.get(&by.into_inner()).cloned())
    }
}

impl Database<Update<Cart>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(cart): Update<Cart>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.state().carts.insert(cart.id, cart);
        Ok(())
    }
}

impl Database<Lock<By<Cart, cart::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Cart, cart::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Delete<By<Cart, cart::ModificationDateTime>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Cart, cart::ModificationDateTime>>,
    ) -> Result<Self::Ok, Self::Err> {
        let deadline = by.into_inner();
        self.state().carts.retain(|_, c| c.updated_at >= deadline);
        Ok(())
    }
}
