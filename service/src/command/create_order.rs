//! [`Command`] for placing a new [`Order`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{cart, order, user, Cart, Order},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for placing a new [`Order`] of the current [`Cart`] items.
///
/// The [`Cart`] itself is left untouched.
#[derive(Clone, Debug)]
pub struct CreateOrder {
    /// ID of the [`Cart`] to check out.
    pub cart_id: cart::Id,

    /// ID of the [`User`] placing the [`Order`], if authenticated.
    pub user_id: Option<user::Id>,

    /// [`order::ShippingAddress`] of the [`Order`].
    pub shipping_address: order::ShippingAddress,
}

impl<Db> Command<CreateOrder> for Service<Db>
where
    Db: Database<
            Select<By<Option<Cart>, cart::Id>>,
            Ok = Option<Cart>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Order>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Order;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateOrder) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateOrder {
            cart_id,
            user_id,
            shipping_address,
        } = cmd;

        let cart = self
            .database()
            .execute(Select(By::new(cart_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|c| !c.is_empty())
            .ok_or(E::CartEmpty(cart_id))
            .map_err(tracerr::wrap!())?;

        let now = DateTime::now();
        let order = Order {
            id: order::Id::new(),
            user_id,
            items: cart.items().to_vec(),
            total: cart.total(),
            shipping_address,
            status: order::Status::Pending,
            payment_status: order::PaymentStatus::Pending,
            payment_id: None,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(order.clone()))
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

/// Error of [`CreateOrder`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Cart`] has no items to order.
    #[display("`Cart(id: {_0})` is empty")]
    #[from(ignore)]
    CartEmpty(#[error(not(source))] cart::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::Insert;

    use crate::{
        command::{AddCartItem, Command as _},
        domain::{
            cart, order,
            product::{self, spec::money},
        },
        infra::{Database as _, Memory},
        query::{self, Query as _},
        Service,
    };

    use super::{CreateOrder, ExecutionError};

    #[tokio::test]
    async fn snapshots_cart() {
        let db = Memory::new();
        let svc = Service::in_memory(db.clone());
        let mut lamp = product::spec::product("Lamp", "40");
        lamp.sale = true;
        lamp.sale_percentage = Some("50".parse().unwrap());
        db.execute(Insert(lamp.clone())).await.unwrap();
        let cart_id = cart::Id::new();
        for _ in 0..2 {
            _ = svc
                .execute(AddCartItem {
                    cart_id,
                    product_id: lamp.id,
                })
                .await
                .unwrap();
        }

        let order = svc
            .execute(CreateOrder {
                cart_id,
                user_id: None,
                shipping_address: order::spec::shipping_address(),
            })
            .await
            .unwrap();

        assert_eq!(order.total, money("40"));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.status, order::Status::Pending);
        assert_eq!(order.payment_status, order::PaymentStatus::Pending);
        let stored = svc
            .execute(query::order::ById::by(order.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.items, order.items);
    }

    #[tokio::test]
    async fn rejects_empty_cart() {
        let svc = Service::in_memory(Memory::new());

        let err = svc
            .execute(CreateOrder {
                cart_id: cart::Id::new(),
                user_id: None,
                shipping_address: order::spec::shipping_address(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::CartEmpty(_)));
        let count = svc
            .execute(query::orders::TotalCount::by(()))
            .await
            .unwrap();
        assert_eq!(i64::from(count), 0);
    }
}
