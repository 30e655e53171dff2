//! [`Command`] for modifying a [`Cart`] atomically.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{cart, product, Cart},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] applying an [`Operation`] to the stored state of a [`Cart`].
///
/// The [`Cart`] is locked for the whole read-modify-write cycle, so
/// concurrent modifications of the same [`Cart`] are serialized. A missing
/// [`Cart`] is treated as an empty one.
#[derive(Clone, Debug)]
pub struct ModifyCart {
    /// ID of the [`Cart`] to modify.
    pub cart_id: cart::Id,

    /// [`Operation`] to apply.
    pub op: Operation,
}

/// Modification of a [`Cart`].
#[derive(Clone, Debug)]
pub enum Operation {
    /// [`Cart::add_item()`].
    Add(cart::NewItem),

    /// [`Cart::remove_item()`].
    Remove(product::Id),

    /// [`Cart::update_quantity()`].
    UpdateQuantity(product::Id, i32),

    /// [`Cart::clear()`].
    Clear,
}

impl Operation {
    /// Applies this [`Operation`] to the provided [`Cart`] snapshot.
    ///
    /// # Errors
    ///
    /// If the resulting [`Cart`] total overflows.
    pub fn apply(self, cart: &Cart) -> Result<Cart, cart::TotalOverflow> {
        match self {
            Self::Add(item) => cart.add_item(item),
            Self::Remove(id) => cart.remove_item(id),
            Self::UpdateQuantity(id, qty) => cart.update_quantity(id, qty),
            Self::Clear => Ok(cart.clear()),
        }
    }
}

impl<Db> Command<ModifyCart> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Lock<By<Cart, cart::Id>>, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Cart>, cart::Id>>,
            Ok = Option<Cart>,
            Err = Traced<database::Error>,
        > + Database<Update<Cart>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Cart;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ModifyCart,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ModifyCart { cart_id, op } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Lock(By::<Cart, _>::new(cart_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let current = tx
            .execute(Select(By::new(cart_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .unwrap_or_else(|| Cart::empty(cart_id));
        let mut cart = op
            .apply(&current)
            .map_err(E::TotalOverflow)
            .map_err(tracerr::wrap!())?;
        cart.updated_at = DateTime::now().coerce();

        tx.execute(Update(cart.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(cart)
    }
}

/// Error of [`ModifyCart`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Cart`] total doesn't fit into [`Money`].
    ///
    /// [`Money`]: common::Money
    #[display("Failed to modify `Cart`: {_0}")]
    TotalOverflow(cart::TotalOverflow),
}

#[cfg(test)]
mod spec {
    use common::{operations::Insert, Money};

    use crate::{
        command::{
            AddCartItem, ClearCart, Command as _, RemoveCartItem,
            UpdateCartItemQuantity,
        },
        domain::{
            cart,
            product::{self, spec::money},
            Product,
        },
        infra::{Database as _, Memory},
        query::{self, Query as _},
        Service,
    };

    async fn stored(db: &Memory, name: &str, price: &str) -> Product {
        let product = product::spec::product(name, price);
        db.execute(Insert(product.clone())).await.unwrap();
        product
    }

    #[tokio::test]
    async fn follows_worked_example() {
        let db = Memory::new();
        let svc = Service::in_memory(db.clone());
        let a = stored(&db, "A", "10").await;
        let cart_id = cart::Id::new();
        let add = AddCartItem {
            cart_id,
            product_id: a.id,
        };

        let cart = svc.execute(add).await.unwrap();
        assert_eq!(cart.total(), money("10"));

        let cart = svc.execute(add).await.unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity.get(), 2);
        assert_eq!(cart.total(), money("20"));

        let cart = svc
            .execute(UpdateCartItemQuantity {
                cart_id,
                product_id: a.id,
                quantity: 5,
            })
            .await
            .unwrap();
        assert_eq!(cart.total(), money("50"));

        let cart = svc
            .execute(RemoveCartItem {
                cart_id,
                product_id: a.id,
            })
            .await
            .unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::ZERO);
    }

    #[tokio::test]
    async fn persists_state_under_cart_key() {
        let db = Memory::new();
        let svc = Service::in_memory(db.clone());
        let a = stored(&db, "A", "10").await;
        let b = stored(&db, "B", "2.50").await;
        let (cart_id, other_id) = (cart::Id::new(), cart::Id::new());

        for product_id in [a.id, b.id, b.id] {
            _ = svc
                .execute(AddCartItem {
                    cart_id,
                    product_id,
                })
                .await
                .unwrap();
        }

        let cart = svc
            .execute(query::cart::ById::by(cart_id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total(), money("15"));
        assert!(svc
            .execute(query::cart::ById::by(other_id))
            .await
            .unwrap()
            .is_none());

        let cart = svc.execute(ClearCart { cart_id }).await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::ZERO);
    }

    #[tokio::test]
    async fn zero_quantity_removes() {
        let db = Memory::new();
        let svc = Service::in_memory(db.clone());
        let a = stored(&db, "A", "10").await;
        let cart_id = cart::Id::new();
        _ = svc
            .execute(AddCartItem {
                cart_id,
                product_id: a.id,
            })
            .await
            .unwrap();

        let cart = svc
            .execute(UpdateCartItemQuantity {
                cart_id,
                product_id: a.id,
                quantity: 0,
            })
            .await
            .unwrap();

        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn keeps_cart_on_total_overflow() {
        let db = Memory::new();
        let svc = Service::in_memory(db.clone());
        let a = stored(&db, "A", "100000000000000000000").await;
        let cart_id = cart::Id::new();
        _ = svc
            .execute(AddCartItem {
                cart_id,
                product_id: a.id,
            })
            .await
            .unwrap();

        let err = svc
            .execute(UpdateCartItemQuantity {
                cart_id,
                product_id: a.id,
                quantity: i32::MAX,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            crate::command::update_cart_item_quantity::ExecutionError::TotalOverflow(_),
        ));
        let cart = svc
            .execute(query::cart::ById::by(cart_id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cart.items()[0].quantity.get(), 1);
        assert_eq!(cart.total(), money("100000000000000000000"));
    }

    #[tokio::test]
    async fn rejects_unknown_product() {
        let svc = Service::in_memory(Memory::new());
        let cart_id = cart::Id::new();

        let err = svc
            .execute(AddCartItem {
                cart_id,
                product_id: product::Id::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            crate::command::add_cart_item::ExecutionError::ProductNotExists(_),
        ));
        assert!(svc
            .execute(query::cart::ById::by(cart_id))
            .await
            .unwrap()
            .is_none());
    }
}
