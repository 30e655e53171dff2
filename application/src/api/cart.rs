//! [`Cart`]-related definitions.

use common::Money;
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLObject, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    define_error, Context,
};

/// A shopping cart.
///
/// A `Cart` that was never modified is empty.
#[derive(Clone, Debug, From)]
pub struct Cart(domain::Cart);

/// A shopping cart.
#[graphql_object(context = Context)]
impl Cart {
    /// Unique identifier of this `Cart`, chosen by the client.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Cart.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Line items of this `Cart`, in the order of adding.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Cart.items",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn items(&self) -> Vec<Item> {
        self.0.items().iter().cloned().map(Into::into).collect()
    }

    /// Total price of all the items in this `Cart`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Cart.total",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn total(&self) -> Money {
        self.0.total()
    }

    /// Number of `Product` units in this `Cart`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Cart.itemCount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn item_count(&self) -> i32 {
        i32::try_from(self.0.item_count()).unwrap_or(i32::MAX)
    }
}

/// Unique identifier of a `Cart`.
#[derive(Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[from(domain::cart::Id)]
#[into(domain::cart::Id)]
#[graphql(name = "CartId", transparent)]
pub struct Id(Uuid);

/// Line item of a `Cart`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "CartItem", context = Context)]
pub struct Item {
    /// ID of the `Product`.
    pub product_id: api::product::Id,

    /// Name of the `Product` at the moment of adding.
    pub name: api::product::Name,

    /// Regular price of the `Product` at the moment of adding.
    pub price: Money,

    /// Discounted price of the `Product` at the moment of adding.
    pub sale_price: Option<Money>,

    /// Main image of the `Product`.
    pub image: scalar::Image,

    /// Number of `Product` units.
    pub quantity: i32,

    /// Price of all the units of this item.
    ///
    /// `null` if it's too large to be represented.
    pub subtotal: Option<Money>,
}

impl From<domain::cart::Item> for Item {
    fn from(item: domain::cart::Item) -> Self {
        let subtotal = item.subtotal();
        let domain::cart::Item {
            product_id,
            name,
            price,
            sale_price,
            image,
            quantity,
        } = item;
        Self {
            product_id: product_id.into(),
            name: name.into(),
            price,
            sale_price,
            image: image.into(),
            quantity: i32::try_from(quantity.get()).unwrap_or(i32::MAX),
            subtotal,
        }
    }
}

define_error! {
    enum CartError {
        #[code = "CART_TOTAL_OVERFLOW"]
        #[status = BAD_REQUEST]
        #[message = "`Cart` total is too large"]
        TotalOverflow,
    }
}
