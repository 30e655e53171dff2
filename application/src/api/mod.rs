//! GraphQL API definitions.

pub mod cart;
pub mod category;
mod mutation;
pub mod order;
pub mod product;
mod query;
pub mod report;
pub mod scalar;
pub mod user;

use juniper::EmptySubscription;

use crate::{define_error, Context};

pub use self::{
    cart::Cart, category::Category, mutation::Mutation, order::Order,
    product::Product, query::Query, user::User,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

/// Creates a new [`Schema`].
#[must_use]
pub fn schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}

define_error! {
    enum PaginationError {
        #[code = "INVALID_PAGINATION"]
        #[status = BAD_REQUEST]
        #[message = "`limit` and `skip` must be non-negative"]
        Invalid,
    }
}
