//! GraphQL [`Query`]s definitions.

use common::pagination;
use juniper::graphql_object;
use service::{domain, query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Fetches the page of `Product`s.
    ///
    /// `limit` defaults to 20 and `skip` defaults to 0. A `minPrice` exceeding
    /// `maxPrice` matches no `Product`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_PAGINATION` - `limit` or `skip` is negative;
    /// - `INVALID_CATEGORY` - the provided `category` is not a valid
    ///                        `Category` name.
    #[tracing::instrument(
        skip_all,
        fields(
            filter = ?filter,
            gql.name = "products",
            limit = ?limit,
            otel.name = Self::SPAN_NAME,
            skip = ?skip,
            sort = ?sort,
        ),
    )]
    pub async fn products(
        filter: Option<api::product::list::Filter>,
        sort: Option<api::product::list::Sort>,
        limit: Option<i32>,
        skip: Option<i32>,
        ctx: &Context,
    ) -> Result<api::product::list::Connection, Error> {
        let arguments = pagination::Arguments::new(limit, skip)
            .ok_or_else(|| api::PaginationError::Invalid.into())
            .map_err(ctx.error())?;
        let filter = read::product::list::Filter::try_from(
            filter.unwrap_or_default(),
        )
        .map_err(ctx.error())?;

        ctx.service()
            .execute(query::products::List::by(read::product::list::Selector {
                arguments,
                filter: filter.clone(),
                order: sort.unwrap_or_default().into(),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|products| {
                api::product::list::Connection::new(products, filter)
            })
    }

    /// Returns the `Product` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRODUCT_NOT_EXISTS` - the `Product` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "product",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn product(
        id: api::product::Id,
        ctx: &Context,
    ) -> Result<api::Product, Error> {
        ctx.service()
            .execute(query::product::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::product::ProductError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists all the `Category`s ordered by their names.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "categories",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn categories(
        ctx: &Context,
    ) -> Result<Vec<api::Category>, Error> {
        ctx.service()
            .execute(query::categories::List::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|cs| cs.into_iter().map(Into::into).collect())
    }

    /// Returns the `Cart` with the specified ID.
    ///
    /// A `Cart` that was never modified is returned empty.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "cart",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cart(
        id: api::cart::Id,
        ctx: &Context,
    ) -> Result<api::Cart, Error> {
        let id = domain::cart::Id::from(id);
        ctx.service()
            .execute(query::cart::ById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|c| c.unwrap_or_else(|| domain::Cart::empty(id)).into())
    }

    /// Lists all the `Order`s, newest first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authorized;
    /// - `NOT_ADMIN` - the current `User` is not an administrator.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "orders",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn orders(ctx: &Context) -> Result<Vec<api::Order>, Error> {
        _ = ctx.admin_session().await?;

        ctx.service()
            .execute(query::orders::List::by(read::order::list::Selector {
                limit: None,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|os| os.into_iter().map(Into::into).collect())
    }

    /// Returns the `Order` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authorized;
    /// - `NOT_ADMIN` - the current `User` is not an administrator;
    /// - `ORDER_NOT_EXISTS` - the `Order` with the specified ID does not
    ///                        exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "order",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn order(
        id: api::order::Id,
        ctx: &Context,
    ) -> Result<api::Order, Error> {
        _ = ctx.admin_session().await?;

        ctx.service()
            .execute(query::order::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::order::OrderError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists all the registered `User`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authorized;
    /// - `NOT_ADMIN` - the current `User` is not an administrator.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "users",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn users(ctx: &Context) -> Result<Vec<api::User>, Error> {
        _ = ctx.admin_session().await?;

        ctx.service()
            .execute(query::users::List::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|us| us.into_iter().map(Into::into).collect())
    }

    /// Returns the currently authenticated `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authorized;
    /// - `USER_NOT_EXISTS` - the authenticated `User` was deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myUser",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_user(ctx: &Context) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::user::ById::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Builds the administrative overview of the store.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authorized;
    /// - `NOT_ADMIN` - the current `User` is not an administrator.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "dashboard",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn dashboard(
        ctx: &Context,
    ) -> Result<api::report::Dashboard, Error> {
        _ = ctx.admin_session().await?;

        ctx.service()
            .execute(query::report::Dashboard)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the specified ID does not exist"]
        NotExists,
    }
}
