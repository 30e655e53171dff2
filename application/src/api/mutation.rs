//! GraphQL [`Mutation`]s definitions.

use common::{Money, Percent};
use juniper::graphql_object;
use service::{command, domain, Command as _};

use crate::{api, define_error, AsError, Context, Error, Session};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Registers a new `User` with the provided credentials.
    ///
    /// The created `User` always has the `USER` role.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMAIL_OCCUPIED` - provided `UserEmail` is occupied by another
    ///                      `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "signup",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn signup(
        name: api::user::Name,
        email: api::user::Email,
        password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        ctx.service()
            .execute(command::CreateUser {
                name: name.into(),
                email: email.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `UserSession` with the provided credentials.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_CREDENTIALS` - provided credentials does not match any `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "createUserSession",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_user_session(
        email: api::user::Email,
        password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let output = ctx
            .service()
            .execute(command::CreateUserSession {
                email: email.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session {
            user_id: output.user.id.into(),
            role: output.user.role,
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        })
        .await;

        Ok(output.into())
    }

    /// Adds a single unit of the specified `Product` to the `Cart`.
    ///
    /// Creates the `Cart` if it doesn't exist yet.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRODUCT_NOT_EXISTS` - the `Product` with the specified ID does not
    ///                          exist;
    /// - `CART_TOTAL_OVERFLOW` - the `Cart` total becomes too large.
    #[tracing::instrument(
        skip_all,
        fields(
            cart_id = %cart_id,
            gql.name = "addCartItem",
            otel.name = Self::SPAN_NAME,
            product_id = %product_id,
        ),
    )]
    pub async fn add_cart_item(
        cart_id: api::cart::Id,
        product_id: api::product::Id,
        ctx: &Context,
    ) -> Result<api::Cart, Error> {
        ctx.service()
            .execute(command::AddCartItem {
                cart_id: cart_id.into(),
                product_id: product_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Removes the specified `Product` from the `Cart`.
    ///
    /// Removing a `Product` absent in the `Cart` changes nothing.
    #[tracing::instrument(
        skip_all,
        fields(
            cart_id = %cart_id,
            gql.name = "removeCartItem",
            otel.name = Self::SPAN_NAME,
            product_id = %product_id,
        ),
    )]
    pub async fn remove_cart_item(
        cart_id: api::cart::Id,
        product_id: api::product::Id,
        ctx: &Context,
    ) -> Result<api::Cart, Error> {
        ctx.service()
            .execute(command::RemoveCartItem {
                cart_id: cart_id.into(),
                product_id: product_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Sets the quantity of the specified `Product` in the `Cart`.
    ///
    /// Zero or negative `quantity` removes the `Product` from the `Cart`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CART_TOTAL_OVERFLOW` - the `Cart` total becomes too large.
    #[tracing::instrument(
        skip_all,
        fields(
            cart_id = %cart_id,
            gql.name = "updateCartItemQuantity",
            otel.name = Self::SPAN_NAME,
            product_id = %product_id,
            quantity = quantity,
        ),
    )]
    pub async fn update_cart_item_quantity(
        cart_id: api::cart::Id,
        product_id: api::product::Id,
        quantity: i32,
        ctx: &Context,
    ) -> Result<api::Cart, Error> {
        ctx.service()
            .execute(command::UpdateCartItemQuantity {
                cart_id: cart_id.into(),
                product_id: product_id.into(),
                quantity,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Removes all the items from the `Cart`.
    #[tracing::instrument(
        skip_all,
        fields(
            cart_id = %cart_id,
            gql.name = "clearCart",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn clear_cart(
        cart_id: api::cart::Id,
        ctx: &Context,
    ) -> Result<api::Cart, Error> {
        ctx.service()
            .execute(command::ClearCart {
                cart_id: cart_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Places a new `Order` out of the `Cart` contents.
    ///
    /// The `Order` is linked to the current `User`, if authenticated.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CART_EMPTY` - the `Cart` has no items.
    #[tracing::instrument(
        skip_all,
        fields(
            cart_id = %cart_id,
            gql.name = "createOrder",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_order(
        cart_id: api::cart::Id,
        shipping_address: api::order::ShippingAddressInput,
        ctx: &Context,
    ) -> Result<api::Order, Error> {
        let user_id = ctx.try_current_session().await?.map(|s| s.user_id);

        ctx.service()
            .execute(command::CreateOrder {
                cart_id: cart_id.into(),
                user_id: user_id.map(Into::into),
                shipping_address: shipping_address.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Adds a new `Product` to the catalog.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authorized;
    /// - `NOT_ADMIN` - the current `User` is not an administrator;
    /// - `NO_PRODUCT_IMAGES` - no `images` are provided;
    /// - `INVALID_STOCK` - `stock` is negative.
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    #[tracing::instrument(
        skip_all,
        fields(
            category = %category,
            gql.name = "createProduct",
            name = %name,
            otel.name = Self::SPAN_NAME,
            price = %price,
        ),
    )]
    pub async fn create_product(
        name: api::product::Name,
        description: api::product::Description,
        price: Money,
        category: api::category::Name,
        images: Vec<api::scalar::Image>,
        stock: i32,
        sale: Option<bool>,
        sale_percentage: Option<Percent>,
        featured: Option<bool>,
        ctx: &Context,
    ) -> Result<api::Product, Error> {
        _ = ctx.admin_session().await?;
        let images = api::product::images(images).map_err(ctx.error())?;
        let stock = api::product::stock(stock).map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateProduct {
                name: name.into(),
                description: description.into(),
                price,
                category: category.into(),
                images,
                stock,
                sale: sale.unwrap_or_default(),
                sale_percentage,
                featured: featured.unwrap_or_default(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Applies the provided `ProductPatch` to the specified `Product`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authorized;
    /// - `NOT_ADMIN` - the current `User` is not an administrator;
    /// - `PRODUCT_NOT_EXISTS` - the `Product` with the specified ID does not
    ///                          exist;
    /// - `NO_PRODUCT_IMAGES` - an empty list of `images` is provided;
    /// - `INVALID_STOCK` - `stock` is negative.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateProduct",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_product(
        id: api::product::Id,
        patch: api::product::Patch,
        ctx: &Context,
    ) -> Result<api::Product, Error> {
        _ = ctx.admin_session().await?;
        let patch =
            domain::product::Patch::try_from(patch).map_err(ctx.error())?;

        ctx.service()
            .execute(command::UpdateProduct {
                id: id.into(),
                patch,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Removes the specified `Product` from the catalog.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authorized;
    /// - `NOT_ADMIN` - the current `User` is not an administrator;
    /// - `PRODUCT_NOT_EXISTS` - the `Product` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteProduct",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_product(
        id: api::product::Id,
        ctx: &Context,
    ) -> Result<bool, Error> {
        _ = ctx.admin_session().await?;

        ctx.service()
            .execute(command::DeleteProduct { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|_| true)
    }

    /// Creates a new `Category`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authorized;
    /// - `NOT_ADMIN` - the current `User` is not an administrator;
    /// - `CATEGORY_SLUG_OCCUPIED` - provided `CategorySlug` is occupied by
    ///                              another `Category`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createCategory",
            name = %name,
            otel.name = Self::SPAN_NAME,
            slug = %slug,
        ),
    )]
    pub async fn create_category(
        name: api::category::Name,
        slug: api::category::Slug,
        description: Option<api::category::Description>,
        image: Option<api::scalar::Image>,
        ctx: &Context,
    ) -> Result<api::Category, Error> {
        _ = ctx.admin_session().await?;

        ctx.service()
            .execute(command::CreateCategory {
                name: name.into(),
                slug: slug.into(),
                description: description.map(Into::into),
                image: image.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Moves the specified `Order` to the provided `OrderStatus`.
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
            gql.name = "updateOrderStatus",
            id = %id,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn update_order_status(
        id: api::order::Id,
        status: api::order::Status,
        ctx: &Context,
    ) -> Result<api::Order, Error> {
        _ = ctx.admin_session().await?;

        ctx.service()
            .execute(command::UpdateOrderStatus {
                id: id.into(),
                status: status.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EMAIL_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`UserEmail` is occupied by another `User`"]
                EmailOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(Error::EmailOccupied.into()),
            Self::PasswordHashError(_) => None,
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_CREDENTIALS"]
                #[status = UNAUTHORIZED]
                #[message = "Provided credentials does not match any `User`"]
                WrongCredentials,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) => None,
            Self::WrongCredentials => Some(Error::WrongCredentials.into()),
        }
    }
}

impl AsError for command::add_cart_item::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ProductNotExists(_) => {
                Some(api::product::ProductError::NotExists.into())
            }
            Self::TotalOverflow(_) => {
                Some(api::cart::CartError::TotalOverflow.into())
            }
        }
    }
}

impl AsError for command::remove_cart_item::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::TotalOverflow(_) => {
                Some(api::cart::CartError::TotalOverflow.into())
            }
        }
    }
}

impl AsError for command::update_cart_item_quantity::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::TotalOverflow(_) => {
                Some(api::cart::CartError::TotalOverflow.into())
            }
        }
    }
}

impl AsError for command::clear_cart::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::TotalOverflow(_) => {
                Some(api::cart::CartError::TotalOverflow.into())
            }
        }
    }
}

impl AsError for command::create_order::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CART_EMPTY"]
                #[status = BAD_REQUEST]
                #[message = "`Cart` has no items to order"]
                CartEmpty,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::CartEmpty(_) => Some(Error::CartEmpty.into()),
        }
    }
}

impl AsError for command::create_product::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::update_product::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ProductNotExists(_) => {
                Some(api::product::ProductError::NotExists.into())
            }
        }
    }
}

impl AsError for command::delete_product::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ProductNotExists(_) => {
                Some(api::product::ProductError::NotExists.into())
            }
        }
    }
}

impl AsError for command::create_category::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CATEGORY_SLUG_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`CategorySlug` is occupied by another \
                             `Category`"]
                SlugOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::SlugOccupied(_) => Some(Error::SlugOccupied.into()),
        }
    }
}

impl AsError for command::update_order_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::OrderNotExists(_) => {
                Some(api::order::OrderError::NotExists.into())
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use service::{command, domain};

    use crate::AsError as _;

    #[test]
    fn maps_business_errors_to_codes() {
        let email: domain::user::Email = "ann@example.com".parse().unwrap();
        let err = command::create_user::ExecutionError::EmailOccupied(email)
            .try_as_error()
            .unwrap();
        assert_eq!(err.code, "EMAIL_OCCUPIED");
        assert_eq!(err.status_code, http::StatusCode::CONFLICT);

        let err = command::create_user_session::ExecutionError::WrongCredentials
            .try_as_error()
            .unwrap();
        assert_eq!(err.code, "WRONG_CREDENTIALS");
        assert_eq!(err.status_code, http::StatusCode::UNAUTHORIZED);

        let err = command::create_order::ExecutionError::CartEmpty(
            domain::cart::Id::new(),
        )
        .try_as_error()
        .unwrap();
        assert_eq!(err.code, "CART_EMPTY");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn maps_cart_overflow_to_bad_request() {
        let overflow = domain::cart::TotalOverflow;

        let err = command::add_cart_item::ExecutionError::TotalOverflow(overflow)
            .try_as_error()
            .unwrap();
        assert_eq!(err.code, "CART_TOTAL_OVERFLOW");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);

        let err =
            command::update_cart_item_quantity::ExecutionError::TotalOverflow(
                overflow,
            )
            .try_as_error()
            .unwrap();
        assert_eq!(err.code, "CART_TOTAL_OVERFLOW");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn maps_missing_entities_to_not_found() {
        let err = command::delete_product::ExecutionError::ProductNotExists(
            domain::product::Id::new(),
        )
        .try_as_error()
        .unwrap();
        assert_eq!(err.code, "PRODUCT_NOT_EXISTS");
        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);

        let err = command::update_order_status::ExecutionError::OrderNotExists(
            domain::order::Id::new(),
        )
        .try_as_error()
        .unwrap();
        assert_eq!(err.code, "ORDER_NOT_EXISTS");
    }
}
