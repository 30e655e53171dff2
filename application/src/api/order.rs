//! [`Order`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLObject,
    GraphQLScalar,
};
use service::domain;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    define_error, Context,
};

/// An order placed at checkout.
#[derive(Clone, Debug, From)]
pub struct Order(domain::Order);

/// An order placed at checkout.
#[graphql_object(context = Context)]
impl Order {
    /// Unique identifier of this `Order`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Order.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `User` who placed this `Order`, if known.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Order.user",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn user(&self) -> Option<api::User> {
        self.0.user_id.map(|id| {
            #[expect(
                unsafe_code,
                reason = "`Order.user_id` is nulled once the `User` is \
                          deleted"
            )]
            unsafe {
                api::User::new_unchecked(id)
            }
        })
    }

    /// Items of the `Cart` at checkout.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Order.items",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn items(&self) -> Vec<api::cart::Item> {
        self.0.items.iter().cloned().map(Into::into).collect()
    }

    /// Total price of this `Order`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Order.total",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn total(&self) -> Money {
        self.0.total
    }

    /// Address this `Order` is shipped to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Order.shippingAddress",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn shipping_address(&self) -> ShippingAddress {
        self.0.shipping_address.clone().into()
    }

    /// Fulfillment status of this `Order`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Order.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Payment status of this `Order`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Order.paymentStatus",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn payment_status(&self) -> PaymentStatus {
        self.0.payment_status.into()
    }

    /// ID of the payment in the payment gateway, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Order.paymentId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn payment_id(&self) -> Option<String> {
        self.0.payment_id.as_ref().map(ToString::to_string)
    }

    /// `DateTime` when this `Order` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Order.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Order` was modified the last time.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Order.updatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn updated_at(&self) -> DateTime {
        self.0.updated_at.coerce()
    }
}

/// Unique identifier of an `Order`.
#[derive(Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[from(domain::order::Id)]
#[into(domain::order::Id)]
#[graphql(name = "OrderId", transparent)]
pub struct Id(Uuid);

/// Fulfillment status of an `Order`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "OrderStatus")]
pub enum Status {
    /// Placed and waiting for processing.
    Pending,

    /// Being prepared for shipping.
    Processing,

    /// Handed over to a carrier.
    Shipped,

    /// Received by the customer.
    Delivered,

    /// Cancelled.
    Cancelled,
}

impl From<domain::order::Status> for Status {
    fn from(status: domain::order::Status) -> Self {
        use domain::order::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Processing => Self::Processing,
            S::Shipped => Self::Shipped,
            S::Delivered => Self::Delivered,
            S::Cancelled => Self::Cancelled,
        }
    }
}

impl From<Status> for domain::order::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => Self::Pending,
            Status::Processing => Self::Processing,
            Status::Shipped => Self::Shipped,
            Status::Delivered => Self::Delivered,
            Status::Cancelled => Self::Cancelled,
        }
    }
}

/// Payment status of an `Order`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "OrderPaymentStatus")]
pub enum PaymentStatus {
    /// Waiting for payment.
    Pending,

    /// Paid.
    Paid,

    /// Payment failed.
    Failed,

    /// Payment returned to the customer.
    Refunded,
}

impl From<domain::order::PaymentStatus> for PaymentStatus {
    fn from(status: domain::order::PaymentStatus) -> Self {
        use domain::order::PaymentStatus as S;
        match status {
            S::Pending => Self::Pending,
            S::Paid => Self::Paid,
            S::Failed => Self::Failed,
            S::Refunded => Self::Refunded,
        }
    }
}

/// Address an `Order` is shipped to.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct ShippingAddress {
    /// Name of the recipient.
    pub name: api::user::Name,

    /// Contact email of the recipient.
    pub email: api::user::Email,

    /// Contact phone of the recipient.
    pub phone: Phone,

    /// Street address.
    pub address: Address,

    /// City of the address.
    pub city: City,

    /// State or region of the address.
    pub state: State,

    /// Postal code of the address.
    pub pincode: Pincode,
}

impl From<domain::order::ShippingAddress> for ShippingAddress {
    fn from(address: domain::order::ShippingAddress) -> Self {
        let domain::order::ShippingAddress {
            name,
            email,
            phone,
            address,
            city,
            state,
            pincode,
        } = address;
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            address: address.into(),
            city: city.into(),
            state: state.into(),
            pincode: pincode.into(),
        }
    }
}

/// Address an `Order` should be shipped to.
#[derive(Clone, Debug, GraphQLInputObject)]
pub struct ShippingAddressInput {
    /// Name of the recipient.
    pub name: api::user::Name,

    /// Contact email of the recipient.
    pub email: api::user::Email,

    /// Contact phone of the recipient.
    pub phone: Phone,

    /// Street address.
    pub address: Address,

    /// City of the address.
    pub city: City,

    /// State or region of the address.
    pub state: State,

    /// Postal code of the address.
    pub pincode: Pincode,
}

impl From<ShippingAddressInput> for domain::order::ShippingAddress {
    fn from(input: ShippingAddressInput) -> Self {
        let ShippingAddressInput {
            name,
            email,
            phone,
            address,
            city,
            state,
            pincode,
        } = input;
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            address: address.into(),
            city: city.into(),
            state: state.into(),
            pincode: pincode.into(),
        }
    }
}

/// Phone number of an `Order` recipient, at least 10 digits.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ShippingPhone",
    with = scalar::Via::<domain::order::Phone>,
)]
pub struct Phone(domain::order::Phone);

/// Street address of an `Order`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ShippingStreetAddress",
    with = scalar::Via::<domain::order::Address>,
)]
pub struct Address(domain::order::Address);

/// City of an `Order` address.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ShippingCity",
    with = scalar::Via::<domain::order::City>,
)]
pub struct City(domain::order::City);

/// State or region of an `Order` address.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ShippingState",
    with = scalar::Via::<domain::order::State>,
)]
pub struct State(domain::order::State);

/// Postal code of an `Order` address, at least 6 alphanumeric characters.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ShippingPincode",
    with = scalar::Via::<domain::order::Pincode>,
)]
pub struct Pincode(domain::order::Pincode);

define_error! {
    enum OrderError {
        #[code = "ORDER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Order` with the specified ID does not exist"]
        NotExists,
    }
}
