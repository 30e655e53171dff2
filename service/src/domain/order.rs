//! [`Order`] definitions.

use std::{str::FromStr, sync::LazyLock};

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use uuid::Uuid;

use crate::domain::{cart, user};

/// Order placed at checkout.
#[derive(Clone, Debug)]
pub struct Order {
    /// ID of this [`Order`].
    pub id: Id,

    /// ID of the [`User`] who placed this [`Order`], if known.
    ///
    /// [`User`]: crate::domain::User
    pub user_id: Option<user::Id>,

    /// Snapshot of the [`cart::Item`]s at checkout.
    pub items: Vec<cart::Item>,

    /// Total price of this [`Order`].
    pub total: Money,

    /// [`ShippingAddress`] of this [`Order`].
    pub shipping_address: ShippingAddress,

    /// [`Status`] of this [`Order`].
    pub status: Status,

    /// [`PaymentStatus`] of this [`Order`].
    pub payment_status: PaymentStatus,

    /// ID of the payment in the payment gateway, if any.
    pub payment_id: Option<PaymentId>,

    /// [`DateTime`] when this [`Order`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Order`] was modified the last time.
    pub updated_at: ModificationDateTime,
}

/// ID of an [`Order`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    derive_more::FromStr,
    Hash,
    Into,
    PartialEq,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Fulfillment status of an [`Order`]."]
    enum Status {
        #[doc = "Placed and waiting for processing."]
        Pending = 1,

        #[doc = "Being prepared for shipping."]
        Processing = 2,

        #[doc = "Handed over to a carrier."]
        Shipped = 3,

        #[doc = "Received by the customer."]
        Delivered = 4,

        #[doc = "Cancelled."]
        Cancelled = 5,
    }
}

define_kind! {
    #[doc = "Payment status of an [`Order`]."]
    enum PaymentStatus {
        #[doc = "Waiting for payment."]
        Pending = 1,

        #[doc = "Paid."]
        Paid = 2,

        #[doc = "Payment failed."]
        Failed = 3,

        #[doc = "Payment returned to the customer."]
        Refunded = 4,
    }
}

/// ID of a payment in the payment gateway.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct PaymentId(String);

impl PaymentId {
    /// Creates a new [`PaymentId`] if the given `id` is not blank.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        (!id.trim().is_empty() && id.len() <= 256).then_some(Self(id))
    }
}

/// Address an [`Order`] is shipped to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShippingAddress {
    /// Name of the recipient.
    pub name: user::Name,

    /// Contact email of the recipient.
    pub email: user::Email,

    /// Contact [`Phone`] of the recipient.
    pub phone: Phone,

    /// Street [`Address`].
    pub address: Address,

    /// [`City`] of the [`Address`].
    pub city: City,

    /// [`State`] of the [`Address`].
    pub state: State,

    /// Postal code of the [`Address`].
    pub pincode: Pincode,
}

/// Generates a non-blank text newtype of a [`ShippingAddress`].
macro_rules! define_address_line {
    ($(#[doc = $doc:literal])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
        #[as_ref(str, String)]
        #[cfg_attr(
            feature = "postgres",
            derive(FromSql, ToSql),
            postgres(transparent)
        )]
        pub struct $name(String);

        impl $name {
            #[doc = concat!(
                "Creates a new [`", stringify!($name), "`] if the given \
                 `line` is valid.",
            )]
            #[must_use]
            pub fn new(line: impl Into<String>) -> Option<Self> {
                let line = line.into();
                (line.trim() == line && !line.is_empty() && line.len() <= 512)
                    .then_some(Self(line))
            }
        }

        impl FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s).ok_or(concat!("invalid `", stringify!($name), "`"))
            }
        }
    };
}

define_address_line! {
    /// Street address of a [`ShippingAddress`].
    Address
}

define_address_line! {
    /// City of a [`ShippingAddress`].
    City
}

define_address_line! {
    /// State or region of a [`ShippingAddress`].
    State
}

/// Phone number of a [`ShippingAddress`] recipient.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`]: digits with
    /// optional leading `+` and separators, at least 10 digits in total.
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\+?[\d\s\-()]+$").expect("valid regex")
        });

        let number = number.as_ref();
        let digits = number.chars().filter(char::is_ascii_digit).count();
        (10..=15).contains(&digits) && REGEX.is_match(number)
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// Postal code of a [`ShippingAddress`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Pincode(String);

impl Pincode {
    /// Creates a new [`Pincode`] if the given `code` is at least 6
    /// alphanumeric characters.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        (code.len() >= 6
            && code.len() <= 16
            && code.chars().all(|c| c.is_ascii_alphanumeric()))
        .then_some(Self(code))
    }
}

impl FromStr for Pincode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Pincode`")
    }
}

/// [`DateTime`] when an [`Order`] was created.
pub type CreationDateTime = DateTimeOf<(Order, unit::Creation)>;

/// [`DateTime`] when an [`Order`] was modified the last time.
pub type ModificationDateTime = DateTimeOf<(Order, unit::Modification)>;

#[cfg(test)]
pub(crate) mod spec {
    use common::DateTime;

    use crate::domain::{product::spec::money, user};

    use super::{
        Address, City, Id, Order, PaymentStatus, Phone, Pincode,
        ShippingAddress, State, Status,
    };

    pub(crate) fn shipping_address() -> ShippingAddress {
        ShippingAddress {
            name: user::Name::new("Jane Doe").unwrap(),
            email: user::Email::new("jane@example.com").unwrap(),
            phone: Phone::new("+1 555 123 4567").unwrap(),
            address: Address::new("221B Baker Street").unwrap(),
            city: City::new("London").unwrap(),
            state: State::new("Greater London").unwrap(),
            pincode: Pincode::new("NW16XE").unwrap(),
        }
    }

    pub(crate) fn order(total: &str, payment_status: PaymentStatus) -> Order {
        let now = DateTime::now();
        Order {
            id: Id::new(),
            user_id: None,
            items: vec![],
            total: money(total),
            shipping_address: shipping_address(),
            status: Status::Pending,
            payment_status,
            payment_id: None,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        }
    }

    #[test]
    fn phone_needs_10_digits() {
        assert!(Phone::new("+1 (555) 123-4567").is_some());
        assert!(Phone::new("9876543210").is_some());

        assert!(Phone::new("12345").is_none());
        assert!(Phone::new("call me 9876543210").is_none());
    }

    #[test]
    fn pincode_is_alphanumeric() {
        assert!(Pincode::new("560001").is_some());
        assert!(Pincode::new("SW1A1AA").is_some());

        assert!(Pincode::new("5600").is_none());
        assert!(Pincode::new("560 001").is_none());
    }

    #[test]
    fn address_lines_are_trimmed_and_non_empty() {
        assert!(Address::new("221B Baker Street").is_some());
        assert!(Address::new(" 221B").is_none());
        assert!(Address::new("").is_none());
    }

    #[test]
    fn status_names() {
        assert_eq!(Status::Shipped.to_string(), "shipped");
        assert_eq!("cancelled".parse::<Status>().unwrap(), Status::Cancelled);
    }
}
