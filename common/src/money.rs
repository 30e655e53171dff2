//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::Percent;

/// Non-negative amount of money in the store currency.
///
/// Always [`Display`]ed with exactly two fractional digits.
///
/// [`Display`]: fmt::Display
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Money(Decimal);

impl Money {
    /// Zero [`Money`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Money`] out of the provided `amount`, if it's not
    /// negative.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (amount >= Decimal::ZERO).then_some(Self(amount))
    }

    /// Returns the amount of this [`Money`].
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Applies the provided discount [`Percent`] to this [`Money`], rounding
    /// the result to cents (midpoint away from zero).
    #[must_use]
    pub fn discounted(self, discount: Percent) -> Self {
        let kept = Decimal::ONE - discount.fraction();
        Self(
            (self.0 * kept)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Adds the provided [`Money`], returning [`None`] on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Adds the provided [`Money`], stopping at the maximum.
    #[must_use]
    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    /// Multiplies this [`Money`] by the provided number of units, returning
    /// [`None`] on overflow.
    #[must_use]
    pub fn checked_mul(self, units: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(units)).map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| "invalid amount")?;
        Self::new(amount).ok_or("negative amount")
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use std::str::FromStr as _;

    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    use super::Money;

    impl Serialize for Money {
        fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
            ser.serialize_str(&self.0.to_string())
        }
    }

    impl<'de> Deserialize<'de> for Money {
        fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
            let s = String::deserialize(de)?;
            Money::from_str(&s).map_err(de::Error::custom)
        }
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};
    use rust_decimal::Decimal;

    /// Non-negative amount of money, formatted as a `{major}.{minor}` string.
    ///
    /// Accepts strings, integers and floats as input.
    #[graphql_scalar(with = Self, parse_token(String, i32, f64))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            let parsed = if let Some(s) = input.as_string_value() {
                Self::from_str(s)
            } else if let Some(i) = input.as_int_value() {
                Self::new(Decimal::from(i)).ok_or("negative amount")
            } else if let Some(f) = input.as_float_value() {
                Decimal::try_from(f)
                    .ok()
                    .and_then(Self::new)
                    .ok_or("invalid amount")
            } else {
                return Err(format!(
                    "Cannot parse `Money` input scalar from \
                     non-numeric value: {input}",
                ));
            };
            parsed.map_err(|e| format!("Cannot parse `Money` input scalar: {e}"))
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use crate::Percent;

    use super::Money;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(money("123.45").amount(), "123.45".parse().unwrap());
        assert_eq!(money("0").amount(), "0".parse().unwrap());

        assert!(Money::from_str("-0.01").is_err());
        assert!(Money::from_str("12,5").is_err());
        assert!(Money::from_str("USD").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(money("123.45").to_string(), "123.45");
        assert_eq!(money("123").to_string(), "123.00");
        assert_eq!(money("0.5").to_string(), "0.50");
    }

    #[test]
    fn sums_and_multiplies() {
        let total = [money("10.00"), money("0.99"), money("5")]
            .into_iter()
            .try_fold(Money::ZERO, Money::checked_add);
        assert_eq!(total, Some(money("15.99")));

        assert_eq!(money("2.50").checked_mul(3), Some(money("7.50")));
        assert_eq!(money("2.50").checked_mul(0), Some(Money::ZERO));
    }

    #[test]
    fn detects_overflow() {
        let huge = money("50000000000000000000000000000");

        assert_eq!(huge.checked_add(huge), None);
        assert_eq!(huge.checked_mul(2), None);
        assert_eq!(huge.checked_mul(1), Some(huge));
        assert!(huge.saturating_add(huge) > huge);
    }

    #[test]
    fn discounts_with_rounding() {
        let pct = |s: &str| Percent::from_str(s).unwrap();

        assert_eq!(money("100").discounted(pct("20")), money("80"));
        assert_eq!(money("19.99").discounted(pct("15")), money("16.99"));
        assert_eq!(money("0.05").discounted(pct("50")), money("0.03"));
        assert_eq!(money("10").discounted(pct("100")), Money::ZERO);
    }
}
