//! [`Cart`] definitions.
//!
//! A [`Cart`] is an immutable snapshot: every operation returns a new
//! [`Cart`] with its total recomputed from scratch.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money};
use derive_more::{Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{product, Image};

/// Shopping cart stored under its [`Id`].
#[derive(Clone, Debug)]
pub struct Cart {
    /// ID of this [`Cart`].
    pub id: Id,

    /// [`Item`]s of this [`Cart`] in the order they were added.
    items: Vec<Item>,

    /// Total price of all the [`Item`]s.
    total: Money,

    /// [`DateTime`] when this [`Cart`] was modified the last time.
    pub updated_at: ModificationDateTime,
}

impl Cart {
    /// Creates a new empty [`Cart`].
    #[must_use]
    pub fn empty(id: Id) -> Self {
        Self {
            id,
            items: vec![],
            total: Money::ZERO,
            updated_at: ModificationDateTime::UNIX_EPOCH,
        }
    }

    /// Restores a [`Cart`] from its stored [`Item`]s.
    ///
    /// Items repeating an already seen [`product::Id`] are merged into it.
    ///
    /// # Errors
    ///
    /// If the total of the [`Item`]s overflows [`Money`].
    pub fn restore(
        id: Id,
        items: impl IntoIterator<Item = Item>,
        updated_at: ModificationDateTime,
    ) -> Result<Self, TotalOverflow> {
        let mut merged: Vec<Item> = vec![];
        for item in items {
            if let Some(existing) =
                merged.iter_mut().find(|i| i.product_id == item.product_id)
            {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            } else {
                merged.push(item);
            }
        }
        Ok(Self {
            updated_at,
            ..Self::empty(id).with_items(merged)?
        })
    }

    /// Returns the [`Item`]s of this [`Cart`].
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Returns the total price of this [`Cart`].
    #[must_use]
    pub fn total(&self) -> Money {
        self.total
    }

    /// Returns the number of product units in this [`Cart`].
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity.get())).sum()
    }

    /// Indicates whether this [`Cart`] has no [`Item`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds a single unit of the provided [`NewItem`].
    ///
    /// If the product is already in this [`Cart`], its quantity is
    /// incremented by one and its snapshot is kept as is.
    ///
    /// # Errors
    ///
    /// If the new total overflows [`Money`].
    pub fn add_item(&self, item: NewItem) -> Result<Self, TotalOverflow> {
        let mut items = self.items.clone();
        if let Some(existing) =
            items.iter_mut().find(|i| i.product_id == item.product_id)
        {
            existing.quantity = existing.quantity.saturating_add(Quantity::ONE);
        } else {
            items.push(item.with_quantity(Quantity::ONE));
        }
        self.with_items(items)
    }

    /// Removes the product with the provided [`product::Id`], if any.
    ///
    /// # Errors
    ///
    /// If the new total overflows [`Money`].
    pub fn remove_item(
        &self,
        product_id: product::Id,
    ) -> Result<Self, TotalOverflow> {
        self.with_items(
            self.items
                .iter()
                .filter(|i| i.product_id != product_id)
                .cloned()
                .collect(),
        )
    }

    /// Sets the quantity of the product with the provided [`product::Id`].
    ///
    /// Non-positive `quantity` removes the product.
    ///
    /// # Errors
    ///
    /// If the new total overflows [`Money`].
    pub fn update_quantity(
        &self,
        product_id: product::Id,
        quantity: i32,
    ) -> Result<Self, TotalOverflow> {
        let Some(quantity) = Quantity::new(quantity) else {
            return self.remove_item(product_id);
        };
        self.with_items(
            self.items
                .iter()
                .cloned()
                .map(|mut i| {
                    if i.product_id == product_id {
                        i.quantity = quantity;
                    }
                    i
                })
                .collect(),
        )
    }

    /// Removes all the [`Item`]s.
    #[must_use]
    pub fn clear(&self) -> Self {
        Self {
            updated_at: self.updated_at,
            ..Self::empty(self.id)
        }
    }

    /// Returns a copy of this [`Cart`] with the provided [`Item`]s and the
    /// recomputed total.
    fn with_items(&self, items: Vec<Item>) -> Result<Self, TotalOverflow> {
        let total = items
            .iter()
            .try_fold(Money::ZERO, |total, i| total.checked_add(i.subtotal()?))
            .ok_or(TotalOverflow)?;
        Ok(Self {
            id: self.id,
            items,
            total,
            updated_at: self.updated_at,
        })
    }
}

/// Product line of a [`Cart`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// ID of the [`Product`] this [`Item`] is about.
    ///
    /// [`Product`]: crate::domain::Product
    pub product_id: product::Id,

    /// Name of the [`Product`] at the moment of adding.
    ///
    /// [`Product`]: crate::domain::Product
    pub name: product::Name,

    /// Regular price of the [`Product`] at the moment of adding.
    ///
    /// [`Product`]: crate::domain::Product
    pub price: Money,

    /// Discounted price of the [`Product`] at the moment of adding, if any.
    ///
    /// [`Product`]: crate::domain::Product
    pub sale_price: Option<Money>,

    /// Main [`Image`] of the [`Product`].
    ///
    /// [`Product`]: crate::domain::Product
    pub image: Image,

    /// Number of [`Product`] units.
    ///
    /// [`Product`]: crate::domain::Product
    pub quantity: Quantity,
}

impl Item {
    /// Returns the price of a single unit of this [`Item`].
    #[must_use]
    pub fn effective_price(&self) -> Money {
        self.sale_price.unwrap_or(self.price)
    }

    /// Returns the price of all the units of this [`Item`], or [`None`] if
    /// it overflows [`Money`].
    #[must_use]
    pub fn subtotal(&self) -> Option<Money> {
        self.effective_price().checked_mul(self.quantity.get())
    }
}

/// Error of a [`Cart`] total not fitting into [`Money`].
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
#[display("`Cart` total overflows `Money`")]
pub struct TotalOverflow;

/// [`Item`] without a quantity, added to a [`Cart`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewItem {
    /// ID of the [`Product`].
    ///
    /// [`Product`]: crate::domain::Product
    pub product_id: product::Id,

    /// Name of the [`Product`].
    ///
    /// [`Product`]: crate::domain::Product
    pub name: product::Name,

    /// Regular price of the [`Product`].
    ///
    /// [`Product`]: crate::domain::Product
    pub price: Money,

    /// Discounted price of the [`Product`], if any.
    ///
    /// [`Product`]: crate::domain::Product
    pub sale_price: Option<Money>,

    /// Main [`Image`] of the [`Product`].
    ///
    /// [`Product`]: crate::domain::Product
    pub image: Image,
}

impl NewItem {
    /// Turns this [`NewItem`] into an [`Item`] with the provided quantity.
    #[must_use]
    pub fn with_quantity(self, quantity: Quantity) -> Item {
        let Self {
            product_id,
            name,
            price,
            sale_price,
            image,
        } = self;
        Item {
            product_id,
            name,
            price,
            sale_price,
            image,
            quantity,
        }
    }
}

/// Positive number of [`Product`] units in an [`Item`].
///
/// [`Product`]: crate::domain::Product
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Ord, PartialEq, PartialOrd,
    Serialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// Single unit.
    pub const ONE: Self = Self(1);

    /// Creates a new [`Quantity`] if the provided `value` is positive.
    #[must_use]
    pub fn new<T: TryInto<u32>>(value: T) -> Option<Self> {
        value.try_into().ok().filter(|v| *v > 0).map(Self)
    }

    /// Returns the number of units.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Adds the provided [`Quantity`], stopping at the maximum.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl TryFrom<u32> for Quantity {
    type Error = &'static str;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("`Quantity` must be positive")
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

/// ID of a [`Cart`], chosen by the client.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
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

/// [`DateTime`] when a [`Cart`] was modified the last time.
pub type ModificationDateTime = DateTimeOf<(Cart, unit::Modification)>;

#[cfg(test)]
mod spec {
    use common::Money;

    use crate::domain::{
        product::{self, spec::money},
        Image,
    };

    use super::{
        Cart, Id, Item, ModificationDateTime, NewItem, Quantity, TotalOverflow,
    };

    fn item(id: product::Id, price: &str, sale: Option<&str>) -> NewItem {
        NewItem {
            product_id: id,
            name: product::Name::new(format!("product {id}")).unwrap(),
            price: money(price),
            sale_price: sale.map(money),
            image: Image::new("https://cdn.test/p.png").unwrap(),
        }
    }

    fn recomputed(cart: &Cart) -> Money {
        cart.items()
            .iter()
            .map(|i| i.effective_price().checked_mul(i.quantity.get()).unwrap())
            .fold(Money::ZERO, |a, b| a.checked_add(b).unwrap())
    }

    #[test]
    fn worked_example() {
        let a = product::Id::new();
        let cart = Cart::empty(Id::new());

        let cart = cart.add_item(item(a, "10", None)).unwrap();
        assert_eq!(cart.total(), money("10"));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, Quantity::ONE);

        let cart = cart.add_item(item(a, "10", None)).unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity.get(), 2);
        assert_eq!(cart.total(), money("20"));

        let cart = cart.update_quantity(a, 5).unwrap();
        assert_eq!(cart.total(), money("50"));

        let cart = cart.remove_item(a).unwrap();
        assert!(cart.items().is_empty());
        assert_eq!(cart.total(), Money::ZERO);
    }

    #[test]
    fn uses_sale_price_when_present() {
        let cart = Cart::empty(Id::new())
            .add_item(item(product::Id::new(), "100", Some("80")))
            .and_then(|c| c.add_item(item(product::Id::new(), "5.50", None)))
            .unwrap();

        assert_eq!(cart.total(), money("85.50"));
    }

    #[test]
    fn zero_or_negative_quantity_removes() {
        let (a, b) = (product::Id::new(), product::Id::new());
        let cart = Cart::empty(Id::new())
            .add_item(item(a, "3", None))
            .and_then(|c| c.add_item(item(b, "4", None)))
            .unwrap();

        for q in [0, -1, i32::MIN] {
            let updated = cart.update_quantity(a, q).unwrap();
            let removed = cart.remove_item(a).unwrap();
            assert_eq!(updated.items(), removed.items());
            assert_eq!(updated.total(), removed.total());
            assert_eq!(updated.total(), money("4"));
        }
    }

    #[test]
    fn absent_product_is_noop() {
        let a = product::Id::new();
        let cart = Cart::empty(Id::new()).add_item(item(a, "3", None)).unwrap();

        let other = product::Id::new();
        assert_eq!(cart.remove_item(other).unwrap().items(), cart.items());
        assert_eq!(
            cart.update_quantity(other, 7).unwrap().items(),
            cart.items(),
        );
    }

    #[test]
    fn clear_empties() {
        let cart = Cart::empty(Id::new())
            .add_item(item(product::Id::new(), "3", None))
            .and_then(|c| c.add_item(item(product::Id::new(), "9.99", Some("1"))))
            .unwrap();

        let cleared = cart.clear();
        assert!(cleared.is_empty());
        assert_eq!(cleared.total(), Money::ZERO);
        assert_eq!(cleared.item_count(), 0);
        assert_eq!(cleared.id, cart.id);
    }

    #[test]
    fn keeps_first_snapshot_on_repeated_add() {
        let a = product::Id::new();
        let cart = Cart::empty(Id::new())
            .add_item(item(a, "10", None))
            .and_then(|c| c.add_item(item(a, "12", Some("11"))))
            .unwrap();

        assert_eq!(cart.items()[0].price, money("10"));
        assert_eq!(cart.items()[0].sale_price, None);
        assert_eq!(cart.total(), money("20"));
    }

    #[test]
    fn counts_units() {
        let (a, b) = (product::Id::new(), product::Id::new());
        let cart = Cart::empty(Id::new())
            .add_item(item(a, "1", None))
            .and_then(|c| c.add_item(item(a, "1", None)))
            .and_then(|c| c.add_item(item(b, "1", None)))
            .and_then(|c| c.update_quantity(b, 4))
            .unwrap();

        assert_eq!(cart.item_count(), 6);
    }

    #[test]
    fn total_never_drifts() {
        let ids = [product::Id::new(), product::Id::new(), product::Id::new()];
        let prices = [("19.99", None), ("5", Some("4.25")), ("0.10", None)];

        // Deterministic pseudo-random sequence of mutations.
        let mut seed = 0x2545_f491_u32;
        let mut next = |n: u32| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            seed % n
        };

        let mut cart = Cart::empty(Id::new());
        for _ in 0..500 {
            let idx = next(3) as usize;
            let (price, sale) = prices[idx];
            cart = match next(4) {
                0 | 1 => cart.add_item(item(ids[idx], price, sale)),
                2 => cart.remove_item(ids[idx]),
                _ => cart.update_quantity(ids[idx], next(7) as i32 - 2),
            }
            .unwrap();

            assert_eq!(cart.total(), recomputed(&cart));
            let mut seen = cart.items().iter().map(|i| i.product_id).collect::<Vec<_>>();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), cart.items().len(), "one entry per product");
            assert!(cart.items().iter().all(|i| i.quantity.get() >= 1));
        }
    }

    #[test]
    fn restore_merges_duplicates() {
        let a = product::Id::new();
        let line = |q| item(a, "2", None).with_quantity(Quantity::new(q).unwrap());

        let cart = Cart::restore(
            Id::new(),
            [line(1), line(3)],
            ModificationDateTime::UNIX_EPOCH,
        )
        .unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity.get(), 4);
        assert_eq!(cart.total(), money("8"));
    }

    #[test]
    fn rejects_overflowing_total() {
        let (a, b) = (product::Id::new(), product::Id::new());
        let cart = Cart::empty(Id::new())
            .add_item(item(a, "100000000000000000000", None))
            .and_then(|c| c.add_item(item(b, "1", None)))
            .unwrap();

        assert_eq!(cart.update_quantity(a, i32::MAX).unwrap_err(), TotalOverflow);
        assert_eq!(cart.total(), money("100000000000000000001"));

        let huge = "50000000000000000000000000000";
        let cart = Cart::empty(Id::new())
            .add_item(item(a, huge, None))
            .unwrap();
        assert_eq!(cart.add_item(item(b, huge, None)).unwrap_err(), TotalOverflow);
        assert_eq!(cart.add_item(item(a, huge, None)).unwrap_err(), TotalOverflow);

        let line = |id| item(id, huge, None).with_quantity(Quantity::ONE);
        assert!(Cart::restore(
            Id::new(),
            [line(a), line(b)],
            ModificationDateTime::UNIX_EPOCH,
        )
        .is_err());
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(Quantity::new(0).is_none());
        assert!(Quantity::new(-3).is_none());
        assert_eq!(Quantity::new(2_u32).map(Quantity::get), Some(2));

        assert!(serde_json::from_str::<Item>(
            r#"{"productId":"5f0c6a9e-4a33-4b59-8f3c-6d6a2f7d9b11",
                "name":"lamp","price":"1.00","salePrice":null,
                "image":"https://cdn.test/p.png","quantity":0}"#,
        )
        .is_err());
    }
}
