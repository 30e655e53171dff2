//! [`Product`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money, Percent};
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{cart, category, Image};

/// Product sold in the store.
#[derive(Clone, Debug)]
pub struct Product {
    /// ID of this [`Product`].
    pub id: Id,

    /// [`Name`] of this [`Product`].
    pub name: Name,

    /// [`Description`] of this [`Product`].
    pub description: Description,

    /// Regular price of this [`Product`].
    pub price: Money,

    /// Name of the [`Category`] this [`Product`] belongs to.
    ///
    /// [`Category`]: crate::domain::Category
    pub category: category::Name,

    /// [`Images`] of this [`Product`].
    pub images: Images,

    /// Number of items of this [`Product`] in stock.
    pub stock: Stock,

    /// Indicator whether this [`Product`] is on sale.
    pub sale: bool,

    /// Discount applied while this [`Product`] is on sale.
    pub sale_percentage: Option<Percent>,

    /// Indicator whether this [`Product`] is featured on the storefront.
    pub featured: bool,

    /// [`DateTime`] when this [`Product`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Product`] was modified the last time.
    pub updated_at: ModificationDateTime,
}

impl Product {
    /// Returns the discounted price of this [`Product`], if it's on sale with
    /// a non-zero discount.
    #[must_use]
    pub fn sale_price(&self) -> Option<Money> {
        if !self.sale {
            return None;
        }
        self.sale_percentage
            .filter(|pct| !pct.is_zero())
            .map(|pct| self.price.discounted(pct))
    }

    /// Returns the price this [`Product`] is actually sold for.
    #[must_use]
    pub fn effective_price(&self) -> Money {
        self.sale_price().unwrap_or(self.price)
    }

    /// Snapshots this [`Product`] for adding it into a [`Cart`].
    ///
    /// [`Cart`]: crate::domain::Cart
    #[must_use]
    pub fn to_cart_item(&self) -> cart::NewItem {
        cart::NewItem {
            product_id: self.id,
            name: self.name.clone(),
            price: self.price,
            sale_price: self.sale_price(),
            image: self.images.first().clone(),
        }
    }

    /// Applies the provided [`Patch`] to this [`Product`].
    pub fn apply(&mut self, patch: Patch) {
        let Patch {
            name,
            description,
            price,
            category,
            images,
            stock,
            sale,
            sale_percentage,
            featured,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(images) = images {
            self.images = images;
        }
        if let Some(stock) = stock {
            self.stock = stock;
        }
        if let Some(sale) = sale {
            self.sale = sale;
        }
        if let Some(pct) = sale_percentage {
            self.sale_percentage = Some(pct);
        }
        if let Some(featured) = featured {
            self.featured = featured;
        }
    }
}

/// Partial modification of a [`Product`].
///
/// Absent fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct Patch {
    /// New [`Name`].
    pub name: Option<Name>,

    /// New [`Description`].
    pub description: Option<Description>,

    /// New regular price.
    pub price: Option<Money>,

    /// New [`category::Name`].
    pub category: Option<category::Name>,

    /// New [`Images`].
    pub images: Option<Images>,

    /// New [`Stock`].
    pub stock: Option<Stock>,

    /// New sale indicator.
    pub sale: Option<bool>,

    /// New sale discount.
    pub sale_percentage: Option<Percent>,

    /// New featured indicator.
    pub featured: Option<bool>,
}

/// ID of a [`Product`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    derive_more::FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
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

/// Name of a [`Product`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize,
)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Description of a [`Product`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Description`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        !text.trim().is_empty() && text.len() <= 8192
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Non-empty list of [`Image`]s of a [`Product`].
///
/// The first [`Image`] is the main one.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Images(Vec<Image>);

impl Images {
    /// Creates new [`Images`] if the given list is not empty.
    #[must_use]
    pub fn new(images: Vec<Image>) -> Option<Self> {
        (!images.is_empty()).then_some(Self(images))
    }

    /// Returns the main [`Image`].
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn first(&self) -> &Image {
        self.0.first().expect("`Images` are never empty")
    }

    /// Returns all the [`Image`]s.
    #[must_use]
    pub fn as_slice(&self) -> &[Image] {
        &self.0
    }
}

/// Number of items of a [`Product`] in stock.
pub type Stock = u32;

/// [`DateTime`] when a [`Product`] was created.
pub type CreationDateTime = DateTimeOf<(Product, unit::Creation)>;

/// [`DateTime`] when a [`Product`] was modified the last time.
pub type ModificationDateTime = DateTimeOf<(Product, unit::Modification)>;

#[cfg(test)]
pub(crate) mod spec {
    use std::str::FromStr as _;

    use common::{DateTime, Money, Percent};

    use crate::domain::{category, Image};

    use super::{Description, Id, Images, Name, Patch, Product};

    pub(crate) fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    pub(crate) fn product(name: &str, price: &str) -> Product {
        Product {
            id: Id::new(),
            name: Name::new(name).unwrap(),
            description: Description::new(format!("{name} description"))
                .unwrap(),
            price: money(price),
            category: category::Name::new("Misc").unwrap(),
            images: Images::new(vec![
                Image::new(format!(
                    "https://cdn.test/{}.png",
                    name.to_lowercase().replace(' ', "-"),
                ))
                .unwrap(),
            ])
            .unwrap(),
            stock: 10,
            sale: false,
            sale_percentage: None,
            featured: false,
            created_at: DateTime::now().coerce(),
            updated_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn sale_price_requires_sale_and_nonzero_percentage() {
        let mut p = product("lamp", "100");
        assert_eq!(p.sale_price(), None);

        p.sale_percentage = Some(Percent::from_str("20").unwrap());
        assert_eq!(p.sale_price(), None, "not on sale");

        p.sale = true;
        assert_eq!(p.sale_price(), Some(money("80")));
        assert_eq!(p.effective_price(), money("80"));

        p.sale_percentage = Some(Percent::from_str("0").unwrap());
        assert_eq!(p.sale_price(), None, "zero discount");
        assert_eq!(p.effective_price(), money("100"));

        p.sale_percentage = None;
        assert_eq!(p.sale_price(), None);
    }

    #[test]
    fn sale_price_rounds_to_cents() {
        let mut p = product("mug", "9.99");
        p.sale = true;
        p.sale_percentage = Some(Percent::from_str("33").unwrap());

        // 9.99 * 0.67 = 6.6933
        assert_eq!(p.sale_price(), Some(money("6.69")));
    }

    #[test]
    fn cart_item_snapshots_main_image_and_prices() {
        let mut p = product("chair", "50");
        p.images = Images::new(vec![
            Image::new("https://cdn.test/main.png").unwrap(),
            Image::new("https://cdn.test/side.png").unwrap(),
        ])
        .unwrap();
        p.sale = true;
        p.sale_percentage = Some(Percent::from_str("10").unwrap());

        let item = p.to_cart_item();
        assert_eq!(item.product_id, p.id);
        assert_eq!(item.name, p.name);
        assert_eq!(item.price, money("50"));
        assert_eq!(item.sale_price, Some(money("45")));
        assert_eq!(AsRef::<str>::as_ref(&item.image), "https://cdn.test/main.png");
    }

    #[test]
    fn patch_touches_only_provided_fields() {
        let mut p = product("desk", "120");
        let before = p.clone();

        p.apply(Patch {
            price: Some(money("99.90")),
            featured: Some(true),
            ..Patch::default()
        });

        assert_eq!(p.price, money("99.90"));
        assert!(p.featured);
        assert_eq!(p.name, before.name);
        assert_eq!(p.description, before.description);
        assert_eq!(p.stock, before.stock);
        assert_eq!(p.sale, before.sale);
    }

    #[test]
    fn images_are_never_empty() {
        assert!(Images::new(vec![]).is_none());
    }
}
