//! [`Product`]-related definitions.

use common::{DateTime, Money, Percent};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLInputObject, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    define_error, Context, Error,
};

/// A product of the store.
#[derive(Clone, Debug, From)]
pub struct Product(domain::Product);

/// A product of the store.
#[graphql_object(context = Context)]
impl Product {
    /// Unique identifier of this `Product`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Name of this `Product`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn name(&self) -> Name {
        self.0.name.clone().into()
    }

    /// Description of this `Product`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn description(&self) -> Description {
        self.0.description.clone().into()
    }

    /// Regular price of this `Product`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.price",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn price(&self) -> Money {
        self.0.price
    }

    /// Discounted price of this `Product`.
    ///
    /// Present only while this `Product` is on sale with a non-zero discount.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.salePrice",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn sale_price(&self) -> Option<Money> {
        self.0.sale_price()
    }

    /// Name of the `Category` this `Product` belongs to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.category",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn category(&self) -> api::category::Name {
        self.0.category.clone().into()
    }

    /// Images of this `Product`, the main one goes first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.images",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn images(&self) -> Vec<scalar::Image> {
        self.0
            .images
            .as_slice()
            .iter()
            .cloned()
            .map(Into::into)
            .collect()
    }

    /// Number of items of this `Product` in stock.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.stock",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn stock(&self) -> i32 {
        i32::try_from(self.0.stock).unwrap_or(i32::MAX)
    }

    /// Indicator whether this `Product` is on sale.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.sale",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn sale(&self) -> bool {
        self.0.sale
    }

    /// Discount of this `Product` while it's on sale.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.salePercentage",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn sale_percentage(&self) -> Option<Percent> {
        self.0.sale_percentage
    }

    /// Indicator whether this `Product` is featured on the storefront.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.featured",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn featured(&self) -> bool {
        self.0.featured
    }

    /// `DateTime` when this `Product` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Product` was modified the last time.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.updatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn updated_at(&self) -> DateTime {
        self.0.updated_at.coerce()
    }
}

/// Unique identifier of a `Product`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::product::Id)]
#[into(domain::product::Id)]
#[graphql(name = "ProductId", transparent)]
pub struct Id(Uuid);

/// Name of a `Product`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProductName",
    with = scalar::Via::<domain::product::Name>,
)]
pub struct Name(domain::product::Name);

/// Description of a `Product`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProductDescription",
    with = scalar::Via::<domain::product::Description>,
)]
pub struct Description(domain::product::Description);

/// Converts the provided list of images into [`domain::product::Images`].
///
/// # Errors
///
/// With `NO_PRODUCT_IMAGES` if the list is empty.
pub(crate) fn images(
    images: Vec<scalar::Image>,
) -> Result<domain::product::Images, Error> {
    domain::product::Images::new(images.into_iter().map(Into::into).collect())
        .ok_or_else(|| ProductError::NoImages.into())
}

/// Converts the provided number of items into [`domain::product::Stock`].
///
/// # Errors
///
/// With `INVALID_STOCK` if the number is negative.
pub(crate) fn stock(stock: i32) -> Result<domain::product::Stock, Error> {
    domain::product::Stock::try_from(stock)
        .map_err(|_| ProductError::InvalidStock.into())
}

/// Partial modification of a `Product`.
///
/// Absent fields are left untouched.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "ProductPatch")]
pub struct Patch {
    /// New name.
    pub name: Option<Name>,

    /// New description.
    pub description: Option<Description>,

    /// New regular price.
    pub price: Option<Money>,

    /// New `Category` name.
    pub category: Option<api::category::Name>,

    /// New images, the main one goes first.
    pub images: Option<Vec<scalar::Image>>,

    /// New number of items in stock.
    pub stock: Option<i32>,

    /// New sale indicator.
    pub sale: Option<bool>,

    /// New sale discount.
    pub sale_percentage: Option<Percent>,

    /// New featured indicator.
    pub featured: Option<bool>,
}

impl TryFrom<Patch> for domain::product::Patch {
    type Error = Error;

    fn try_from(patch: Patch) -> Result<Self, Self::Error> {
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

        Ok(Self {
            name: name.map(Into::into),
            description: description.map(Into::into),
            price,
            category: category.map(Into::into),
            images: images.map(self::images).transpose()?,
            stock: stock.map(self::stock).transpose()?,
            sale,
            sale_percentage,
            featured,
        })
    }
}

define_error! {
    enum ProductError {
        #[code = "PRODUCT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Product` with the specified ID does not exist"]
        NotExists,

        #[code = "NO_PRODUCT_IMAGES"]
        #[status = BAD_REQUEST]
        #[message = "`Product` must have at least one image"]
        NoImages,

        #[code = "INVALID_STOCK"]
        #[status = BAD_REQUEST]
        #[message = "`Product` stock must be non-negative"]
        InvalidStock,
    }
}

pub mod list {
    //! Definitions related to the [`Product`] list.

    use std::sync::OnceLock;

    use common::Money;
    use juniper::{graphql_object, GraphQLEnum, GraphQLInputObject};
    use service::{domain, query, read, Query as _};

    use crate::{api, define_error, AsError, Context, Error};

    use super::Product;

    /// Filter of the `Product` list.
    ///
    /// All the provided conditions must hold. Empty strings are treated as
    /// absent conditions.
    #[derive(Clone, Debug, Default, GraphQLInputObject)]
    #[graphql(name = "ProductFilter")]
    pub struct Filter {
        /// Name of the `Category` a `Product` must belong to.
        pub category: Option<String>,

        /// Inclusive lower bound of a `Product` price.
        pub min_price: Option<Money>,

        /// Inclusive upper bound of a `Product` price.
        pub max_price: Option<Money>,

        /// Indicator whether only `Product`s on sale are listed.
        pub on_sale: Option<bool>,

        /// Text to be contained in a `Product` name or description,
        /// case-insensitively.
        pub search: Option<String>,
    }

    impl TryFrom<Filter> for read::product::list::Filter {
        type Error = Error;

        fn try_from(filter: Filter) -> Result<Self, Self::Error> {
            let Filter {
                category,
                min_price,
                max_price,
                on_sale,
                search,
            } = filter;

            let category = category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(|c| {
                    domain::category::Name::new(c)
                        .ok_or_else(|| Error::from(FilterError::InvalidCategory))
                })
                .transpose()?;

            Ok(Self {
                category,
                min_price,
                max_price,
                on_sale: on_sale.unwrap_or_default(),
                search: search.and_then(read::product::list::SearchTerm::new),
            })
        }
    }

    /// Order of the `Product` list.
    #[derive(Clone, Copy, Debug, Default, GraphQLEnum)]
    #[graphql(name = "ProductSort")]
    pub enum Sort {
        /// By name, alphabetically.
        Name,

        /// Cheapest first.
        PriceAsc,

        /// Most expensive first.
        PriceDesc,

        /// Recently created first.
        #[default]
        Newest,

        /// Featured first, then recently created first.
        Popularity,
    }

    impl From<Sort> for read::product::list::Sort {
        fn from(sort: Sort) -> Self {
            match sort {
                Sort::Name => Self::Name,
                Sort::PriceAsc => Self::PriceAsc,
                Sort::PriceDesc => Self::PriceDesc,
                Sort::Newest => Self::Newest,
                Sort::Popularity => Self::Popularity,
            }
        }
    }

    /// Page of the [`Product`] list.
    #[derive(Debug)]
    pub struct Connection {
        /// [`domain::Product`]s of this page.
        products: Vec<domain::Product>,

        /// [`read::product::list::Filter`] the page was selected with.
        filter: read::product::list::Filter,

        /// [`Product`]s of this page, converted lazily.
        items: OnceLock<Vec<Product>>,
    }

    impl Connection {
        /// Creates a new [`Connection`] out of the selected page.
        #[must_use]
        pub fn new(
            products: Vec<domain::Product>,
            filter: read::product::list::Filter,
        ) -> Self {
            Self {
                products,
                filter,
                items: OnceLock::new(),
            }
        }
    }

    /// Page of the `Product` list.
    #[graphql_object(name = "ProductListConnection", context = Context)]
    impl Connection {
        /// `Product`s of this page.
        #[must_use]
        pub fn items(&self) -> &[Product] {
            self.items
                .get_or_init(|| {
                    self.products.iter().cloned().map(Into::into).collect()
                })
                .as_slice()
        }

        /// Total count of `Product`s matching the filter, regardless of
        /// pagination.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::products::TotalCount::by(self.filter.clone()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(|c| i32::try_from(i64::from(c)).unwrap_or(i32::MAX))
        }
    }

    define_error! {
        enum FilterError {
            #[code = "INVALID_CATEGORY"]
            #[status = BAD_REQUEST]
            #[message = "`category` is not a valid `Category` name"]
            InvalidCategory,
        }
    }

    #[cfg(test)]
    mod spec {
        use std::str::FromStr as _;

        use common::Money;
        use service::read;

        use super::Filter;

        #[test]
        fn treats_empty_strings_as_absent() {
            let filter = read::product::list::Filter::try_from(Filter {
                category: Some(String::new()),
                search: Some(String::new()),
                ..Filter::default()
            })
            .unwrap();

            assert!(filter.category.is_none());
            assert!(filter.search.is_none());
            assert!(!filter.on_sale);
        }

        #[test]
        fn accepts_inverted_price_range() {
            let filter = read::product::list::Filter::try_from(Filter {
                min_price: Some(Money::from_str("500").unwrap()),
                max_price: Some(Money::from_str("100").unwrap()),
                ..Filter::default()
            })
            .unwrap();

            assert_eq!(filter.min_price, Some(Money::from_str("500").unwrap()));
            assert_eq!(filter.max_price, Some(Money::from_str("100").unwrap()));
        }

        #[test]
        fn rejects_invalid_category() {
            let err = read::product::list::Filter::try_from(Filter {
                category: Some("x".repeat(300)),
                ..Filter::default()
            })
            .unwrap_err();

            assert_eq!(err.code, "INVALID_CATEGORY");
        }

        #[test]
        fn keeps_zero_price_bound() {
            let filter = read::product::list::Filter::try_from(Filter {
                min_price: Some(Money::from_str("0").unwrap()),
                ..Filter::default()
            })
            .unwrap();

            assert_eq!(filter.min_price, Some(Money::from_str("0").unwrap()));
        }
    }
}

