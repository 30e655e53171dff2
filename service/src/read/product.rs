//! [`Product`] read model definition.
//!
//! [`Product`]: crate::domain::Product

pub mod list {
    //! [`Product`]s list definitions.

    use std::cmp::Ordering;

    use common::{pagination, Money};
    use derive_more::{AsRef, Display, From, Into};

    use crate::domain::{category, Product};

    /// [`Product`]s page selector.
    pub type Selector = pagination::Selector<Filter, Sort>;

    /// Pagination arguments of a [`Selector`].
    pub type Arguments = pagination::Arguments;

    /// Filter of a [`Selector`].
    ///
    /// All the present conditions must hold.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`category::Name`] a [`Product`] must belong to.
        pub category: Option<category::Name>,

        /// Inclusive lower bound of a [`Product`] price.
        pub min_price: Option<Money>,

        /// Inclusive upper bound of a [`Product`] price.
        pub max_price: Option<Money>,

        /// Indicator whether only [`Product`]s on sale are selected.
        pub on_sale: bool,

        /// [`SearchTerm`] to be contained in a [`Product`] name or
        /// description.
        pub search: Option<SearchTerm>,
    }

    impl Filter {
        /// Checks whether the provided [`Product`] satisfies this [`Filter`].
        #[must_use]
        pub fn matches(&self, product: &Product) -> bool {
            let Self {
                category,
                min_price,
                max_price,
                on_sale,
                search,
            } = self;

            category.as_ref().map_or(true, |c| *c == product.category)
                && min_price.map_or(true, |min| product.price >= min)
                && max_price.map_or(true, |max| product.price <= max)
                && (!on_sale || product.sale)
                && search.as_ref().map_or(true, |term| {
                    term.is_contained_in(product.name.as_ref())
                        || term.is_contained_in(product.description.as_ref())
                })
        }
    }

    /// Order of [`Product`]s in a [`Selector`].
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
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

    impl Sort {
        /// Compares the provided [`Product`]s according to this [`Sort`].
        ///
        /// Equal [`Product`]s are ordered by their IDs.
        #[must_use]
        pub fn compare(self, a: &Product, b: &Product) -> Ordering {
            let by_field = match self {
                Self::Name => AsRef::<str>::as_ref(&a.name)
                    .cmp(AsRef::<str>::as_ref(&b.name)),
                Self::PriceAsc => a.price.cmp(&b.price),
                Self::PriceDesc => b.price.cmp(&a.price),
                Self::Newest => b.created_at.cmp(&a.created_at),
                Self::Popularity => b
                    .featured
                    .cmp(&a.featured)
                    .then_with(|| b.created_at.cmp(&a.created_at)),
            };
            by_field.then_with(|| a.id.cmp(&b.id))
        }
    }

    /// Non-empty text searched case-insensitively.
    #[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
    #[as_ref(str, String)]
    pub struct SearchTerm(String);

    impl SearchTerm {
        /// Creates a new [`SearchTerm`] if the given `term` is not empty.
        #[must_use]
        pub fn new(term: impl Into<String>) -> Option<Self> {
            let term = term.into();
            (!term.is_empty()).then_some(Self(term))
        }

        /// Checks whether this [`SearchTerm`] is a case-insensitive substring
        /// of the provided `text`.
        #[must_use]
        pub fn is_contained_in(&self, text: &str) -> bool {
            text.to_lowercase().contains(&self.0.to_lowercase())
        }
    }

    /// Total count of [`Product`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i64);

    #[cfg(test)]
    mod spec {
        use std::{str::FromStr as _, time::Duration};

        use common::{DateTime, Percent};

        use crate::domain::{
            category,
            product::{self, spec::money},
            Product,
        };

        use super::{Filter, SearchTerm, Sort};

        fn products() -> Vec<Product> {
            let now = DateTime::now();
            let mut lamp = product::spec::product("Desk Lamp", "49.90");
            lamp.category = category::Name::new("Lighting").unwrap();
            lamp.created_at = (now - Duration::from_secs(30)).coerce();

            let mut sofa = product::spec::product("Sofa", "500");
            sofa.description =
                product::Description::new("Comfy 100% cotton").unwrap();
            sofa.sale = true;
            sofa.sale_percentage = Some(Percent::from_str("10").unwrap());
            sofa.created_at = (now - Duration::from_secs(20)).coerce();

            let mut rug = product::spec::product("rug", "100");
            rug.featured = true;
            rug.created_at = (now - Duration::from_secs(10)).coerce();

            let mut vase = product::spec::product("Vase", "99.99");
            vase.created_at = now.coerce();

            vec![lamp, sofa, rug, vase]
        }

        fn names<'a>(ps: impl IntoIterator<Item = &'a Product>) -> Vec<&'a str> {
            ps.into_iter().map(|p| AsRef::<str>::as_ref(&p.name)).collect()
        }

        #[test]
        fn price_range_is_inclusive() {
            let ps = products();
            let filter = Filter {
                min_price: Some(money("100")),
                max_price: Some(money("500")),
                ..Filter::default()
            };

            let found = ps.iter().filter(|p| filter.matches(p));
            assert_eq!(names(found), ["Sofa", "rug"]);
        }

        #[test]
        fn single_price_bound() {
            let ps = products();
            let cheap = Filter {
                max_price: Some(money("99.99")),
                ..Filter::default()
            };
            assert_eq!(
                names(ps.iter().filter(|p| cheap.matches(p))),
                ["Desk Lamp", "Vase"],
            );

            let free = Filter {
                max_price: Some(money("0")),
                ..Filter::default()
            };
            assert_eq!(ps.iter().filter(|p| free.matches(p)).count(), 0);
        }

        #[test]
        fn inverted_price_range_matches_nothing() {
            let filter = Filter {
                min_price: Some(money("500")),
                max_price: Some(money("100")),
                ..Filter::default()
            };

            assert_eq!(products().iter().filter(|p| filter.matches(p)).count(), 0);
        }

        #[test]
        fn combines_conditions() {
            let ps = products();
            let filter = Filter {
                category: Some(category::Name::new("Misc").unwrap()),
                on_sale: true,
                ..Filter::default()
            };
            assert_eq!(names(ps.iter().filter(|p| filter.matches(p))), ["Sofa"]);

            let lighting = Filter {
                category: Some(category::Name::new("Lighting").unwrap()),
                ..Filter::default()
            };
            assert_eq!(
                names(ps.iter().filter(|p| lighting.matches(p))),
                ["Desk Lamp"],
            );
        }

        #[test]
        fn searches_name_or_description_ignoring_case() {
            let ps = products();
            let search = |s: &str| Filter {
                search: SearchTerm::new(s),
                ..Filter::default()
            };

            assert_eq!(names(ps.iter().filter(|p| search("LAMP").matches(p))), [
                "Desk Lamp"
            ]);
            assert_eq!(
                names(ps.iter().filter(|p| search("100%").matches(p))),
                ["Sofa"],
            );
            assert_eq!(ps.iter().filter(|p| search("_").matches(p)).count(), 0);
        }

        #[test]
        fn empty_search_is_absent() {
            assert!(SearchTerm::new("").is_none());
        }

        #[test]
        fn sorts() {
            let ps = products();
            let sorted = |sort: Sort| {
                let mut ps = ps.iter().collect::<Vec<_>>();
                ps.sort_by(|a, b| sort.compare(a, b));
                names(ps)
            };

            assert_eq!(sorted(Sort::Name), ["Desk Lamp", "Sofa", "Vase", "rug"]);
            assert_eq!(sorted(Sort::PriceAsc), [
                "Desk Lamp",
                "Vase",
                "rug",
                "Sofa"
            ]);
            assert_eq!(sorted(Sort::PriceDesc), [
                "Sofa",
                "rug",
                "Vase",
                "Desk Lamp"
            ]);
            assert_eq!(sorted(Sort::Newest), ["Vase", "rug", "Sofa", "Desk Lamp"]);
            assert_eq!(sorted(Sort::Popularity), [
                "rug",
                "Vase",
                "Sofa",
                "Desk Lamp"
            ]);
        }
    }
}
