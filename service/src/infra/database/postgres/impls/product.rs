//! [`Product`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{product, Product},
    infra::{
        database::{
            self,
            postgres::{Connection, LikePattern},
            Postgres,
        },
        Database,
    },
    read::product::list::{Filter, Selector, Sort, TotalCount},
};

/// Columns of the `products` table read into a [`Product`].
const COLUMNS: &str = "\
    id, name, description, price, category, images, stock, \
    sale, sale_percentage, featured, created_at, updated_at";

/// Reads a [`Product`] from the provided [`Row`].
fn product_from_row(row: &Row) -> Product {
    Product {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        price: row.get("price"),
        category: row.get("category"),
        images: row.get("images"),
        stock: u32::try_from(row.get::<_, i64>("stock"))
            .expect("`products.stock` column is constrained"),
        sale: row.get("sale"),
        sale_percentage: row.get("sale_percentage"),
        featured: row.get("featured"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Renders the `AND`-prefixed SQL conditions of the provided [`Filter`],
/// binding their parameters after the ones already present in `ps`.
///
/// `search` must be the [`LikePattern`] of the [`Filter::search`] term.
fn filter_conditions<'p>(
    filter: &'p Filter,
    search: Option<&'p LikePattern>,
    ps: &mut Vec<&'p (dyn ToSql + Sync)>,
) -> String {
    let mut bind = |p: &'p (dyn ToSql + Sync)| {
        ps.push(p);
        ps.len()
    };

    let mut conditions = Vec::new();
    if let Some(category) = &filter.category {
        let idx = bind(category);
        conditions.push(format!("category = ${idx}::VARCHAR"));
    }
    if let Some(min) = &filter.min_price {
        let idx = bind(min);
        conditions.push(format!("price >= ${idx}::NUMERIC"));
    }
    if let Some(max) = &filter.max_price {
        let idx = bind(max);
        conditions.push(format!("price <= ${idx}::NUMERIC"));
    }
    if filter.on_sale {
        conditions.push("sale".to_owned());
    }
    if let Some(pattern) = search {
        let idx = bind(pattern);
        conditions.push(format!(
            "(name ILIKE ${idx}::VARCHAR ESCAPE '\\' \
              OR description ILIKE ${idx}::VARCHAR ESCAPE '\\')",
        ));
    }

    conditions
        .into_iter()
        .format_with(" ", |c, f| f(&format_args!("AND {c}")))
        .to_string()
}

/// Returns the SQL `ORDER BY` expression of the provided [`Sort`].
fn order_by(sort: Sort) -> &'static str {
    match sort {
        Sort::Name => "name COLLATE \"C\" ASC, id ASC",
        Sort::PriceAsc => "price ASC, id ASC",
        Sort::PriceDesc => "price DESC, id ASC",
        Sort::Newest => "created_at DESC, id ASC",
        Sort::Popularity => "featured DESC, created_at DESC, id ASC",
    }
}

/// Builds the SQL statement selecting a page of [`Product`]s.
///
/// `$1` and `$2` are reserved for the `LIMIT` and `OFFSET` of the page.
fn list_statement<'p>(
    filter: &'p Filter,
    search: Option<&'p LikePattern>,
    sort: Sort,
    ps: &mut Vec<&'p (dyn ToSql + Sync)>,
) -> String {
    format!(
        "SELECT {COLUMNS} \
         FROM products \
         WHERE TRUE {conditions} \
         ORDER BY {order} \
         LIMIT $1::INT8 OFFSET $2::INT8",
        conditions = filter_conditions(filter, search, ps),
        order = order_by(sort),
    )
}

impl<C> Database<Select<By<Option<Product>, product::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Product>, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!("SELECT {COLUMNS} FROM products WHERE id = $1::UUID");
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(product_from_row))
    }
}

impl<C> Database<Select<By<Vec<Product>, Selector>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Product>, Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Selector {
            arguments,
            filter,
            order,
        } = by.into_inner();

        let limit = i64::try_from(arguments.limit()).unwrap_or(i64::MAX);
        let skip = i64::try_from(arguments.skip()).unwrap_or(i64::MAX);
        let search = filter
            .search
            .as_ref()
            .map(|term| LikePattern::containing(term.as_ref()));

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit, &skip];
        let sql = list_statement(&filter, search.as_ref(), order, &mut ps);
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(product_from_row)
            .collect())
    }
}

impl<C> Database<Select<By<TotalCount, Filter>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<TotalCount, Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        let search = filter
            .search
            .as_ref()
            .map(|term| LikePattern::containing(term.as_ref()));

        let mut ps = Vec::new();
        let sql = format!(
            "SELECT COUNT(*)::INT8 \
             FROM products \
             WHERE TRUE {conditions}",
            conditions = filter_conditions(&filter, search.as_ref(), &mut ps),
        );
        self.query_opt(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i64>(0).into())
    }
}

impl<C> Database<Insert<Product>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Product>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(product): Insert<Product>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(product)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Product>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(product): Update<Product>,
    ) -> Result<Self::Ok, Self::Err> {
        let Product {
            id,
            name,
            description,
            price,
            category,
            images,
            stock,
            sale,
            sale_percentage,
            featured,
            created_at,
            updated_at,
        } = product;
        let stock = i64::from(stock);

        const SQL: &str = "\
            INSERT INTO products (\
                id, name, description, price, category, images, stock, \
                sale, sale_percentage, featured, created_at, updated_at\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::TEXT, $4::NUMERIC, \
                $5::VARCHAR, $6::VARCHAR[], $7::INT8, \
                $8::BOOL, $9::NUMERIC, $10::BOOL, \
                $11::TIMESTAMPTZ, $12::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                description = EXCLUDED.description, \
                price = EXCLUDED.price, \
                category = EXCLUDED.category, \
                images = EXCLUDED.images, \
                stock = EXCLUDED.stock, \
                sale = EXCLUDED.sale, \
                sale_percentage = EXCLUDED.sale_percentage, \
                featured = EXCLUDED.featured, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &description,
                &price,
                &category,
                &images,
                &stock,
                &sale,
                &sale_percentage,
                &featured,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Product, product::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Product, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM products \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Product, product::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Product, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: product::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO products_lock (id) \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::Money;
    use postgres_types::ToSql;

    use crate::{
        infra::database::postgres::LikePattern,
        read::product::list::{Filter, SearchTerm, Sort},
    };

    use super::list_statement;

    fn statement(filter: &Filter, sort: Sort) -> (String, usize) {
        let search = filter
            .search
            .as_ref()
            .map(|t| LikePattern::containing(t.as_ref()));
        let (limit, skip) = (20_i64, 0_i64);
        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit, &skip];
        let sql = list_statement(filter, search.as_ref(), sort, &mut ps);
        (sql, ps.len())
    }

    #[test]
    fn selects_everything_without_filter() {
        let (sql, params) = statement(&Filter::default(), Sort::default());

        assert!(sql.contains("WHERE TRUE  ORDER BY created_at DESC, id ASC"));
        assert!(sql.ends_with("LIMIT $1::INT8 OFFSET $2::INT8"));
        assert_eq!(params, 2);
    }

    #[test]
    fn binds_price_range_inclusively() {
        let filter = Filter {
            min_price: Some(Money::from_str("100").unwrap()),
            max_price: Some(Money::from_str("500").unwrap()),
            ..Filter::default()
        };

        let (sql, params) = statement(&filter, Sort::PriceAsc);

        assert!(sql.contains(
            "WHERE TRUE AND price >= $3::NUMERIC AND price <= $4::NUMERIC \
             ORDER BY price ASC, id ASC",
        ));
        assert_eq!(params, 4);
    }

    #[test]
    fn binds_only_present_conditions() {
        let filter = Filter {
            max_price: Some(Money::ZERO),
            on_sale: true,
            ..Filter::default()
        };

        let (sql, params) = statement(&filter, Sort::PriceDesc);

        assert!(sql.contains(
            "WHERE TRUE AND price <= $3::NUMERIC AND sale \
             ORDER BY price DESC, id ASC",
        ));
        assert_eq!(params, 3);
    }

    #[test]
    fn searches_name_or_description() {
        let filter = Filter {
            category: Some("Lighting".parse().unwrap()),
            search: SearchTerm::new("lamp"),
            ..Filter::default()
        };

        let (sql, params) = statement(&filter, Sort::Popularity);

        assert!(sql.contains(
            "WHERE TRUE AND category = $3::VARCHAR \
             AND (name ILIKE $4::VARCHAR ESCAPE '\\' \
             OR description ILIKE $4::VARCHAR ESCAPE '\\') \
             ORDER BY featured DESC, created_at DESC, id ASC",
        ));
        assert_eq!(params, 4);
    }

    #[test]
    fn sorts_by_name() {
        let (sql, _) = statement(&Filter::default(), Sort::Name);

        assert!(sql.contains("ORDER BY name COLLATE \"C\" ASC, id ASC"));
    }
}
