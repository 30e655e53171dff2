//! [`Order`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use postgres_types::Json;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{cart, order, Order},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::order::list::{Revenue, Selector, TotalCount},
};

/// Columns of the `orders` table read into an [`Order`].
const COLUMNS: &str = "\
    id, user_id, items, total, \
    shipping_name, shipping_email, shipping_phone, shipping_address, \
    shipping_city, shipping_state, shipping_pincode, \
    status, payment_status, payment_id, created_at, updated_at";

/// Reads an [`Order`] from the provided [`Row`].
fn order_from_row(row: &Row) -> Order {
    let Json(items) = row.get::<_, Json<Vec<cart::Item>>>("items");
    Order {
        id: row.get("id"),
        user_id: row.get("user_id"),
        items,
        total: row.get("total"),
        shipping_address: order::ShippingAddress {
            name: row.get("shipping_name"),
            email: row.get("shipping_email"),
            phone: row.get("shipping_phone"),
            address: row.get("shipping_address"),
            city: row.get("shipping_city"),
            state: row.get("shipping_state"),
            pincode: row.get("shipping_pincode"),
        },
        status: row.get("status"),
        payment_status: row.get("payment_status"),
        payment_id: row.get("payment_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<C> Database<Select<By<Option<Order>, order::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Order>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Order>, order::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!("SELECT {COLUMNS} FROM orders WHERE id = $1::UUID");
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(order_from_row))
    }
}

impl<C> Database<Select<By<Vec<Order>, Selector>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Order>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Order>, Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Selector { limit } = by.into_inner();
        // `LIMIT NULL` means no limit.
        let limit = limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX));

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM orders \
             ORDER BY created_at DESC, id ASC \
             LIMIT $1::INT8"
        );
        Ok(self
            .query(&sql, &[&limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(order_from_row)
            .collect())
    }
}

impl<C> Database<Select<By<TotalCount, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT8 \
            FROM orders";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i64>(0).into())
    }
}

impl<C> Database<Select<By<Revenue, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Revenue;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Revenue, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COALESCE(SUM(total), 0)::NUMERIC \
            FROM orders \
            WHERE payment_status = $1::INT2";
        self.query_opt(SQL, &[&order::PaymentStatus::Paid])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| {
                row.expect("always exists").get::<_, Money>(0).into()
            })
    }
}

impl<C> Database<Insert<Order>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Order>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(order): Insert<Order>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(order)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Order>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(order): Update<Order>,
    ) -> Result<Self::Ok, Self::Err> {
        let Order {
            id,
            user_id,
            items,
            total,
            shipping_address,
            status,
            payment_status,
            payment_id,
            created_at,
            updated_at,
        } = order;
        let order::ShippingAddress {
            name,
            email,
            phone,
            address,
            city,
            state,
            pincode,
        } = shipping_address;
        let items = Json(items);

        const SQL: &str = "\
            INSERT INTO orders (\
                id, user_id, items, total, \
                shipping_name, shipping_email, shipping_phone, \
                shipping_address, shipping_city, shipping_state, \
                shipping_pincode, \
                status, payment_status, payment_id, \
                created_at, updated_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::JSONB, $4::NUMERIC, \
                $5::VARCHAR, $6::VARCHAR, $7::VARCHAR, \
                $8::VARCHAR, $9::VARCHAR, $10::VARCHAR, \
                $11::VARCHAR, \
                $12::INT2, $13::INT2, $14::VARCHAR, \
                $15::TIMESTAMPTZ, $16::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET status = EXCLUDED.status, \
                payment_status = EXCLUDED.payment_status, \
                payment_id = EXCLUDED.payment_id, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &user_id,
                &items,
                &total,
                &name,
                &email,
                &phone,
                &address,
                &city,
                &state,
                &pincode,
                &status,
                &payment_status,
                &payment_id,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Order, order::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Order, order::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: order::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO orders_lock (id) \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
