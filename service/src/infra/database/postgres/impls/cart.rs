//! [`Cart`]-related [`Database`] implementations.

use common::operations::{By, Delete, Lock, Select, Update};
use postgres_types::Json;
use tracerr::Traced;

use crate::{
    domain::{cart, Cart},
    infra::{
        database::{
            self,
            postgres::{self, Connection},
            Postgres,
        },
        Database,
    },
};

impl<C> Database<Select<By<Option<Cart>, cart::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Cart>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Cart>, cart::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT items, updated_at \
            FROM carts \
            WHERE id = $1::UUID";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| {
                let Json(items) = row.get::<_, Json<Vec<cart::Item>>>("items");
                Cart::restore(id, items, row.get("updated_at"))
                    .map_err(postgres::Error::MalformedCart)
                    .map_err(tracerr::wrap!())
                    .map_err(tracerr::map_from)
            })
            .transpose()
    }
}

impl<C> Database<Update<Cart>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(cart): Update<Cart>,
    ) -> Result<Self::Ok, Self::Err> {
        let items = Json(cart.items());
        let total = cart.total();

        const SQL: &str = "\
            INSERT INTO carts (id, items, total, updated_at) \
            VALUES ($1::UUID, $2::JSONB, $3::NUMERIC, $4::TIMESTAMPTZ) \
            ON CONFLICT (id) DO UPDATE \
            SET items = EXCLUDED.items, \
                total = EXCLUDED.total, \
                updated_at = EXCLUDED.updated_at";
        self.exec(SQL, &[&cart.id, &items, &total, &cart.updated_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Cart, cart::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Cart, cart::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: cart::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO carts_lock (id) \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Cart, cart::ModificationDateTime>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Cart, cart::ModificationDateTime>>,
    ) -> Result<Self::Ok, Self::Err> {
        let deadline = by.into_inner();

        const SQL: &str = "\
            WITH abandoned AS (\
                DELETE FROM carts \
                WHERE updated_at < $1::TIMESTAMPTZ \
                RETURNING id\
            ) \
            DELETE FROM carts_lock \
            WHERE id IN (SELECT id FROM abandoned)";
        self.exec(SQL, &[&deadline])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
