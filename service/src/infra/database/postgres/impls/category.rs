//! [`Category`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{category, Category},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Reads a [`Category`] from the provided [`Row`].
fn category_from_row(row: &Row) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        description: row.get("description"),
        image: row.get("image"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Vec<Category>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Category>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Category>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id, name, slug, description, image, created_at \
            FROM categories \
            ORDER BY created_at ASC, id ASC";
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(category_from_row)
            .collect())
    }
}

impl<'s, C> Database<Select<By<Option<Category>, &'s category::Slug>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Category>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Category>, &'s category::Slug>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slug = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, slug, description, image, created_at \
            FROM categories \
            WHERE slug = $1::VARCHAR";
        Ok(self
            .query_opt(SQL, &[slug])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(category_from_row))
    }
}

impl<C> Database<Insert<Category>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(category): Insert<Category>,
    ) -> Result<Self::Ok, Self::Err> {
        let Category {
            id,
            name,
            slug,
            description,
            image,
            created_at,
        } = category;

        const SQL: &str = "\
            INSERT INTO categories (\
                id, name, slug, description, image, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::TEXT, \
                $5::VARCHAR, $6::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[&id, &name, &slug, &description, &image, &created_at],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
