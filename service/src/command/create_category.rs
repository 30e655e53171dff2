//! [`Command`] for creating a new [`Category`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::category::{Description, Name, Slug};
use crate::{
    domain::{category, Category, Image},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Category`].
#[derive(Clone, Debug)]
pub struct CreateCategory {
    /// [`Name`] of a new [`Category`].
    pub name: category::Name,

    /// Unique [`Slug`] of a new [`Category`].
    pub slug: category::Slug,

    /// [`Description`] of a new [`Category`].
    pub description: Option<category::Description>,

    /// [`Image`] of a new [`Category`].
    pub image: Option<Image>,
}

impl<Db> Command<CreateCategory> for Service<Db>
where
    Db: for<'s> Database<
            Select<By<Option<Category>, &'s category::Slug>>,
            Ok = Option<Category>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Category>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Category;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateCategory,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateCategory {
            name,
            slug,
            description,
            image,
        } = cmd;

        let c = self
            .database()
            .execute(Select(By::new(&slug)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if c.is_some() {
            return Err(tracerr::new!(E::SlugOccupied(slug)));
        }

        let category = Category {
            id: category::Id::new(),
            name,
            slug,
            description,
            image,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        match tx.execute(Insert(category.clone())).await {
            Err(e) if e.as_ref().is_unique_violation(Some("categories_slug")) => {
                return Err(tracerr::new!(E::SlugOccupied(category.slug)));
            }
            res => res.map_err(tracerr::map_from_and_wrap!(=> E)).map(drop)?,
        }
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(category)
    }
}

/// Error of [`CreateCategory`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`category::Slug`] is already occupied.
    #[display("`{_0}` slug is occupied")]
    #[from(ignore)]
    SlugOccupied(#[error(not(source))] category::Slug),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::Command as _,
        domain::category,
        infra::Memory,
        query::{self, Query as _},
        Service,
    };

    use super::{CreateCategory, ExecutionError};

    fn category(name: &str, slug: &str) -> CreateCategory {
        CreateCategory {
            name: category::Name::new(name).unwrap(),
            slug: category::Slug::new(slug).unwrap(),
            description: None,
            image: None,
        }
    }

    #[tokio::test]
    async fn rejects_occupied_slug() {
        let svc = Service::in_memory(Memory::new());
        _ = svc.execute(category("Lighting", "lighting")).await.unwrap();
        _ = svc.execute(category("Sofas", "sofas")).await.unwrap();

        let err = svc
            .execute(category("Lamps", "lighting"))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::SlugOccupied(_)));
        let all = svc.execute(query::categories::List::by(())).await.unwrap();
        assert_eq!(
            all.iter()
                .map(|c| AsRef::<str>::as_ref(&c.name))
                .collect::<Vec<_>>(),
            ["Lighting", "Sofas"],
        );
    }
}
