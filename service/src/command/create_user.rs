//! [`Command`] for creating a new [`User`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::{Email, Name, Password, Role};
use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`User`] with the [`Role::User`].
#[derive(Clone, Debug)]
pub struct CreateUser {
    /// [`Name`] of a new [`User`].
    pub name: user::Name,

    /// [`Email`] of a new [`User`].
    pub email: user::Email,

    /// [`Password`] of a new [`User`].
    pub password: SecretBox<user::Password>,
}

impl<Db> Command<CreateUser> for Service<Db>
where
    Db: for<'e> Database<
            Select<By<Option<User>, &'e user::Email>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<User>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUser {
            name,
            email,
            password,
        } = cmd;

        let u = self
            .database()
            .execute(Select(By::new(&email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if u.is_some() {
            return Err(tracerr::new!(E::EmailOccupied(email)));
        }

        let user = User {
            id: user::Id::new(),
            name,
            email,
            password_hash: user::PasswordHash::new(password.expose_secret())
                .map_err(tracerr::from_and_wrap!(=> E))?,
            role: user::Role::User,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        match tx.execute(Insert(user.clone())).await {
            // Email may be occupied concurrently.
            Err(e) if e.as_ref().is_unique_violation(Some("users_email")) => {
                return Err(tracerr::new!(E::EmailOccupied(user.email)));
            }
            res => res.map_err(tracerr::map_from_and_wrap!(=> E)).map(drop)?,
        }
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(user)
    }
}

/// Error of [`CreateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`user::Email`] is already registered.
    #[display("`{_0}` email is occupied")]
    #[from(ignore)]
    EmailOccupied(#[error(not(source))] user::Email),

    /// [`Password`] hashing error.
    #[display("Failed to hash `Password`: {_0}")]
    PasswordHashError(#[error(not(source))] argon2::password_hash::Error),
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use crate::{
        command::Command as _,
        domain::user,
        infra::Memory,
        query::{self, Query as _},
        Service,
    };

    use super::{CreateUser, ExecutionError};

    fn signup(email: &str) -> CreateUser {
        CreateUser {
            name: user::Name::new("Jane").unwrap(),
            email: user::Email::new(email).unwrap(),
            password: SecretBox::new(Box::new(
                user::Password::new("secret-password").unwrap(),
            )),
        }
    }

    #[tokio::test]
    async fn creates_regular_user() {
        let svc = Service::in_memory(Memory::new());

        let user = svc.execute(signup("jane@example.com")).await.unwrap();

        assert_eq!(user.role, user::Role::User);
        assert!(user.password_hash.verify(
            &user::Password::new("secret-password").unwrap()
        ));
        let users = svc.execute(query::users::List::by(())).await.unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn rejects_occupied_email_without_insert() {
        let svc = Service::in_memory(Memory::new());
        _ = svc.execute(signup("jane@example.com")).await.unwrap();

        let err = svc.execute(signup("jane@example.com")).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::EmailOccupied(_)));
        let users = svc.execute(query::users::List::by(())).await.unwrap();
        assert_eq!(users.len(), 1);
    }
}
