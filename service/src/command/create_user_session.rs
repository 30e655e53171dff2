//! [`Command`] for creating a [`Session`].

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::{session::Token, Email, Password};
use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a [`Session`] by [`User`] credentials.
#[derive(Clone, Debug)]
pub struct CreateUserSession {
    /// [`Email`] of a [`User`].
    pub email: user::Email,

    /// [`Password`] of a [`User`].
    pub password: SecretBox<user::Password>,
}

/// Output of [`CreateUserSession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Token`] of the created [`Session`].
    pub token: session::Token,

    /// [`User`] whose [`Session`] has been created.
    pub user: User,

    /// [`DateTime`] when the [`Session`] expires.
    pub expires_at: session::ExpirationDateTime,
}

impl<Db> Command<CreateUserSession> for Service<Db>
where
    Db: for<'e> Database<
        Select<By<Option<User>, &'e user::Email>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUserSession { email, password } = cmd;

        let user = self
            .database()
            .execute(Select(By::new(&email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::WrongCredentials)
            .map_err(tracerr::wrap!())?;
        if !user.password_hash.verify(password.expose_secret()) {
            return Err(tracerr::new!(E::WrongCredentials));
        }

        let expires_at = (DateTime::now() + Session::LIFETIME).coerce();
        let token = jsonwebtoken::encode::<Session>(
            &jsonwebtoken::Header::default(),
            &Session {
                user_id: user.id,
                role: user.role,
                expires_at,
            },
            &self.config.jwt_encoding_key,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        // SAFETY: `jsonwebtoken::encode` always returns a valid
        //         `session::Token`.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let token = unsafe { session::Token::new_unchecked(token) };

        Ok(Output {
            token,
            user,
            expires_at,
        })
    }
}

/// Error of [`CreateUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`jsonwebtoken`] encoding error.
    #[display("Failed to encode a JSON Web Token: {_0}")]
    JsonWebTokenEncodeError(jsonwebtoken::errors::Error),

    /// [`CreateUserSession`] contains wrong credentials.
    #[display("Wrong `User` credentials")]
    WrongCredentials,
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use crate::{
        command::{self, Command as _},
        domain::user,
        infra::Memory,
        Service,
    };

    use super::{CreateUserSession, ExecutionError};

    fn password(s: &str) -> SecretBox<user::Password> {
        SecretBox::new(Box::new(user::Password::new(s).unwrap()))
    }

    #[tokio::test]
    async fn issues_token_for_valid_credentials() {
        let svc = Service::in_memory(Memory::new());
        let email = user::Email::new("jane@example.com").unwrap();
        let user = svc
            .execute(command::CreateUser {
                name: user::Name::new("Jane").unwrap(),
                email: email.clone(),
                password: password("qwerty123"),
            })
            .await
            .unwrap();

        let out = svc
            .execute(CreateUserSession {
                email,
                password: password("qwerty123"),
            })
            .await
            .unwrap();

        assert_eq!(out.user.id, user.id);
        let session = svc
            .execute(command::AuthorizeUserSession { token: out.token })
            .await
            .unwrap();
        assert_eq!(session.user_id, user.id);
        assert_eq!(session.role, user::Role::User);
    }

    #[tokio::test]
    async fn rejects_wrong_credentials() {
        let svc = Service::in_memory(Memory::new());
        let email = user::Email::new("jane@example.com").unwrap();
        _ = svc
            .execute(command::CreateUser {
                name: user::Name::new("Jane").unwrap(),
                email: email.clone(),
                password: password("qwerty123"),
            })
            .await
            .unwrap();

        let wrong_password = svc
            .execute(CreateUserSession {
                email,
                password: password("qwerty124"),
            })
            .await
            .unwrap_err();
        let unknown_email = svc
            .execute(CreateUserSession {
                email: user::Email::new("john@example.com").unwrap(),
                password: password("qwerty123"),
            })
            .await
            .unwrap_err();

        for err in [wrong_password, unknown_email] {
            assert!(matches!(err.as_ref(), ExecutionError::WrongCredentials));
        }
    }
}
