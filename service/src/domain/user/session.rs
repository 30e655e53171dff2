//! [`Session`] definitions.

use std::time::Duration;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, FromStr};
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::User;
use crate::domain::user;

/// Authenticated session of a [`User`], encoded as [JWT] claims.
///
/// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Session {
    /// ID of the [`User`] this [`Session`] belongs to.
    #[serde(rename = "sub")]
    pub user_id: user::Id,

    /// [`user::Role`] of the [`User`] at the moment of issuing.
    #[serde(with = "role")]
    pub role: user::Role,

    /// [`DateTime`] when this [`Session`] expires.
    #[serde(rename = "exp", with = "common::datetime::serde::unix_timestamp")]
    pub expires_at: ExpirationDateTime,
}

impl Session {
    /// [`Duration`] a newly issued [`Session`] is valid for.
    pub const LIFETIME: Duration = Duration::from_secs(30 * 60);

    /// Indicates whether this [`Session`] grants administrative privileges.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == user::Role::Admin
    }
}

/// Access token of a [`Session`].
#[derive(AsRef, Clone, Debug, Display, FromStr)]
pub struct Token(String);

impl Token {
    /// Creates a new [`Token`] without checking its contents.
    ///
    /// # Safety
    ///
    /// The provided `token` must be a valid [`Token`] representation.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(token: String) -> Self {
        Self(token)
    }
}

/// [`DateTime`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, unit::Expiration)>;

mod role {
    //! [`user::Role`] (de)serialization as a claim string.

    use std::str::FromStr as _;

    use serde::{de, Deserialize as _, Deserializer, Serializer};

    use crate::domain::user;

    pub(super) fn serialize<S: Serializer>(
        role: &user::Role,
        ser: S,
    ) -> Result<S::Ok, S::Error> {
        ser.collect_str(role)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<user::Role, D::Error> {
        let s = String::deserialize(de)?;
        user::Role::from_str(&s).map_err(de::Error::custom)
    }
}
