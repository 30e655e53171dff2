//! API [`Error`] returned to GraphQL clients and its conversions.

use std::fmt;

use axum_extra::typed_header::TypedHeaderRejection;
use derive_more::Error as StdError;
use itertools::Itertools as _;
use juniper::IntoFieldError;
use service::infra::database;
use tracerr::{Trace, Traced};
use tracing as log;

/// Declares an enum of client-facing errors, each variant having a fixed
/// code, HTTP status and message, convertible into the crate [`Error`].
///
/// ```ignore
/// define_error! {
///     enum CartError {
///         #[code = "CART_TOTAL_OVERFLOW"]
///         #[status = BAD_REQUEST]
///         #[message = "`Cart` total is too large"]
///         TotalOverflow,
///     }
/// }
/// ```
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Client-facing error.
        #[derive(
            Clone,
            Copy,
            Debug,
            Eq,
            PartialEq,
            ::derive_more::Display,
            ::derive_more::Error,
        )]
        pub enum $name {
            $(
                #[doc = $message]
                #[display($message)]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                let (code, status) = match err {
                    $( $name::$variant => ($code, ::http::StatusCode::$status), )*
                };
                Self::new(code, status, err.to_string())
            }
        }
    };
}

/// Error of a GraphQL request, rendered into the `errors` list of the
/// response.
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// Machine-readable code of this [`Error`], like `CART_EMPTY`.
    pub code: Code,

    /// [`http::StatusCode`] the whole response is answered with.
    pub status_code: http::StatusCode,

    /// Trace of the service layer this [`Error`] originated from, if any.
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// Human-readable description.
    pub message: String,
}

impl Error {
    /// Code of an [`Error::internal()`].
    pub const INTERNAL: Code = "INTERNAL_SERVER_ERROR";

    /// Creates a new [`Error`] without a backtrace.
    #[must_use]
    pub fn new(
        code: Code,
        status_code: http::StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            status_code,
            backtrace: None,
            message: message.into(),
        }
    }

    /// Creates a new [`Error`] for a failure the client cannot act upon.
    ///
    /// The `cause` is logged, while clients only see a generic message.
    #[must_use]
    pub fn internal(cause: &impl fmt::Display) -> Self {
        log::error!("internal error: {cause}");
        Self::new(
            Self::INTERNAL,
            http::StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(trace) = &self.backtrace {
            write!(f, "\n{}", trace.iter().join("\n"))?;
        }
        Ok(())
    }
}

impl<S> IntoFieldError<S> for Error
where
    S: From<String>,
{
    fn into_field_error(self) -> juniper::FieldError<S> {
        let mut ext = juniper::Object::with_capacity(2);
        _ = ext.add_field("code", juniper::Value::scalar(self.code.to_owned()));
        // Traces are exposed in debug builds only.
        if cfg!(debug_assertions) {
            if let Some(trace) = &self.backtrace {
                _ = ext.add_field(
                    "backtrace",
                    juniper::Value::list(
                        trace
                            .iter()
                            .map(|frame| juniper::Value::scalar(frame.to_string()))
                            .collect(),
                    ),
                );
            }
        }
        juniper::FieldError::new(self.message, juniper::Value::object(ext))
    }
}

/// Code of an [`Error`].
pub type Code = &'static str;

/// Conversion of a failure into an API [`Error`].
pub trait AsError {
    /// Returns the [`Error`] a client should see, or [`None`] if this failure
    /// is internal.
    fn try_as_error(&self) -> Option<Error>;

    /// Returns the [`Error`] a client should see, falling back to
    /// [`Error::internal()`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error().unwrap_or_else(|| Error::internal(&self))
    }

    /// Same as [`AsError::as_error()`], but consumes the failure, so fits
    /// into [`Result::map_err()`].
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        self.as_ref().try_as_error().map(|e| Error {
            backtrace: Some(self.trace().clone()),
            ..e
        })
    }
}

impl AsError for TypedHeaderRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::new(
            "BAD_REQUEST",
            http::StatusCode::BAD_REQUEST,
            self.to_string(),
        ))
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

#[cfg(test)]
mod spec {
    use juniper::{DefaultScalarValue, IntoFieldError};

    use super::{AsError, Error};

    crate::define_error! {
        enum TestError {
            #[code = "OUT_OF_STOCK"]
            #[status = CONFLICT]
            #[message = "`Product` is out of stock"]
            OutOfStock,
        }
    }

    #[test]
    fn defined_errors_carry_code_and_status() {
        let err = Error::from(TestError::OutOfStock);

        assert_eq!(err.code, "OUT_OF_STOCK");
        assert_eq!(err.status_code, http::StatusCode::CONFLICT);
        assert_eq!(err.message, "`Product` is out of stock");
        assert!(err.backtrace.is_none());
        assert_eq!(err.to_string(), "[OUT_OF_STOCK] `Product` is out of stock");
    }

    #[test]
    fn hides_internal_causes() {
        struct Broken;

        impl std::fmt::Display for Broken {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "connection refused by 10.0.0.7")
            }
        }

        impl AsError for Broken {
            fn try_as_error(&self) -> Option<Error> {
                None
            }
        }

        let err = Broken.into_error();

        assert_eq!(err.code, Error::INTERNAL);
        assert_eq!(err.status_code, http::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("10.0.0.7"));
    }

    #[test]
    fn exposes_code_in_extensions() {
        let field = IntoFieldError::<DefaultScalarValue>::into_field_error(
            Error::from(TestError::OutOfStock),
        );

        assert_eq!(field.message(), "`Product` is out of stock");
        let ext = field.extensions().as_object_value().unwrap();
        assert_eq!(
            ext.get_field_value("code").and_then(|v| v.as_string_value()),
            Some("OUT_OF_STOCK"),
        );
    }
}
