//! GraphQL API of the storefront built on top of the [`Service`].

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod api;
pub mod args;
pub mod config;
mod context;
pub mod error;

use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    Extension, Json,
};
use derive_more::Debug;
use juniper::{http::GraphQLBatchResponse, DefaultScalarValue, ScalarValue};
use juniper_axum::extract::JuniperRequest;
// Used in binary.
use axum_client_ip as _;
use refinery as _;
use tower_http as _;
use tracing_subscriber as _;

pub use self::{
    args::Args,
    config::Config,
    context::{Context, Session},
    error::{AsError, Error},
};

/// [`service::Service`] backed by [`service::infra::Postgres`].
pub type Service = service::Service<service::infra::Postgres>;

/// HTTP response of the GraphQL endpoint.
#[derive(Debug)]
pub struct GraphQlResponse<S = DefaultScalarValue>
where
    S: ScalarValue,
{
    /// [`http::StatusCode`] to answer with if the request failed as a whole.
    pub error_status: http::StatusCode,

    /// Results of the executed GraphQL operations.
    #[debug(skip)]
    pub batch: GraphQLBatchResponse<S>,
}

impl<S> GraphQlResponse<S>
where
    S: ScalarValue,
{
    /// Returns the [`http::StatusCode`] this response is sent with.
    #[must_use]
    pub fn status(&self) -> http::StatusCode {
        if self.batch.is_ok() {
            http::StatusCode::OK
        } else {
            self.error_status
        }
    }
}

impl<S> IntoResponse for GraphQlResponse<S>
where
    S: ScalarValue,
{
    fn into_response(self) -> Response {
        (self.status(), Json(self.batch)).into_response()
    }
}

/// Executes the GraphQL request against the storefront [`api::Schema`].
pub async fn graphql(
    Extension(schema): Extension<Arc<api::Schema>>,
    ctx: Context,
    JuniperRequest(req): JuniperRequest,
) -> GraphQlResponse {
    let batch = req.execute(&*schema, &ctx).await;
    GraphQlResponse {
        error_status: ctx.error_status_code(),
        batch,
    }
}

#[cfg(test)]
mod spec {
    use juniper::{
        http::{GraphQLBatchResponse, GraphQLResponse},
        GraphQLError, Value,
    };

    use super::GraphQlResponse;

    #[test]
    fn answers_ok_when_executed() {
        let resp: GraphQlResponse = GraphQlResponse {
            error_status: http::StatusCode::UNAUTHORIZED,
            batch: GraphQLBatchResponse::Single(GraphQLResponse::from_result(
                Ok((Value::null(), vec![])),
            )),
        };

        assert_eq!(resp.status(), http::StatusCode::OK);
    }

    #[test]
    fn answers_error_status_when_not_executed() {
        let resp: GraphQlResponse = GraphQlResponse {
            error_status: http::StatusCode::BAD_REQUEST,
            batch: GraphQLBatchResponse::Single(GraphQLResponse::from_result(
                Err(GraphQLError::NoOperationProvided),
            )),
        };

        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);
    }
}
