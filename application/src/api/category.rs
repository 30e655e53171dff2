//! [`Category`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    Context,
};

/// A category grouping `Product`s.
#[derive(Clone, Debug, From)]
pub struct Category(domain::Category);

/// A category grouping `Product`s.
#[graphql_object(context = Context)]
impl Category {
    /// Unique identifier of this `Category`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Category.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Name of this `Category`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Category.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn name(&self) -> Name {
        self.0.name.clone().into()
    }

    /// URL-friendly unique identifier of this `Category`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Category.slug",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn slug(&self) -> Slug {
        self.0.slug.clone().into()
    }

    /// Description of this `Category`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Category.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn description(&self) -> Option<Description> {
        self.0.description.clone().map(Into::into)
    }

    /// Cover image of this `Category`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Category.image",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn image(&self) -> Option<scalar::Image> {
        self.0.image.clone().map(Into::into)
    }

    /// `DateTime` when this `Category` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Category.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `Category`.
#[derive(Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[from(domain::category::Id)]
#[into(domain::category::Id)]
#[graphql(name = "CategoryId", transparent)]
pub struct Id(Uuid);

/// Name of a `Category`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CategoryName",
    with = scalar::Via::<domain::category::Name>,
)]
pub struct Name(domain::category::Name);

/// Slug of a `Category`: lowercase alphanumeric words joined with dashes.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CategorySlug",
    with = scalar::Via::<domain::category::Slug>,
)]
pub struct Slug(domain::category::Slug);

/// Description of a `Category`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CategoryDescription",
    with = scalar::Via::<domain::category::Description>,
)]
pub struct Description(domain::category::Description);
