//! [`Dashboard`] report definition.

use std::sync::OnceLock;

use common::Money;
use juniper::graphql_object;
use service::query;

use crate::{api, Context};

/// Administrative overview of the store.
#[derive(Clone, Debug)]
pub struct Dashboard {
    /// Underlying [`query::report::dashboard::Output`].
    output: query::report::dashboard::Output,

    /// Most recent [`api::Order`]s of this report.
    recent_orders: OnceLock<Vec<api::Order>>,
}

impl From<query::report::dashboard::Output> for Dashboard {
    fn from(output: query::report::dashboard::Output) -> Self {
        Self {
            output,
            recent_orders: OnceLock::new(),
        }
    }
}

/// Administrative overview of the store.
#[graphql_object(name = "DashboardReport", context = Context)]
impl Dashboard {
    /// Total number of `Product`s in the catalog.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "DashboardReport.totalProducts",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn total_products(&self) -> i32 {
        saturate(self.output.total_products.into())
    }

    /// Total number of placed `Order`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "DashboardReport.totalOrders",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn total_orders(&self) -> i32 {
        saturate(self.output.total_orders.into())
    }

    /// Sum of all the paid `Order`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "DashboardReport.totalRevenue",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn total_revenue(&self) -> Money {
        self.output.total_revenue.into()
    }

    /// Most recent `Order`s, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "DashboardReport.recentOrders",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn recent_orders(&self) -> &[api::Order] {
        self.recent_orders
            .get_or_init(|| {
                self.output
                    .recent_orders
                    .iter()
                    .cloned()
                    .map(api::Order::from)
                    .collect()
            })
            .as_slice()
    }
}

/// Converts the provided count into GraphQL `Int`, saturating on overflow.
fn saturate(count: i64) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod spec {
    use super::saturate;

    #[test]
    fn saturates_huge_counts() {
        assert_eq!(saturate(7), 7);
        assert_eq!(saturate(i64::MAX), i32::MAX);
    }
}
