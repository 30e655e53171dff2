//! [`Dashboard`] definition.

use common::operations::{By, Select};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{order::PaymentStatus, Product};
use crate::{
    domain::Order,
    infra::{database, Database},
    read, Query, Service,
};

/// [`Query`] to build the administrative overview of the store.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dashboard;

impl Dashboard {
    /// Number of the most recent [`Order`]s included into the [`Output`].
    pub const RECENT_ORDERS: usize = 5;
}

/// Output of the [`Dashboard`] [`Query`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Total count of [`Product`]s.
    pub total_products: read::product::list::TotalCount,

    /// Total count of [`Order`]s.
    pub total_orders: read::order::list::TotalCount,

    /// Sum of the [`Order`]s with the [`PaymentStatus::Paid`].
    pub total_revenue: read::order::list::Revenue,

    /// [`Dashboard::RECENT_ORDERS`] most recent [`Order`]s.
    pub recent_orders: Vec<Order>,
}

impl<Db> Query<Dashboard> for Service<Db>
where
    Db: Database<
            Select<
                By<
                    read::product::list::TotalCount,
                    read::product::list::Filter,
                >,
            >,
            Ok = read::product::list::TotalCount,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::order::list::TotalCount, ()>>,
            Ok = read::order::list::TotalCount,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::order::list::Revenue, ()>>,
            Ok = read::order::list::Revenue,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Order>, read::order::list::Selector>>,
            Ok = Vec<Order>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Dashboard) -> Result<Self::Ok, Self::Err> {
        let total_products = self
            .database()
            .execute(Select(By::new(read::product::list::Filter::default())))
            .await
            .map_err(tracerr::wrap!())?;
        let total_orders = self
            .database()
            .execute(Select(By::<read::order::list::TotalCount, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;
        let total_revenue = self
            .database()
            .execute(Select(By::<read::order::list::Revenue, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;
        let recent_orders = self
            .database()
            .execute(Select(By::new(read::order::list::Selector {
                limit: Some(Dashboard::RECENT_ORDERS),
            })))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Output {
            total_products,
            total_orders,
            total_revenue,
            recent_orders,
        })
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::operations::Insert;

    use crate::{
        domain::{
            order::{self, PaymentStatus},
            product::{self, spec::money},
        },
        infra::{Database as _, Memory},
        read::order::list::Revenue,
        Query as _, Service,
    };

    use super::Dashboard;

    #[tokio::test]
    async fn summarizes_store() {
        let db = Memory::new();
        let svc = Service::in_memory(db.clone());
        for name in ["Lamp", "Sofa"] {
            db.execute(Insert(product::spec::product(name, "10")))
                .await
                .unwrap();
        }
        let mut ids = vec![];
        for (i, (total, status)) in [
            ("100", PaymentStatus::Paid),
            ("20.50", PaymentStatus::Paid),
            ("999", PaymentStatus::Pending),
            ("5", PaymentStatus::Refunded),
            ("1", PaymentStatus::Paid),
            ("2", PaymentStatus::Failed),
        ]
        .into_iter()
        .enumerate()
        {
            let mut o = order::spec::order(total, status);
            o.created_at = (o.created_at
                + Duration::from_secs(u64::try_from(i).unwrap()))
            .coerce();
            ids.push(o.id);
            db.execute(Insert(o)).await.unwrap();
        }

        let out = svc.execute(Dashboard).await.unwrap();

        assert_eq!(i64::from(out.total_products), 2);
        assert_eq!(i64::from(out.total_orders), 6);
        assert_eq!(out.total_revenue, Revenue::from(money("121.50")));
        assert_eq!(
            out.recent_orders.iter().map(|o| o.id).collect::<Vec<_>>(),
            ids.into_iter().rev().take(5).collect::<Vec<_>>(),
        );
    }
}
