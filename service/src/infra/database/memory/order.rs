//! [`Order`]-related [`Memory`] implementations.

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use tracerr::Traced;

use crate::{
    domain::{order, Order},
    infra::{database, Database},
    read,
};

use super::Memory;

impl Database<Select<By<Option<Order>, order::Id>>> for Memory {
    type Ok = Option<Order>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Order>, order::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.state().orders.iter().find(|o| o.id == id).cloned())
    }
}

impl Database<Select<By<Vec<Order>, read::order::list::Selector>>> for Memory {
    type Ok = Vec<Order>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Order>, read::order::list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::order::list::Selector { limit } = by.into_inner();

        let mut orders = self.state().orders.clone();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit {
            orders.truncate(limit);
        }
        Ok(orders)
    }
}

impl Database<Select<By<read::order::list::TotalCount, ()>>> for Memory {
    type Ok = read::order::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<read::order::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let count = self.state().orders.len();
        Ok(i64::try_from(count).unwrap_or(i64::MAX).into())
    }
}

impl Database<Select<By<read::order::list::Revenue, ()>>> for Memory {
    type Ok = read::order::list::Revenue;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<read::order::list::Revenue, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .state()
            .orders
            .iter()
            .filter(|o| o.payment_status == order::PaymentStatus::Paid)
            .map(|o| o.total)
            .fold(Money::ZERO, Money::saturating_add)
            .into())
    }
}

impl Database<Insert<Order>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(order): Insert<Order>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state().orders.push(order);
        Ok(())
    }
}

impl Database<Update<Order>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(order): Update<Order>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state();
        if let Some(stored) = state.orders.iter_mut().find(|o| o.id == order.id)
        {
            *stored = order;
        } else {
            state.orders.push(order);
        }
        Ok(())
    }
}

impl Database<Lock<By<Order, order::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Order, order::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}
