//! [`Product`]- and [`Category`]-related [`Memory`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{category, product, Category, Product},
    infra::{database, Database},
    read,
};

use super::Memory;

impl Database<Select<By<Option<Product>, product::Id>>> for Memory {
    type Ok = Option<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Product>, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.state().products.iter().find(|p| p.id == id).cloned())
    }
}

impl Database<Select<By<Vec<Product>, read::product::list::Selector>>>
    for Memory
{
    type Ok = Vec<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Product>, read::product::list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::product::list::Selector {
            arguments,
            filter,
            order,
        } = by.into_inner();

        let state = self.state();
        let mut found = state
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .collect::<Vec<_>>();
        found.sort_by(|a, b| order.compare(a, b));

        Ok(arguments.page(found).cloned().collect())
    }
}

impl
    Database<
        Select<
            By<read::product::list::TotalCount, read::product::list::Filter>,
        >,
    > for Memory
{
    type Ok = read::product::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::product::list::TotalCount, read::product::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        let count = self
            .state()
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX).into())
    }
}

impl Database<Insert<Product>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(product): Insert<Product>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state().products.push(product);
        Ok(())
    }
}

impl Database<Update<Product>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(product): Update<Product>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state();
        if let Some(stored) =
            state.products.iter_mut().find(|p| p.id == product.id)
        {
            *stored = product;
        } else {
            state.products.push(product);
        }
        Ok(())
    }
}

impl Database<Delete<By<Product, product::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Product, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.state().products.retain(|p| p.id != id);
        Ok(())
    }
}

impl Database<Lock<By<Product, product::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Product, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Select<By<Vec<Category>, ()>>> for Memory {
    type Ok = Vec<Category>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Category>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().categories.clone())
    }
}

impl<'s> Database<Select<By<Option<Category>, &'s category::Slug>>> for Memory {
    type Ok = Option<Category>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Category>, &'s category::Slug>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slug = by.into_inner();
        Ok(self
            .state()
            .categories
            .iter()
            .find(|c| &c.slug == slug)
            .cloned())
    }
}

impl Database<Insert<Category>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(category): Insert<Category>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state().categories.push(category);
        Ok(())
    }
}
