use std::sync::Arc;

use pafiso_core::{Error, OrderKey, Paging, Predicate, QuerySource, Queryable, SortOrder};
use sea_orm::sea_query::{NullOrdering, Order, OrderedStatement};
use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, Select};

use crate::condition::{predicate_to_condition, FieldMap};
use crate::hook;

/// A `Select<E>` driven through [`QuerySource`].
///
/// Ordering places nulls first when ascending and last when descending,
/// which matches the in-memory backend. Filters must be added before the
/// window. `backend` selects dialect-specific lowerings and should match the
/// connection the select runs on.
pub struct SeaSource<E: EntityTrait> {
    select: Select<E>,
    fields: Arc<FieldMap<E>>,
    backend: DbBackend,
    ordered: bool,
    windowed: bool,
}

impl<E: EntityTrait> Clone for SeaSource<E> {
    fn clone(&self) -> Self {
        Self {
            select: self.select.clone(),
            fields: Arc::clone(&self.fields),
            backend: self.backend,
            ordered: self.ordered,
            windowed: self.windowed,
        }
    }
}

impl<E: EntityTrait> SeaSource<E> {
    pub fn new(select: Select<E>, fields: Arc<FieldMap<E>>, backend: DbBackend) -> Self {
        Self {
            select,
            fields,
            backend,
            ordered: false,
            windowed: false,
        }
    }

    pub fn select(&self) -> &Select<E> {
        &self.select
    }

    pub fn into_select(self) -> Select<E> {
        self.select
    }

    fn push_order(mut self, key: &OrderKey) -> Result<Self, Error>
    where
        E::Model: Queryable,
    {
        let member = self.fields.member(&key.path, entity_name::<E>())?;
        let (order, nulls) = match key.order {
            SortOrder::Ascending => (Order::Asc, NullOrdering::First),
            SortOrder::Descending => (Order::Desc, NullOrdering::Last),
        };
        self.select = self.select.order_by_with_nulls(member, order, nulls);
        self.ordered = true;
        Ok(self)
    }
}

fn entity_name<E: EntityTrait>() -> &'static str
where
    E::Model: Queryable,
{
    <E::Model as Queryable>::schema().name()
}

impl<E> QuerySource for SeaSource<E>
where
    E: EntityTrait,
    E::Model: Queryable + 'static,
{
    type Entity = E::Model;

    fn supports_native_match(&self) -> bool {
        hook::is_registered()
    }

    fn filter(mut self, predicate: Predicate) -> Result<Self, Error> {
        if self.windowed {
            return Err(Error::MalformedExpression(
                "filter after window is not expressible in SQL".into(),
            ));
        }
        let cond = predicate_to_condition(&predicate, &self.fields, entity_name::<E>(), self.backend)?;
        self.select = self.select.filter(cond);
        Ok(self)
    }

    fn order_by(mut self, key: OrderKey) -> Result<Self, Error> {
        QueryTrait::query(&mut self.select).clear_order_by();
        self.ordered = false;
        self.push_order(&key)
    }

    fn then_by(self, key: OrderKey) -> Result<Self, Error> {
        if !self.ordered {
            return Err(Error::MalformedExpression(format!(
                "then_by on '{}' without a preceding order_by",
                key.path.raw()
            )));
        }
        self.push_order(&key)
    }

    fn window(mut self, paging: Paging) -> Result<Self, Error> {
        self.select = self.select.offset(paging.skip).limit(paging.take);
        self.windowed = true;
        Ok(self)
    }
}
