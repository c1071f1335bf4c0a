use crate::error::Result;
use crate::expr::{OrderKey, Predicate};
use crate::paging::Paging;
use crate::schema::Queryable;

/// A deferred query plan over one entity type.
///
/// Implemented by the in-memory [`crate::Local`] plan and by remote
/// backends that lower the AST into their own query language. All methods
/// consume and return the plan so builds compose by value; `Clone` is what
/// lets one filtered plan fork into a count plan and an entries plan.
pub trait QuerySource: Clone + Sized {
    type Entity: Queryable + 'static;

    /// Whether case-insensitive equality and substring tests can be lowered
    /// to a native backend primitive.
    fn supports_native_match(&self) -> bool {
        false
    }

    /// Adds a predicate in conjunction with those already applied.
    fn filter(self, predicate: Predicate) -> Result<Self>;

    /// Sets the primary ordering, replacing any existing order.
    fn order_by(self, key: OrderKey) -> Result<Self>;

    /// Appends a secondary ordering key.
    fn then_by(self, key: OrderKey) -> Result<Self>;

    /// Skip-then-take window.
    fn window(self, paging: Paging) -> Result<Self>;
}
