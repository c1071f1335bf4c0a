//! SeaORM backend for pafiso query plans.
//!
//! [`SeaSource`] wraps a `Select<E>` together with a [`FieldMap`] that maps
//! declared field paths of `E::Model` to SQL member expressions. Predicates
//! lower to `sea_orm::Condition`, sort keys to `ORDER BY` and paging to
//! `OFFSET`/`LIMIT`; nothing executes until the caller runs the select, or
//! calls [`paginate`], which runs the count and entries plans concurrently.
//!
//! Case-insensitive equality and substring filters can be lowered through a
//! process-wide builder, see [`hook`].
//!
//! # Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use pafiso_core::{FieldRestrictions, Filter, FilterOperator, Paging, Queryable, SearchParameters};
//! use pafiso_db::{paginate, FieldMap};
//! use sea_orm::{DatabaseConnection, EntityTrait};
//!
//! async fn first_page<E>(db: &DatabaseConnection) -> pafiso_db::Result<()>
//! where
//!     E: EntityTrait,
//!     E::Model: Queryable + Send + Sync + 'static,
//! {
//!     let params = SearchParameters::new()
//!         .with_filter(Filter::new("name", FilterOperator::Contains, "lap"))
//!         .with_paging(Paging::from_page(0, 20));
//!
//!     let fields = Arc::new(FieldMap::<E>::from_entity());
//!     let page = paginate(E::find(), db, &params, fields, &FieldRestrictions::default(), None).await?;
//!     println!("{} of {}", page.entries.len(), page.total_entries);
//!     Ok(())
//! }
//! ```

pub mod condition;
pub mod error;
pub mod hook;
pub mod paginate;
pub mod source;

pub use condition::{predicate_to_condition, FieldMap};
pub use error::{DbError, Result};
pub use hook::{clear_case_insensitive_match, is_registered, like_match, register_case_insensitive_match};
pub use paginate::paginate;
pub use source::SeaSource;
