//! Runtime filter, sort and paging expressions over arbitrary entity types.
//!
//! Callers describe entities with a [`Schema`] and the [`Queryable`] trait,
//! collect stringly-typed [`Filter`]s, [`Sorting`]s and an optional
//! [`Paging`] into [`SearchParameters`], and apply them to any
//! [`QuerySource`]. The result is two deferred plans over the same entity
//! type: a count plan (filters only) and an entries plan (filters, order,
//! window).
//!
//! ```
//! use once_cell::sync::Lazy;
//! use pafiso_core::*;
//!
//! #[derive(Clone)]
//! struct Product {
//!     name: String,
//!     price: i64,
//! }
//!
//! static PRODUCT: Lazy<Schema> = Lazy::new(|| {
//!     Schema::builder("Product")
//!         .field("name", FieldKind::String)
//!         .field("price", FieldKind::I64)
//!         .build()
//! });
//!
//! impl Queryable for Product {
//!     fn schema() -> &'static Schema {
//!         &PRODUCT
//!     }
//!     fn field(&self, name: &str) -> FieldValue<'_> {
//!         match name {
//!             "name" => (&self.name).into(),
//!             "price" => self.price.into(),
//!             _ => FieldValue::Missing,
//!         }
//!     }
//! }
//!
//! let products = vec![
//!     Product { name: "Laptop".into(), price: 1200 },
//!     Product { name: "Mouse".into(), price: 25 },
//!     Product { name: "Lamp".into(), price: 40 },
//! ];
//!
//! let params = SearchParameters::new()
//!     .with_filter(Filter::new("price", FilterOperator::GreaterThan, "30"))
//!     .with_sorting(Sorting::desc("price"))
//!     .with_paging(Paging::from_page(0, 1));
//!
//! let page = PagedList::from_local(&products, &params, &FieldRestrictions::default(), None)?;
//! assert_eq!(page.total_entries, 2);
//! assert_eq!(page.entries[0].name, "Laptop");
//! # Ok::<(), pafiso_core::Error>(())
//! ```

pub mod coerce;
pub mod error;
pub mod expr;
pub mod filter;
pub mod local;
pub mod paging;
pub mod path;
pub mod restrictions;
pub mod schema;
pub mod search;
pub mod settings;
pub mod sorting;
pub mod source;
pub mod value;

pub use coerce::{coerce, infer};
pub use error::{Error, FieldUsage, ParseTokenError, Result};
pub use expr::{CompareOp, MatchKind, OrderKey, Predicate};
pub use filter::{Filter, FilterOperator};
pub use local::Local;
pub use paging::{PagedList, Paging};
pub use path::{resolve, FieldPath};
pub use restrictions::FieldRestrictions;
pub use schema::{FieldDef, FieldType, FieldValue, Queryable, Schema, SchemaBuilder};
pub use search::SearchParameters;
pub use settings::{NamingPolicy, PafisoSettings, StringComparison};
pub use sorting::{SortOrder, Sorting};
pub use source::QuerySource;
pub use value::{EnumDescriptor, EnumValue, EnumVariant, FieldKind, QueryEnum, Value};
