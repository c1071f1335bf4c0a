//! Declared shape of queryable entities.
//!
//! A [`Schema`] lists the fields an entity exposes to the engine, their
//! kinds, optional external names, and nested entities. The resolver walks
//! schemas to turn a dotted field path into a [`crate::FieldPath`]; the
//! in-memory backend walks [`Queryable::field`] with the resolved declared
//! names.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::value::{EnumValue, FieldKind, Value};

#[derive(Clone, Copy, Debug)]
pub enum FieldType {
    Leaf(FieldKind),
    Nested(fn() -> &'static Schema),
}

#[derive(Clone, Debug)]
pub struct FieldDef {
    pub name: &'static str,
    /// External name honored when name overrides are enabled.
    pub rename: Option<&'static str>,
    pub ty: FieldType,
    pub nullable: bool,
}

impl FieldDef {
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            rename: None,
            ty: FieldType::Leaf(kind),
            nullable: false,
        }
    }

    pub fn nested(name: &'static str, schema: fn() -> &'static Schema) -> Self {
        Self {
            name,
            rename: None,
            ty: FieldType::Nested(schema),
            nullable: false,
        }
    }

    pub fn rename(mut self, external: &'static str) -> Self {
        self.rename = Some(external);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn kind(&self) -> FieldKind {
        match self.ty {
            FieldType::Leaf(kind) => kind,
            FieldType::Nested(_) => FieldKind::Object,
        }
    }
}

#[derive(Debug)]
pub struct Schema {
    name: &'static str,
    fields: Vec<FieldDef>,
}

impl Schema {
    pub fn builder(name: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            name,
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, declared: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == declared)
    }
}

pub struct SchemaBuilder {
    name: &'static str,
    fields: Vec<FieldDef>,
}

impl SchemaBuilder {
    pub fn field(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldDef::new(name, kind));
        self
    }

    pub fn optional(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldDef::new(name, kind).nullable());
        self
    }

    pub fn nested(mut self, name: &'static str, schema: fn() -> &'static Schema) -> Self {
        self.fields.push(FieldDef::nested(name, schema));
        self
    }

    pub fn with(mut self, def: FieldDef) -> Self {
        self.fields.push(def);
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            name: self.name,
            fields: self.fields,
        }
    }
}

/// Value of one field as reported by an entity.
pub enum FieldValue<'a> {
    Value(Value),
    Nested(Option<&'a dyn Queryable>),
    Missing,
}

impl<'a> FieldValue<'a> {
    pub fn nested<T: Queryable>(v: Option<&'a T>) -> Self {
        FieldValue::Nested(v.map(|x| x as &dyn Queryable))
    }
}

macro_rules! leaf_into_field_value {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue<'_> {
            fn from(v: $t) -> Self {
                FieldValue::Value(v.into())
            }
        })*
    };
}

leaf_into_field_value!(
    Value,
    &str,
    String,
    &String,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    bool,
    Decimal,
    Uuid,
    DateTime<Utc>,
    NaiveDate,
    NaiveTime,
    EnumValue
);

impl<T: Into<Value>> From<Option<T>> for FieldValue<'_> {
    fn from(v: Option<T>) -> Self {
        FieldValue::Value(v.into())
    }
}

/// Entity types the engine can filter and sort.
///
/// ```
/// use once_cell::sync::Lazy;
/// use pafiso_core::{FieldKind, FieldValue, Queryable, Schema};
///
/// struct Product {
///     name: String,
///     price: i64,
/// }
///
/// static PRODUCT: Lazy<Schema> = Lazy::new(|| {
///     Schema::builder("Product")
///         .field("name", FieldKind::String)
///         .field("price", FieldKind::I64)
///         .build()
/// });
///
/// impl Queryable for Product {
///     fn schema() -> &'static Schema {
///         &PRODUCT
///     }
///
///     fn field(&self, name: &str) -> FieldValue<'_> {
///         match name {
///             "name" => (&self.name).into(),
///             "price" => self.price.into(),
///             _ => FieldValue::Missing,
///         }
///     }
/// }
/// ```
pub trait Queryable {
    fn schema() -> &'static Schema
    where
        Self: Sized;

    /// Returns the field with the given declared name.
    fn field(&self, name: &str) -> FieldValue<'_>;
}
