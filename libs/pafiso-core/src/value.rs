//! Runtime values and the field kinds they are coerced into.
//!
//! [`FieldKind`] is what the resolver reports for a field path; it drives
//! both coercion of raw strings and the capability checks the builders
//! perform (ordering, substring match, null check). [`Value`] is the owned
//! runtime representation used for constants inside predicates and for the
//! values an entity reports through [`crate::Queryable`].

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

/// A declared enum variant. `label` is the external string form (if any);
/// `name` is the declared variant name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EnumVariant {
    pub name: &'static str,
    pub label: Option<&'static str>,
}

impl EnumVariant {
    pub const fn new(name: &'static str) -> Self {
        Self { name, label: None }
    }

    pub const fn labeled(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label: Some(label),
        }
    }
}

/// Static description of an enum type usable as a field kind.
/// Variant order defines the ordering of enum values.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct EnumDescriptor {
    pub name: &'static str,
    pub variants: &'static [EnumVariant],
}

impl EnumDescriptor {
    /// Finds a variant by declared label first, then by variant name.
    /// Both lookups ignore ASCII case.
    pub fn parse(&'static self, raw: &str) -> Option<EnumValue> {
        let raw = raw.trim();
        self.variants
            .iter()
            .position(|v| v.label.is_some_and(|l| l.eq_ignore_ascii_case(raw)))
            .or_else(|| {
                self.variants
                    .iter()
                    .position(|v| v.name.eq_ignore_ascii_case(raw))
            })
            .map(|index| EnumValue {
                descriptor: self,
                index,
            })
    }

    pub fn value(&'static self, index: usize) -> Option<EnumValue> {
        (index < self.variants.len()).then_some(EnumValue {
            descriptor: self,
            index,
        })
    }
}

/// Implemented by user enums that appear as entity fields.
///
/// ```
/// use pafiso_core::{EnumDescriptor, EnumVariant, QueryEnum};
///
/// enum Status {
///     Draft,
///     Published,
/// }
///
/// static STATUS: EnumDescriptor = EnumDescriptor {
///     name: "Status",
///     variants: &[EnumVariant::new("Draft"), EnumVariant::labeled("Published", "live")],
/// };
///
/// impl QueryEnum for Status {
///     fn descriptor() -> &'static EnumDescriptor {
///         &STATUS
///     }
///     fn variant_index(&self) -> usize {
///         match self {
///             Status::Draft => 0,
///             Status::Published => 1,
///         }
///     }
/// }
///
/// assert_eq!(Status::Published.to_value().as_enum().unwrap().name(), "Published");
/// ```
pub trait QueryEnum {
    fn descriptor() -> &'static EnumDescriptor
    where
        Self: Sized;

    fn variant_index(&self) -> usize;

    fn to_value(&self) -> Value
    where
        Self: Sized,
    {
        Value::Enum(EnumValue {
            descriptor: Self::descriptor(),
            index: self.variant_index(),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EnumValue {
    descriptor: &'static EnumDescriptor,
    index: usize,
}

impl EnumValue {
    pub fn descriptor(&self) -> &'static EnumDescriptor {
        self.descriptor
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.variants[self.index].name
    }

    pub fn label(&self) -> Option<&'static str> {
        self.descriptor.variants[self.index].label
    }
}

/// Type of a resolved field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    I64,
    F64,
    Decimal,
    Bool,
    Uuid,
    DateTime,
    Date,
    Time,
    Enum(&'static EnumDescriptor),
    /// Not statically known; constants are inferred from the raw string.
    Any,
    /// A nested entity; only null checks apply.
    Object,
}

impl FieldKind {
    pub fn supports_ordering(self) -> bool {
        !matches!(self, FieldKind::Object)
    }

    pub fn supports_substring(self) -> bool {
        matches!(self, FieldKind::String | FieldKind::Any)
    }

    pub fn supports_null_check(self) -> bool {
        true
    }

    pub fn is_string(self) -> bool {
        matches!(self, FieldKind::String)
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::String => f.write_str("string"),
            FieldKind::I64 => f.write_str("integer"),
            FieldKind::F64 => f.write_str("float"),
            FieldKind::Decimal => f.write_str("decimal"),
            FieldKind::Bool => f.write_str("bool"),
            FieldKind::Uuid => f.write_str("uuid"),
            FieldKind::DateTime => f.write_str("datetime"),
            FieldKind::Date => f.write_str("date"),
            FieldKind::Time => f.write_str("time"),
            FieldKind::Enum(d) => write!(f, "enum {}", d.name),
            FieldKind::Any => f.write_str("untyped"),
            FieldKind::Object => f.write_str("object"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    String(String),
    I64(i64),
    F64(f64),
    Decimal(Decimal),
    Bool(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    Time(NaiveTime),
    Enum(EnumValue),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<EnumValue> {
        match self {
            Value::Enum(e) => Some(*e),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::String(_) => "string",
            Value::I64(_) => "integer",
            Value::F64(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Bool(_) => "bool",
            Value::Uuid(_) => "uuid",
            Value::DateTime(_) => "datetime",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Enum(_) => "enum",
        }
    }

    /// Compares two non-null values. Numbers compare across representations;
    /// an enum compares with a string by variant name. Returns `None` on a
    /// type mismatch, NaN, or when either side is null.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        use Value as V;
        match (self, other) {
            (V::String(a), V::String(b)) => Some(a.cmp(b)),
            (V::Bool(a), V::Bool(b)) => Some(a.cmp(b)),
            (V::Uuid(a), V::Uuid(b)) => Some(a.cmp(b)),
            (V::DateTime(a), V::DateTime(b)) => Some(a.cmp(b)),
            (V::Date(a), V::Date(b)) => Some(a.cmp(b)),
            (V::Time(a), V::Time(b)) => Some(a.cmp(b)),
            (V::Enum(a), V::Enum(b)) if a.descriptor == b.descriptor => Some(a.index.cmp(&b.index)),
            (V::Enum(a), V::String(b)) => Some(a.name().cmp(b.as_str())),
            (V::String(a), V::Enum(b)) => Some(a.as_str().cmp(b.name())),

            (V::I64(a), V::I64(b)) => Some(a.cmp(b)),
            (V::F64(a), V::F64(b)) => a.partial_cmp(b),
            (V::Decimal(a), V::Decimal(b)) => Some(a.cmp(b)),
            (V::I64(a), V::Decimal(b)) => Some(Decimal::from(*a).cmp(b)),
            (V::Decimal(a), V::I64(b)) => Some(a.cmp(&Decimal::from(*b))),
            (V::I64(a), V::F64(b)) => (*a as f64).partial_cmp(b),
            (V::F64(a), V::I64(b)) => a.partial_cmp(&(*b as f64)),
            (V::F64(a), V::Decimal(b)) => a.partial_cmp(&b.to_f64()?),
            (V::Decimal(a), V::F64(b)) => a.to_f64()?.partial_cmp(b),

            _ => None,
        }
    }

    /// Total order used for sorting: nulls first, incomparable values equal.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (a, b) => a.compare(b).unwrap_or(Ordering::Equal),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::String(s) => write!(f, "'{s}'"),
            Value::I64(n) => write!(f, "{n}"),
            Value::F64(n) => write!(f, "{n}"),
            Value::Decimal(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Uuid(u) => write!(f, "{u}"),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::Date(d) => write!(f, "{d}"),
            Value::Time(t) => write!(f, "{t}"),
            Value::Enum(e) => f.write_str(e.name()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

macro_rules! int_into_value {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::I64(i64::from(n))
            }
        })*
    };
}

int_into_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::F64(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::F64(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(t)
    }
}

impl From<EnumValue> for Value {
    fn from(e: EnumValue) -> Self {
        Value::Enum(e)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
