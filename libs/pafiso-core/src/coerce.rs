//! Raw string → [`Value`] coercion.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::value::{FieldKind, Value};

/// Coerces `raw` into a value of `kind`.
///
/// `None` always yields [`Value::Null`]; callers decide whether a null
/// constant is legal for the operator at hand. [`FieldKind::Any`] switches
/// to [`infer`].
pub fn coerce(raw: Option<&str>, kind: FieldKind, field: &str) -> Result<Value> {
    let Some(raw) = raw else {
        return Ok(Value::Null);
    };
    let fail = || Error::coercion(field, Some(raw), kind);
    let s = raw.trim();

    let value = match kind {
        FieldKind::String => Value::String(raw.to_string()),
        FieldKind::I64 => Value::I64(s.parse::<i64>().map_err(|_| fail())?),
        FieldKind::F64 => Value::F64(parse_finite(s).ok_or_else(fail)?),
        FieldKind::Decimal => Value::Decimal(
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .map_err(|_| fail())?,
        ),
        FieldKind::Bool => Value::Bool(parse_bool(s).ok_or_else(fail)?),
        FieldKind::Uuid => Value::Uuid(Uuid::parse_str(s).map_err(|_| fail())?),
        FieldKind::DateTime => Value::DateTime(parse_datetime(s).ok_or_else(fail)?),
        FieldKind::Date => Value::Date(NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| fail())?),
        FieldKind::Time => Value::Time(parse_time(s).ok_or_else(fail)?),
        FieldKind::Enum(descriptor) => Value::Enum(descriptor.parse(s).ok_or_else(fail)?),
        FieldKind::Any => infer(raw),
        FieldKind::Object => return Err(fail()),
    };
    Ok(value)
}

/// Untyped inference: finite float, then bool, then integer, then the
/// string itself. The first successful parse wins.
pub fn infer(raw: &str) -> Value {
    let s = raw.trim();
    if let Some(n) = parse_finite(s) {
        return Value::F64(n);
    }
    if let Some(b) = parse_bool(s) {
        return Value::Bool(b);
    }
    if let Ok(n) = s.parse::<i64>() {
        return Value::I64(n);
    }
    Value::String(raw.to_string())
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}
