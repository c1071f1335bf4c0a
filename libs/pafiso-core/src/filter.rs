//! Filter clauses and the predicate builder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coerce::coerce;
use crate::error::{Error, ParseTokenError, Result};
use crate::expr::{CompareOp, MatchKind, Predicate};
use crate::path::resolve;
use crate::schema::Queryable;
use crate::settings::PafisoSettings;
use crate::value::{FieldKind, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterThanOrEquals,
    LessThanOrEquals,
    Contains,
    NotContains,
    Null,
    NotNull,
}

impl FilterOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOperator::Equals => "eq",
            FilterOperator::NotEquals => "ne",
            FilterOperator::GreaterThan => "gt",
            FilterOperator::LessThan => "lt",
            FilterOperator::GreaterThanOrEquals => "ge",
            FilterOperator::LessThanOrEquals => "le",
            FilterOperator::Contains => "contains",
            FilterOperator::NotContains => "notcontains",
            FilterOperator::Null => "null",
            FilterOperator::NotNull => "notnull",
        }
    }

    fn compare_op(self) -> Option<CompareOp> {
        match self {
            FilterOperator::Equals => Some(CompareOp::Eq),
            FilterOperator::NotEquals => Some(CompareOp::Ne),
            FilterOperator::GreaterThan => Some(CompareOp::Gt),
            FilterOperator::LessThan => Some(CompareOp::Lt),
            FilterOperator::GreaterThanOrEquals => Some(CompareOp::Ge),
            FilterOperator::LessThanOrEquals => Some(CompareOp::Le),
            _ => None,
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = ParseTokenError;

    /// Accepts variant names and short tokens, ignoring ASCII case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let op = match s.trim().to_ascii_lowercase().as_str() {
            "eq" | "equals" => FilterOperator::Equals,
            "ne" | "notequals" => FilterOperator::NotEquals,
            "gt" | "greaterthan" => FilterOperator::GreaterThan,
            "lt" | "lessthan" => FilterOperator::LessThan,
            "ge" | "gte" | "greaterthanorequals" => FilterOperator::GreaterThanOrEquals,
            "le" | "lte" | "lessthanorequals" => FilterOperator::LessThanOrEquals,
            "contains" => FilterOperator::Contains,
            "notcontains" => FilterOperator::NotContains,
            "null" => FilterOperator::Null,
            "notnull" => FilterOperator::NotNull,
            _ => {
                return Err(ParseTokenError {
                    what: "filter operator",
                    token: s.to_string(),
                })
            }
        };
        Ok(op)
    }
}

/// One predicate clause over a field path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: Option<String>,
}

impl Filter {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: Some(value.into()),
        }
    }

    /// A clause with no constant, e.g. `Null`/`NotNull`.
    pub fn without_value(field: impl Into<String>, operator: FilterOperator) -> Self {
        Self {
            field: field.into(),
            operator,
            value: None,
        }
    }

    /// Builds a clause from a `(field, operator, value)` triple with a
    /// textual operator.
    pub fn parse(field: &str, operator: &str, value: Option<&str>) -> Result<Self> {
        let op = operator.parse::<FilterOperator>().map_err(|e| Error::UnsupportedOperator {
            field: field.to_string(),
            operator: e.token,
            kind: None,
        })?;
        Ok(Self {
            field: field.to_string(),
            operator: op,
            value: value.map(str::to_string),
        })
    }

    /// Operator after the `Equals(None)` → `Null` and `NotEquals(None)` →
    /// `NotNull` reinterpretation.
    pub fn effective_operator(&self) -> FilterOperator {
        match (self.operator, &self.value) {
            (FilterOperator::Equals, None) => FilterOperator::Null,
            (FilterOperator::NotEquals, None) => FilterOperator::NotNull,
            (op, _) => op,
        }
    }

    /// Builds the predicate for entity `T`.
    ///
    /// `native_match` says whether case-insensitive equality and substring
    /// tests may be delegated to the target backend's native primitive.
    pub fn build<T: Queryable + 'static>(
        &self,
        settings: &PafisoSettings,
        native_match: bool,
    ) -> Result<Predicate> {
        let path = resolve::<T>(&self.field, settings)?;
        let kind = path.kind();
        let op = self.effective_operator();
        let delegate = native_match && settings.use_native_case_insensitive_match;

        match op {
            FilterOperator::Null | FilterOperator::NotNull => {
                if !kind.supports_null_check() {
                    return Err(Error::unsupported(&self.field, op.as_str(), kind));
                }
                Ok(Predicate::IsNull {
                    path,
                    negated: op == FilterOperator::NotNull,
                })
            }
            FilterOperator::Contains | FilterOperator::NotContains => {
                if !kind.supports_substring() {
                    return Err(Error::unsupported(&self.field, op.as_str(), kind));
                }
                let needle = self.require_value(kind)?;
                let negated = op == FilterOperator::NotContains;
                let fold_case = settings.ignores_case();

                if fold_case && delegate {
                    return Ok(Predicate::Match {
                        path,
                        kind: MatchKind::Substring,
                        value: needle.to_string(),
                        negated,
                    });
                }
                Ok(Predicate::Contains {
                    path,
                    needle: if fold_case {
                        needle.to_lowercase()
                    } else {
                        needle.to_string()
                    },
                    fold_case,
                    negated,
                })
            }
            _ => {
                let cmp = op
                    .compare_op()
                    .ok_or_else(|| Error::MalformedExpression(format!("no comparison for {op}")))?;
                if kind == FieldKind::Object || (!cmp.is_equality() && !kind.supports_ordering()) {
                    return Err(Error::unsupported(&self.field, op.as_str(), kind));
                }

                let raw = self.require_value(kind)?;
                let value = coerce(Some(raw), kind, &self.field)?;
                let is_string = matches!(value, Value::String(_));
                let text = (kind == FieldKind::Any && !is_string).then(|| raw.to_string());
                let fold_case = settings.ignores_case() && (is_string || text.is_some());

                if fold_case && is_string && delegate && cmp.is_equality() {
                    return Ok(Predicate::Match {
                        path,
                        kind: MatchKind::Exact,
                        value: raw.to_string(),
                        negated: cmp == CompareOp::Ne,
                    });
                }
                let value = match value {
                    Value::String(s) if fold_case => Value::String(s.to_lowercase()),
                    other => other,
                };
                let text = text.map(|t| if fold_case { t.to_lowercase() } else { t });
                Ok(Predicate::Compare {
                    path,
                    op: cmp,
                    value,
                    text,
                    fold_case,
                })
            }
        }
    }

    fn require_value(&self, kind: FieldKind) -> Result<&str> {
        self.value
            .as_deref()
            .ok_or_else(|| Error::coercion(&self.field, None, kind))
    }
}
