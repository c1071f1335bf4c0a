use thiserror::Error;

use crate::value::FieldKind;

/// Which operation a field was requested for; used by restriction errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldUsage {
    Filtering,
    Sorting,
}

impl std::fmt::Display for FieldUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldUsage::Filtering => f.write_str("filtering"),
            FieldUsage::Sorting => f.write_str("sorting"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown field '{field}' on {entity}")]
    UnknownField { entity: &'static str, field: String },

    #[error("field '{field}' is not allowed for {usage}")]
    FieldNotAllowed { field: String, usage: FieldUsage },

    #[error("cannot coerce {value} into {expected} for field '{field}'")]
    ValueCoercion {
        field: String,
        value: String,
        expected: FieldKind,
    },

    /// `kind` is `None` when the operator token itself is unknown.
    #[error("operator '{operator}' is not supported for field '{field}'")]
    UnsupportedOperator {
        field: String,
        operator: String,
        kind: Option<FieldKind>,
    },

    #[error(transparent)]
    InvalidToken(#[from] ParseTokenError),

    #[error("malformed expression: {0}")]
    MalformedExpression(String),

    #[error("invalid settings: {0}")]
    Config(#[from] Box<figment::Error>),
}

/// Failure to parse an operator or sort-order token.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown {what} '{token}'")]
pub struct ParseTokenError {
    pub what: &'static str,
    pub token: String,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn coercion(field: &str, raw: Option<&str>, expected: FieldKind) -> Self {
        Error::ValueCoercion {
            field: field.to_string(),
            value: match raw {
                Some(s) => format!("'{s}'"),
                None => "null".to_string(),
            },
            expected,
        }
    }

    pub(crate) fn unsupported(field: &str, operator: impl Into<String>, kind: FieldKind) -> Self {
        Error::UnsupportedOperator {
            field: field.to_string(),
            operator: operator.into(),
            kind: Some(kind),
        }
    }

    /// `true` for errors caused by the request itself; `false` for
    /// programming and configuration errors.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Error::MalformedExpression(_) | Error::Config(_))
    }
}
