//! Sort keys and the ordering builder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ParseTokenError, Result};
use crate::expr::OrderKey;
use crate::path::resolve;
use crate::schema::Queryable;
use crate::settings::PafisoSettings;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(ParseTokenError {
                what: "sort order",
                token: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sorting {
    pub field: String,
    #[serde(default)]
    pub order: SortOrder,
}

impl Sorting {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Ascending)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Descending)
    }

    /// Builds from a `(field, order)` pair with a textual order.
    pub fn parse(field: &str, order: &str) -> Result<Self> {
        Ok(Self::new(field, order.parse::<SortOrder>()?))
    }

    pub fn build<T: Queryable + 'static>(&self, settings: &PafisoSettings) -> Result<OrderKey> {
        let path = resolve::<T>(&self.field, settings)?;
        if !path.kind().supports_ordering() {
            return Err(Error::unsupported(
                &self.field,
                self.order.as_str(),
                path.kind(),
            ));
        }
        Ok(OrderKey {
            path,
            order: self.order,
        })
    }
}
