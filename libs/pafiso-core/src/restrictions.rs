use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, FieldUsage, Result};
use crate::search::SearchParameters;

/// Allow-lists for filtering and sorting. `None` leaves that usage
/// unrestricted. Fields are matched exactly as the caller supplied them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRestrictions {
    pub filtering: Option<BTreeSet<String>>,
    pub sorting: Option<BTreeSet<String>>,
}

impl FieldRestrictions {
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn allow_filtering<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filtering = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn allow_sorting<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sorting = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_allowed(&self, field: &str, usage: FieldUsage) -> bool {
        let list = match usage {
            FieldUsage::Filtering => &self.filtering,
            FieldUsage::Sorting => &self.sorting,
        };
        list.as_ref().map_or(true, |allowed| allowed.contains(field))
    }

    pub fn check(&self, field: &str, usage: FieldUsage) -> Result<()> {
        if self.is_allowed(field, usage) {
            Ok(())
        } else {
            Err(Error::FieldNotAllowed {
                field: field.to_string(),
                usage,
            })
        }
    }

    /// Checks every filter and sort field of `params`.
    pub fn check_all(&self, params: &SearchParameters) -> Result<()> {
        for f in params.filters() {
            self.check(&f.field, FieldUsage::Filtering)?;
        }
        for s in &params.sortings {
            self.check(&s.field, FieldUsage::Sorting)?;
        }
        Ok(())
    }
}
