//! Aggregate of filters, sort keys and paging applied to a source in one go.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::filter::Filter;
use crate::paging::Paging;
use crate::restrictions::FieldRestrictions;
use crate::schema::Queryable;
use crate::settings::PafisoSettings;
use crate::sorting::{SortOrder, Sorting};
use crate::source::QuerySource;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParameters {
    /// Ordered set: inserting a filter equal to an existing one is a no-op.
    #[serde(default, deserialize_with = "dedup_filters")]
    filters: Vec<Filter>,
    #[serde(default)]
    pub sortings: Vec<Sorting>,
    #[serde(default)]
    pub paging: Option<Paging>,
    /// Server-chosen final key; exempt from sorting restrictions.
    #[serde(skip)]
    tiebreaker: Option<Sorting>,
}

impl SearchParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.insert_filter(filter);
        self
    }

    /// Returns `false` when an equal filter was already present.
    pub fn insert_filter(&mut self, filter: Filter) -> bool {
        if self.filters.contains(&filter) {
            return false;
        }
        self.filters.push(filter);
        true
    }

    pub fn with_sorting(mut self, sorting: Sorting) -> Self {
        self.sortings.push(sorting);
        self
    }

    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = Some(paging);
        self
    }

    /// Appends `field` as the last sort key unless the caller already sorts
    /// by it, so windowed results have a deterministic order.
    pub fn ensure_tiebreaker(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.tiebreaker = Some(Sorting::new(field, order));
        self
    }

    fn effective_sortings(&self) -> impl Iterator<Item = &Sorting> {
        let tiebreaker = self
            .tiebreaker
            .as_ref()
            .filter(|t| self.sortings.iter().all(|s| s.field != t.field));
        self.sortings.iter().chain(tiebreaker)
    }

    /// Produces `(count_source, entries_source)`.
    ///
    /// Both plans carry the same filter predicates; only the entries plan is
    /// ordered and windowed. Every field is checked and every expression is
    /// built before either plan is returned. `settings` falls back to
    /// [`PafisoSettings::global`].
    pub fn apply<S: QuerySource>(
        &self,
        source: S,
        restrictions: &FieldRestrictions,
        settings: Option<&PafisoSettings>,
    ) -> Result<(S, S)> {
        let global;
        let settings = match settings {
            Some(s) => s,
            None => {
                global = PafisoSettings::global();
                &*global
            }
        };

        restrictions.check_all(self)?;

        let native_match = source.supports_native_match();
        let predicates = self
            .filters
            .iter()
            .map(|f| f.build::<S::Entity>(settings, native_match))
            .collect::<Result<Vec<_>>>()?;
        let keys = self
            .effective_sortings()
            .map(|s| s.build::<S::Entity>(settings))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            entity = <S::Entity as Queryable>::schema().name(),
            filters = predicates.len(),
            sortings = keys.len(),
            paging = ?self.paging,
            native_match,
            "applying search parameters"
        );

        let mut filtered = source;
        for predicate in predicates {
            filtered = filtered.filter(predicate)?;
        }
        let count = filtered.clone();

        let mut entries = filtered;
        let mut keys = keys.into_iter();
        if let Some(primary) = keys.next() {
            entries = entries.order_by(primary)?;
            for key in keys {
                entries = entries.then_by(key)?;
            }
        }
        if let Some(paging) = self.paging {
            entries = entries.window(paging)?;
        }

        Ok((count, entries))
    }
}

fn dedup_filters<'de, D>(deserializer: D) -> std::result::Result<Vec<Filter>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Filter>::deserialize(deserializer)?;
    let mut filters = Vec::with_capacity(raw.len());
    for f in raw {
        if !filters.contains(&f) {
            filters.push(f);
        }
    }
    Ok(filters)
}
