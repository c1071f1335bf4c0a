//! In-memory backend.
//!
//! [`Local`] records filter, order and window steps over a borrowed slice
//! and evaluates them only when [`Local::execute`] or [`Local::count`] is
//! called. Steps run in the order they were added.

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::expr::{CompareOp, MatchKind, OrderKey, Predicate};
use crate::paging::{PagedList, Paging};
use crate::path::FieldPath;
use crate::restrictions::FieldRestrictions;
use crate::schema::{FieldValue, Queryable};
use crate::search::SearchParameters;
use crate::settings::PafisoSettings;
use crate::source::QuerySource;
use crate::value::Value;

#[derive(Clone)]
enum Step {
    Filter(Predicate),
    Order(Vec<OrderKey>),
    Window(Paging),
}

/// Deferred query plan over a slice.
pub struct Local<'a, T> {
    items: &'a [T],
    steps: Vec<Step>,
}

impl<T> Clone for Local<'_, T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items,
            steps: self.steps.clone(),
        }
    }
}

impl<'a, T: Queryable + 'static> Local<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self {
            items,
            steps: Vec::new(),
        }
    }

    /// Runs the plan, returning matching items in plan order.
    pub fn execute(&self) -> Vec<&'a T> {
        let mut rows: Vec<&'a T> = self.items.iter().collect();
        for step in &self.steps {
            match step {
                Step::Filter(predicate) => rows.retain(|row| eval(predicate, *row)),
                Step::Order(keys) => rows = sort_stable(rows, keys),
                Step::Window(paging) => {
                    let (start, end) = paging.bounds(rows.len());
                    rows.truncate(end);
                    rows.drain(..start);
                }
            }
        }
        rows
    }

    pub fn count(&self) -> u64 {
        self.execute().len() as u64
    }
}

impl<T: Queryable + 'static> QuerySource for Local<'_, T> {
    type Entity = T;

    fn filter(mut self, predicate: Predicate) -> Result<Self> {
        self.steps.push(Step::Filter(predicate));
        Ok(self)
    }

    /// Drops every earlier order step; at most one order is in effect.
    fn order_by(mut self, key: OrderKey) -> Result<Self> {
        self.steps.retain(|step| !matches!(step, Step::Order(_)));
        self.steps.push(Step::Order(vec![key]));
        Ok(self)
    }

    fn then_by(mut self, key: OrderKey) -> Result<Self> {
        let order = self.steps.iter_mut().rev().find_map(|step| match step {
            Step::Order(keys) => Some(keys),
            _ => None,
        });
        match order {
            Some(keys) => {
                keys.push(key);
                Ok(self)
            }
            None => Err(Error::MalformedExpression(format!(
                "then_by on '{}' without a preceding order_by",
                key.path.raw()
            ))),
        }
    }

    fn window(mut self, paging: Paging) -> Result<Self> {
        self.steps.push(Step::Window(paging));
        Ok(self)
    }
}

impl<T: Queryable + Clone + 'static> PagedList<T> {
    /// Applies `params` to `items` and materializes both plans.
    pub fn from_local(
        items: &[T],
        params: &SearchParameters,
        restrictions: &FieldRestrictions,
        settings: Option<&PafisoSettings>,
    ) -> Result<Self> {
        let (count, entries) = params.apply(Local::new(items), restrictions, settings)?;
        Ok(PagedList::new(
            count.count(),
            entries.execute().into_iter().cloned().collect(),
            params.paging,
        ))
    }
}

enum Slot {
    Null,
    Value(Value),
    Entity,
}

impl Slot {
    fn is_null(&self) -> bool {
        matches!(self, Slot::Null | Slot::Value(Value::Null))
    }

    fn into_value(self) -> Value {
        match self {
            Slot::Value(v) => v,
            Slot::Null | Slot::Entity => Value::Null,
        }
    }
}

/// Walks the declared segments. A null or missing segment anywhere along the
/// path makes the whole path null.
fn read(entity: &dyn Queryable, path: &FieldPath) -> Slot {
    let mut current = entity;
    let segments = path.segments();
    for (i, segment) in segments.iter().enumerate() {
        let last = i + 1 == segments.len();
        match current.field(segment) {
            FieldValue::Nested(Some(_)) if last => return Slot::Entity,
            FieldValue::Nested(Some(next)) => current = next,
            FieldValue::Value(v) if last => return Slot::Value(v),
            FieldValue::Value(_) | FieldValue::Nested(None) | FieldValue::Missing => {
                return Slot::Null
            }
        }
    }
    Slot::Null
}

fn eval(predicate: &Predicate, entity: &dyn Queryable) -> bool {
    match predicate {
        Predicate::And(all) => all.iter().all(|p| eval(p, entity)),
        Predicate::IsNull { path, negated } => read(entity, path).is_null() != *negated,
        Predicate::Compare {
            path,
            op,
            value,
            text,
            fold_case,
        } => {
            let slot = read(entity, path);
            if slot.is_null() {
                return *op == CompareOp::Ne;
            }
            let actual = slot.into_value();
            let ord = match (&actual, value, text) {
                (Value::String(a), Value::String(b), _) | (Value::String(a), _, Some(b)) => {
                    Some(if *fold_case {
                        a.to_lowercase().cmp(b)
                    } else {
                        a.as_str().cmp(b.as_str())
                    })
                }
                (a, b, _) => a.compare(b),
            };
            // incomparable values are never equal
            ord.map_or(*op == CompareOp::Ne, |o| op.holds(o))
        }
        Predicate::Contains {
            path,
            needle,
            fold_case,
            negated,
        } => {
            let hit = match read(entity, path) {
                Slot::Value(Value::String(s)) if *fold_case => s.to_lowercase().contains(needle.as_str()),
                Slot::Value(Value::String(s)) => s.contains(needle.as_str()),
                _ => false,
            };
            hit != *negated
        }
        Predicate::Match {
            path,
            kind,
            value,
            negated,
        } => {
            let hit = match read(entity, path) {
                Slot::Value(Value::String(s)) => {
                    let (s, v) = (s.to_lowercase(), value.to_lowercase());
                    match kind {
                        MatchKind::Exact => s == v,
                        MatchKind::Substring => s.contains(&v),
                    }
                }
                _ => false,
            };
            hit != *negated
        }
    }
}

fn sort_stable<'a, T: Queryable>(rows: Vec<&'a T>, keys: &[OrderKey]) -> Vec<&'a T> {
    let mut keyed: Vec<(Vec<Value>, &'a T)> = rows
        .into_iter()
        .map(|row| {
            let values = keys.iter().map(|k| read(row, &k.path).into_value()).collect();
            (values, row)
        })
        .collect();

    // slice::sort_by is stable
    keyed.sort_by(|(a, _), (b, _)| {
        keys.iter()
            .zip(a.iter().zip(b.iter()))
            .map(|(key, (x, y))| key.directed(x.sort_cmp(y)))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
    keyed.into_iter().map(|(_, row)| row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Filter, FilterOperator};
    use crate::schema::Schema;
    use crate::sorting::Sorting;
    use crate::value::FieldKind;
    use once_cell::sync::Lazy;

    #[derive(Clone, Debug)]
    struct Dept {
        title: String,
    }

    #[derive(Clone, Debug)]
    struct Emp {
        id: i64,
        name: String,
        grade: i64,
        nick: Option<String>,
        dept: Option<Dept>,
    }

    static DEPT: Lazy<Schema> =
        Lazy::new(|| Schema::builder("Dept").field("title", FieldKind::String).build());

    static EMP: Lazy<Schema> = Lazy::new(|| {
        Schema::builder("Emp")
            .field("id", FieldKind::I64)
            .field("name", FieldKind::String)
            .field("grade", FieldKind::I64)
            .optional("nick", FieldKind::String)
            .with(crate::schema::FieldDef::nested("dept", Dept::schema).nullable())
            .build()
    });

    impl Queryable for Dept {
        fn schema() -> &'static Schema {
            &DEPT
        }
        fn field(&self, name: &str) -> FieldValue<'_> {
            match name {
                "title" => (&self.title).into(),
                _ => FieldValue::Missing,
            }
        }
    }

    impl Queryable for Emp {
        fn schema() -> &'static Schema {
            &EMP
        }
        fn field(&self, name: &str) -> FieldValue<'_> {
            match name {
                "id" => self.id.into(),
                "name" => (&self.name).into(),
                "grade" => self.grade.into(),
                "nick" => self.nick.clone().into(),
                "dept" => FieldValue::nested(self.dept.as_ref()),
                _ => FieldValue::Missing,
            }
        }
    }

    fn staff() -> Vec<Emp> {
        let dept = |t: &str| {
            Some(Dept {
                title: t.to_string(),
            })
        };
        vec![
            Emp { id: 1, name: "Ann".into(), grade: 2, nick: None, dept: dept("Ops") },
            Emp { id: 2, name: "bob".into(), grade: 1, nick: Some("B".into()), dept: None },
            Emp { id: 3, name: "Cid".into(), grade: 2, nick: Some("C".into()), dept: dept("Dev") },
            Emp { id: 4, name: "dee".into(), grade: 1, nick: None, dept: dept("Dev") },
        ]
    }

    fn settings() -> PafisoSettings {
        PafisoSettings::default()
    }

    fn ids(rows: &[&Emp]) -> Vec<i64> {
        rows.iter().map(|e| e.id).collect()
    }

    fn filtered(items: &[Emp], filter: Filter) -> Vec<i64> {
        let pred = filter.build::<Emp>(&settings(), false).unwrap();
        let plan = Local::new(items).filter(pred).unwrap();
        ids(&plan.execute())
    }

    #[test]
    fn nested_null_propagates() {
        let items = staff();
        assert_eq!(
            filtered(&items, Filter::new("dept.title", FilterOperator::Equals, "Dev")),
            vec![3, 4]
        );
        assert_eq!(
            filtered(&items, Filter::without_value("dept.title", FilterOperator::Null)),
            vec![2]
        );
        assert_eq!(
            filtered(&items, Filter::without_value("dept", FilterOperator::NotNull)),
            vec![1, 3, 4]
        );
    }

    #[test]
    fn not_equals_admits_nulls() {
        let items = staff();
        assert_eq!(
            filtered(&items, Filter::new("nick", FilterOperator::NotEquals, "B")),
            vec![1, 3, 4]
        );
        assert_eq!(
            filtered(&items, Filter::new("nick", FilterOperator::NotContains, "C")),
            vec![1, 2, 4]
        );
    }

    #[test]
    fn then_by_is_stable_and_requires_order() {
        let items = staff();
        let s = settings();
        let plan = Local::new(&items)
            .order_by(Sorting::desc("grade").build::<Emp>(&s).unwrap())
            .unwrap();
        assert_eq!(ids(&plan.execute()), vec![1, 3, 2, 4]);

        let plan = plan
            .then_by(Sorting::desc("id").build::<Emp>(&s).unwrap())
            .unwrap();
        assert_eq!(ids(&plan.execute()), vec![3, 1, 4, 2]);

        let err = Local::new(&items)
            .then_by(Sorting::asc("id").build::<Emp>(&s).unwrap())
            .err()
            .unwrap();
        assert!(matches!(err, Error::MalformedExpression(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn order_by_replaces_previous_order() {
        let items = staff();
        let s = settings();
        let plan = Local::new(&items)
            .order_by(Sorting::desc("id").build::<Emp>(&s).unwrap())
            .unwrap()
            .order_by(Sorting::asc("name").build::<Emp>(&s).unwrap())
            .unwrap();
        // ordinal: upper case sorts before lower case
        assert_eq!(ids(&plan.execute()), vec![1, 3, 2, 4]);
    }

    #[test]
    fn order_by_after_filter_drops_earlier_order() {
        let items = staff();
        let s = settings();
        let plan = Local::new(&items)
            .order_by(Sorting::desc("id").build::<Emp>(&s).unwrap())
            .unwrap()
            .filter(
                Filter::new("grade", FilterOperator::GreaterThan, "0")
                    .build::<Emp>(&s, false)
                    .unwrap(),
            )
            .unwrap()
            .order_by(Sorting::asc("grade").build::<Emp>(&s).unwrap())
            .unwrap();
        assert_eq!(ids(&plan.execute()), vec![2, 4, 1, 3]);

        let plan = plan
            .then_by(Sorting::desc("id").build::<Emp>(&s).unwrap())
            .unwrap();
        assert_eq!(ids(&plan.execute()), vec![4, 2, 3, 1]);
    }

    #[derive(Clone, Debug)]
    struct Row {
        id: i64,
        code: Value,
    }

    static ROW: Lazy<Schema> = Lazy::new(|| {
        Schema::builder("Row")
            .field("id", FieldKind::I64)
            .optional("code", FieldKind::Any)
            .build()
    });

    impl Queryable for Row {
        fn schema() -> &'static Schema {
            &ROW
        }
        fn field(&self, name: &str) -> FieldValue<'_> {
            match name {
                "id" => self.id.into(),
                "code" => self.code.clone().into(),
                _ => FieldValue::Missing,
            }
        }
    }

    fn untyped_rows() -> Vec<Row> {
        let row = |id, code: Value| Row { id, code };
        vec![
            row(1, Value::from("007")),
            row(2, Value::from("abc")),
            row(3, Value::I64(7)),
            row(4, Value::Bool(true)),
            row(5, Value::from("True")),
            row(6, Value::F64(2.5)),
            row(7, Value::Null),
        ]
    }

    fn untyped(filter: Filter, settings: &PafisoSettings) -> Vec<i64> {
        let items = untyped_rows();
        let pred = filter.build::<Row>(settings, false).unwrap();
        Local::new(&items)
            .filter(pred)
            .unwrap()
            .execute()
            .iter()
            .map(|r| r.id)
            .collect()
    }

    #[test]
    fn untyped_field_matches_its_own_value() {
        let s = settings();
        for (raw, expected) in [
            ("007", vec![1, 3]),
            ("abc", vec![2]),
            ("7", vec![3]),
            ("true", vec![4]),
            ("True", vec![4, 5]),
            ("2.5", vec![6]),
        ] {
            assert_eq!(
                untyped(Filter::new("code", FilterOperator::Equals, raw), &s),
                expected,
                "Equals {raw}"
            );
        }
        assert_eq!(
            untyped(Filter::new("code", FilterOperator::NotEquals, "007"), &s),
            vec![2, 4, 5, 6, 7]
        );
    }

    #[test]
    fn untyped_field_folds_case_on_raw_text() {
        let s = settings().with_string_comparison(crate::settings::StringComparison::OrdinalIgnoreCase);
        assert_eq!(
            untyped(Filter::new("code", FilterOperator::Equals, "TRUE"), &s),
            vec![4, 5]
        );
        assert_eq!(
            untyped(Filter::new("code", FilterOperator::Equals, "ABC"), &s),
            vec![2]
        );
    }

    #[test]
    fn nulls_sort_first_ascending() {
        let items = staff();
        let plan = Local::new(&items)
            .order_by(Sorting::asc("nick").build::<Emp>(&settings()).unwrap())
            .unwrap();
        assert_eq!(ids(&plan.execute()), vec![1, 4, 2, 3]);
    }

    #[test]
    fn window_past_end_is_empty() {
        let items = staff();
        let plan = Local::new(&items).window(Paging::new(10, 5)).unwrap();
        assert!(plan.execute().is_empty());
        let plan = Local::new(&items).window(Paging::new(1, 0)).unwrap();
        assert!(plan.execute().is_empty());
        let plan = Local::new(&items).window(Paging::new(1, 2)).unwrap();
        assert_eq!(ids(&plan.execute()), vec![2, 3]);
    }

    #[test]
    fn match_nodes_fold_case_in_memory() {
        let items = staff();
        let s = settings().with_string_comparison(crate::settings::StringComparison::OrdinalIgnoreCase);
        let pred = Filter::new("name", FilterOperator::Equals, "BOB")
            .build::<Emp>(&s, true)
            .unwrap();
        assert!(matches!(pred, Predicate::Match { .. }));
        let plan = Local::new(&items).filter(pred).unwrap();
        assert_eq!(ids(&plan.execute()), vec![2]);
    }
}
