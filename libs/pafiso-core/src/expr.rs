//! Backend-neutral predicate and ordering AST.
//!
//! Builders in [`crate::filter`] and [`crate::sorting`] produce these nodes;
//! each [`crate::QuerySource`] lowers them into its own representation.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::path::FieldPath;
use crate::sorting::SortOrder;
use crate::value::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl CompareOp {
    /// Whether `actual <op> constant` holds given `actual.cmp(constant)`.
    pub fn holds(self, ord: Ordering) -> bool {
        match self {
            CompareOp::Eq => ord == Ordering::Equal,
            CompareOp::Ne => ord != Ordering::Equal,
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Lt => ord == Ordering::Less,
            CompareOp::Ge => ord != Ordering::Less,
            CompareOp::Le => ord != Ordering::Greater,
        }
    }

    pub fn is_equality(self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::Ne)
    }
}

/// Shape of a case-insensitive match delegated to a backend hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchKind {
    Exact,
    Substring,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// `path <op> value`. With `fold_case` the string constants are already
    /// lower-cased and string members are lower-cased at evaluation time.
    Compare {
        path: Arc<FieldPath>,
        op: CompareOp,
        value: Value,
        /// Constant as supplied, kept on untyped paths when the inferred
        /// `value` is not a string. String members compare against it.
        text: Option<String>,
        fold_case: bool,
    },
    Contains {
        path: Arc<FieldPath>,
        needle: String,
        fold_case: bool,
        negated: bool,
    },
    /// Case-insensitive match lowered by the backend's native primitive.
    Match {
        path: Arc<FieldPath>,
        kind: MatchKind,
        value: String,
        negated: bool,
    },
    IsNull {
        path: Arc<FieldPath>,
        negated: bool,
    },
    /// Conjunction; empty is always true.
    And(Vec<Predicate>),
}

impl Predicate {
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Predicate::Compare { path, .. }
            | Predicate::Contains { path, .. }
            | Predicate::Match { path, .. }
            | Predicate::IsNull { path, .. } => Some(path),
            Predicate::And(_) => None,
        }
    }

    pub fn and(self, other: Predicate) -> Predicate {
        match self {
            Predicate::And(mut all) => {
                all.push(other);
                Predicate::And(all)
            }
            first => Predicate::And(vec![first, other]),
        }
    }
}

/// One ordering key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderKey {
    pub path: Arc<FieldPath>,
    pub order: SortOrder,
}

impl OrderKey {
    /// Applies the direction to an ascending comparison.
    pub fn directed(&self, ascending: Ordering) -> Ordering {
        match self.order {
            SortOrder::Ascending => ascending,
            SortOrder::Descending => ascending.reverse(),
        }
    }
}
