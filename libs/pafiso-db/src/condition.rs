//! Predicate AST → `sea_orm::Condition` lowering.

use std::collections::HashMap;
use std::marker::PhantomData;

use pafiso_core::{CompareOp, Error, FieldPath, MatchKind, Predicate, Value};
use sea_orm::sea_query::{Alias, ConditionExpression, Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{Condition, DbBackend, EntityTrait, IdenStatic, Iterable};

use crate::hook;

/// Maps declared field paths to SQL member expressions.
///
/// Keys are declared names joined with `.` (see [`FieldPath::declared`]).
/// Paths that reach into related entities map to columns of joined tables,
/// which the caller adds to the `Select` beforehand.
pub struct FieldMap<E: EntityTrait> {
    map: HashMap<String, SimpleExpr>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: EntityTrait> Clone for FieldMap<E> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: EntityTrait> Default for FieldMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityTrait> FieldMap<E> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            _entity: PhantomData,
        }
    }

    /// Maps every column of `E` under its column name.
    pub fn from_entity() -> Self {
        E::Column::iter().fold(Self::new(), |m, col| {
            let name = col.as_str().to_string();
            m.insert(name, col)
        })
    }

    /// Maps `declared` to a table-qualified column of `E`.
    pub fn insert(self, declared: impl Into<String>, col: E::Column) -> Self {
        self.insert_expr(declared, Expr::col((E::default(), col)))
    }

    /// Maps `declared` to an arbitrary expression, e.g. a joined column.
    pub fn insert_expr(mut self, declared: impl Into<String>, expr: impl Into<SimpleExpr>) -> Self {
        self.map.insert(declared.into(), expr.into());
        self
    }

    pub fn get(&self, declared: &str) -> Option<&SimpleExpr> {
        self.map.get(declared)
    }

    pub(crate) fn member(&self, path: &FieldPath, entity: &'static str) -> Result<SimpleExpr, Error> {
        self.get(&path.declared())
            .cloned()
            .ok_or_else(|| Error::UnknownField {
                entity,
                field: path.raw().to_string(),
            })
    }
}

/// Converts a constant into a bind value. Enums bind as their declaration
/// index so SQL ordering agrees with in-memory ordering.
pub fn to_sea_value(value: &Value) -> sea_orm::Value {
    match value {
        Value::Null => sea_orm::Value::String(None),
        Value::String(s) => sea_orm::Value::String(Some(Box::new(s.clone()))),
        Value::I64(n) => sea_orm::Value::BigInt(Some(*n)),
        Value::F64(n) => sea_orm::Value::Double(Some(*n)),
        Value::Decimal(d) => sea_orm::Value::Decimal(Some(Box::new(*d))),
        Value::Bool(b) => sea_orm::Value::Bool(Some(*b)),
        Value::Uuid(u) => sea_orm::Value::Uuid(Some(Box::new(*u))),
        Value::DateTime(dt) => sea_orm::Value::ChronoDateTimeUtc(Some(Box::new(*dt))),
        Value::Date(d) => sea_orm::Value::ChronoDate(Some(Box::new(*d))),
        Value::Time(t) => sea_orm::Value::ChronoTime(Some(Box::new(*t))),
        Value::Enum(e) => sea_orm::Value::BigInt(Some(e.index() as i64)),
    }
}

/* ---------- LIKE helpers ---------- */

pub fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            c => out.push(c),
        }
    }
    out
}

pub fn like_contains(s: &str) -> String {
    format!("%{}%", like_escape(s))
}

fn like(pattern: String) -> LikeExpr {
    LikeExpr::new(pattern).escape('\\')
}

fn lower(member: SimpleExpr) -> Expr {
    Expr::expr(Func::lower(member))
}

fn compare(lhs: Expr, op: CompareOp, rhs: impl Into<SimpleExpr>) -> SimpleExpr {
    match op {
        CompareOp::Eq => lhs.eq(rhs),
        CompareOp::Ne => lhs.ne(rhs),
        CompareOp::Gt => lhs.gt(rhs),
        CompareOp::Ge => lhs.gte(rhs),
        CompareOp::Lt => lhs.lt(rhs),
        CompareOp::Le => lhs.lte(rhs),
    }
}

/// Case-sensitive substring test. `LIKE` folds ASCII case on SQLite and
/// under MySQL's default collations, so those backends use `INSTR`.
fn contains_ordinal(member: SimpleExpr, needle: &str, backend: DbBackend) -> SimpleExpr {
    match backend {
        DbBackend::Sqlite => Expr::expr(
            Func::cust(Alias::new("INSTR"))
                .arg(member)
                .arg(needle.to_string()),
        )
        .gt(0),
        DbBackend::MySql => Expr::cust_with_exprs(
            "INSTR(BINARY $1, $2) > 0",
            [member, SimpleExpr::from(needle.to_string())],
        ),
        _ => Expr::expr(member).like(like(like_contains(needle))),
    }
}

/// `expr OR member IS NULL`, so negative tests on nullable paths admit nulls
/// the way the in-memory backend does.
fn admit_null(
    expr: impl Into<ConditionExpression>,
    member: SimpleExpr,
    path: &FieldPath,
) -> Condition {
    if path.is_nullable() {
        Condition::any().add(expr).add(Expr::expr(member).is_null())
    } else {
        Condition::all().add(expr)
    }
}

/* ---------- Predicate -> Condition ---------- */

/// Lowers `predicate` for `backend`. Paths must be mapped in `fields`;
/// `entity` names the entity in [`Error::UnknownField`].
pub fn predicate_to_condition<E: EntityTrait>(
    predicate: &Predicate,
    fields: &FieldMap<E>,
    entity: &'static str,
    backend: DbBackend,
) -> Result<Condition, Error> {
    Ok(match predicate {
        Predicate::And(all) => {
            let mut cond = Condition::all();
            for p in all {
                cond = cond.add(predicate_to_condition(p, fields, entity, backend)?);
            }
            cond
        }

        Predicate::IsNull { path, negated } => {
            let member = Expr::expr(fields.member(path, entity)?);
            Condition::all().add(if *negated {
                member.is_not_null()
            } else {
                member.is_null()
            })
        }

        Predicate::Compare {
            path,
            op,
            value,
            text,
            fold_case,
        } => {
            let member = fields.member(path, entity)?;
            let operand = |fold: bool| {
                if fold {
                    lower(member.clone())
                } else {
                    Expr::expr(member.clone())
                }
            };
            let fold_typed = *fold_case && matches!(value, Value::String(_));
            let typed = compare(operand(fold_typed), *op, to_sea_value(value));

            // untyped columns may hold the constant as text
            let cond = match text {
                Some(t) if *op == CompareOp::Eq => Condition::any()
                    .add(typed)
                    .add(compare(operand(*fold_case), CompareOp::Eq, t.clone())),
                Some(t) if *op == CompareOp::Ne => Condition::all()
                    .add(typed)
                    .add(compare(operand(*fold_case), CompareOp::Ne, t.clone())),
                _ => Condition::all().add(typed),
            };
            if *op == CompareOp::Ne {
                admit_null(cond, member, path)
            } else {
                cond
            }
        }

        Predicate::Contains {
            path,
            needle,
            fold_case,
            negated,
        } => {
            let member = fields.member(path, entity)?;
            let e = if *fold_case {
                lower(member.clone()).like(like(like_contains(needle)))
            } else {
                contains_ordinal(member.clone(), needle, backend)
            };
            if *negated {
                admit_null(e.not(), member, path)
            } else {
                Condition::all().add(e)
            }
        }

        Predicate::Match {
            path,
            kind,
            value,
            negated,
        } => {
            let member = fields.member(path, entity)?;
            let e = match (hook::current(), kind) {
                (Some(builder), MatchKind::Exact) => builder.build(member.clone(), &like_escape(value)),
                (Some(builder), MatchKind::Substring) => {
                    builder.build(member.clone(), &like_contains(value))
                }
                (None, MatchKind::Exact) => lower(member.clone()).eq(value.to_lowercase()),
                (None, MatchKind::Substring) => {
                    lower(member.clone()).like(like(like_contains(&value.to_lowercase())))
                }
            };
            if *negated {
                admit_null(e.not(), member, path)
            } else {
                Condition::all().add(e)
            }
        }
    })
}
