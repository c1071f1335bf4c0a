//! Process-wide builder for native case-insensitive matches.
//!
//! At most one builder is active. When one is registered, SQL sources report
//! native-match support and the predicate builder emits match nodes for
//! case-insensitive equality and substring filters; those nodes are lowered
//! by calling the builder with the member expression and a `LIKE` pattern
//! (`%`/`_` wildcards, `\` escape). Without a builder the lowering falls back
//! to `LOWER(member)` against a lower-cased constant.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};

type BuildFn = dyn Fn(SimpleExpr, &str) -> SimpleExpr + Send + Sync;

pub struct MatchBuilder(Box<BuildFn>);

impl MatchBuilder {
    pub fn build(&self, member: SimpleExpr, pattern: &str) -> SimpleExpr {
        (self.0)(member, pattern)
    }
}

static BUILDER: ArcSwapOption<MatchBuilder> = ArcSwapOption::const_empty();

/// Installs `builder`, replacing any previous one.
pub fn register_case_insensitive_match<F>(builder: F)
where
    F: Fn(SimpleExpr, &str) -> SimpleExpr + Send + Sync + 'static,
{
    let previous = BUILDER.swap(Some(Arc::new(MatchBuilder(Box::new(builder)))));
    tracing::info!(
        replaced = previous.is_some(),
        "registered case-insensitive match builder"
    );
}

pub fn clear_case_insensitive_match() {
    if BUILDER.swap(None).is_some() {
        tracing::info!("cleared case-insensitive match builder");
    }
}

pub fn is_registered() -> bool {
    BUILDER.load().is_some()
}

pub(crate) fn current() -> Option<Arc<MatchBuilder>> {
    BUILDER.load_full()
}

/// Stock builder: `member LIKE pattern ESCAPE '\'`. Case-insensitive under
/// the default collations of SQLite and MySQL.
pub fn like_match(member: SimpleExpr, pattern: &str) -> SimpleExpr {
    Expr::expr(member).like(LikeExpr::new(pattern).escape('\\'))
}
