use std::sync::Arc;

use pafiso_core::{FieldRestrictions, PafisoSettings, PagedList, Queryable, SearchParameters};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, Select};

use crate::condition::FieldMap;
use crate::error::Result;
use crate::source::SeaSource;

/// Applies `params` to `select` and runs the count and entries plans
/// concurrently.
///
/// Construction errors are returned before any statement is executed.
pub async fn paginate<E, C>(
    select: Select<E>,
    conn: &C,
    params: &SearchParameters,
    fields: Arc<FieldMap<E>>,
    restrictions: &FieldRestrictions,
    settings: Option<&PafisoSettings>,
) -> Result<PagedList<E::Model>>
where
    E: EntityTrait,
    E::Model: Queryable + Send + Sync + 'static,
    C: ConnectionTrait,
{
    let source = SeaSource::new(select, fields, conn.get_database_backend());
    let (count, entries) = params.apply(source, restrictions, settings)?;

    tracing::debug!(
        entity = <E::Model as Queryable>::schema().name(),
        paging = ?params.paging,
        "executing count and entries plans"
    );

    let (total, rows) = tokio::try_join!(
        count.into_select().count(conn),
        entries.into_select().all(conn),
    )?;

    tracing::debug!(total, returned = rows.len(), "page assembled");
    Ok(PagedList::new(total, rows, params.paging))
}
