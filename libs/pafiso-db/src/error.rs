use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// Building the plans failed; nothing was sent to the database.
    #[error(transparent)]
    Query(#[from] pafiso_core::Error),

    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
}

pub type Result<T> = std::result::Result<T, DbError>;

impl DbError {
    pub fn is_client_error(&self) -> bool {
        match self {
            DbError::Query(e) => e.is_client_error(),
            DbError::Db(_) => false,
        }
    }
}
