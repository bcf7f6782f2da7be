use sea_orm::DbErr;

#[derive(Debug, thiserror::Error)]
pub enum RaffleError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("pool already initialized for event {0}")]
    AlreadyInitialized(i64),
    #[error("number {0} is no longer available for payment")]
    SlotUnavailable(String),
    #[error("number {0} has already been sold")]
    SlotSold(String),
    #[error("{0} role required for this operation")]
    Forbidden(&'static str),
}

impl RaffleError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
