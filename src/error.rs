use thiserror::Error;

#[derive(Debug, Error)]
pub enum PosError {
    #[error("{0}")]
    Validation(String),

    #[error("{field} cannot be negative")]
    NegativeAmount { field: &'static str },

    #[error("Deal number {0} already exists")]
    DuplicateDealNumber(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Cannot generate an empty invoice")]
    EmptyBill,

    #[error("Invalid backup data: {0}")]
    InvalidBackup(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PosError>;

impl PosError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        PosError::NotFound {
            entity,
            id: id.into(),
        }
    }
}
