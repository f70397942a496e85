use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("column '{column}' is reserved for the row header")]
    ReservedColumn { column: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
