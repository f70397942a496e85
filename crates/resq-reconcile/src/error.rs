use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("item id not found in schema index: {item_id}")]
    ItemNotFound { item_id: String },

    #[error("worker count must be between 1 and {max}, got {requested}")]
    InvalidParallelism { requested: usize, max: usize },

    #[error("partition needs at least one bucket")]
    ZeroBuckets,

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {origin}: {source}")]
    ConfigParse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {message}")]
    InvalidConfig { message: String },

    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
