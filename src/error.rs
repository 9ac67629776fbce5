use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to encode graph cache entry: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("storage file {path} is not a JSON object: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid viewer settings: {0}")]
    Parse(#[from] serde_json::Error),
}
