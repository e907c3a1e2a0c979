use thiserror::Error;

pub type Result<T> = std::result::Result<T, DynaformError>;

#[derive(Debug, Error)]
pub enum DynaformError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("naming collision: {name} is already registered as {existing}")]
    NamingCollision { name: String, existing: &'static str },
    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),
    #[error("malformed query: {0}")]
    MalformedQuery(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
