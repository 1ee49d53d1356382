use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid session id: {0}")]
    InvalidSessionId(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
