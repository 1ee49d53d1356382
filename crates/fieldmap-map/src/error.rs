use fieldmap_model::SessionId;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("session {0} is already finalized")]
    SessionFinalized(SessionId),

    #[error(transparent)]
    Report(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, MapError>;
