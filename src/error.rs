use thiserror::Error;

#[derive(Error, Debug)]
pub enum FestError {
    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("store is not initialized: {0} (run `festboard init`)")]
    StoreNotFound(String),

    #[error("event not found: {0}")]
    EventNotFound(String),

    #[error("participant not found: {0}")]
    ParticipantNotFound(String),

    #[error("no point scheme for event {event}: {reason}")]
    MissingPointScheme { event: String, reason: String },

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("refusing to overwrite existing file: {0}")]
    AlreadyExists(String),

    #[error("store write failed: {0}")]
    Persistence(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FestError {
    /// Errors that mean the request was refused rather than broken.
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            Self::Forbidden(_) | Self::MissingPointScheme { .. } | Self::UnknownUser(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FestError>;
