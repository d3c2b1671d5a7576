use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed chat message: {fields} fields, need at least {minimum}")]
    MalformedMessage { fields: usize, minimum: usize },

    #[error("Unknown speaker id: {0}")]
    UnknownSpeaker(i64),

    #[error("Speaker is muted: {0}")]
    MutedSpeaker(usize),

    #[error("Invalid value for {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
