use crate::passage::Tier;
use thiserror::Error;

/// Configuration failures. Any of these leaves the engine idle.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown difficulty tier `{0}` (expected easy, medium or hard)")]
    UnknownTier(String),

    #[error("no passages registered for the {0} tier")]
    EmptyCorpus(Tier),

    #[error("passage contains no words")]
    EmptyPassage,

    #[error("session duration must be a positive number of seconds, got {0}")]
    InvalidDuration(u64),

    #[error("no passage selected; reset the session before starting it")]
    NoPassage,

    #[error("corpus file `{0}` is missing")]
    MissingCorpus(String),

    #[error("corpus could not be parsed: {0}")]
    Corpus(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
