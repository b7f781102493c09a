use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchdayError {
    #[error("please select a date for the match")]
    MissingDate,
    #[error("please select an opponent for the match")]
    MissingOpponent,
    #[error("invalid match date: {0}")]
    InvalidDate(String),
    #[error("please select a scorer and a valid minute")]
    InvalidQuickGoal,
    #[error("no match with id {0}")]
    UnknownMatch(String),
    #[error("record store failure: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, MatchdayError>;

impl From<anyhow::Error> for MatchdayError {
    fn from(err: anyhow::Error) -> Self {
        MatchdayError::Store(format!("{err:#}"))
    }
}
