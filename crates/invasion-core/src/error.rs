//! Error types for the simulation.

use crate::types::AlienId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Map parse error on line {line}: {message}")]
    MapParse { line: usize, message: String },

    #[error("alien count should be in range [0, 10,000], found {0}")]
    InvalidAgentCount(usize),

    #[error("world must contain at least one city")]
    EmptyWorld,

    #[error("epoch budget should be in range [1, 10,000], found {0}")]
    InvalidEpochBudget(u32),

    #[error("city {0} is not part of the world")]
    InvalidLocation(String),

    /// Every epoch of the budget has been spent.
    #[error("max iteration reached")]
    BudgetExhausted,

    /// All aliens died fighting each other, or there were none to begin with.
    ///
    /// Destroying a city always destroys the aliens in it, so this also
    /// covers the case where every city is gone.
    #[error("no alien alive")]
    NoAgentsAlive,

    #[error("inconsistent state: {0}")]
    InconsistentState(String),

    #[error("city {0} already destroyed")]
    AlreadyDestroyed(String),

    #[error("current location for alien {0} not found")]
    UnknownAlien(AlienId),
}

impl Error {
    /// True for the two signals that end a run normally.
    pub fn is_termination(&self) -> bool {
        matches!(self, Error::BudgetExhausted | Error::NoAgentsAlive)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
