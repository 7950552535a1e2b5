use thiserror::Error;
use tonic::Status;

use crate::market::grinex::FetchError;
use crate::market::rate::ExtractError;
use crate::storage::PersistenceError;

/// Caller-visible failure of a `GetRates` call.
#[derive(Error, Debug)]
pub enum RateServiceError {
    #[error("fetch rates failed: {0}")]
    Fetch(#[source] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("save rate failed: {0}")]
    Save(#[source] PersistenceError),
}

impl RateServiceError {
    /// Pipeline stage that produced the error, for logs.
    pub fn stage(&self) -> &'static str {
        match self {
            RateServiceError::Fetch(_) => "fetch",
            RateServiceError::Extract(ExtractError::EmptySide { .. }) => "validate",
            RateServiceError::Extract(ExtractError::PriceParse { .. }) => "parse",
            RateServiceError::Save(_) => "persist",
        }
    }
}

impl From<RateServiceError> for Status {
    fn from(err: RateServiceError) -> Self {
        match &err {
            RateServiceError::Fetch(_) => Status::unavailable(err.to_string()),
            RateServiceError::Extract(_) | RateServiceError::Save(_) => {
                Status::internal(err.to_string())
            }
        }
    }
}
