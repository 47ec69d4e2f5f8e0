use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BayesError {
    /// Malformed shapes, out of range values or non-positive scale/length parameters.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The evidence of a grid posterior is exactly zero, so it can not be normalized.
    #[error("Degenerate posterior: {reason}")]
    DegeneratePosterior { reason: String },
    #[error("Could not build sample trace")]
    Trace(#[from] arrow::error::ArrowError),
}

pub type Result<T> = std::result::Result<T, BayesError>;

pub(crate) fn invalid<T>(msg: impl Into<String>) -> Result<T> {
    Err(BayesError::InvalidArgument(msg.into()))
}
