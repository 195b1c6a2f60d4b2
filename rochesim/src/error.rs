//! Crate-wide error type.
//!
//! Configuration problems are reported as `InvalidParam` before a run starts.
//! Numerical degeneracies (two bodies collapsing onto the same point) surface as
//! `Degenerate` from the physics step and end the run.

use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid scenario or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Two distinct bodies share a position, so no contact normal or force direction exists.
    #[error("degenerate geometry: bodies {a} and {b} are coincident")]
    Degenerate { a: usize, b: usize },

    /// Normalization of a zero-length vector.
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,

    /// State became NaN or infinite.
    #[error("non-finite state: {0}")]
    NonFinite(String),

    /// Output sink I/O.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Scenario file could not be parsed.
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),
}

impl Error {
    /// Attach arena indices to a vector degeneracy raised deep inside a pair interaction.
    pub(crate) fn between(self, a: usize, b: usize) -> Self {
        match self {
            Error::DegenerateVector => Error::Degenerate { a, b },
            other => other,
        }
    }
}
