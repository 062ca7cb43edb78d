//! Failures that can be recovered from at the call boundary.
//!
//! Contract violations by the caller (e.g. applying a [`crate::chess::core::Move`]
//! whose source square does not hold the claimed piece) are not represented
//! here: they are programming errors and are caught by debug assertions.

use thiserror::Error;

/// Errors produced by parsing chess text formats.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input can not be interpreted as a (possibly truncated) FEN string.
    /// No existing [`crate::chess::position::Position`] is affected.
    #[error("malformed FEN: {reason}")]
    MalformedFen {
        #[allow(missing_docs)]
        reason: String,
    },
    /// A textual move can not be interpreted or resolved against the
    /// position.
    #[error("malformed move '{input}': {reason}")]
    MalformedMove {
        #[allow(missing_docs)]
        input: String,
        #[allow(missing_docs)]
        reason: String,
    },
    /// A single token (file, rank, square, color, piece or castling rights)
    /// is not valid.
    #[error("{0}")]
    Parse(String),
}

impl Error {
    pub(crate) fn malformed_fen(reason: impl Into<String>) -> Self {
        Self::MalformedFen {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_move(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedMove {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Shorthand for results of parsing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Early-returns [`Error::Parse`] built from the format arguments.
macro_rules! bail_parse {
    ($($arg:tt)*) => {
        return Err($crate::chess::error::Error::Parse(format!($($arg)*)))
    };
}

pub(crate) use bail_parse;
