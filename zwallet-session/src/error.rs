//! Error types for wallet sessions

use std::fmt;

use thiserror::Error;
use zwallet_core::EngineError;

/// The facade operation an error was raised by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Open,
    CreateAccount,
    Accounts,
    DefaultAddress,
    Balances,
    Summaries,
    Destroy,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Open => "open",
            Operation::CreateAccount => "create_account",
            Operation::Accounts => "accounts",
            Operation::DefaultAddress => "default_address_for_account",
            Operation::Balances => "balances_for_account",
            Operation::Summaries => "summaries",
            Operation::Destroy => "destroy",
        };
        f.write_str(name)
    }
}

/// Coarse classification of session errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The engine could not be loaded or initialized; fatal to `open`
    EngineUnavailable,
    /// A handle reached the engine after release. Indicates a bug.
    InvalidHandle,
    AccountCreationFailed,
    UnknownAccount,
    InvalidLabel,
    /// The session was already destroyed
    SessionClosed,
    AmountOutOfRange,
    /// Any other engine-side failure
    Engine,
}

/// Error type for session operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A failure reported by the engine, passed through unchanged
    #[error("{op} failed: {source}")]
    Engine {
        op: Operation,
        #[source]
        source: EngineError,
    },

    #[error("{op} failed: account label must not be empty")]
    InvalidLabel { op: Operation },

    #[error("{op} failed: unknown account {index}")]
    UnknownAccount { op: Operation, index: i64 },

    #[error("{op} failed: wallet session is closed")]
    SessionClosed { op: Operation },
}

impl Error {
    /// The operation that produced this error
    pub fn op(&self) -> Operation {
        match self {
            Error::Engine { op, .. }
            | Error::InvalidLabel { op }
            | Error::UnknownAccount { op, .. }
            | Error::SessionClosed { op } => *op,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Engine { source, .. } => match source {
                EngineError::EngineUnavailable(_) => ErrorKind::EngineUnavailable,
                EngineError::InvalidHandle(_) => ErrorKind::InvalidHandle,
                EngineError::AccountCreationFailed(_) => ErrorKind::AccountCreationFailed,
                EngineError::UnknownAccount { .. } => ErrorKind::UnknownAccount,
                EngineError::AmountOutOfRange(_) => ErrorKind::AmountOutOfRange,
                _ => ErrorKind::Engine,
            },
            Error::InvalidLabel { .. } => ErrorKind::InvalidLabel,
            Error::UnknownAccount { .. } => ErrorKind::UnknownAccount,
            Error::SessionClosed { .. } => ErrorKind::SessionClosed,
        }
    }
}

/// Tag an engine failure with the operation that forwarded the call
pub(crate) fn engine_error(op: Operation) -> impl FnOnce(EngineError) -> Error {
    move |source| Error::Engine { op, source }
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_errors_keep_their_kind() {
        let cases = [
            (EngineError::EngineUnavailable("gone".into()), ErrorKind::EngineUnavailable),
            (EngineError::InvalidHandle(7), ErrorKind::InvalidHandle),
            (EngineError::AccountCreationFailed("x".into()), ErrorKind::AccountCreationFailed),
            (EngineError::UnknownAccount { index: 3, count: 1 }, ErrorKind::UnknownAccount),
            (EngineError::Address("bad".into()), ErrorKind::Engine),
        ];

        for (source, kind) in cases {
            let error = engine_error(Operation::Balances)(source);
            assert_eq!(error.kind(), kind);
            assert_eq!(error.op(), Operation::Balances);
        }
    }

    #[test]
    fn test_messages_name_the_operation() {
        let error = Error::SessionClosed { op: Operation::Accounts };
        assert_eq!(error.to_string(), "accounts failed: wallet session is closed");

        let error = engine_error(Operation::DefaultAddress)(EngineError::UnknownAccount {
            index: 4,
            count: 2,
        });
        assert_eq!(
            error.to_string(),
            "default_address_for_account failed: Unknown account 4 (wallet has 2 accounts)"
        );
    }
}
