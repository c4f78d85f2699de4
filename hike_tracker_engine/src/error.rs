use std::fmt;

use crate::location::PermissionStatus;

#[derive(Debug)]
pub enum SessionError {
    /// Location access is not granted. Recoverable: re-request permission
    /// and start again. The engine never re-requests on its own.
    PermissionDenied(PermissionStatus),
    /// The operation is not legal in the current session state. Always a
    /// caller contract violation, surfaced immediately.
    InvalidStateTransition {
        state: &'static str,
        operation: &'static str,
    },
    /// The storage collaborator failed to persist the record. Retry policy
    /// belongs to the caller.
    Persistence(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::PermissionDenied(status) => write!(
                f,
                "location access is {status:?}; grant location permission before starting a session"
            ),
            SessionError::InvalidStateTransition { state, operation } => {
                write!(f, "cannot {operation} while the session is {state}")
            }
            SessionError::Persistence(message) => {
                write!(f, "failed to store the track record: {message}")
            }
        }
    }
}

impl std::error::Error for SessionError {}
