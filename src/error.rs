//! Fatal failures. Everything recoverable goes through `diagnostics` instead.

use thiserror::Error;

/// An id registered with `IdAllocator::must` was already taken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("id already taken: {id}")]
pub struct DuplicateIdError {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("unspecified timezone, set config.timezone")]
    UnspecifiedTimezone,

    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error(transparent)]
    DuplicateId(#[from] DuplicateIdError),

    #[error("sessions must be an array or an object, got {0}")]
    MalformedSessions(String),
}
