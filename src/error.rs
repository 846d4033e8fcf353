use crate::Serial;

/// Why a serial could not be issued. The allocator's last issued value is
/// left untouched in every case.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// Every serial above `last` is either taken or out of range.
    #[error("serial range exhausted after {last}")]
    Exhausted { last: Serial },

    /// More consecutive collisions were found than the configured limit allows.
    #[error("gave up after {probes} occupied serials starting at {from}")]
    ProbeLimit { from: Serial, probes: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error(transparent)]
    Alloc(#[from] AllocError),

    #[error("{0} is not a valid serial")]
    InvalidSerial(Serial),

    #[error("no entity bound to {0}")]
    NotFound(Serial),

    #[error("entity name must not be empty")]
    EmptyName,

    #[error("snapshot is corrupt: {0}")]
    CorruptSnapshot(String),

    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a socket address, got {value:?}")]
    Address { var: &'static str, value: String },

    #[error("{var} must be a positive integer, got {value:?}")]
    Number { var: &'static str, value: String },

    #[error("{var} must be a whole number of seconds, got {value:?}")]
    Seconds { var: &'static str, value: String },
}
