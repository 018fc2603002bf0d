//! Crate-level error types.

use std::fmt;

use crate::scheme::SchemeDiagnostic;

/// Errors produced by the trajframe crate.
#[derive(Debug)]
pub enum DecodeError {
    /// The payload could not be laid onto the topology: a read fell outside
    /// the payload, or the atom counts on both sides disagree.
    TopologyMismatch {
        /// What went wrong, for logs.
        detail: String,
    },
    /// Neither the backbone nor the heavy-atom count matched the payload and
    /// strict scheme checking is enabled.
    AmbiguousScheme(SchemeDiagnostic),
    /// Raw payload byte length is not a whole number of `f32` values.
    PayloadBytes {
        /// Byte length received.
        len: usize,
    },
    /// Structure file loading/parsing failure.
    StructureLoad(String),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
}

impl DecodeError {
    pub(crate) fn mismatch(detail: impl Into<String>) -> Self {
        Self::TopologyMismatch {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TopologyMismatch { detail } => write!(
                f,
                "topology and trajectory data may not match: {detail}"
            ),
            Self::AmbiguousScheme(diag) => {
                write!(f, "cannot determine projection atom selection: {diag}")
            }
            Self::PayloadBytes { len } => write!(
                f,
                "payload of {len} bytes is not a sequence of 32-bit floats"
            ),
            Self::StructureLoad(msg) => {
                write!(f, "structure load error: {msg}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DecodeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
