use thiserror::Error;

use crate::packet::Direction;

/// The primary error type for the `q30-lib` library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Q30Error {
    #[error("malformed frame: {reason}")]
    MalformedFrame {
        #[from]
        reason: MalformedFrameReason,
    },

    #[error("unknown {direction} packet type {command:#06x}")]
    UnknownPacketType { direction: Direction, command: u16 },

    #[error("truncated payload: expected at least {expected} bytes, got {actual}")]
    TruncatedPayload { expected: usize, actual: usize },

    #[error("invalid value {value} for {field}")]
    InvalidField { field: &'static str, value: u32 },

    #[error("equalizer band {band} gain {value} is out of range")]
    GainOutOfRange { band: usize, value: i16 },

    #[error("{extra_bytes} trailing bytes after the last field")]
    TrailingData { extra_bytes: usize },
}

impl Q30Error {
    /// Whether the surrounding stream is still usable after this error.
    ///
    /// Unknown packet types and trailing bytes are produced by firmware newer
    /// than this crate; the envelope around them checked out. Every other
    /// error means the frame is corrupt and must be discarded.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Q30Error::UnknownPacketType { .. } | Q30Error::TrailingData { .. }
        )
    }
}

/// Why a frame failed envelope validation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedFrameReason {
    #[error("{actual} bytes is below the {minimum} byte frame minimum")]
    TooShort { minimum: usize, actual: usize },

    #[error("unrecognized direction prefix")]
    BadPrefix,

    #[error("declared length {declared} does not match the {actual} byte buffer")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("checksum mismatch: computed {computed:#04x}, stored {stored:#04x}")]
    ChecksumMismatch { computed: u8, stored: u8 },
}
