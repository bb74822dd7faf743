use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::FIRMWARE_VERSION_SIZE;
use crate::error::Q30Error;

/// Device firmware version, five ASCII bytes `MM.mm` on the wire, each
/// component two digits (`0..=99`).
///
/// Ordered so the effective version of a left/right earbud pair is the
/// smaller of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FirmwareVersion {
    major: u8,
    minor: u8,
}

impl FirmwareVersion {
    /// Largest value one `MM.mm` component can spell in two digits.
    pub const MAX_COMPONENT: u8 = 99;

    pub fn new(major: u8, minor: u8) -> Result<Self, Q30Error> {
        for value in [major, minor] {
            if value > Self::MAX_COMPONENT {
                return Err(Q30Error::InvalidField {
                    field: "firmware_version",
                    value: u32::from(value),
                });
            }
        }
        Ok(FirmwareVersion { major, minor })
    }

    pub fn major(&self) -> u8 {
        self.major
    }

    pub fn minor(&self) -> u8 {
        self.minor
    }

    /// Parse the leading `MM.mm` field of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Q30Error> {
        if bytes.len() < FIRMWARE_VERSION_SIZE {
            return Err(Q30Error::TruncatedPayload {
                expected: FIRMWARE_VERSION_SIZE,
                actual: bytes.len(),
            });
        }
        let digit = |byte: u8| {
            if byte.is_ascii_digit() {
                Ok(byte - b'0')
            } else {
                Err(Q30Error::InvalidField {
                    field: "firmware_version",
                    value: byte as u32,
                })
            }
        };
        if bytes[2] != b'.' {
            return Err(Q30Error::InvalidField {
                field: "firmware_version",
                value: bytes[2] as u32,
            });
        }
        Ok(FirmwareVersion {
            major: digit(bytes[0])? * 10 + digit(bytes[1])?,
            minor: digit(bytes[3])? * 10 + digit(bytes[4])?,
        })
    }

    pub fn to_bytes(&self) -> [u8; FIRMWARE_VERSION_SIZE] {
        [
            b'0' + self.major / 10,
            b'0' + self.major % 10,
            b'.',
            b'0' + self.minor / 10,
            b'0' + self.minor % 10,
        ]
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:02}", self.major, self.minor)
    }
}
