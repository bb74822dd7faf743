//! Frame envelope shared by every Q30 packet.
//!
//! ```text
//! [prefix: 5][command: 2][length: 2 LE][body: length - 10][checksum: 1]
//! ```
//!
//! The declared length covers the whole frame, header and checksum included.
//! The checksum is the wrapping byte sum of everything before it.

use bytes::Bytes;
use num_enum::{FromPrimitive, IntoPrimitive};
use strum_macros::Display;

use crate::constants::{
    CHECKSUM_SIZE, HEADER_SIZE, INBOUND_PREFIX, MAX_BODY_SIZE, MIN_FRAME_SIZE, OUTBOUND_PREFIX,
    PREFIX_SIZE,
};
use crate::error::{MalformedFrameReason, Q30Error};

/// Which side of the Bluetooth link a frame travels from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Direction {
    /// Host to device.
    Outbound,
    /// Device to host.
    Inbound,
}

impl Direction {
    /// The five bytes opening every frame in this direction.
    pub fn prefix(&self) -> [u8; PREFIX_SIZE] {
        match self {
            Direction::Outbound => OUTBOUND_PREFIX,
            Direction::Inbound => INBOUND_PREFIX,
        }
    }

    fn from_prefix(prefix: &[u8]) -> Option<Direction> {
        if prefix == OUTBOUND_PREFIX {
            Some(Direction::Outbound)
        } else if prefix == INBOUND_PREFIX {
            Some(Direction::Inbound)
        } else {
            None
        }
    }
}

/// Command pair (frame bytes 5 and 6), read big-endian.
///
/// The same pair appears in both directions; the direction prefix tells a
/// request or set apart from the matching report or ack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, FromPrimitive)]
#[repr(u16)]
pub enum Command {
    State = 0x0101,
    BatteryLevel = 0x0103,
    BatteryCharging = 0x0104,
    FirmwareVersion = 0x0105,
    SetEqualizer = 0x0281,
    SetEqualizerWithDrc = 0x0283,
    SoundModeUpdate = 0x0601,
    SetSoundMode = 0x0681,

    #[num_enum(catch_all)]
    Unknown(u16),
}

impl Command {
    pub fn to_bytes(self) -> [u8; 2] {
        u16::from(self).to_be_bytes()
    }

    pub fn from_bytes(bytes: [u8; 2]) -> Command {
        Command::from_primitive(u16::from_be_bytes(bytes))
    }
}

/// Wrapping byte sum over everything that precedes the checksum byte.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
}

/// A validated frame with the envelope stripped: direction, command pair,
/// and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPacket {
    pub direction: Direction,
    pub command: Command,
    pub body: Bytes,
}

impl RawPacket {
    /// Bodies longer than [`MAX_BODY_SIZE`] are rejected: the declared
    /// length would wrap its 2-byte field and the frame could never pass
    /// validation again.
    pub fn new(direction: Direction, command: Command, body: Bytes) -> Result<Self, Q30Error> {
        if body.len() > MAX_BODY_SIZE {
            return Err(Q30Error::InvalidField {
                field: "body",
                value: body.len() as u32,
            });
        }
        Ok(RawPacket {
            direction,
            command,
            body,
        })
    }

    /// Total length of the encoded frame, header and checksum included.
    pub fn frame_len(&self) -> usize {
        HEADER_SIZE + self.body.len() + CHECKSUM_SIZE
    }
}

impl TryFrom<Bytes> for RawPacket {
    type Error = Q30Error;

    fn try_from(bytes: Bytes) -> Result<Self, Self::Error> {
        if bytes.len() < MIN_FRAME_SIZE {
            return Err(MalformedFrameReason::TooShort {
                minimum: MIN_FRAME_SIZE,
                actual: bytes.len(),
            }
            .into());
        }

        let direction = Direction::from_prefix(&bytes[..PREFIX_SIZE])
            .ok_or(MalformedFrameReason::BadPrefix)?;

        // The declared length is part of the checksummed header, so a frame
        // that disagrees with its buffer is rejected rather than trimmed.
        let declared =
            u16::from_le_bytes([bytes[PREFIX_SIZE + 2], bytes[PREFIX_SIZE + 3]]) as usize;
        if declared != bytes.len() {
            return Err(MalformedFrameReason::LengthMismatch {
                declared,
                actual: bytes.len(),
            }
            .into());
        }

        let stored = bytes[bytes.len() - CHECKSUM_SIZE];
        let computed = checksum(&bytes[..bytes.len() - CHECKSUM_SIZE]);
        if computed != stored {
            return Err(MalformedFrameReason::ChecksumMismatch { computed, stored }.into());
        }

        let command = Command::from_bytes([bytes[PREFIX_SIZE], bytes[PREFIX_SIZE + 1]]);
        let body = bytes.slice(HEADER_SIZE..bytes.len() - CHECKSUM_SIZE);

        Ok(RawPacket {
            direction,
            command,
            body,
        })
    }
}

impl From<RawPacket> for Bytes {
    fn from(packet: RawPacket) -> Self {
        let total = packet.frame_len();
        let mut frame = Vec::with_capacity(total);
        frame.extend_from_slice(&packet.direction.prefix());
        frame.extend_from_slice(&packet.command.to_bytes());
        frame.extend_from_slice(&(total as u16).to_le_bytes());
        frame.extend_from_slice(packet.body.as_ref());
        frame.push(checksum(&frame));
        Bytes::from(frame)
    }
}
