use modular_bitfield::prelude::*;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{EQUALIZER_BLOCK_SIZE, SOUND_MODES_BLOCK_SIZE, STEREO_EQUALIZER_BLOCK_SIZE};
use crate::equalizer::EqualizerConfiguration;
use crate::error::Q30Error;
use crate::sound_modes::SoundModes;

/// Which optional blocks a state payload carries, one bit per field.
/// Bits 4 through 7 are reserved: ignored on decode, never set on encode.
#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    pub sound_modes: bool,
    pub firmware_version: bool,
    pub serial_number: bool,
    pub stereo_equalizer: bool,
    #[skip]
    unused: B4,
}

/// Everything the device reports in one state update.
///
/// The flags byte is never stored: [`Self::feature_flags`] computes it from
/// which optional fields are populated, so outgoing flags cannot disagree
/// with the payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceState {
    pub equalizer_configuration: EqualizerConfiguration,
    pub sound_modes: Option<SoundModes>,
    pub firmware_version: Option<String>,
    pub serial_number: Option<String>,
}

impl DeviceState {
    pub fn feature_flags(&self) -> FeatureFlags {
        FeatureFlags::new()
            .with_sound_modes(self.sound_modes.is_some())
            .with_firmware_version(self.firmware_version.is_some())
            .with_serial_number(self.serial_number.is_some())
            .with_stereo_equalizer(self.equalizer_configuration.is_stereo())
    }

    /// Strict parse of a state payload. Bytes left over after the last
    /// flagged block fail with [`Q30Error::TrailingData`]; use
    /// [`Self::from_bytes_partial`] to accept payloads from firmware that
    /// appends blocks this crate does not know.
    pub fn from_bytes(bytes: &[u8]) -> Result<DeviceState, Q30Error> {
        let (state, extra_bytes) = Self::from_bytes_partial(bytes)?;
        if extra_bytes > 0 {
            return Err(Q30Error::TrailingData { extra_bytes });
        }
        Ok(state)
    }

    /// Parse a state payload, returning the count of unparsed trailing bytes
    /// alongside the state.
    pub fn from_bytes_partial(bytes: &[u8]) -> Result<(DeviceState, usize), Q30Error> {
        let &flags_byte = bytes.first().ok_or(Q30Error::TruncatedPayload {
            expected: 1,
            actual: 0,
        })?;
        let flags = FeatureFlags::from_bytes([flags_byte]);
        let mut offset = 1;

        let eq_len = if flags.stereo_equalizer() {
            STEREO_EQUALIZER_BLOCK_SIZE
        } else {
            EQUALIZER_BLOCK_SIZE
        };
        let equalizer_configuration =
            EqualizerConfiguration::from_bytes(take(bytes, &mut offset, eq_len)?)?;

        let sound_modes = if flags.sound_modes() {
            let block = take(bytes, &mut offset, SOUND_MODES_BLOCK_SIZE)?;
            Some(SoundModes::from_bytes(block)?)
        } else {
            None
        };

        let firmware_version = if flags.firmware_version() {
            Some(take_string(bytes, &mut offset, "firmware_version")?)
        } else {
            None
        };

        let serial_number = if flags.serial_number() {
            Some(take_string(bytes, &mut offset, "serial_number")?)
        } else {
            None
        };

        let state = DeviceState {
            equalizer_configuration,
            sound_modes,
            firmware_version,
            serial_number,
        };
        Ok((state, bytes.len() - offset))
    }

    /// Encode the payload. Flags are recomputed from field presence, never
    /// replayed from an earlier decode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Q30Error> {
        let mut bytes = Vec::new();
        bytes.push(self.feature_flags().into_bytes()[0]);
        bytes.extend_from_slice(&self.equalizer_configuration.to_bytes());
        if let Some(sound_modes) = self.sound_modes {
            bytes.extend_from_slice(&sound_modes.to_bytes());
        }
        if let Some(firmware_version) = &self.firmware_version {
            push_string(&mut bytes, firmware_version, "firmware_version")?;
        }
        if let Some(serial_number) = &self.serial_number {
            push_string(&mut bytes, serial_number, "serial_number")?;
        }
        Ok(bytes)
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "equalizer: {}", self.equalizer_configuration)?;
        if let Some(modes) = &self.sound_modes {
            write!(f, ", {}", modes)?;
        }
        if let Some(firmware) = &self.firmware_version {
            write!(f, ", firmware {}", firmware)?;
        }
        if let Some(serial) = &self.serial_number {
            write!(f, ", serial {}", serial)?;
        }
        Ok(())
    }
}

fn take<'a>(bytes: &'a [u8], offset: &mut usize, len: usize) -> Result<&'a [u8], Q30Error> {
    if bytes.len() < *offset + len {
        return Err(Q30Error::TruncatedPayload {
            expected: *offset + len,
            actual: bytes.len(),
        });
    }
    let slice = &bytes[*offset..*offset + len];
    *offset += len;
    Ok(slice)
}

/// Length-prefixed UTF-8. The error value is the first byte that is not
/// valid UTF-8.
fn take_string(bytes: &[u8], offset: &mut usize, field: &'static str) -> Result<String, Q30Error> {
    let len = take(bytes, offset, 1)?[0] as usize;
    let data = take(bytes, offset, len)?;
    match std::str::from_utf8(data) {
        Ok(value) => Ok(value.to_owned()),
        Err(err) => Err(Q30Error::InvalidField {
            field,
            value: data[err.valid_up_to()] as u32,
        }),
    }
}

fn push_string(bytes: &mut Vec<u8>, value: &str, field: &'static str) -> Result<(), Q30Error> {
    if value.len() > u8::MAX as usize {
        return Err(Q30Error::InvalidField {
            field,
            value: value.len() as u32,
        });
    }
    bytes.push(value.len() as u8);
    bytes.extend_from_slice(value.as_bytes());
    Ok(())
}
