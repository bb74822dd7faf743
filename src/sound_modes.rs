use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;
use strum_macros::Display;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::SOUND_MODES_BLOCK_SIZE;
use crate::error::Q30Error;

/// Top-level listening mode, one byte on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Default, TryFromPrimitive, IntoPrimitive,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum AmbientSoundMode {
    #[strum(to_string = "Noise Canceling")]
    NoiseCanceling = 0,
    Transparency = 1,
    #[default]
    Normal = 2,
}

/// Noise-canceling tuning, meaningful while [`AmbientSoundMode::NoiseCanceling`]
/// is active.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Default, TryFromPrimitive, IntoPrimitive,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum NoiseCancelingMode {
    #[default]
    Transport = 0,
    Outdoor = 1,
    Indoor = 2,
    Custom = 3,
}

/// Transparency tuning, meaningful while [`AmbientSoundMode::Transparency`]
/// is active.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Default, TryFromPrimitive, IntoPrimitive,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum TransparencyMode {
    #[default]
    #[strum(to_string = "Fully Transparent")]
    FullyTransparent = 0,
    #[strum(to_string = "Vocal Mode")]
    VocalMode = 1,
}

/// Strength of the custom noise-canceling curve, `0..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CustomNoiseCanceling(u8);

impl CustomNoiseCanceling {
    pub const MAX_LEVEL: u8 = 10;

    pub fn new(level: u8) -> Result<Self, Q30Error> {
        if level > Self::MAX_LEVEL {
            return Err(Q30Error::InvalidField {
                field: "custom_noise_canceling",
                value: level as u32,
            });
        }
        Ok(CustomNoiseCanceling(level))
    }

    pub fn level(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for CustomNoiseCanceling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wire form of the sound-modes block, byte per field.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct SoundModesRaw {
    pub ambient_sound_mode: u8,
    pub noise_canceling_mode: u8,
    pub transparency_mode: u8,
    pub custom_noise_canceling: u8,
}

/// The hearing-mode block carried by state updates, sound-mode reports and
/// set-sound-mode commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoundModes {
    pub ambient_sound_mode: AmbientSoundMode,
    pub noise_canceling_mode: NoiseCancelingMode,
    pub transparency_mode: TransparencyMode,
    pub custom_noise_canceling: CustomNoiseCanceling,
}

impl TryFrom<SoundModesRaw> for SoundModes {
    type Error = Q30Error;

    fn try_from(raw: SoundModesRaw) -> Result<Self, Self::Error> {
        let ambient_sound_mode =
            AmbientSoundMode::try_from(raw.ambient_sound_mode).map_err(|_| {
                Q30Error::InvalidField {
                    field: "ambient_sound_mode",
                    value: raw.ambient_sound_mode as u32,
                }
            })?;
        let noise_canceling_mode =
            NoiseCancelingMode::try_from(raw.noise_canceling_mode).map_err(|_| {
                Q30Error::InvalidField {
                    field: "noise_canceling_mode",
                    value: raw.noise_canceling_mode as u32,
                }
            })?;
        let transparency_mode =
            TransparencyMode::try_from(raw.transparency_mode).map_err(|_| {
                Q30Error::InvalidField {
                    field: "transparency_mode",
                    value: raw.transparency_mode as u32,
                }
            })?;
        let custom_noise_canceling = CustomNoiseCanceling::new(raw.custom_noise_canceling)?;

        Ok(SoundModes {
            ambient_sound_mode,
            noise_canceling_mode,
            transparency_mode,
            custom_noise_canceling,
        })
    }
}

impl From<SoundModes> for SoundModesRaw {
    fn from(modes: SoundModes) -> Self {
        SoundModesRaw {
            ambient_sound_mode: modes.ambient_sound_mode.into(),
            noise_canceling_mode: modes.noise_canceling_mode.into(),
            transparency_mode: modes.transparency_mode.into(),
            custom_noise_canceling: modes.custom_noise_canceling.level(),
        }
    }
}

impl SoundModes {
    /// Parse the leading 4-byte wire block of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Q30Error> {
        let (raw, _) = SoundModesRaw::read_from_prefix(bytes).map_err(|_| {
            Q30Error::TruncatedPayload {
                expected: SOUND_MODES_BLOCK_SIZE,
                actual: bytes.len(),
            }
        })?;
        SoundModes::try_from(raw)
    }

    /// The 4-byte wire block.
    pub fn to_bytes(&self) -> [u8; SOUND_MODES_BLOCK_SIZE] {
        let raw = SoundModesRaw::from(*self);
        let mut bytes = [0u8; SOUND_MODES_BLOCK_SIZE];
        bytes.copy_from_slice(raw.as_bytes());
        bytes
    }
}

impl fmt::Display for SoundModes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (noise canceling: {}, transparency: {}, custom level: {})",
            self.ambient_sound_mode,
            self.noise_canceling_mode,
            self.transparency_mode,
            self.custom_noise_canceling
        )
    }
}
