use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;
use strum_macros::Display;
use zerocopy::byteorder::little_endian::U16;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{
    CUSTOM_PROFILE_ID, EQUALIZER_BAND_COUNT, EQUALIZER_BLOCK_SIZE, STEREO_EQUALIZER_BLOCK_SIZE,
};
use crate::error::Q30Error;

/// Eight per-band gains in 0.1 dB steps, -12.0 dB to +12.0 dB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VolumeAdjustments([i16; EQUALIZER_BAND_COUNT]);

impl VolumeAdjustments {
    pub const MIN_GAIN: i16 = -120;
    pub const MAX_GAIN: i16 = 120;

    pub fn new(gains: [i16; EQUALIZER_BAND_COUNT]) -> Result<Self, Q30Error> {
        for (band, &value) in gains.iter().enumerate() {
            if !(Self::MIN_GAIN..=Self::MAX_GAIN).contains(&value) {
                return Err(Q30Error::GainOutOfRange { band, value });
            }
        }
        Ok(VolumeAdjustments(gains))
    }

    pub fn gains(&self) -> [i16; EQUALIZER_BAND_COUNT] {
        self.0
    }

    /// Wire bytes: each gain shifted so [`Self::MIN_GAIN`] lands on zero.
    pub fn to_bytes(&self) -> [u8; EQUALIZER_BAND_COUNT] {
        self.0.map(|gain| (gain - Self::MIN_GAIN) as u8)
    }

    /// Inverse of [`Self::to_bytes`]. Bytes above 240 would decode past
    /// [`Self::MAX_GAIN`] and are rejected.
    pub fn from_bytes(bytes: [u8; EQUALIZER_BAND_COUNT]) -> Result<Self, Q30Error> {
        let mut gains = [0i16; EQUALIZER_BAND_COUNT];
        for (band, &byte) in bytes.iter().enumerate() {
            let value = Self::MIN_GAIN + byte as i16;
            if value > Self::MAX_GAIN {
                return Err(Q30Error::GainOutOfRange { band, value });
            }
            gains[band] = value;
        }
        Ok(VolumeAdjustments(gains))
    }

    /// Dynamic range compensation expected by firmwares that take the
    /// set-equalizer-with-DRC command. Neighboring bands bleed into each
    /// other, so the device applies the inverse once the gains reach the
    /// speaker.
    pub fn apply_drc(&self) -> VolumeAdjustments {
        const SMALLER_COEFFICIENT: f64 = 0.85;
        const LARGER_COEFFICIENT: f64 = 0.95;
        // Zero entries are crossover slots replaced by the subtraction terms
        // in the match below.
        const BAND_COEFFICIENTS: [[f64; EQUALIZER_BAND_COUNT]; EQUALIZER_BAND_COUNT] = [
            [
                1.26,
                -0.71 * SMALLER_COEFFICIENT,
                0.177,
                -0.0494,
                0.0345,
                -0.0197,
                0.0075,
                -0.00217,
            ],
            [
                -0.71 * SMALLER_COEFFICIENT,
                1.73 * LARGER_COEFFICIENT,
                0.0,
                0.204,
                -0.068,
                0.045,
                -0.0235,
                0.0075,
            ],
            [
                0.177,
                -0.81 * SMALLER_COEFFICIENT,
                1.73 * LARGER_COEFFICIENT,
                -0.81 * SMALLER_COEFFICIENT,
                0.208,
                -0.07,
                0.045,
                -0.0197,
            ],
            [
                -0.0494,
                0.204,
                0.0,
                1.73 * LARGER_COEFFICIENT,
                -0.82 * SMALLER_COEFFICIENT,
                0.208,
                -0.068,
                0.0345,
            ],
            [
                0.0345,
                -0.068,
                0.208,
                -0.82 * SMALLER_COEFFICIENT,
                1.73 * LARGER_COEFFICIENT,
                0.0,
                0.204,
                -0.0494,
            ],
            [
                -0.0197,
                0.045,
                -0.07,
                0.208,
                -0.81 * SMALLER_COEFFICIENT,
                1.73 * LARGER_COEFFICIENT,
                -0.81 * SMALLER_COEFFICIENT,
                0.177,
            ],
            [
                0.0075,
                -0.0235,
                0.045,
                -0.068,
                0.204,
                0.0,
                1.83 * LARGER_COEFFICIENT,
                -0.71 * SMALLER_COEFFICIENT,
            ],
            [
                -0.00217,
                0.0075,
                -0.0197,
                0.0345,
                -0.0494,
                0.177,
                -0.71 * SMALLER_COEFFICIENT,
                1.5,
            ],
        ];

        let bands = self.0.map(|gain| f64::from(gain) / 10.0);
        let lows_subtraction = bands[2] * 0.81 * SMALLER_COEFFICIENT;
        let highs_subtraction = bands[5] * 0.81 * SMALLER_COEFFICIENT;

        let multiplied: [f64; EQUALIZER_BAND_COUNT] = std::array::from_fn(|row| {
            bands
                .iter()
                .enumerate()
                .map(|(index, band)| match (row, index) {
                    (1 | 3, 2) => -lows_subtraction,
                    (4 | 6, 5) => -highs_subtraction,
                    _ => band * BAND_COEFFICIENTS[row][index],
                })
                .sum()
        });

        // The weighted sum is ten times the target dB value, which makes it
        // exactly the 0.1 dB step count.
        VolumeAdjustments(multiplied.map(|band| band.round() as i16))
    }
}

/// Factory equalizer presets and their protocol ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u16)]
pub enum PresetEqualizerProfile {
    #[strum(to_string = "Soundcore Signature")]
    SoundcoreSignature = 0x0000,
    Acoustic = 0x0001,
    #[strum(to_string = "Bass Booster")]
    BassBooster = 0x0002,
    #[strum(to_string = "Bass Reducer")]
    BassReducer = 0x0003,
    Classical = 0x0004,
    Podcast = 0x0005,
    Dance = 0x0006,
    Deep = 0x0007,
    Electronic = 0x0008,
    Flat = 0x0009,
    #[strum(to_string = "Hip Hop")]
    HipHop = 0x000A,
    Jazz = 0x000B,
    Latin = 0x000C,
    Lounge = 0x000D,
    Piano = 0x000E,
    Pop = 0x000F,
    #[strum(to_string = "R&B")]
    RnB = 0x0010,
    Rock = 0x0011,
    #[strum(to_string = "Small Speakers")]
    SmallSpeakers = 0x0012,
    #[strum(to_string = "Spoken Word")]
    SpokenWord = 0x0013,
    #[strum(to_string = "Treble Booster")]
    TrebleBooster = 0x0014,
    #[strum(to_string = "Treble Reducer")]
    TrebleReducer = 0x0015,
}

impl PresetEqualizerProfile {
    pub fn id(&self) -> u16 {
        (*self).into()
    }

    /// The factory gain table for this preset, in 0.1 dB steps.
    pub fn volume_adjustments(&self) -> VolumeAdjustments {
        let gains: [i16; EQUALIZER_BAND_COUNT] = match self {
            Self::SoundcoreSignature => [0, 0, 0, 0, 0, 0, 0, 0],
            Self::Acoustic => [40, 10, 20, 20, 40, 40, 40, 20],
            Self::BassBooster => [40, 30, 10, 0, 0, 0, 0, 0],
            Self::BassReducer => [-40, -30, -10, 0, 0, 0, 0, 0],
            Self::Classical => [30, 30, -20, -20, 0, 20, 30, 40],
            Self::Podcast => [-30, 20, 40, 40, 30, 20, 0, -20],
            Self::Dance => [20, -30, -10, 10, 20, 20, 10, -30],
            Self::Deep => [20, 10, 30, 30, 20, -20, -40, -50],
            Self::Electronic => [30, 20, -20, 20, 10, 20, 30, 30],
            Self::Flat => [-20, -20, -10, 0, 0, 0, -20, -20],
            Self::HipHop => [20, 30, -10, -10, 20, -10, 20, 30],
            Self::Jazz => [20, 20, -20, -20, 0, 20, 30, 40],
            Self::Latin => [0, 0, -20, -20, -20, 0, 30, 50],
            Self::Lounge => [-10, 20, 40, 30, 0, -20, 20, 10],
            Self::Piano => [0, 30, 30, 20, 40, 50, 30, 40],
            Self::Pop => [-10, 10, 30, 30, 10, -10, -20, -30],
            Self::RnB => [60, 20, -20, -20, 20, 30, 30, 40],
            Self::Rock => [30, 20, -10, -10, 10, 30, 30, 30],
            Self::SmallSpeakers => [40, 30, 10, 0, -20, -30, -40, -40],
            Self::SpokenWord => [-30, -20, 10, 20, 20, 10, 0, -30],
            Self::TrebleBooster => [-20, -20, -20, -10, 10, 20, 20, 40],
            Self::TrebleReducer => [0, 0, 0, -20, -30, -40, -40, -60],
        };
        VolumeAdjustments(gains)
    }
}

/// Wire form of the leading mono part of an equalizer block.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct EqualizerBlockRaw {
    pub profile_id: U16,
    pub bands: [u8; EQUALIZER_BAND_COUNT],
}

/// A preset or hand-set equalizer, with an optional separate right channel.
///
/// The wire block is `[profile id: 2 LE][left bands: 8][right bands: 8]`,
/// with the right half present only on stereo-equalizer devices. A profile
/// id other than [`CUSTOM_PROFILE_ID`] is authoritative: the left gains come
/// from the preset table, not from the band bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EqualizerConfiguration {
    preset_profile: Option<PresetEqualizerProfile>,
    volume_adjustments: VolumeAdjustments,
    right_volume_adjustments: Option<VolumeAdjustments>,
}

impl Default for EqualizerConfiguration {
    fn default() -> Self {
        Self::new_from_preset_profile(PresetEqualizerProfile::SoundcoreSignature)
    }
}

impl EqualizerConfiguration {
    pub fn new_from_preset_profile(preset_profile: PresetEqualizerProfile) -> Self {
        EqualizerConfiguration {
            preset_profile: Some(preset_profile),
            volume_adjustments: preset_profile.volume_adjustments(),
            right_volume_adjustments: None,
        }
    }

    pub fn new_custom_profile(volume_adjustments: VolumeAdjustments) -> Self {
        EqualizerConfiguration {
            preset_profile: None,
            volume_adjustments,
            right_volume_adjustments: None,
        }
    }

    /// The same configuration with its own right channel gains.
    pub fn with_right_channel(mut self, right_volume_adjustments: VolumeAdjustments) -> Self {
        self.right_volume_adjustments = Some(right_volume_adjustments);
        self
    }

    pub fn profile_id(&self) -> u16 {
        match self.preset_profile {
            Some(profile) => profile.id(),
            None => CUSTOM_PROFILE_ID,
        }
    }

    pub fn preset_profile(&self) -> Option<PresetEqualizerProfile> {
        self.preset_profile
    }

    pub fn volume_adjustments(&self) -> VolumeAdjustments {
        self.volume_adjustments
    }

    pub fn right_volume_adjustments(&self) -> Option<VolumeAdjustments> {
        self.right_volume_adjustments
    }

    pub fn is_stereo(&self) -> bool {
        self.right_volume_adjustments.is_some()
    }

    /// Parse an exactly 10-byte mono or 18-byte stereo block.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Q30Error> {
        let (raw, rest) = EqualizerBlockRaw::read_from_prefix(bytes).map_err(|_| {
            Q30Error::TruncatedPayload {
                expected: EQUALIZER_BLOCK_SIZE,
                actual: bytes.len(),
            }
        })?;

        let right_volume_adjustments = if rest.is_empty() {
            None
        } else {
            if rest.len() > EQUALIZER_BAND_COUNT {
                return Err(Q30Error::TrailingData {
                    extra_bytes: rest.len() - EQUALIZER_BAND_COUNT,
                });
            }
            let right_bytes: [u8; EQUALIZER_BAND_COUNT] =
                rest.try_into().map_err(|_| Q30Error::TruncatedPayload {
                    expected: STEREO_EQUALIZER_BLOCK_SIZE,
                    actual: bytes.len(),
                })?;
            Some(VolumeAdjustments::from_bytes(right_bytes)?)
        };

        // Band bytes are validated even when a preset overrides them, so a
        // corrupt block never decodes cleanly.
        let wire_adjustments = VolumeAdjustments::from_bytes(raw.bands)?;

        let profile_id = raw.profile_id.get();
        if profile_id == CUSTOM_PROFILE_ID {
            return Ok(EqualizerConfiguration {
                preset_profile: None,
                volume_adjustments: wire_adjustments,
                right_volume_adjustments,
            });
        }
        match PresetEqualizerProfile::try_from(profile_id) {
            Ok(profile) => Ok(EqualizerConfiguration {
                preset_profile: Some(profile),
                volume_adjustments: profile.volume_adjustments(),
                right_volume_adjustments,
            }),
            Err(_) => Err(Q30Error::InvalidField {
                field: "profile_id",
                value: profile_id as u32,
            }),
        }
    }

    /// The 10-byte mono or 18-byte stereo wire block.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(STEREO_EQUALIZER_BLOCK_SIZE);
        bytes.extend_from_slice(&self.profile_id().to_le_bytes());
        bytes.extend_from_slice(&self.volume_adjustments.to_bytes());
        if let Some(right) = self.right_volume_adjustments {
            bytes.extend_from_slice(&right.to_bytes());
        }
        bytes
    }

    /// Length of [`Self::to_bytes`] without building it.
    pub fn byte_len(&self) -> usize {
        if self.is_stereo() {
            STEREO_EQUALIZER_BLOCK_SIZE
        } else {
            EQUALIZER_BLOCK_SIZE
        }
    }
}

impl fmt::Display for EqualizerConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.preset_profile {
            Some(profile) => write!(f, "{}", profile),
            None => write!(f, "Custom"),
        }
    }
}
