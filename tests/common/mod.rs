//! Common test utilities and shared imports

// Allow unused imports and dead code since this is a shared module
// used across multiple test files - not all items are used in every test file
#[allow(unused_imports)]
pub use bytes::Bytes;
#[allow(unused_imports)]
pub use hex;
#[allow(unused_imports)]
pub use q30_lib::battery::BatteryLevel;
#[allow(unused_imports)]
pub use q30_lib::constants::MAX_BODY_SIZE;
#[allow(unused_imports)]
pub use q30_lib::equalizer::{EqualizerConfiguration, PresetEqualizerProfile, VolumeAdjustments};
#[allow(unused_imports)]
pub use q30_lib::error::{MalformedFrameReason, Q30Error};
#[allow(unused_imports)]
pub use q30_lib::firmware::FirmwareVersion;
#[allow(unused_imports)]
pub use q30_lib::message::Packet;
#[allow(unused_imports)]
pub use q30_lib::packet::{Command, Direction, RawPacket, checksum};
#[allow(unused_imports)]
pub use q30_lib::sound_modes::{
    AmbientSoundMode, CustomNoiseCanceling, NoiseCancelingMode, SoundModes, TransparencyMode,
};
#[allow(unused_imports)]
pub use q30_lib::state::{DeviceState, FeatureFlags};

/// Decode hex string to bytes for testing
#[allow(dead_code)]
pub fn hex_to_bytes(hex_data: &str) -> Bytes {
    Bytes::from(hex::decode(hex_data).expect("Failed to decode hex"))
}

/// Real request-firmware-version frame from a device capture
#[allow(dead_code)]
pub const REQUEST_FIRMWARE_VERSION_FRAME: &str = "08ee00000001050a0006";

/// Real set-equalizer-with-DRC ack from a device capture
#[allow(dead_code)]
pub const SET_EQUALIZER_WITH_DRC_OK_FRAME: &str = "09ff00000102830a0098";

/// Request-state frame (empty body)
#[allow(dead_code)]
pub const REQUEST_STATE_FRAME: &str = "08ee00000001010a0002";

/// Sound-mode report: Transparency, Transport, Fully Transparent, level 0
#[allow(dead_code)]
pub const SOUND_MODE_UPDATE_FRAME: &str = "09ff00000106010e00010000001f";

/// State update with every non-stereo optional block: Soundcore Signature
/// preset, Normal mode, firmware "02.35", serial "Q30X"
#[allow(dead_code)]
pub const STATE_UPDATE_FRAME: &str =
    "09ff000001010124000700007878787878787878020000000530322e3335045133305805";
