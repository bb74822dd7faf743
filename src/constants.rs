// Protocol constants for the Soundcore Q30

/// Direction prefix opening every host-to-device packet
pub const OUTBOUND_PREFIX: [u8; 5] = [0x08, 0xEE, 0x00, 0x00, 0x00];

/// Direction prefix opening every device-to-host packet
pub const INBOUND_PREFIX: [u8; 5] = [0x09, 0xFF, 0x00, 0x00, 0x01];

/// Size of the direction prefix (5 bytes)
pub const PREFIX_SIZE: usize = 5;

/// Size of the full frame header: prefix + command + declared length (9 bytes)
pub const HEADER_SIZE: usize = PREFIX_SIZE + 2 + 2;

/// Size of the checksum trailer (1 byte)
pub const CHECKSUM_SIZE: usize = 1;

/// Minimum size for a valid frame (header and checksum, empty body)
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + CHECKSUM_SIZE;

/// Largest body a frame can carry with its total length still fitting the
/// 2-byte length field
pub const MAX_BODY_SIZE: usize = u16::MAX as usize - HEADER_SIZE - CHECKSUM_SIZE;

/// Number of equalizer bands
pub const EQUALIZER_BAND_COUNT: usize = 8;

/// Size of a mono equalizer block: profile id + 8 band bytes (10 bytes)
pub const EQUALIZER_BLOCK_SIZE: usize = 2 + EQUALIZER_BAND_COUNT;

/// Size of a stereo equalizer block: profile id + 16 band bytes (18 bytes)
pub const STEREO_EQUALIZER_BLOCK_SIZE: usize = 2 + 2 * EQUALIZER_BAND_COUNT;

/// Profile id marking hand-set band gains rather than a factory preset
pub const CUSTOM_PROFILE_ID: u16 = 0xFEFE;

/// Size of the sound-modes block in state and sound-mode payloads (4 bytes)
pub const SOUND_MODES_BLOCK_SIZE: usize = 4;

/// Size of one firmware version field on the wire ("MM.mm", 5 bytes)
pub const FIRMWARE_VERSION_SIZE: usize = 5;
