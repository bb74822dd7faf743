//! Edge case tests for malformed frames and out-of-range field values

mod common;

use common::*;

#[test]
fn test_frame_below_minimum_length() {
    let frame = hex_to_bytes(REQUEST_STATE_FRAME);
    for len in 0..frame.len() {
        match Packet::from_bytes(frame.slice(..len)) {
            Err(Q30Error::MalformedFrame {
                reason: MalformedFrameReason::TooShort { minimum, actual },
            }) => {
                assert_eq!(minimum, 10);
                assert_eq!(actual, len);
            }
            other => panic!("Expected TooShort for length {}, got {:?}", len, other),
        }
    }
}

#[test]
fn test_unrecognized_prefix() {
    let mut frame = hex_to_bytes(REQUEST_STATE_FRAME).to_vec();
    frame[0] = 0x0A;

    match Packet::from_bytes(Bytes::from(frame)) {
        Err(Q30Error::MalformedFrame {
            reason: MalformedFrameReason::BadPrefix,
        }) => {}
        other => panic!("Expected BadPrefix, got {:?}", other),
    }
}

#[test]
fn test_declared_length_mismatch() {
    let mut frame = hex_to_bytes(REQUEST_STATE_FRAME).to_vec();
    frame[7] = 0x0B; // claims one byte more than the buffer holds

    match Packet::from_bytes(Bytes::from(frame)) {
        Err(Q30Error::MalformedFrame {
            reason: MalformedFrameReason::LengthMismatch { declared, actual },
        }) => {
            assert_eq!(declared, 11);
            assert_eq!(actual, 10);
        }
        other => panic!("Expected LengthMismatch, got {:?}", other),
    }
}

#[test]
fn test_appended_garbage_is_rejected() {
    let mut frame = hex_to_bytes(REQUEST_STATE_FRAME).to_vec();
    frame.push(0xAA);

    match Packet::from_bytes(Bytes::from(frame)) {
        Err(Q30Error::MalformedFrame {
            reason: MalformedFrameReason::LengthMismatch { declared, actual },
        }) => {
            assert_eq!(declared, 10);
            assert_eq!(actual, 11);
        }
        other => panic!("Expected LengthMismatch, got {:?}", other),
    }
}

#[test]
fn test_checksum_mismatch() {
    let mut frame = hex_to_bytes(REQUEST_STATE_FRAME).to_vec();
    frame[9] = 0x03;

    match Packet::from_bytes(Bytes::from(frame)) {
        Err(Q30Error::MalformedFrame {
            reason: MalformedFrameReason::ChecksumMismatch { computed, stored },
        }) => {
            assert_eq!(computed, 0x02);
            assert_eq!(stored, 0x03);
        }
        other => panic!("Expected ChecksumMismatch, got {:?}", other),
    }
}

#[test]
fn test_oversized_body_is_rejected() {
    match RawPacket::new(
        Direction::Outbound,
        Command::State,
        Bytes::from(vec![0u8; 70_000]),
    ) {
        Err(Q30Error::InvalidField { field, value }) => {
            assert_eq!(field, "body");
            assert_eq!(value, 70_000);
        }
        other => panic!("Expected InvalidField, got {:?}", other),
    }

    // A body of exactly MAX_BODY_SIZE fills the length field to its limit
    let raw = RawPacket::new(
        Direction::Inbound,
        Command::State,
        Bytes::from(vec![0u8; MAX_BODY_SIZE]),
    )
    .unwrap();
    let frame = Bytes::from(raw.clone());
    assert_eq!(frame.len(), u16::MAX as usize);
    assert_eq!(&frame[7..9], &u16::MAX.to_le_bytes());
    assert_eq!(RawPacket::try_from(frame).unwrap(), raw);
}

#[test]
fn test_invalid_sound_mode_bytes() {
    let cases: [([u8; 4], &str, u32); 4] = [
        ([3, 0, 0, 0], "ambient_sound_mode", 3),
        ([0, 4, 0, 0], "noise_canceling_mode", 4),
        ([0, 0, 2, 0], "transparency_mode", 2),
        ([0, 0, 0, 11], "custom_noise_canceling", 11),
    ];

    for (bytes, expected_field, expected_value) in cases {
        match SoundModes::from_bytes(&bytes) {
            Err(Q30Error::InvalidField { field, value }) => {
                assert_eq!(field, expected_field);
                assert_eq!(value, expected_value);
            }
            other => panic!(
                "Expected InvalidField for {:?}, got {:?}",
                bytes, other
            ),
        }
    }
}

#[test]
fn test_truncated_sound_modes_block() {
    match SoundModes::from_bytes(&[1, 0]) {
        Err(Q30Error::TruncatedPayload { expected, actual }) => {
            assert_eq!(expected, 4);
            assert_eq!(actual, 2);
        }
        other => panic!("Expected TruncatedPayload, got {:?}", other),
    }
}

#[test]
fn test_empty_state_payload() {
    match DeviceState::from_bytes(&[]) {
        Err(Q30Error::TruncatedPayload { expected, actual }) => {
            assert_eq!(expected, 1);
            assert_eq!(actual, 0);
        }
        other => panic!("Expected TruncatedPayload, got {:?}", other),
    }
}

#[test]
fn test_custom_noise_canceling_bounds() {
    assert_eq!(CustomNoiseCanceling::new(10).unwrap().level(), 10);

    match CustomNoiseCanceling::new(11) {
        Err(Q30Error::InvalidField { field, value }) => {
            assert_eq!(field, "custom_noise_canceling");
            assert_eq!(value, 11);
        }
        other => panic!("Expected InvalidField, got {:?}", other),
    }
}

#[test]
fn test_firmware_version_text_forms() {
    let version = FirmwareVersion::from_bytes(b"02.35").unwrap();
    assert_eq!(version.major(), 2);
    assert_eq!(version.minor(), 35);
    assert_eq!(version.to_bytes(), *b"02.35");
    assert_eq!(version.to_string(), "02.35");

    match FirmwareVersion::from_bytes(b"02x35") {
        Err(Q30Error::InvalidField { field, value }) => {
            assert_eq!(field, "firmware_version");
            assert_eq!(value, u32::from(b'x'));
        }
        other => panic!("Expected InvalidField, got {:?}", other),
    }

    match FirmwareVersion::from_bytes(b"0a.35") {
        Err(Q30Error::InvalidField { field, value }) => {
            assert_eq!(field, "firmware_version");
            assert_eq!(value, u32::from(b'a'));
        }
        other => panic!("Expected InvalidField, got {:?}", other),
    }

    match FirmwareVersion::from_bytes(b"02.") {
        Err(Q30Error::TruncatedPayload { expected, actual }) => {
            assert_eq!(expected, 5);
            assert_eq!(actual, 3);
        }
        other => panic!("Expected TruncatedPayload, got {:?}", other),
    }
}

#[test]
fn test_firmware_version_component_bounds() {
    // Two ASCII digits per component, so anything above 99 has no wire form
    match FirmwareVersion::new(255, 0) {
        Err(Q30Error::InvalidField { field, value }) => {
            assert_eq!(field, "firmware_version");
            assert_eq!(value, 255);
        }
        other => panic!("Expected InvalidField, got {:?}", other),
    }

    match FirmwareVersion::new(0, 100) {
        Err(Q30Error::InvalidField { field, value }) => {
            assert_eq!(field, "firmware_version");
            assert_eq!(value, 100);
        }
        other => panic!("Expected InvalidField, got {:?}", other),
    }

    let version = FirmwareVersion::new(99, 99).unwrap();
    assert_eq!(
        FirmwareVersion::from_bytes(&version.to_bytes()).unwrap(),
        version
    );

    let packet = Packet::FirmwareVersionUpdate {
        left: version,
        right: version,
    };
    let decoded = Packet::from_bytes(packet.to_bytes().unwrap()).unwrap();
    assert_eq!(decoded, packet);
}

#[test]
fn test_firmware_version_ordering() {
    assert!(FirmwareVersion::new(1, 99).unwrap() < FirmwareVersion::new(2, 0).unwrap());
    assert!(FirmwareVersion::new(2, 0).unwrap() < FirmwareVersion::new(2, 1).unwrap());
    assert_eq!(
        FirmwareVersion::new(2, 35).unwrap().min(FirmwareVersion::new(2, 34).unwrap()),
        FirmwareVersion::new(2, 34).unwrap()
    );
}

#[test]
fn test_error_recoverability() {
    let recoverable = [
        Q30Error::UnknownPacketType {
            direction: Direction::Inbound,
            command: 0xEEFF,
        },
        Q30Error::TrailingData { extra_bytes: 3 },
    ];
    for error in recoverable {
        assert!(error.is_recoverable(), "{error} should be recoverable");
    }

    let fatal = [
        Q30Error::MalformedFrame {
            reason: MalformedFrameReason::BadPrefix,
        },
        Q30Error::TruncatedPayload {
            expected: 4,
            actual: 2,
        },
        Q30Error::InvalidField {
            field: "ambient_sound_mode",
            value: 3,
        },
        Q30Error::GainOutOfRange {
            band: 0,
            value: 130,
        },
    ];
    for error in fatal {
        assert!(!error.is_recoverable(), "{error} should not be recoverable");
    }
}
