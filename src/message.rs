use bytes::Bytes;
use tracing::warn;

use crate::battery::BatteryLevel;
use crate::constants::{FIRMWARE_VERSION_SIZE, SOUND_MODES_BLOCK_SIZE};
use crate::equalizer::EqualizerConfiguration;
use crate::error::Q30Error;
use crate::firmware::FirmwareVersion;
use crate::packet::{Command, Direction, RawPacket};
use crate::sound_modes::SoundModes;
use crate::state::DeviceState;

/// Every packet this crate understands, both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// Full device state report, sent on connect and after most changes
    StateUpdate(DeviceState),
    /// Sound modes were changed on the device itself
    SoundModeUpdate(SoundModes),
    /// Battery level report; `right` is present on devices with two cells
    BatteryLevelUpdate {
        left: BatteryLevel,
        right: Option<BatteryLevel>,
    },
    /// Charging state report
    BatteryChargingUpdate { left: bool, right: Option<bool> },
    /// Firmware versions of both sides of the device
    FirmwareVersionUpdate {
        left: FirmwareVersion,
        right: FirmwareVersion,
    },
    /// Ack for [`Packet::SetSoundMode`]
    SetSoundModeOk,
    /// Ack for [`Packet::SetEqualizer`]
    SetEqualizerOk,
    /// Ack for [`Packet::SetEqualizerWithDrc`]
    SetEqualizerWithDrcOk,
    /// Ask the device for a [`Packet::StateUpdate`]
    RequestState,
    /// Ask the device for a [`Packet::FirmwareVersionUpdate`]
    RequestFirmwareVersion,
    /// Change the sound modes
    SetSoundMode(SoundModes),
    /// Change the equalizer
    SetEqualizer(EqualizerConfiguration),
    /// Change the equalizer on firmwares that expect DRC-compensated gains.
    /// The configuration is encoded as given; callers run
    /// [`crate::equalizer::VolumeAdjustments::apply_drc`] first.
    SetEqualizerWithDrc(EqualizerConfiguration),
}

impl TryFrom<RawPacket> for Packet {
    type Error = Q30Error;

    fn try_from(raw: RawPacket) -> Result<Self, Self::Error> {
        let body = raw.body.as_ref();
        match (raw.direction, raw.command) {
            // Device reports tolerate trailing bytes: newer firmware appends
            // fields, and rejecting the whole report would make the crate
            // useless against it.
            (Direction::Inbound, Command::State) => {
                let (state, trailing) = DeviceState::from_bytes_partial(body)?;
                warn_on_trailing(trailing, raw.command);
                Ok(Packet::StateUpdate(state))
            }
            (Direction::Inbound, Command::SoundModeUpdate) => {
                let modes = SoundModes::from_bytes(body)?;
                warn_on_trailing(body.len() - SOUND_MODES_BLOCK_SIZE, raw.command);
                Ok(Packet::SoundModeUpdate(modes))
            }
            (Direction::Inbound, Command::BatteryLevel) => {
                let &left = body.first().ok_or(Q30Error::TruncatedPayload {
                    expected: 1,
                    actual: 0,
                })?;
                warn_on_trailing(body.len().saturating_sub(2), raw.command);
                Ok(Packet::BatteryLevelUpdate {
                    left: BatteryLevel(left),
                    right: body.get(1).map(|&level| BatteryLevel(level)),
                })
            }
            (Direction::Inbound, Command::BatteryCharging) => {
                let &left = body.first().ok_or(Q30Error::TruncatedPayload {
                    expected: 1,
                    actual: 0,
                })?;
                warn_on_trailing(body.len().saturating_sub(2), raw.command);
                Ok(Packet::BatteryChargingUpdate {
                    left: left != 0,
                    right: body.get(1).map(|&charging| charging != 0),
                })
            }
            (Direction::Inbound, Command::FirmwareVersion) => {
                if body.len() < 2 * FIRMWARE_VERSION_SIZE {
                    return Err(Q30Error::TruncatedPayload {
                        expected: 2 * FIRMWARE_VERSION_SIZE,
                        actual: body.len(),
                    });
                }
                warn_on_trailing(body.len() - 2 * FIRMWARE_VERSION_SIZE, raw.command);
                Ok(Packet::FirmwareVersionUpdate {
                    left: FirmwareVersion::from_bytes(body)?,
                    right: FirmwareVersion::from_bytes(&body[FIRMWARE_VERSION_SIZE..])?,
                })
            }
            (Direction::Inbound, Command::SetSoundMode) => {
                warn_on_trailing(body.len(), raw.command);
                Ok(Packet::SetSoundModeOk)
            }
            (Direction::Inbound, Command::SetEqualizer) => {
                warn_on_trailing(body.len(), raw.command);
                Ok(Packet::SetEqualizerOk)
            }
            (Direction::Inbound, Command::SetEqualizerWithDrc) => {
                warn_on_trailing(body.len(), raw.command);
                Ok(Packet::SetEqualizerWithDrcOk)
            }

            // Host commands are produced by software under our control, so
            // anything beyond the exact layout is an error, not an advisory.
            (Direction::Outbound, Command::State) => {
                expect_empty_body(body)?;
                Ok(Packet::RequestState)
            }
            (Direction::Outbound, Command::FirmwareVersion) => {
                expect_empty_body(body)?;
                Ok(Packet::RequestFirmwareVersion)
            }
            (Direction::Outbound, Command::SetSoundMode) => {
                let modes = SoundModes::from_bytes(body)?;
                if body.len() > SOUND_MODES_BLOCK_SIZE {
                    return Err(Q30Error::TrailingData {
                        extra_bytes: body.len() - SOUND_MODES_BLOCK_SIZE,
                    });
                }
                Ok(Packet::SetSoundMode(modes))
            }
            (Direction::Outbound, Command::SetEqualizer) => Ok(Packet::SetEqualizer(
                EqualizerConfiguration::from_bytes(body)?,
            )),
            (Direction::Outbound, Command::SetEqualizerWithDrc) => Ok(
                Packet::SetEqualizerWithDrc(EqualizerConfiguration::from_bytes(body)?),
            ),

            (direction, command) => Err(Q30Error::UnknownPacketType {
                direction,
                command: command.into(),
            }),
        }
    }
}

impl Packet {
    /// The direction this packet travels.
    pub fn direction(&self) -> Direction {
        match self {
            Packet::StateUpdate(_)
            | Packet::SoundModeUpdate(_)
            | Packet::BatteryLevelUpdate { .. }
            | Packet::BatteryChargingUpdate { .. }
            | Packet::FirmwareVersionUpdate { .. }
            | Packet::SetSoundModeOk
            | Packet::SetEqualizerOk
            | Packet::SetEqualizerWithDrcOk => Direction::Inbound,
            Packet::RequestState
            | Packet::RequestFirmwareVersion
            | Packet::SetSoundMode(_)
            | Packet::SetEqualizer(_)
            | Packet::SetEqualizerWithDrc(_) => Direction::Outbound,
        }
    }

    /// The command pair identifying this packet on the wire.
    pub fn command(&self) -> Command {
        match self {
            Packet::StateUpdate(_) | Packet::RequestState => Command::State,
            Packet::SoundModeUpdate(_) => Command::SoundModeUpdate,
            Packet::BatteryLevelUpdate { .. } => Command::BatteryLevel,
            Packet::BatteryChargingUpdate { .. } => Command::BatteryCharging,
            Packet::FirmwareVersionUpdate { .. } | Packet::RequestFirmwareVersion => {
                Command::FirmwareVersion
            }
            Packet::SetSoundModeOk | Packet::SetSoundMode(_) => Command::SetSoundMode,
            Packet::SetEqualizerOk | Packet::SetEqualizer(_) => Command::SetEqualizer,
            Packet::SetEqualizerWithDrcOk | Packet::SetEqualizerWithDrc(_) => {
                Command::SetEqualizerWithDrc
            }
        }
    }

    /// Convert to a raw packet ready for framing.
    ///
    /// Fails only when a state string is too long for its length prefix.
    pub fn to_raw_packet(&self) -> Result<RawPacket, Q30Error> {
        let body = match self {
            Packet::StateUpdate(state) => Bytes::from(state.to_bytes()?),
            Packet::SoundModeUpdate(modes) | Packet::SetSoundMode(modes) => {
                Bytes::copy_from_slice(&modes.to_bytes())
            }
            Packet::BatteryLevelUpdate { left, right } => {
                let mut body = vec![left.0];
                if let Some(right) = right {
                    body.push(right.0);
                }
                Bytes::from(body)
            }
            Packet::BatteryChargingUpdate { left, right } => {
                let mut body = vec![*left as u8];
                if let Some(right) = right {
                    body.push(*right as u8);
                }
                Bytes::from(body)
            }
            Packet::FirmwareVersionUpdate { left, right } => {
                let mut body = Vec::with_capacity(2 * FIRMWARE_VERSION_SIZE);
                body.extend_from_slice(&left.to_bytes());
                body.extend_from_slice(&right.to_bytes());
                Bytes::from(body)
            }
            Packet::SetEqualizer(configuration) | Packet::SetEqualizerWithDrc(configuration) => {
                Bytes::from(configuration.to_bytes())
            }
            Packet::SetSoundModeOk
            | Packet::SetEqualizerOk
            | Packet::SetEqualizerWithDrcOk
            | Packet::RequestState
            | Packet::RequestFirmwareVersion => Bytes::new(),
        };
        RawPacket::new(self.direction(), self.command(), body)
    }

    /// Encode to a complete frame, envelope included.
    pub fn to_bytes(&self) -> Result<Bytes, Q30Error> {
        Ok(Bytes::from(self.to_raw_packet()?))
    }

    /// Parse a complete frame: envelope first, then the packet body.
    pub fn from_bytes(bytes: Bytes) -> Result<Packet, Q30Error> {
        Packet::try_from(RawPacket::try_from(bytes)?)
    }
}

fn warn_on_trailing(extra_bytes: usize, command: Command) {
    if extra_bytes > 0 {
        warn!(?command, extra_bytes, "ignoring trailing bytes in device report");
    }
}

fn expect_empty_body(body: &[u8]) -> Result<(), Q30Error> {
    if body.is_empty() {
        Ok(())
    } else {
        Err(Q30Error::TrailingData {
            extra_bytes: body.len(),
        })
    }
}
