//! Packet codec and device-state model for Soundcore Q30 Bluetooth
//! headphones: the frame envelope, the packets both sides exchange, and the
//! equalizer, sound-mode and state structures they carry. Transport is out
//! of scope; everything here works on owned byte buffers.

pub mod battery;
pub mod constants;
pub mod equalizer;
pub mod error;
pub mod firmware;
pub mod message;
pub mod packet;
pub mod sound_modes;
pub mod state;

// Re-export the front-door types for easy access
pub use error::Q30Error;
pub use message::Packet;
pub use state::DeviceState;
