//! Rust library for controlling Yamaha AV receivers over the YNCA protocol
//!
//! This library provides an async API for receivers that speak the
//! line-oriented YNCA control protocol (`@SUBUNIT:FUNCTION=VALUE`) over the
//! network or a serial bridge. It supports:
//!
//! - Discovery of the subunits a device actually has (zones, tuner, media
//!   sources)
//! - Power, volume, mute, input and sound program control per zone
//! - Playback control and metadata for the media sources
//! - Scene recall and zone/input naming
//! - Update callbacks for device-confirmed state changes
//!
//! # Quick Start
//!
//! ```no_run
//! use ynca::{Pwr, Receiver, YNCA_PORT};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and find out what the device has. Initialization takes a
//!     // few seconds; the receiver paces commands at ~100 ms.
//!     let mut receiver = Receiver::connect("192.168.1.100", YNCA_PORT).await?;
//!     receiver.initialize().await?;
//!
//!     if let Some(main) = receiver.main() {
//!         // Watch for state changes
//!         main.register_update_callback(|subunit, function, value| {
//!             println!("{subunit} {function} changed to {value:?}");
//!         });
//!
//!         // Control the zone
//!         main.set_pwr(Pwr::On)?;
//!         main.set_volume(-35.0)?;
//!     }
//!
//!     receiver.close();
//!     Ok(())
//! }
//! ```
//!
//! Setters return as soon as the command is queued; cached values and
//! update callbacks only change once the device reports the new state back.
//!
//! # Architecture
//!
//! The library is organized into several layers:
//!
//! - **Receiver**: connection setup, subunit discovery, access to subunits
//! - **Subunits**: typed interfaces per subsystem ([`Zone`], [`System`],
//!   [`MediaPlayback`], [`Tuner`]), driven by declarative function tables
//! - **Connection**: background reader/writer tasks, command pacing,
//!   event fan-out
//! - **Protocol**: wire line encoding and reply classification
//! - **Converters**: mapping between wire strings and typed values

mod connection;
mod converter;
mod error;
mod function;
mod mediaplayback;
mod protocol;
mod receiver;
mod subunit;
mod system;
mod tuner;
mod types;
mod zone;

// Public exports
pub use connection::{
    CallbackId, MessageCallback, YncaConnection, COMMAND_SPACING, YNCA_PORT,
};
pub use converter::{Converter, EnumCodec, FloatCodec, StrCodec};
pub use error::{Result, YncaError};
pub use function::{Access, FunctionDescriptor};
pub use mediaplayback::MediaPlayback;
pub use protocol::{Command, ProtocolEvent, Status};
pub use receiver::{Receiver, PER_COMMAND_MARGIN};
pub use subunit::{SubunitState, UpdateCallback, UpdateCallbackId};
pub use system::System;
pub use tuner::Tuner;
pub use types::{
    Avail, Band, InitVolLvl, InitVolMode, Input, Mute, Playback, PlaybackInfo, PureDirMode, Pwr,
    Repeat, Shuffle, Sleep, SoundPrg, Straight, SubunitId, TwoChDecoder, Value,
};
pub use zone::Zone;
