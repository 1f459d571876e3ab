//! String codecs for typed application settings.
//!
//! Every setting is stored, persisted, and transmitted as a string. A codec
//! pairs a fallible parser with a total formatter for one Rust type, so the
//! registry can bind a setting name to a strongly-typed variable.

#![warn(missing_docs, clippy::pedantic)]

mod codec;
mod error;
mod net;
mod numeric;
mod scalar;
mod schedule;
mod time;

/// Codec trait and the default-codec mapping for supported types.
pub use codec::{Codec, SettingValue};
/// Error type and result alias shared by all codecs.
pub use error::{CodecError, CodecResult};
/// Address, network, and URL codecs.
pub use net::{IpAddress, IpNetwork, UrlCodec};
/// Integer and floating point codecs.
pub use numeric::{Float, Integer};
/// Boolean, text, and list codecs.
pub use scalar::{Bool, StringList, Text};
/// Cron schedule validation codec.
pub use schedule::CronSchedule;
/// Duration and timestamp codecs.
pub use time::{DurationCodec, Timestamp};

pub use chrono;
pub use ipnet;
pub use url;
