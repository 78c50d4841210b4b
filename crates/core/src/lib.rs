//! Core library for the Morse Kit transcoder.
//!
//! The crate converts text to dot/dash code and back, and schedules code
//! strings as timed tone and silence events. Each module owns one piece of
//! that pipeline: the static symbol table, the encoder and decoder, the lazy
//! timeline, the sink and clock capabilities, and the playback sessions that
//! tie them together. Audio generation itself is left to the caller through
//! [`ToneSink`].

pub mod audio;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod playback;
pub mod table;
pub mod timeline;

pub use audio::{Clock, ManualClock, SinkError, Stopwatch, SystemClock, ToneSink};
pub use config::{AppConfig, PlaybackConfig};
pub use decoder::{decode, decode_words};
pub use encoder::{encode, CodeSequence, Token};
pub use error::{Result, TranscoderError};
pub use playback::{CancelHandle, Player, SessionReport, SessionStatus};
pub use table::{SymbolTable, UNKNOWN_MARKER, WORD_SEPARATOR};
pub use timeline::{events, next_event, Cursor, EventStream, PlaybackEvent, Timing};
