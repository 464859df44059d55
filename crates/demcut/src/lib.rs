//! Tick-range trimming for Source engine demo recordings.
//!
//! Takes a complete demo in memory and produces a smaller, standalone demo
//! that plays only a tick range. Playback of a mid-stream slice needs the
//! state-defining frames recorded before it, so those are carried ahead of
//! the range.
//!
//! # Architecture
//!
//! - [`DemoParser`] decodes frames lazily from a byte slice
//! - [`RunningContext`] tracks the latest state-defining frames
//! - [`Extractor`] splits the stream into prefix, window, and terminator
//! - [`DemoWriter`] and [`serialize`] re-encode with a rebuilt header
//! - [`cut`](fn@cut) and [`cut_with`] chain the three in one call
//! - [`inspect`](fn@inspect) summarizes a whole demo
//!
//! # Format
//!
//! ```text
//! [MAGIC "HL2DEMO\0"] [demo protocol u32] [network protocol u32]
//! [server 260] [nick 260] [map 260] [game 260]
//! [duration f32] [ticks i32] [frames i32] [signon length i32]
//! [Frame 1] [Frame 2] ... [Stop]
//! ```
//!
//! Each frame is a kind tag (u8), a tick (u32), and a kind-specific body.
//! Integers are little-endian; variable payloads carry an i32 length.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod config;
pub mod context;
pub mod cut;
pub mod error;
pub mod extract;
pub mod inspect;
pub mod parser;
pub mod reader;
pub mod types;
pub mod writer;

#[cfg(test)]
mod test_support;

pub use config::{CutOptions, DEFAULT_TICK_INTERVAL};
pub use context::{Prefix, RunningContext};
pub use cut::{cut, cut_with};
pub use error::CutError;
pub use extract::{Extraction, Extractor, TickRange};
pub use inspect::{inspect, DemoSummary};
pub use parser::{parse, DemoParser};
pub use reader::Reader;
pub use types::{ContextRole, Frame, FrameKind, Header, PacketData, Payload};
pub use writer::{rebuilt_header, serialize, DemoWriter};

/// Magic bytes at the start of every demo file.
pub const MAGIC: [u8; 8] = *b"HL2DEMO\0";

/// Demo protocols this build can read and write.
///
/// History:
/// - 3: Orange Box engine branch (TF2), the only layout handled
pub const SUPPORTED_DEMO_PROTOCOLS: &[u32] = &[3];
