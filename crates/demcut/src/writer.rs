//! Demo writer.
//!
//! [`DemoWriter`] streams frames to any `Write` sink, encoding the demo
//! format. The header is written immediately on construction, so header
//! totals must be known up front; [`serialize`] computes them from an
//! [`Extraction`] before writing.

use std::collections::BTreeSet;
use std::io::Write;

use tracing::debug;

use crate::codec::{encode_frame, encode_header, encoded_len};
use crate::config::DEFAULT_TICK_INTERVAL;
use crate::error::CutError;
use crate::extract::Extraction;
use crate::types::{Frame, FrameKind, Header, Payload, HEADER_LEN};

/// Writes a demo to a byte stream.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and the CLI can use
/// `BufWriter<File>`.
///
/// # Examples
///
/// ```
/// use demcut::{parse, DemoWriter, Frame, Header, Payload};
///
/// let mut buf = Vec::new();
/// let mut writer = DemoWriter::new(&mut buf, &Header::default()).unwrap();
/// writer.write_frame(&Frame::new(7, Payload::ConsoleCmd(b"status\0".as_slice().into()))).unwrap();
/// writer.finish(None).unwrap();
///
/// let (_, parser) = parse(&buf).unwrap();
/// let ticks: Vec<u32> = parser.map(|f| f.unwrap().tick).collect();
/// assert_eq!(ticks, vec![7, 7]);
/// ```
pub struct DemoWriter<W: Write> {
    writer: W,
    frames_written: u64,
    last_tick: u32,
}

impl<W: Write> DemoWriter<W> {
    /// Create a new demo writer, immediately writing the header.
    pub fn new(mut writer: W, header: &Header) -> Result<Self, CutError> {
        encode_header(&mut writer, header)?;
        Ok(Self {
            writer,
            frames_written: 0,
            last_tick: 0,
        })
    }

    /// Encode one frame.
    pub fn write_frame(&mut self, frame: &Frame<'_>) -> Result<(), CutError> {
        encode_frame(&mut self.writer, frame)?;
        self.frames_written += 1;
        self.last_tick = frame.tick;
        Ok(())
    }

    /// Terminate the stream and return the underlying sink.
    ///
    /// Writes `terminator` if given, otherwise a Stop frame stamped with the
    /// last tick written.
    pub fn finish(mut self, terminator: Option<&Frame<'_>>) -> Result<W, CutError> {
        match terminator {
            Some(stop) if stop.kind() == FrameKind::Stop => self.write_frame(stop)?,
            Some(other) => {
                return Err(CutError::encoding(
                    0,
                    format!("terminator must be a stop frame, got {}", other.kind()),
                ))
            }
            None => {
                let stop = Frame::new(self.last_tick, Payload::Stop);
                self.write_frame(&stop)?;
            }
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), CutError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Tick of the last frame written, or 0 before any.
    pub fn last_tick(&self) -> u32 {
        self.last_tick
    }

    /// Consume the writer and return the underlying `Write` sink without
    /// terminating the stream.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Header describing `extraction`, carrying identity fields over from
/// `source`.
///
/// Totals cover the prefix and window; the Stop frame is not counted.
/// Duration is the tick count at the source's tick interval, falling back to
/// [`DEFAULT_TICK_INTERVAL`] when the source does not record one, so the
/// output header implies the same interval as the source.
pub fn rebuilt_header(source: &Header, extraction: &Extraction<'_>) -> Result<Header, CutError> {
    let ticks: BTreeSet<u32> = extraction.window.iter().map(|f| f.tick).collect();
    let frames = extraction.prefix.len() + extraction.window.len();
    let signon_bytes: usize = extraction
        .frames()
        .filter(|f| f.kind() == FrameKind::Signon)
        .map(encoded_len)
        .sum();

    let interval = source.tick_interval().unwrap_or(DEFAULT_TICK_INTERVAL);
    let duration = ticks.len() as f32 * interval;

    let fits = |v: usize, what: &str| {
        u32::try_from(v).map_err(|_| CutError::encoding(0, format!("{what} {v} overflows")))
    };
    Ok(Header {
        duration,
        ticks: fits(ticks.len(), "tick count")?,
        frames: fits(frames, "frame count")?,
        signon_length: fits(signon_bytes, "signon length")?,
        ..source.clone()
    })
}

/// Encode `extraction` as a complete demo: rebuilt header, prefix, window,
/// then a Stop frame.
pub fn serialize(source: &Header, extraction: &Extraction<'_>) -> Result<Vec<u8>, CutError> {
    let header = rebuilt_header(source, extraction)?;
    let body: usize = extraction.frames().map(encoded_len).sum();
    let mut writer = DemoWriter::new(Vec::with_capacity(HEADER_LEN + body + 5), &header)?;
    for frame in extraction.frames() {
        writer.write_frame(frame)?;
    }
    let frames = writer.frames_written();
    let out = writer.finish(extraction.terminator.as_ref())?;
    debug!(
        frames,
        ticks = header.ticks,
        bytes = out.len(),
        "serialized demo"
    );
    Ok(out)
}
