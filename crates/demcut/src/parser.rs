//! Lazy demo parser.
//!
//! [`DemoParser`] validates the header on construction and then yields
//! frames one at a time in file order. It is single-pass: once a frame has
//! been yielded it is never decoded again.

use std::iter::FusedIterator;

use tracing::{debug, trace, warn};

use crate::codec::{decode_frame, decode_header, encoded_len};
use crate::error::CutError;
use crate::reader::Reader;
use crate::types::{Frame, FrameKind, Header};

/// Parse the header of `input` and return it together with a frame iterator.
///
/// # Examples
///
/// ```
/// use demcut::{parse, CutError};
///
/// let err = parse(b"not a demo").unwrap_err();
/// assert!(matches!(err, CutError::UnsupportedFormat { .. }));
/// ```
pub fn parse(input: &[u8]) -> Result<(Header, DemoParser<'_>), CutError> {
    let parser = DemoParser::new(input)?;
    Ok((parser.header().clone(), parser))
}

/// Streaming frame decoder over an in-memory demo.
///
/// Iteration ends after a Stop frame, when the buffer runs out, or after the
/// first error. A buffer that runs out inside a frame, after at least one
/// complete frame, ends the stream implicitly at the last complete frame, as
/// an interrupted recording does.
#[derive(Debug)]
pub struct DemoParser<'a> {
    reader: Reader<'a>,
    header: Header,
    prev_tick: u32,
    frames_read: u64,
    signon_bytes: u64,
    implicit_end: bool,
    done: bool,
}

impl<'a> DemoParser<'a> {
    /// Read and validate the header, leaving the cursor on the first frame.
    pub fn new(input: &'a [u8]) -> Result<Self, CutError> {
        let mut reader = Reader::new(input);
        let header = decode_header(&mut reader)?;
        debug!(
            map = %header.map,
            ticks = header.ticks,
            frames = header.frames,
            signon_length = header.signon_length,
            "parsed demo header"
        );
        Ok(Self {
            reader,
            header,
            prev_tick: 0,
            frames_read: 0,
            signon_bytes: 0,
            implicit_end: false,
            done: false,
        })
    }

    /// Header read on construction.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Number of frames yielded so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Encoded bytes of the Signon frames yielded so far.
    pub fn signon_bytes(&self) -> u64 {
        self.signon_bytes
    }

    /// True if the buffer ended without a Stop frame, on a frame boundary
    /// or inside a trailing partial frame.
    pub fn terminated_implicitly(&self) -> bool {
        self.implicit_end
    }

    /// True once no more frames will be yielded.
    pub fn is_finished(&self) -> bool {
        self.done
    }

    /// Decode the next frame, or `None` once the stream has ended.
    pub fn next_frame(&mut self) -> Result<Option<Frame<'a>>, CutError> {
        if self.done {
            return Ok(None);
        }
        let checkpoint = self.reader.clone();
        let frame = match decode_frame(&mut self.reader, self.prev_tick) {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                self.done = true;
                self.implicit_end = true;
                warn!(
                    frames = self.frames_read,
                    tick = self.prev_tick,
                    "demo ends without a stop frame"
                );
                return Ok(None);
            }
            Err(CutError::Truncated { offset, .. }) if self.frames_read > 0 => {
                self.reader = checkpoint;
                self.done = true;
                self.implicit_end = true;
                warn!(
                    frames = self.frames_read,
                    tick = self.prev_tick,
                    frame_offset = self.reader.position(),
                    offset,
                    "demo ends inside a frame"
                );
                return Ok(None);
            }
            Err(e) => {
                self.done = true;
                return Err(e);
            }
        };

        trace!(kind = %frame.kind(), tick = frame.tick, "frame");
        self.prev_tick = frame.tick;
        self.frames_read += 1;
        match frame.kind() {
            FrameKind::Signon => self.signon_bytes += encoded_len(&frame) as u64,
            FrameKind::Stop => self.done = true,
            _ => {}
        }
        Ok(Some(frame))
    }
}

impl<'a> Iterator for DemoParser<'a> {
    type Item = Result<Frame<'a>, CutError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

impl FusedIterator for DemoParser<'_> {}
