//! Whole-demo summary for diagnostics.

use std::fmt;

use indexmap::IndexMap;

use crate::error::CutError;
use crate::parser::DemoParser;
use crate::types::{FrameKind, Header};

/// What a full pass over a demo found.
#[derive(Clone, Debug, PartialEq)]
pub struct DemoSummary {
    /// Header as recorded.
    pub header: Header,
    /// Frames seen per kind, in order of first appearance.
    pub counts: IndexMap<FrameKind, usize>,
    /// Tick of the first tick-bearing frame.
    pub first_tick: Option<u32>,
    /// Tick of the last frame.
    pub last_tick: Option<u32>,
    /// Encoded bytes of all Signon frames.
    pub signon_bytes: u64,
    /// True if the stream ended without a Stop frame.
    pub terminated_implicitly: bool,
}

impl DemoSummary {
    /// Total frames seen, Stop included.
    pub fn frames(&self) -> usize {
        self.counts.values().sum()
    }

    /// Frames seen of one kind.
    pub fn count(&self, kind: FrameKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }
}

impl fmt::Display for DemoSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = &self.header;
        writeln!(f, "map:      {}", h.map)?;
        writeln!(f, "server:   {}", h.server)?;
        writeln!(f, "nick:     {}", h.nick)?;
        writeln!(f, "game:     {}", h.game)?;
        writeln!(
            f,
            "protocol: demo {} / network {}",
            h.demo_protocol, h.network_protocol
        )?;
        writeln!(
            f,
            "header:   {:.2}s, {} ticks, {} frames, {} signon bytes",
            h.duration, h.ticks, h.frames, h.signon_length
        )?;
        match (self.first_tick, self.last_tick) {
            (Some(first), Some(last)) => writeln!(f, "ticks:    {first}..={last}")?,
            _ => writeln!(f, "ticks:    none")?,
        }
        writeln!(f, "frames:   {}", self.frames())?;
        for (kind, count) in &self.counts {
            writeln!(f, "  {kind:<13} {count}")?;
        }
        if self.terminated_implicitly {
            writeln!(f, "warning:  no stop frame")?;
        }
        Ok(())
    }
}

/// Parse all of `input` and summarize it.
///
/// Unlike [`cut`](fn@crate::cut), this reads every frame, so any error in the
/// stream is reported.
pub fn inspect(input: &[u8]) -> Result<DemoSummary, CutError> {
    let mut parser = DemoParser::new(input)?;
    let mut counts = IndexMap::new();
    let mut first_tick = None;
    let mut last_tick = None;

    for frame in parser.by_ref() {
        let frame = frame?;
        let kind = frame.kind();
        *counts.entry(kind).or_insert(0) += 1;
        if first_tick.is_none() && !kind.is_tick_independent() {
            first_tick = Some(frame.tick);
        }
        last_tick = Some(frame.tick);
    }

    Ok(DemoSummary {
        header: parser.header().clone(),
        counts,
        first_tick,
        last_tick,
        signon_bytes: parser.signon_bytes(),
        terminated_implicitly: parser.terminated_implicitly(),
    })
}
