//! Demo builders and fixtures for demcut development.
//!
//! [`DemoBuilder`] assembles a demo frame by frame and encodes it with a
//! consistent header; [`fixtures`] holds ready-made recordings.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::borrow::Cow;

use demcut::codec::encoded_len;
use demcut::types::CMD_INFO_LEN;
use demcut::{DemoWriter, Frame, FrameKind, Header, PacketData, Payload};

/// Seconds per tick used for built headers.
pub const TICK_INTERVAL: f32 = 0.015;

/// Builds demo byte streams for tests.
///
/// Tick-independent frames are stamped with the tick of the frame before
/// them, so [`frames`](DemoBuilder::frames) matches what a parser yields.
/// Header totals are derived from the frames unless overridden.
#[derive(Clone, Debug)]
pub struct DemoBuilder {
    header: Header,
    frames: Vec<Frame<'static>>,
    last_tick: u32,
    signon_length: Option<u32>,
    stop: bool,
}

impl DemoBuilder {
    pub fn new() -> Self {
        Self {
            header: Header {
                server: "127.0.0.1:27015".into(),
                nick: "SourceTV".into(),
                map: "cp_process_final".into(),
                ..Header::default()
            },
            frames: Vec::new(),
            last_tick: 0,
            signon_length: None,
            stop: true,
        }
    }

    pub fn map(mut self, map: &str) -> Self {
        self.header.map = map.into();
        self
    }

    /// Declare a signon length instead of deriving it from Signon frames.
    pub fn signon_length(mut self, len: u32) -> Self {
        self.signon_length = Some(len);
        self
    }

    /// End the stream without a Stop frame.
    pub fn without_stop(mut self) -> Self {
        self.stop = false;
        self
    }

    pub fn frame(mut self, mut frame: Frame<'static>) -> Self {
        if frame.kind().is_tick_independent() {
            frame.tick = self.last_tick;
        } else {
            self.last_tick = frame.tick;
        }
        self.frames.push(frame);
        self
    }

    pub fn signon(self, data: &[u8]) -> Self {
        let tick = self.last_tick;
        self.frame(Frame::new(tick, Payload::Signon(packet_data(data))))
    }

    pub fn data_tables(self, data: &[u8]) -> Self {
        self.frame(Frame::new(0, Payload::DataTables(Cow::Owned(data.to_vec()))))
    }

    pub fn string_tables(self, data: &[u8]) -> Self {
        self.frame(Frame::new(0, Payload::StringTables(Cow::Owned(data.to_vec()))))
    }

    pub fn sync_tick(self) -> Self {
        self.frame(Frame::new(0, Payload::SyncTick))
    }

    /// A play packet whose data encodes its tick.
    pub fn packet(self, tick: u32) -> Self {
        self.frame(Frame::new(
            tick,
            Payload::Packet(packet_data(&tick.to_le_bytes())),
        ))
    }

    pub fn packets(self, ticks: impl IntoIterator<Item = u32>) -> Self {
        ticks.into_iter().fold(self, Self::packet)
    }

    pub fn console(self, tick: u32, cmd: &str) -> Self {
        let mut data = cmd.as_bytes().to_vec();
        data.push(0);
        self.frame(Frame::new(tick, Payload::ConsoleCmd(Cow::Owned(data))))
    }

    pub fn user_cmd(self, tick: u32, sequence: u32) -> Self {
        self.frame(Frame::new(
            tick,
            Payload::UserCmd {
                sequence,
                data: Cow::Owned(vec![0x5A; 12]),
            },
        ))
    }

    /// Frames added so far, as a parser will read them back.
    pub fn frames(&self) -> &[Frame<'static>] {
        &self.frames
    }

    /// Header [`build`](DemoBuilder::build) will write.
    pub fn header(&self) -> Header {
        let signon: usize = self
            .frames
            .iter()
            .filter(|f| f.kind() == FrameKind::Signon)
            .map(encoded_len)
            .sum();
        Header {
            duration: self.last_tick as f32 * TICK_INTERVAL,
            ticks: self.last_tick,
            frames: self.frames.len() as u32,
            signon_length: self.signon_length.unwrap_or(signon as u32),
            ..self.header.clone()
        }
    }

    /// Encode the demo.
    pub fn build(&self) -> Vec<u8> {
        let mut writer = DemoWriter::new(Vec::new(), &self.header()).unwrap();
        for frame in &self.frames {
            writer.write_frame(frame).unwrap();
        }
        if self.stop {
            writer.finish(None).unwrap()
        } else {
            writer.into_inner()
        }
    }
}

impl Default for DemoBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn packet_data(data: &[u8]) -> PacketData<'static> {
    PacketData {
        cmd_info: [0; CMD_INFO_LEN],
        sequence_in: 1,
        sequence_out: 1,
        data: Cow::Owned(data.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_frames_match_parsed_frames() {
        let builder = DemoBuilder::new()
            .signon(b"hello")
            .data_tables(b"dt")
            .packets([5, 6])
            .string_tables(b"st");
        let bytes = builder.build();
        let (header, parser) = demcut::parse(&bytes).unwrap();
        let frames: Vec<_> = parser.collect::<Result<_, _>>().unwrap();

        assert_eq!(header, builder.header());
        assert_eq!(frames[..4], builder.frames()[..]);
        assert_eq!(frames.last().map(Frame::kind), Some(FrameKind::Stop));
    }

    #[test]
    fn without_stop_ends_implicitly() {
        let bytes = DemoBuilder::new().packet(1).without_stop().build();
        let summary = demcut::inspect(&bytes).unwrap();
        assert!(summary.terminated_implicitly);
    }
}
