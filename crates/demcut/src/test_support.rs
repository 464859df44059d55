//! Frame constructors and demo encoding shared by unit tests.

use std::borrow::Cow;

use crate::codec::{encode_frame, encode_header};
use crate::types::*;

pub(crate) fn demo_bytes(header: &Header, frames: &[Frame<'_>]) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_header(&mut buf, header).unwrap();
    for frame in frames {
        encode_frame(&mut buf, frame).unwrap();
    }
    buf
}

fn packet_data(data: Vec<u8>) -> PacketData<'static> {
    PacketData {
        cmd_info: [0; CMD_INFO_LEN],
        sequence_in: 1,
        sequence_out: 2,
        data: Cow::Owned(data),
    }
}

/// Play packet whose data is its own tick, so frames are distinguishable.
pub(crate) fn packet(tick: u32) -> Frame<'static> {
    Frame::new(tick, Payload::Packet(packet_data(tick.to_le_bytes().to_vec())))
}

pub(crate) fn signon(tick: u32, data: &[u8]) -> Frame<'static> {
    Frame::new(tick, Payload::Signon(packet_data(data.to_vec())))
}

/// Data tables are tick-independent; the tick given is the inherited one.
pub(crate) fn data_tables_at(tick: u32, data: &[u8]) -> Frame<'static> {
    Frame::new(tick, Payload::DataTables(Cow::Owned(data.to_vec())))
}

pub(crate) fn data_tables(data: &[u8]) -> Frame<'static> {
    data_tables_at(0, data)
}

pub(crate) fn string_tables(tick: u32, data: &[u8]) -> Frame<'static> {
    Frame::new(tick, Payload::StringTables(Cow::Owned(data.to_vec())))
}

pub(crate) fn sync_tick(tick: u32) -> Frame<'static> {
    Frame::new(tick, Payload::SyncTick)
}

pub(crate) fn console(tick: u32, cmd: &str) -> Frame<'static> {
    let mut data = cmd.as_bytes().to_vec();
    data.push(0);
    Frame::new(tick, Payload::ConsoleCmd(Cow::Owned(data)))
}

pub(crate) fn stop(tick: u32) -> Frame<'static> {
    Frame::new(tick, Payload::Stop)
}
