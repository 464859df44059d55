//! Binary encode/decode for the demo format.
//!
//! All integers are little-endian. Variable-size payloads carry an `i32`
//! length prefix. Encoding is the exact inverse of decoding: a decoded frame
//! re-encodes to the bytes it was read from, except for the wire tick of
//! tick-independent kinds, which is written as the effective tick.
//!
//! Errors raised while encoding report offset 0; the sink position is not
//! tracked.

use std::borrow::Cow;
use std::io::Write;

use crate::error::CutError;
use crate::reader::Reader;
use crate::types::*;
use crate::{MAGIC, SUPPORTED_DEMO_PROTOCOLS};

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), CutError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), CutError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f32.
pub fn write_f32_le(w: &mut dyn Write, v: f32) -> Result<(), CutError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a count as a non-negative little-endian i32.
pub fn write_count(w: &mut dyn Write, v: u32, what: &str) -> Result<(), CutError> {
    let v = i32::try_from(v)
        .map_err(|_| CutError::encoding(0, format!("{what} {v} does not fit in an i32")))?;
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a length-prefixed byte array (i32 length + bytes).
pub fn write_length_prefixed(w: &mut dyn Write, b: &[u8]) -> Result<(), CutError> {
    let len = u32::try_from(b.len()).unwrap_or(u32::MAX);
    write_count(w, len, "payload length")?;
    w.write_all(b)?;
    Ok(())
}

/// Write a string into a NUL-padded field of `width` bytes.
pub fn write_fixed_str(w: &mut dyn Write, s: &str, width: usize) -> Result<(), CutError> {
    let bytes = s.as_bytes();
    if bytes.len() >= width {
        return Err(CutError::encoding(
            0,
            format!("string of {} bytes does not fit a {width}-byte field", bytes.len()),
        ));
    }
    if bytes.contains(&0) {
        return Err(CutError::encoding(0, "string contains an interior NUL"));
    }
    w.write_all(bytes)?;
    w.write_all(&vec![0u8; width - bytes.len()])?;
    Ok(())
}

// ── Header encode/decode ────────────────────────────────────────

/// Encode the demo header.
pub fn encode_header(w: &mut dyn Write, header: &Header) -> Result<(), CutError> {
    w.write_all(&MAGIC)?;
    write_u32_le(w, header.demo_protocol)?;
    write_u32_le(w, header.network_protocol)?;

    write_fixed_str(w, &header.server, NAME_LEN)?;
    write_fixed_str(w, &header.nick, NAME_LEN)?;
    write_fixed_str(w, &header.map, NAME_LEN)?;
    write_fixed_str(w, &header.game, NAME_LEN)?;

    write_f32_le(w, header.duration)?;
    write_count(w, header.ticks, "tick count")?;
    write_count(w, header.frames, "frame count")?;
    write_count(w, header.signon_length, "signon length")?;
    Ok(())
}

/// Decode and validate the demo header.
///
/// A wrong magic or unknown demo protocol is
/// [`CutError::UnsupportedFormat`]; a buffer shorter than the header is
/// [`CutError::Truncated`].
pub fn decode_header(r: &mut Reader<'_>) -> Result<Header, CutError> {
    let magic = r.read_fixed(MAGIC.len())?;
    if magic != MAGIC.as_slice() {
        return Err(CutError::UnsupportedFormat {
            detail: format!("bad magic {:?}", String::from_utf8_lossy(magic)),
        });
    }

    let demo_protocol = r.read_u32()?;
    if !SUPPORTED_DEMO_PROTOCOLS.contains(&demo_protocol) {
        return Err(CutError::UnsupportedFormat {
            detail: format!("demo protocol {demo_protocol}"),
        });
    }

    Ok(Header {
        demo_protocol,
        network_protocol: r.read_u32()?,
        server: r.read_fixed_str(NAME_LEN)?,
        nick: r.read_fixed_str(NAME_LEN)?,
        map: r.read_fixed_str(NAME_LEN)?,
        game: r.read_fixed_str(NAME_LEN)?,
        duration: r.read_f32()?,
        ticks: r.read_count("tick count")?,
        frames: r.read_count("frame count")?,
        signon_length: r.read_count("signon length")?,
    })
}

// ── Frame encode/decode ─────────────────────────────────────────

fn encode_packet(w: &mut dyn Write, packet: &PacketData<'_>) -> Result<(), CutError> {
    w.write_all(&packet.cmd_info)?;
    write_u32_le(w, packet.sequence_in)?;
    write_u32_le(w, packet.sequence_out)?;
    write_length_prefixed(w, &packet.data)
}

/// Encode a single frame.
pub fn encode_frame(w: &mut dyn Write, frame: &Frame<'_>) -> Result<(), CutError> {
    write_u8(w, frame.kind().tag())?;
    write_u32_le(w, frame.tick)?;

    match &frame.payload {
        Payload::Signon(packet) | Payload::Packet(packet) => encode_packet(w, packet),
        Payload::SyncTick | Payload::Stop => Ok(()),
        Payload::UserCmd { sequence, data } => {
            write_u32_le(w, *sequence)?;
            write_length_prefixed(w, data)
        }
        Payload::ConsoleCmd(data) | Payload::DataTables(data) | Payload::StringTables(data) => {
            write_length_prefixed(w, data)
        }
    }
}

/// Number of bytes [`encode_frame`] writes for `frame`.
pub fn encoded_len(frame: &Frame<'_>) -> usize {
    let body = match &frame.payload {
        Payload::Signon(packet) | Payload::Packet(packet) => {
            CMD_INFO_LEN + 4 + 4 + 4 + packet.data.len()
        }
        Payload::SyncTick | Payload::Stop => 0,
        Payload::UserCmd { data, .. } => 4 + 4 + data.len(),
        Payload::ConsoleCmd(data) | Payload::DataTables(data) | Payload::StringTables(data) => {
            4 + data.len()
        }
    };
    1 + 4 + body
}

fn decode_packet<'a>(r: &mut Reader<'a>) -> Result<PacketData<'a>, CutError> {
    Ok(PacketData {
        cmd_info: r.read_array()?,
        sequence_in: r.read_u32()?,
        sequence_out: r.read_u32()?,
        data: Cow::Borrowed(r.read_length_prefixed()?),
    })
}

/// Decode a single frame.
///
/// Returns `Ok(None)` when the reader is exactly at the end of the buffer.
/// `prev_tick` is the effective tick of the previous frame; tick-independent
/// kinds take it instead of their wire tick. A Stop frame whose tick is cut
/// short by the end of the buffer also takes `prev_tick`.
pub fn decode_frame<'a>(
    r: &mut Reader<'a>,
    prev_tick: u32,
) -> Result<Option<Frame<'a>>, CutError> {
    let Some(tag) = r.peek_kind() else {
        return Ok(None);
    };
    let offset = r.position();
    let kind = FrameKind::from_tag(tag)
        .ok_or_else(|| CutError::encoding(offset, format!("unknown frame kind {tag}")))?;
    r.read_u8()?;

    let wire_tick = if kind == FrameKind::Stop && r.remaining() < 4 {
        r.read_fixed(r.remaining())?;
        prev_tick
    } else {
        r.read_u32()?
    };
    let tick = if kind.is_tick_independent() {
        prev_tick
    } else {
        wire_tick
    };

    let payload = match kind {
        FrameKind::Signon => Payload::Signon(decode_packet(r)?),
        FrameKind::Packet => Payload::Packet(decode_packet(r)?),
        FrameKind::SyncTick => Payload::SyncTick,
        FrameKind::ConsoleCmd => Payload::ConsoleCmd(Cow::Borrowed(r.read_length_prefixed()?)),
        FrameKind::UserCmd => Payload::UserCmd {
            sequence: r.read_u32()?,
            data: Cow::Borrowed(r.read_length_prefixed()?),
        },
        FrameKind::DataTables => Payload::DataTables(Cow::Borrowed(r.read_length_prefixed()?)),
        FrameKind::Stop => Payload::Stop,
        FrameKind::StringTables => {
            Payload::StringTables(Cow::Borrowed(r.read_length_prefixed()?))
        }
    };

    Ok(Some(Frame { tick, payload }))
}
