//! Ready-made demos.
//!
//! - [`scenario`]: one DataTables frame then packets at 0, 50, 100, 150, 200.
//! - [`recording`]: a full signon handshake followed by gameplay.
//! - [`synthetic`]: a long recording for benchmarks.

use crate::DemoBuilder;

/// One DataTables frame, then packets at ticks 0, 50, 100, 150 and 200.
pub fn scenario() -> DemoBuilder {
    DemoBuilder::new()
        .data_tables(b"scenario tables")
        .packets([0, 50, 100, 150, 200])
}

/// Signon handshake, context frames, and `ticks` ticks of gameplay.
///
/// String tables are re-sent every 100 ticks and a console command is
/// issued every 66 ticks.
pub fn recording(ticks: u32) -> DemoBuilder {
    let mut demo = DemoBuilder::new()
        .signon(b"serverinfo")
        .signon(b"classinfo")
        .signon(b"signonstate")
        .data_tables(b"send tables and server classes")
        .string_tables(b"initial string tables")
        .sync_tick();
    for tick in 1..=ticks {
        demo = demo.packet(tick).user_cmd(tick, tick);
        if tick % 100 == 0 {
            demo = demo.string_tables(format!("string tables @{tick}").as_bytes());
        }
        if tick % 66 == 0 {
            demo = demo.console(tick, "+voicerecord");
        }
    }
    demo
}

/// Encoded demo of roughly `frames` frames.
pub fn synthetic(frames: u32) -> Vec<u8> {
    recording(frames / 2).build()
}
