//! End-to-end cuts over builder-made demos.

use demcut::{
    cut, cut_with, inspect, parse, serialize, CutError, CutOptions, Extractor, Frame, FrameKind,
    TickRange,
};
use demcut_test_utils::{fixtures, DemoBuilder};

// ── Helpers ─────────────────────────────────────────────────────

fn parse_all(bytes: &[u8]) -> (demcut::Header, Vec<Frame<'_>>) {
    let (header, parser) = parse(bytes).expect("output parses");
    let frames = parser.collect::<Result<_, _>>().expect("frames parse");
    (header, frames)
}

fn ticks_of(frames: &[Frame<'_>], kind: FrameKind) -> Vec<u32> {
    frames
        .iter()
        .filter(|f| f.kind() == kind)
        .map(|f| f.tick)
        .collect()
}

// ── Scenario ────────────────────────────────────────────────────

#[test]
fn scenario_cut_keeps_tables_and_two_ticks() {
    let input = fixtures::scenario().build();
    let out = cut(&input, 100, 150).unwrap();
    let (header, frames) = parse_all(&out);

    assert_eq!(header.ticks, 2);
    assert_eq!(header.frames, 3);
    assert_eq!(frames[0].kind(), FrameKind::DataTables);
    assert_eq!(ticks_of(&frames, FrameKind::Packet), vec![100, 150]);
    assert_eq!(frames.len(), 4);
    assert_eq!(frames[3].kind(), FrameKind::Stop);
    assert_eq!(frames[3].tick, 150);
}

#[test]
fn scenario_header_keeps_identity() {
    let builder = fixtures::scenario().map("pl_upward");
    let out = cut(&builder.build(), 0, 50).unwrap();
    let (header, _) = parse_all(&out);
    assert_eq!(header.map, "pl_upward");
    assert_eq!(header.nick, builder.header().nick);
    // Two ticks at the source's 0.015 s interval.
    assert_eq!(header.ticks, 2);
    assert!((header.duration - 0.03).abs() < 1e-6);
}

// ── Round trip ──────────────────────────────────────────────────

#[test]
fn output_matches_extraction() {
    let input = fixtures::recording(400).build();
    let (header, parser) = parse(&input).unwrap();
    let extraction = Extractor::new(TickRange::new(150, 260).unwrap(), CutOptions::default())
        .extract(parser)
        .unwrap();
    let expected = serialize(&header, &extraction).unwrap();

    let out = cut(&input, 150, 260).unwrap();
    assert_eq!(out, expected);

    let (_, frames) = parse_all(&out);
    let emitted: Vec<_> = extraction.frames().cloned().collect();
    assert_eq!(frames[..emitted.len()], emitted[..]);
    assert_eq!(frames.len(), emitted.len() + 1);
}

#[test]
fn cut_of_cut_is_stable() {
    let input = fixtures::recording(300).build();
    let once = cut(&input, 120, 180).unwrap();
    let twice = cut(&once, 120, 180).unwrap();
    let (first, first_frames) = parse_all(&once);
    let (second, second_frames) = parse_all(&twice);
    assert_eq!(first_frames, second_frames);
    assert_eq!(first.ticks, second.ticks);
    assert_eq!(first.frames, second.frames);
    assert_eq!(first.signon_length, second.signon_length);
    assert!((first.duration - second.duration).abs() < 1e-5);
    assert!((first.duration - 61.0 * 0.015).abs() < 1e-4);
}

// ── Context ─────────────────────────────────────────────────────

#[test]
fn signon_and_latest_tables_lead_the_output() {
    let input = fixtures::recording(350).build();
    let out = cut(&input, 250, 260).unwrap();
    let (header, frames) = parse_all(&out);

    let kinds: Vec<_> = frames.iter().take(6).map(Frame::kind).collect();
    assert_eq!(
        kinds,
        vec![
            FrameKind::Signon,
            FrameKind::Signon,
            FrameKind::Signon,
            FrameKind::DataTables,
            FrameKind::StringTables,
            FrameKind::SyncTick,
        ]
    );
    assert!(matches!(
        &frames[4].payload,
        demcut::Payload::StringTables(data) if data[..] == b"string tables @200"[..]
    ));
    assert_eq!(frames[6].tick, 250);
    assert!(header.signon_length > 0);
}

#[test]
fn options_rebase_and_strip() {
    let input = fixtures::recording(200).build();
    let options = CutOptions {
        rebase_ticks: true,
        strip_console_commands: true,
    };
    let out = cut_with(&input, 100, 140, &options).unwrap();
    let (_, frames) = parse_all(&out);

    assert!(frames.iter().all(|f| f.kind() != FrameKind::ConsoleCmd));
    let packets = ticks_of(&frames, FrameKind::Packet);
    assert_eq!(packets.first(), Some(&0));
    assert_eq!(packets.last(), Some(&40));
}

#[test]
fn strip_drops_console_command_that_opens_window() {
    let input = DemoBuilder::new()
        .packet(10)
        .console(100, "say hi")
        .packet(101)
        .build();
    let options = CutOptions {
        strip_console_commands: true,
        ..CutOptions::default()
    };
    let out = cut_with(&input, 100, 200, &options).unwrap();
    let (_, frames) = parse_all(&out);
    let kinds: Vec<_> = frames.iter().map(Frame::kind).collect();
    assert_eq!(kinds, vec![FrameKind::Packet, FrameKind::Stop]);
    assert_eq!(frames[0].tick, 101);
}

// ── Edge cases ──────────────────────────────────────────────────

#[test]
fn start_past_every_tick_gives_minimal_file() {
    let input = fixtures::scenario().build();
    let out = cut(&input, 10_000, 20_000).unwrap();
    let (header, frames) = parse_all(&out);
    assert_eq!(header.ticks, 0);
    assert_eq!(header.duration, 0.0);
    assert_eq!(ticks_of(&frames, FrameKind::Packet), Vec::<u32>::new());
    assert_eq!(frames.last().map(Frame::kind), Some(FrameKind::Stop));
}

#[test]
fn invalid_range_is_rejected_before_parsing() {
    // Not a demo: any parse attempt would fail with UnsupportedFormat.
    let garbage = vec![0xEEu8; 64];
    assert!(matches!(
        cut(&garbage, 500, 100),
        Err(CutError::InvalidRange {
            start: 500,
            end: 100
        })
    ));
}

#[test]
fn header_only_demo_without_signon_cuts_to_empty() {
    let input = DemoBuilder::new().without_stop().build();
    assert_eq!(inspect(&input).unwrap().frames(), 0);
    let out = cut(&input, 0, 10).unwrap();
    let (header, frames) = parse_all(&out);
    assert_eq!(header.frames, 0);
    assert_eq!(frames.len(), 1);
}

#[test]
fn header_only_demo_with_declared_signon_is_truncated() {
    let input = DemoBuilder::new()
        .signon_length(20_000)
        .without_stop()
        .build();
    assert!(matches!(
        cut(&input, 0, 10),
        Err(CutError::Truncated { .. })
    ));
}

#[test]
fn interrupted_recording_cuts_to_its_last_complete_frame() {
    let mut input = fixtures::scenario().without_stop().build();
    // A packet tag and tick, then a body cut short.
    input.extend_from_slice(&[2, 250, 0, 0, 0, 0, 0, 0]);
    let out = cut(&input, 100, i64::from(u32::MAX)).unwrap();
    let (header, frames) = parse_all(&out);
    assert_eq!(ticks_of(&frames, FrameKind::Packet), vec![100, 150, 200]);
    assert_eq!(header.ticks, 3);
    assert_eq!(frames.last().map(|f| (f.kind(), f.tick)), Some((FrameKind::Stop, 200)));
}

#[test]
fn corrupt_frame_after_window_is_never_read() {
    let mut input = fixtures::scenario().without_stop().build();
    input.extend_from_slice(&[0xFF, 0, 0, 0, 0]);
    assert!(cut(&input, 0, 150).is_ok());
    assert!(matches!(
        cut(&input, 0, 1_000),
        Err(CutError::InvalidEncoding { .. })
    ));
}
