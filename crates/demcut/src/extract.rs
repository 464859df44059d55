//! Range extraction over a parsed frame stream.
//!
//! The [`Extractor`] makes one pass over the frames. Until the first
//! in-range frame arrives it feeds state-defining frames into a
//! [`RunningContext`]; that frame opens the window, the context is flushed
//! into the prefix, and in-range frames are collected until the first frame
//! past the end tick. The rest of the stream is never decoded.

use tracing::debug;

use crate::config::CutOptions;
use crate::context::{Prefix, RunningContext};
use crate::error::CutError;
use crate::types::{Frame, FrameKind};

/// Inclusive tick range `[start, end]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickRange {
    start: u32,
    end: u32,
}

impl TickRange {
    /// Validate a caller-supplied range.
    ///
    /// Negative bounds and `start > end` are [`CutError::InvalidRange`].
    /// Bounds past `u32::MAX` saturate, since no tick can exceed it.
    ///
    /// ```
    /// use demcut::{CutError, TickRange};
    ///
    /// let range = TickRange::new(100, 150).unwrap();
    /// assert!(range.contains(120));
    /// assert!(matches!(TickRange::new(5, 1), Err(CutError::InvalidRange { .. })));
    /// ```
    pub fn new(start: i64, end: i64) -> Result<Self, CutError> {
        if start < 0 || end < 0 || start > end {
            return Err(CutError::InvalidRange { start, end });
        }
        let clamp = |v: i64| u32::try_from(v).unwrap_or(u32::MAX);
        Ok(Self {
            start: clamp(start),
            end: clamp(end),
        })
    }

    /// First tick of the range.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Last tick of the range.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// True if `tick` lies within the range.
    pub fn contains(&self, tick: u32) -> bool {
        self.start <= tick && tick <= self.end
    }
}

/// Result of extracting a range: what to emit, in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extraction<'a> {
    /// Context frames emitted ahead of the window.
    pub prefix: Prefix<'a>,
    /// Frames whose tick lies in the range, in stream order.
    pub window: Vec<Frame<'a>>,
    /// The stream's own Stop frame, if it fell inside the range.
    pub terminator: Option<Frame<'a>>,
}

impl<'a> Extraction<'a> {
    /// Tick of the first window frame.
    pub fn first_tick(&self) -> Option<u32> {
        self.window.first().map(|f| f.tick)
    }

    /// Tick of the last window frame.
    pub fn last_tick(&self) -> Option<u32> {
        self.window.last().map(|f| f.tick)
    }

    /// Prefix then window frames, in emission order.
    pub fn frames(&self) -> impl Iterator<Item = &Frame<'a>> {
        self.prefix.iter().chain(self.window.iter())
    }

    fn rebase(&mut self, start: u32) {
        for frame in self.prefix.iter_mut() {
            frame.tick = 0;
        }
        for frame in self.window.iter_mut().chain(self.terminator.as_mut()) {
            frame.tick = frame.tick.saturating_sub(start);
        }
    }
}

/// Single-pass range extractor.
#[derive(Clone, Debug)]
pub struct Extractor {
    range: TickRange,
    options: CutOptions,
}

impl Extractor {
    /// Extractor for `range` with the given options.
    pub fn new(range: TickRange, options: CutOptions) -> Self {
        Self { range, options }
    }

    /// The range being extracted.
    pub fn range(&self) -> TickRange {
        self.range
    }

    /// Consume frames until the range is passed and split them into prefix,
    /// window and terminator.
    ///
    /// The first error from `frames` aborts extraction.
    pub fn extract<'a, I>(&self, frames: I) -> Result<Extraction<'a>, CutError>
    where
        I: IntoIterator<Item = Result<Frame<'a>, CutError>>,
    {
        let TickRange { start, end } = self.range;
        let mut context = RunningContext::new();
        let mut out = Extraction::default();
        let mut open = false;
        let mut last_tick = start;
        let mut scanned = 0u64;

        for frame in frames {
            let mut frame = frame?;
            scanned += 1;
            let kind = frame.kind();

            if !open {
                let Some(frame) = context.absorb(frame) else {
                    continue;
                };
                if frame.tick > end {
                    break;
                }
                if frame.tick < start {
                    continue;
                }
                if kind == FrameKind::Stop {
                    break;
                }
                debug!(tick = frame.tick, kind = %kind, "window opened");
                out.prefix = std::mem::take(&mut context).flush();
                open = true;
                if kind == FrameKind::ConsoleCmd && self.options.strip_console_commands {
                    // Later control frames inherit from the end of the prefix.
                    last_tick = out.prefix.last().map_or(0, |f| f.tick);
                    continue;
                }
                last_tick = frame.tick;
                out.window.push(frame);
                continue;
            }

            if kind.is_tick_independent() {
                // Re-read, this frame inherits the tick of whatever was
                // emitted before it.
                frame.tick = last_tick;
            } else if frame.tick > end {
                break;
            } else if frame.tick < start {
                continue;
            }

            match kind {
                FrameKind::Stop => {
                    out.terminator = Some(frame);
                    break;
                }
                FrameKind::ConsoleCmd if self.options.strip_console_commands => continue,
                _ => {}
            }
            last_tick = frame.tick;
            out.window.push(frame);
        }

        if !open {
            out.prefix = context.flush();
        }
        if self.options.rebase_ticks {
            out.rebase(start);
        }

        debug!(
            scanned,
            prefix = out.prefix.len(),
            window = out.window.len(),
            terminator = out.terminator.is_some(),
            "extraction finished"
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    fn run(frames: Vec<Frame<'static>>, start: i64, end: i64) -> Extraction<'static> {
        run_with(frames, start, end, CutOptions::default())
    }

    fn run_with(
        frames: Vec<Frame<'static>>,
        start: i64,
        end: i64,
        options: CutOptions,
    ) -> Extraction<'static> {
        let range = TickRange::new(start, end).unwrap();
        Extractor::new(range, options)
            .extract(frames.into_iter().map(Ok))
            .unwrap()
    }

    fn ticks(frames: &[Frame<'_>]) -> Vec<u32> {
        frames.iter().map(|f| f.tick).collect()
    }

    #[test]
    fn range_validation() {
        assert!(TickRange::new(0, 0).is_ok());
        assert!(matches!(
            TickRange::new(-1, 10),
            Err(CutError::InvalidRange { start: -1, end: 10 })
        ));
        assert!(TickRange::new(11, 10).is_err());
        let wide = TickRange::new(5, i64::MAX).unwrap();
        assert_eq!(wide.end(), u32::MAX);
        assert!(wide.contains(u32::MAX));
    }

    #[test]
    fn window_keeps_in_range_frames() {
        let out = run(
            vec![
                data_tables(b"dt"),
                packet(0),
                packet(50),
                packet(100),
                packet(150),
                packet(200),
                stop(200),
            ],
            100,
            150,
        );
        assert_eq!(ticks(&out.window), vec![100, 150]);
        assert_eq!(out.prefix.as_slice(), &[data_tables(b"dt")]);
        assert!(out.terminator.is_none());
    }

    #[test]
    fn context_at_start_tick_goes_to_prefix_once() {
        let out = run(
            vec![
                packet(90),
                string_tables(90, b"a"),
                packet(100),
                string_tables(100, b"b"),
                packet(110),
            ],
            100,
            200,
        );
        assert_eq!(out.prefix.as_slice(), &[string_tables(0, b"a")]);
        assert_eq!(
            out.window,
            vec![packet(100), string_tables(100, b"b"), packet(110)]
        );
    }

    #[test]
    fn only_latest_role_frame_is_kept() {
        let out = run(
            vec![
                signon(0, b"s1"),
                signon(0, b"s2"),
                sync_tick(0),
                packet(10),
                string_tables(10, b"old"),
                packet(20),
                string_tables(20, b"new"),
                packet(30),
            ],
            30,
            30,
        );
        assert_eq!(
            out.prefix.as_slice(),
            &[
                signon(0, b"s1"),
                signon(0, b"s2"),
                sync_tick(0),
                string_tables(0, b"new")
            ]
        );
        assert_eq!(out.window, vec![packet(30)]);
    }

    #[test]
    fn stop_inside_range_becomes_terminator() {
        let out = run(vec![packet(5), packet(6), stop(6)], 0, 100);
        assert_eq!(ticks(&out.window), vec![5, 6]);
        assert_eq!(out.terminator, Some(stop(6)));
    }

    #[test]
    fn range_past_stream_end_is_empty() {
        let out = run(
            vec![data_tables(b"dt"), packet(1), packet(2), stop(2)],
            1000,
            2000,
        );
        assert!(out.window.is_empty());
        assert!(out.terminator.is_none());
        assert_eq!(out.prefix.as_slice(), &[data_tables(b"dt")]);
    }

    #[test]
    fn gap_between_frames_is_empty() {
        let out = run(vec![packet(10), packet(50), string_tables(50, b"x")], 20, 40);
        assert!(out.window.is_empty());
        assert!(out.prefix.is_empty());
    }

    #[test]
    fn stops_consuming_past_end() {
        let frames = vec![packet(1), packet(2), packet(3), packet(4)];
        let mut pulled = 0;
        let source = frames.into_iter().map(|f| {
            pulled += 1;
            Ok(f)
        });
        let out = Extractor::new(TickRange::new(1, 2).unwrap(), CutOptions::default())
            .extract(source)
            .unwrap();
        assert_eq!(ticks(&out.window), vec![1, 2]);
        assert_eq!(pulled, 3);
    }

    #[test]
    fn error_aborts_extraction() {
        let frames = vec![
            Ok(packet(1)),
            Err(CutError::encoding(40, "unknown frame kind 9")),
            Ok(packet(2)),
        ];
        let result = Extractor::new(TickRange::new(0, 10).unwrap(), CutOptions::default())
            .extract(frames);
        assert!(matches!(result, Err(CutError::InvalidEncoding { offset: 40, .. })));
    }

    #[test]
    fn window_control_frames_follow_emitted_tick() {
        let out = run(
            vec![
                packet(100),
                packet(5),
                sync_tick(5),
                packet(101),
            ],
            100,
            200,
        );
        assert_eq!(ticks(&out.window), vec![100, 100, 101]);
    }

    #[test]
    fn strip_console_commands() {
        let options = CutOptions {
            strip_console_commands: true,
            ..CutOptions::default()
        };
        let out = run_with(
            vec![packet(1), console(1, "say hi"), packet(2)],
            0,
            10,
            options,
        );
        assert!(out
            .window
            .iter()
            .all(|f| f.kind() != FrameKind::ConsoleCmd));
        assert_eq!(out.window.len(), 2);
    }

    #[test]
    fn stripped_console_still_opens_window() {
        let options = CutOptions {
            strip_console_commands: true,
            ..CutOptions::default()
        };
        let out = run_with(
            vec![
                data_tables(b"tables"),
                packet(10),
                console(100, "say hi"),
                packet(101),
            ],
            100,
            200,
            options,
        );
        assert_eq!(out.prefix.as_slice(), &[data_tables(b"tables")]);
        assert_eq!(out.window.as_slice(), &[packet(101)]);
    }

    #[test]
    fn rebase_shifts_to_zero() {
        let options = CutOptions {
            rebase_ticks: true,
            ..CutOptions::default()
        };
        let out = run_with(
            vec![
                signon(3, b"s"),
                data_tables_at(3, b"dt"),
                packet(400),
                packet(410),
                stop(410),
            ],
            400,
            500,
            options,
        );
        assert!(out.prefix.iter().all(|f| f.tick == 0));
        assert_eq!(ticks(&out.window), vec![0, 10]);
        assert_eq!(out.terminator, Some(stop(10)));
    }
}
