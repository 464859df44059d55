//! Benchmark profiles for demcut.
//!
//! - [`reference_demo`]: a synthetic recording of about 10K frames
//! - [`middle_range`]: a tick range covering the middle fifth of a demo

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use demcut_test_utils::fixtures;

/// Frame count of the reference profile.
pub const REFERENCE_FRAMES: u32 = 10_000;

/// Encoded synthetic demo of about [`REFERENCE_FRAMES`] frames.
pub fn reference_demo() -> Vec<u8> {
    fixtures::synthetic(REFERENCE_FRAMES)
}

/// Range spanning the middle fifth of `input`'s ticks.
///
/// Returns `None` if `input` does not parse or holds no ticks.
pub fn middle_range(input: &[u8]) -> Option<(i64, i64)> {
    let summary = demcut::inspect(input).ok()?;
    let last = i64::from(summary.last_tick?);
    Some((last * 2 / 5, last * 3 / 5))
}
