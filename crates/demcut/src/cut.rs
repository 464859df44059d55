//! The `cut` entry points: parse, extract, and re-encode in one call.

use tracing::{debug, warn};

use crate::config::CutOptions;
use crate::error::CutError;
use crate::extract::{Extractor, TickRange};
use crate::parser::DemoParser;
use crate::writer::serialize;

/// Cut `input` down to the inclusive tick range `[start, end]` with default
/// options.
///
/// The output is a standalone demo: the context frames needed to play from
/// `start`, the frames in range, and a Stop frame. An `end` past the last
/// tick simply clamps to the end of the recording.
///
/// # Errors
///
/// [`CutError::InvalidRange`] is checked before any parsing. Parse errors
/// anywhere up to the end of the range abort the call; nothing is returned
/// on failure. A buffer that ends before its declared signon section is
/// complete is [`CutError::Truncated`].
///
/// # Examples
///
/// ```
/// use demcut::{cut, CutError};
///
/// let err = cut(b"garbage", 10, 5).unwrap_err();
/// assert!(matches!(err, CutError::InvalidRange { start: 10, end: 5 }));
/// ```
pub fn cut(input: &[u8], start: i64, end: i64) -> Result<Vec<u8>, CutError> {
    cut_with(input, start, end, &CutOptions::default())
}

/// [`cut`] with explicit [`CutOptions`].
pub fn cut_with(
    input: &[u8],
    start: i64,
    end: i64,
    options: &CutOptions,
) -> Result<Vec<u8>, CutError> {
    let range = TickRange::new(start, end)?;
    let mut parser = DemoParser::new(input)?;
    let extraction = Extractor::new(range, options.clone()).extract(parser.by_ref())?;

    let declared = u64::from(parser.header().signon_length);
    if parser.terminated_implicitly() && parser.signon_bytes() < declared {
        warn!(
            declared,
            found = parser.signon_bytes(),
            "demo ends inside its signon section"
        );
        let missing = declared - parser.signon_bytes();
        return Err(CutError::Truncated {
            offset: input.len(),
            needed: usize::try_from(missing).unwrap_or(usize::MAX),
            remaining: 0,
        });
    }

    debug!(
        start = range.start(),
        end = range.end(),
        first = ?extraction.first_tick(),
        last = ?extraction.last_tick(),
        frames_read = parser.frames_read(),
        "cutting demo"
    );
    serialize(parser.header(), &extraction)
}
