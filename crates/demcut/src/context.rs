//! Running context: the state-defining frames a mid-stream start needs.
//!
//! The context holds the signon handshake in full and, for each
//! [`ContextRole`], only the most recent frame of that role.

use smallvec::SmallVec;

use crate::types::{ContextRole, Frame, FrameKind};

/// Frames emitted ahead of a window. Signon plus one frame per role fits
/// inline for typical recordings.
pub type Prefix<'a> = SmallVec<[Frame<'a>; 6]>;

/// Latest context-defining frames seen while scanning a demo in order.
#[derive(Clone, Debug, Default)]
pub struct RunningContext<'a> {
    frames: Prefix<'a>,
}

impl<'a> RunningContext<'a> {
    /// Empty context, as at the start of a stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take `frame` into the context if it defines state.
    ///
    /// Signon frames accumulate. A role frame replaces the previous frame of
    /// the same role in place, so the handshake keeps its first-seen order.
    /// Any other frame is handed back unchanged.
    pub fn absorb(&mut self, frame: Frame<'a>) -> Option<Frame<'a>> {
        let kind = frame.kind();
        if kind == FrameKind::Signon {
            self.frames.push(frame);
            return None;
        }
        let Some(role) = kind.context_role() else {
            return Some(frame);
        };
        match self
            .frames
            .iter_mut()
            .find(|held| held.kind().context_role() == Some(role))
        {
            Some(slot) => *slot = frame,
            None => self.frames.push(frame),
        }
        None
    }

    /// Most recent frame for `role`, if one has been seen.
    pub fn latest(&self, role: ContextRole) -> Option<&Frame<'a>> {
        self.frames
            .iter()
            .find(|f| f.kind().context_role() == Some(role))
    }

    /// Signon frames seen so far, in stream order.
    pub fn signon(&self) -> impl Iterator<Item = &Frame<'a>> {
        self.frames
            .iter()
            .filter(|f| f.kind() == FrameKind::Signon)
    }

    /// Number of frames held.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if nothing has been absorbed.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Consume the context into prefix frames: the signon handshake, then
    /// role frames in the order their roles first appeared.
    ///
    /// Role frames are re-stamped with the tick of the frame before them in
    /// the prefix, which is the tick a parser assigns them when reading the
    /// prefix back.
    pub fn flush(self) -> Prefix<'a> {
        let (mut frames, roles): (Prefix<'a>, Prefix<'a>) = self
            .frames
            .into_iter()
            .partition(|f| f.kind() == FrameKind::Signon);
        frames.extend(roles);
        let mut tick = 0;
        for frame in frames.iter_mut() {
            if frame.kind().is_tick_independent() {
                frame.tick = tick;
            } else {
                tick = frame.tick;
            }
        }
        frames
    }
}
