//! Explicit change detection for full-redraw rendering.
//!
//! A renderer computes a `ChangeToken` from everything its output depends on
//! and asks a `RedrawObserver` whether it has to rebuild. There is no diffing:
//! any change to the token means a full teardown and rebuild.

use foundation::math::canonical_bits;

use crate::frame::Frame;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeToken {
    /// Content identity of the input data bundle.
    pub data: String,
    pub rotation: [u64; 3],
    pub dimensions: (u32, u32),
    /// Selected field ids, ascending.
    pub selection: Vec<u32>,
    /// Bumped by the renderer's own local state (e.g. highlight toggles).
    pub local_revision: u64,
}

impl ChangeToken {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            rotation: [0; 3],
            dimensions: (0, 0),
            selection: Vec::new(),
            local_revision: 0,
        }
    }

    pub fn with_rotation(mut self, rotation: [f64; 3]) -> Self {
        self.rotation = rotation.map(canonical_bits);
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = (width, height);
        self
    }

    pub fn with_selection(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.selection = ids.into_iter().collect();
        self.selection.sort_unstable();
        self
    }

    pub fn with_local_revision(mut self, revision: u64) -> Self {
        self.local_revision = revision;
        self
    }
}

#[derive(Debug, Default)]
pub struct RedrawObserver {
    last: Option<ChangeToken>,
    frame: Option<Frame>,
}

impl RedrawObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the frame to draw if `token` differs from the last one seen.
    pub fn observe(&mut self, token: ChangeToken) -> Option<Frame> {
        if self.last.as_ref() == Some(&token) {
            return None;
        }
        self.last = Some(token);
        Some(self.advance())
    }

    /// Forces a redraw regardless of the token (e.g. after an interaction).
    pub fn force(&mut self, token: ChangeToken) -> Frame {
        self.last = Some(token);
        self.advance()
    }

    /// The most recent redraw, or `None` before the first one.
    pub fn frame(&self) -> Option<Frame> {
        self.frame
    }

    pub fn redraw_count(&self) -> u64 {
        self.frame.map_or(0, |f| f.index + 1)
    }

    fn advance(&mut self) -> Frame {
        let next = self.frame.map_or(Frame::new(0), Frame::next);
        self.frame = Some(next);
        next
    }
}
