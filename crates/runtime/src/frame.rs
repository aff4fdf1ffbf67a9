/// Deterministic redraw metadata.
///
/// Every full rebuild of the draw surface gets the next frame index, so a
/// recorded event stream can be replayed in order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    /// 0-based redraw index.
    pub index: u64,
}

impl Frame {
    pub fn new(index: u64) -> Self {
        Self { index }
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1)
    }
}
