use std::time::Duration;

/// Render-tick metadata.
///
/// One `Frame` per drawn frame; the HUD stamps notifications with the index of
/// the frame they were raised in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Time since the first frame.
    pub elapsed: Duration,
}

impl Frame {
    pub fn first() -> Self {
        Self::default()
    }

    /// The frame that follows `self` after `dt`.
    pub fn advance(self, dt: Duration) -> Self {
        Self {
            index: self.index + 1,
            elapsed: self.elapsed + dt,
        }
    }
}
