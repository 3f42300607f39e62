use crate::clock::{ClockView, Snapshot};
use crate::session::RuntimeCtx;
use crate::time::FrameTime;

/// Per-frame context passed to `core::App::on_frame`.
///
/// `'a` is the duration of the callback invocation.
pub struct FrameCtx<'a> {
    pub time:    FrameTime,
    pub view:    &'a ClockView,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a> FrameCtx<'a> {
    pub fn snapshot(&self) -> &Snapshot {
        &self.view.snapshot
    }

    /// True when the displayed tick moved since the previous frame.
    pub fn tick_changed(&self) -> bool {
        self.view.tick_changed
    }
}
