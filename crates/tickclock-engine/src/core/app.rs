use crate::session::RuntimeCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Presentation-side observer driven by the runtime.
pub trait App {
    /// Called once before the first frame. Commands queued here apply
    /// immediately.
    fn on_start(&mut self, runtime: &mut RuntimeCtx) {
        let _ = runtime;
    }

    /// Called once per frame, after the engine advanced.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}

/// Plain closures work as observers.
impl<F> App for F
where
    F: FnMut(&mut FrameCtx<'_>) -> AppControl,
{
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        self(ctx)
    }
}
