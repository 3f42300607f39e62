//! Time subsystem.
//!
//! Provides frame timing without coupling to the runtime loop.
//! Intended usage:
//! - one `FrameClock` per session loop
//! - call `tick()` once per frame to obtain `FrameTime`
//! - feed `FrameTime::now_ms` to `ClockEngine::advance`

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime, Pacing};
