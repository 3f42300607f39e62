//! Clock engine.
//!
//! Keeps a wall clock (elapsed real time, pausable) and a tick clock (an
//! integer counter advancing at the applied rate) side by side. The two are
//! deliberately decoupled: changing the rate or skipping never resyncs one
//! from the other, and only `reset` zeroes both together.
//!
//! Typical usage:
//! - one `ClockEngine` per session
//! - call `advance(now)` once per frame
//! - issue `play` / `stop` / `reset` / `commit_rate` / `skip_by` on user input
//! - read `snapshot(now)` or `view(now)` for display

mod engine;
mod skip;
mod snapshot;
mod state;

pub use engine::ClockEngine;
pub use skip::{Direction, SkipOutcome, SkipUnit};
pub use snapshot::{ClockView, Snapshot};
