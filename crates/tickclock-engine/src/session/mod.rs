//! Headless frame runtime.
//!
//! Stands in for a host's per-frame scheduler: drives `ClockEngine::advance`
//! once per frame and routes app commands into the engine between frames.

mod runtime;

pub use runtime::{Command, Runtime, RuntimeConfig, RuntimeCtx};
