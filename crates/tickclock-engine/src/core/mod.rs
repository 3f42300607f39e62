//! Core engine-facing contracts.
//!
//! Defines the interface between the frame runtime and the presentation
//! layer (studio, tools, tests). The presentation layer only sees a read-only
//! `ClockView` and a command buffer; it never holds the mutable engine.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
