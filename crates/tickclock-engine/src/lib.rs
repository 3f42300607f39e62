//! Tickclock engine crate.
//!
//! Keeps a tick clock loosely synchronized with a wall clock and an external
//! video player, so recorded footage can be stepped at a simulation tick rate.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`clock`] | `ClockEngine`, `Snapshot`, `ClockView`, skip types |
//! | [`convert`] | `TickRateConverter` |
//! | [`player`] | `Player` capability, `SimulatedPlayer` |
//! | [`session`] | headless frame `Runtime` and command buffer |
//! | [`core`] | `App` observer contract and `FrameCtx` |
//! | [`time`] | `FrameClock`, `FrameTime`, `Pacing` |
//! | [`format`] | `MM:SS:HH` clock formatting |
//!
//! # Quick start
//!
//! ```rust
//! use tickclock_engine::clock::{ClockEngine, Direction, SkipUnit};
//! use tickclock_engine::config::EngineConfig;
//!
//! let mut engine = ClockEngine::new(EngineConfig::default());
//! engine.play(0.0);
//! engine.advance(0.0);
//! engine.advance(1_000.0);
//! assert_eq!(engine.tick_count(), 60);
//!
//! engine.skip_by(120.0, SkipUnit::Ticks, Direction::Forward, 1_000.0);
//! assert_eq!(engine.tick_count(), 180);
//! assert_eq!(engine.wall_elapsed_ms(1_000.0), 3_000.0);
//! ```

pub mod clock;
pub mod config;
pub mod convert;
pub mod core;
pub mod error;
pub mod format;
pub mod player;
pub mod session;
pub mod time;

pub mod logging;

pub use clock::ClockEngine;
pub use error::ClockError;
