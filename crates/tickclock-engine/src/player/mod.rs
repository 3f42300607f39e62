//! Video player capability.
//!
//! The engine never owns a real player. It talks to one through the narrow
//! [`Player`] trait, treats every call as fallible, and discards failures.
//! [`SimulatedPlayer`] is an in-memory implementation used by the studio
//! driver and by tests.

mod capability;
mod simulated;

pub use capability::{Player, PlayerError};
pub use simulated::SimulatedPlayer;
