use std::fmt;

/// Failure reported by a player call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    /// The player (or this particular capability) is not ready or not present.
    Unavailable,
    /// The player rejected or failed the call.
    Failed(String),
}

impl fmt::Display for PlayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerError::Unavailable => f.write_str("player unavailable"),
            PlayerError::Failed(msg) => write!(f, "player call failed: {msg}"),
        }
    }
}

impl std::error::Error for PlayerError {}

/// External playback capability consulted and commanded by the clock engine.
///
/// Positions and durations are in seconds. Every call may fail independently;
/// callers must not assume a successful `seek_to` is reflected by the next
/// `current_time`.
pub trait Player {
    fn play(&mut self) -> Result<(), PlayerError>;

    fn pause(&mut self) -> Result<(), PlayerError>;

    /// Seeks to `seconds`. `allow_seek_ahead` lets the player fetch unbuffered
    /// media to satisfy the seek.
    fn seek_to(&mut self, seconds: f64, allow_seek_ahead: bool) -> Result<(), PlayerError>;

    fn current_time(&self) -> Result<f64, PlayerError>;

    fn duration(&self) -> Result<f64, PlayerError>;
}
