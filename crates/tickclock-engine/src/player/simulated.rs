use std::cell::RefCell;
use std::rc::Rc;

use super::capability::{Player, PlayerError};

#[derive(Debug, Default)]
struct Inner {
    position: f64,
    duration: Option<f64>,
    playing: bool,
    failing: bool,
    play_calls: u32,
    pause_calls: u32,
    seeks: Vec<f64>,
}

/// In-memory player with a position, an optional duration, and a play state.
///
/// Cloning yields another handle to the same player, so a driver can keep one
/// handle for `advance_by` while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct SimulatedPlayer(Rc<RefCell<Inner>>);

impl SimulatedPlayer {
    /// Creates a paused player at position 0 with the given duration in seconds.
    pub fn new(duration_secs: f64) -> Self {
        let player = Self::default();
        player.0.borrow_mut().duration = Some(duration_secs.max(0.0));
        player
    }

    /// Creates a player whose `duration()` is unavailable.
    pub fn without_duration() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail (or succeed again with `false`).
    pub fn set_failing(&self, failing: bool) {
        self.0.borrow_mut().failing = failing;
    }

    /// Moves the playhead directly, bypassing call bookkeeping.
    pub fn set_position(&self, seconds: f64) {
        let mut inner = self.0.borrow_mut();
        inner.position = clamp_position(seconds, inner.duration);
    }

    /// Advances the playhead by `dt_ms` if playing, stopping at the end.
    pub fn advance_by(&self, dt_ms: f64) {
        let mut inner = self.0.borrow_mut();
        if inner.playing && dt_ms > 0.0 {
            let next = inner.position + dt_ms / 1000.0;
            inner.position = clamp_position(next, inner.duration);
        }
    }

    pub fn position(&self) -> f64 {
        self.0.borrow().position
    }

    pub fn is_playing(&self) -> bool {
        self.0.borrow().playing
    }

    pub fn play_calls(&self) -> u32 {
        self.0.borrow().play_calls
    }

    pub fn pause_calls(&self) -> u32 {
        self.0.borrow().pause_calls
    }

    /// Seek targets received, oldest first. Includes calls that failed.
    pub fn seeks(&self) -> Vec<f64> {
        self.0.borrow().seeks.clone()
    }

    fn check(&self) -> Result<(), PlayerError> {
        if self.0.borrow().failing {
            Err(PlayerError::Failed("simulated failure".to_string()))
        } else {
            Ok(())
        }
    }
}

fn clamp_position(seconds: f64, duration: Option<f64>) -> f64 {
    let upper = duration.unwrap_or(f64::INFINITY);
    if seconds.is_nan() { 0.0 } else { seconds.clamp(0.0, upper) }
}

impl Player for SimulatedPlayer {
    fn play(&mut self) -> Result<(), PlayerError> {
        self.0.borrow_mut().play_calls += 1;
        self.check()?;
        self.0.borrow_mut().playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        self.0.borrow_mut().pause_calls += 1;
        self.check()?;
        self.0.borrow_mut().playing = false;
        Ok(())
    }

    fn seek_to(&mut self, seconds: f64, _allow_seek_ahead: bool) -> Result<(), PlayerError> {
        self.0.borrow_mut().seeks.push(seconds);
        self.check()?;
        self.set_position(seconds);
        Ok(())
    }

    fn current_time(&self) -> Result<f64, PlayerError> {
        self.check()?;
        Ok(self.0.borrow().position)
    }

    fn duration(&self) -> Result<f64, PlayerError> {
        self.check()?;
        self.0.borrow().duration.ok_or(PlayerError::Unavailable)
    }
}
