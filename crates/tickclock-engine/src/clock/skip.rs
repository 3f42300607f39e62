use std::fmt;
use std::str::FromStr;

use crate::error::ClockError;

/// Unit of a relative skip amount.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SkipUnit {
    /// Ticks at the engine's base rate.
    Ticks,
    Seconds,
}

impl FromStr for SkipUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "t" | "tick" | "ticks" => Ok(SkipUnit::Ticks),
            "s" | "sec" | "secs" | "second" | "seconds" => Ok(SkipUnit::Seconds),
            other => Err(format!("unknown skip unit '{other}' (expected ticks or seconds)")),
        }
    }
}

impl fmt::Display for SkipUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipUnit::Ticks => "ticks",
            SkipUnit::Seconds => "seconds",
        })
    }
}

/// Skip direction.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    /// Maps `-1` / `+1` to a direction. Anything else is rejected.
    pub fn from_sign(sign: i32) -> Option<Self> {
        match sign {
            -1 => Some(Direction::Backward),
            1 => Some(Direction::Forward),
            _ => None,
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            Direction::Backward => -1.0,
            Direction::Forward => 1.0,
        }
    }
}

/// Result of an applied skip.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SkipOutcome {
    /// Requested magnitude converted to seconds (unsigned).
    pub requested_seconds: f64,
    /// Player position the skip seeked to, after clamping.
    pub target_player_seconds: f64,
    /// Signed distance actually covered. Smaller than requested when clamped.
    pub actual_jumped_seconds: f64,
    /// Signed change applied to the tick counter before saturation at zero.
    pub tick_delta: i64,
}

/// Converts a skip request into seconds, rejecting unusable amounts.
pub(crate) fn requested_seconds(amount: f64, unit: SkipUnit, base_rate: f64) -> Result<f64, ClockError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ClockError::InvalidSkipAmount(amount));
    }
    Ok(match unit {
        SkipUnit::Ticks => amount / base_rate,
        SkipUnit::Seconds => amount,
    })
}

/// Clamps `current + delta` into `[0, duration]` and returns `(target, actual_jump)`.
///
/// A `None` duration leaves the upper end unbounded.
pub(crate) fn clamp_target(current: f64, delta: f64, duration: Option<f64>) -> (f64, f64) {
    let upper = duration.unwrap_or(f64::INFINITY);
    let target = (current + delta).clamp(0.0, upper);
    (target, target - current)
}
