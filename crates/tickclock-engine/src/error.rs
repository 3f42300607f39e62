use std::fmt;

/// Input rejected by the clock engine or the rate converter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockError {
    /// A tick rate that is not finite or not strictly positive.
    InvalidRate(f64),
    /// A skip amount that is not finite or is negative.
    InvalidSkipAmount(f64),
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockError::InvalidRate(r) => {
                write!(f, "invalid tick rate {r}: must be a finite number greater than zero")
            }
            ClockError::InvalidSkipAmount(a) => {
                write!(f, "invalid skip amount {a}: must be a finite, non-negative number")
            }
        }
    }
}

impl std::error::Error for ClockError {}

/// Returns `rate` if it is usable as a tick rate.
pub(crate) fn validate_rate(rate: f64) -> Result<f64, ClockError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(ClockError::InvalidRate(rate))
    }
}
