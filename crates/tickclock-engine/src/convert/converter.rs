use crate::error::{validate_rate, ClockError};

/// What [`TickRateConverter::set_rate`] holds fixed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RateMode {
    /// Keep elapsed time; the tick count is recomputed for the new rate.
    PreserveTime,
    /// Keep the tick count; elapsed time shifts to match the new rate.
    PreserveTicks,
}

/// Tick counter bound to one rate, convertible to others.
#[derive(Debug, Clone, PartialEq)]
pub struct TickRateConverter {
    rate: f64,
    tick_duration_ms: f64,
    tick_count: u64,
    elapsed_ms: f64,
}

impl TickRateConverter {
    pub fn new(rate: f64) -> Result<Self, ClockError> {
        let rate = validate_rate(rate)?;
        Ok(Self {
            rate,
            tick_duration_ms: 1000.0 / rate,
            tick_count: 0,
            elapsed_ms: 0.0,
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn tick_duration_ms(&self) -> f64 {
        self.tick_duration_ms
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn set_rate(&mut self, rate: f64, mode: RateMode) -> Result<(), ClockError> {
        let rate = validate_rate(rate)?;
        self.rate = rate;
        self.tick_duration_ms = 1000.0 / rate;
        match mode {
            RateMode::PreserveTime => self.tick_count = self.ticks_for(self.elapsed_ms),
            RateMode::PreserveTicks => self.elapsed_ms = self.ms_for(self.tick_count),
        }
        Ok(())
    }

    /// Moves the counter by `ticks` (saturating at zero); elapsed time follows.
    pub fn advance_by_delta(&mut self, ticks: i64) {
        self.tick_count = if ticks >= 0 {
            self.tick_count.saturating_add(ticks as u64)
        } else {
            self.tick_count.saturating_sub(ticks.unsigned_abs())
        };
        self.elapsed_ms = self.ms_for(self.tick_count);
    }

    /// Sets elapsed time and derives the whole-tick count from it.
    pub fn set_from_elapsed_time(&mut self, ms: f64) {
        self.elapsed_ms = if ms.is_finite() && ms > 0.0 { ms } else { 0.0 };
        self.tick_count = self.ticks_for(self.elapsed_ms);
    }

    pub fn set_from_tick_count(&mut self, ticks: u64) {
        self.tick_count = ticks;
        self.elapsed_ms = self.ms_for(ticks);
    }

    /// Converts `ticks` counted at `source_rate` into whole ticks at this rate.
    pub fn convert_ticks_from_rate(&self, ticks: u64, source_rate: f64) -> Result<u64, ClockError> {
        let source_rate = validate_rate(source_rate)?;
        let ms = ticks as f64 * 1000.0 / source_rate;
        Ok(self.ticks_for(ms))
    }

    fn ticks_for(&self, ms: f64) -> u64 {
        // Nudge up so exact multiples survive float division (e.g. 1000 / (1000/60)).
        (ms / self.tick_duration_ms + 1e-9).floor().max(0.0) as u64
    }

    fn ms_for(&self, ticks: u64) -> f64 {
        ticks as f64 * self.tick_duration_ms
    }
}
