/// Absorbs float error when the accumulator lands a hair under a tick boundary
/// (e.g. 1000 ms at 60 Hz dividing to 59.999...).
const TICK_EPSILON: f64 = 1e-9;

/// Mutable clock state for one session.
///
/// Wall clock: `accumulated_ms` plus the live segment since `run_start`.
/// Tick clock: `tick_count` plus the sub-tick residue in `tick_accumulator_ms`.
/// The two sides are only ever zeroed together by [`ClockState::reset`]; no
/// other path derives one from the other.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ClockState {
    pub accumulated_ms: f64,
    pub run_start: Option<f64>,
    pub running: bool,
    pub tick_count: u64,
    pub tick_accumulator_ms: f64,
    pub last_tick: Option<f64>,
    pub applied_rate: f64,
}

impl ClockState {
    pub fn new(applied_rate: f64) -> Self {
        Self {
            accumulated_ms: 0.0,
            run_start: None,
            running: false,
            tick_count: 0,
            tick_accumulator_ms: 0.0,
            last_tick: None,
            applied_rate,
        }
    }

    /// Milliseconds per tick at the applied rate. Rates below 1 are treated as 1.
    pub fn ms_per_tick(&self) -> f64 {
        1000.0 / self.applied_rate.max(1.0)
    }

    /// Length of the in-progress run segment, or 0 when stopped.
    pub fn live_segment_ms(&self, now: f64) -> f64 {
        match (self.running, self.run_start) {
            (true, Some(start)) => (now - start).max(0.0),
            _ => 0.0,
        }
    }

    pub fn wall_elapsed_ms(&self, now: f64) -> f64 {
        (self.accumulated_ms + self.live_segment_ms(now)).max(0.0)
    }

    /// Per-frame tick accumulation.
    pub fn advance(&mut self, now: f64) {
        if !self.running {
            self.last_tick = None;
            return;
        }

        // A missing baseline yields a zero delta instead of a jump after a pause.
        let last = *self.last_tick.get_or_insert(now);
        // The baseline never moves backwards, so a revisited instant adds nothing.
        let delta = (now - last).max(0.0);
        self.last_tick = Some(now.max(last));
        self.tick_accumulator_ms += delta;

        // All whole ticks are removed in one step, however long the delta.
        let ms_per_tick = self.ms_per_tick();
        let whole = (self.tick_accumulator_ms / ms_per_tick + TICK_EPSILON).floor();
        if whole >= 1.0 {
            self.tick_count = self.tick_count.saturating_add(whole as u64);
            self.tick_accumulator_ms = (self.tick_accumulator_ms - whole * ms_per_tick).max(0.0);
        }
    }

    pub fn start(&mut self, now: f64) {
        if !self.running {
            self.run_start = Some(now);
            self.last_tick = Some(now);
            self.running = true;
        }
    }

    pub fn stop(&mut self, now: f64) {
        if self.running {
            self.accumulated_ms += self.live_segment_ms(now);
            self.run_start = None;
            self.running = false;
        }
    }

    pub fn reset(&mut self, now: f64) {
        self.accumulated_ms = 0.0;
        self.run_start = Some(now);
        self.running = true;
        self.tick_count = 0;
        self.tick_accumulator_ms = 0.0;
        self.last_tick = Some(now);
    }

    /// Re-anchors tick accumulation at `now` (running) or clears it (stopped).
    pub fn rebaseline(&mut self, now: f64) {
        self.last_tick = if self.running { Some(now) } else { None };
    }

    /// Moves the tick counter by a signed amount, saturating at zero.
    pub fn shift_ticks(&mut self, delta: i64) {
        self.tick_count = if delta >= 0 {
            self.tick_count.saturating_add(delta as u64)
        } else {
            self.tick_count.saturating_sub(delta.unsigned_abs())
        };
    }

    /// Moves the wall clock by `delta_ms`, keeping the total in `[0, max_ms]`.
    ///
    /// While running, the live segment is banked first and restarted at `now`,
    /// so `accumulated_ms` alone carries the new total.
    pub fn shift_wall(&mut self, delta_ms: f64, max_ms: f64, now: f64) {
        let target = (self.wall_elapsed_ms(now) + delta_ms).clamp(0.0, max_ms.max(0.0));
        self.accumulated_ms = target;
        if self.running {
            self.run_start = Some(now);
        }
    }
}
