use crate::format::format_clock;

/// Read-only projection of both clocks at one instant.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Snapshot {
    pub wall_elapsed_ms: f64,
    pub tick_count: u64,
    pub applied_rate: f64,
    /// Tick count expressed as time at the base rate, rounded to whole ms.
    pub derived_tick_time_ms: f64,
    pub running: bool,
}

impl Snapshot {
    /// Signed drift of the tick clock against the wall clock, in ms.
    pub fn drift_ms(&self) -> f64 {
        self.derived_tick_time_ms - self.wall_elapsed_ms
    }
}

/// Presentation view handed to observers each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockView {
    pub snapshot: Snapshot,
    /// Wall clock as `MM:SS:HH`.
    pub wall: String,
    /// Tick clock as `MM:SS:HH`.
    pub derived: String,
    /// Whether the tick count differs from the last view produced.
    pub tick_changed: bool,
}

/// Last displayed tick and its formatted text.
#[derive(Debug, Default)]
pub(crate) struct DisplayCache {
    last: Option<(u64, String)>,
}

impl DisplayCache {
    /// Returns the formatted derived time and whether the tick changed.
    ///
    /// Formatting only happens when the tick moved since the previous call.
    pub fn derived(&mut self, snapshot: &Snapshot) -> (String, bool) {
        match &self.last {
            Some((tick, text)) if *tick == snapshot.tick_count => (text.clone(), false),
            _ => {
                let text = format_clock(snapshot.derived_tick_time_ms);
                self.last = Some((snapshot.tick_count, text.clone()));
                (text, true)
            }
        }
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}
