use std::time::{Duration, Instant};

/// How a [`FrameClock`] obtains timestamps.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Pacing {
    /// Monotonic host time; frames are paced to `interval`.
    Realtime { interval: Duration },
    /// Virtual time advancing a fixed `step_ms` per frame. Deterministic.
    Fixed { step_ms: f64 },
}

impl Pacing {
    /// Realtime pacing at `hz` frames per second.
    pub fn realtime_hz(hz: f64) -> Self {
        Pacing::Realtime {
            interval: Duration::from_secs_f64(1.0 / hz.max(1.0)),
        }
    }

    /// Virtual pacing at `hz` frames per second.
    pub fn fixed_hz(hz: f64) -> Self {
        Pacing::Fixed {
            step_ms: 1000.0 / hz.max(1.0),
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing::realtime_hz(60.0)
    }
}

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time elapsed since the previous frame, in milliseconds (clamped).
    pub dt_ms: f64,

    /// Monotonic timestamp of this frame, in milliseconds since the clock origin.
    /// Never clamped; this is what the clock engine consumes.
    pub now_ms: f64,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Reported `dt_ms` is clamped so per-frame consumers (e.g. a simulated
/// player) stay stable after stalls. `now_ms` is not clamped: the clock
/// engine handles long gaps itself.
#[derive(Debug, Clone)]
pub struct FrameClock {
    pacing: Pacing,
    origin: Instant,
    last_ms: f64,
    virtual_ms: f64,
    frame_index: u64,
    dt_min_ms: f64,
    dt_max_ms: f64,
}

impl FrameClock {
    /// Creates a new clock with default clamps.
    ///
    /// - minimum prevents zero-dt frames from tight loops
    /// - maximum bounds per-frame work after a long stall
    pub fn new(pacing: Pacing) -> Self {
        Self::with_clamps(pacing, 0.1, 250.0)
    }

    /// Creates a clock with custom delta-time clamps, in milliseconds.
    pub fn with_clamps(pacing: Pacing, dt_min_ms: f64, dt_max_ms: f64) -> Self {
        debug_assert!(dt_min_ms <= dt_max_ms);
        Self {
            pacing,
            origin: Instant::now(),
            last_ms: 0.0,
            virtual_ms: 0.0,
            frame_index: 0,
            dt_min_ms,
            dt_max_ms,
        }
    }

    /// Current timestamp without producing a frame.
    pub fn now_ms(&self) -> f64 {
        match self.pacing {
            Pacing::Realtime { .. } => self.origin.elapsed().as_secs_f64() * 1000.0,
            Pacing::Fixed { .. } => self.virtual_ms,
        }
    }

    /// Blocks until the next frame is due. No-op for fixed pacing.
    pub fn wait_for_next_frame(&self) {
        if let Pacing::Realtime { interval } = self.pacing {
            let due_ms = self.last_ms + interval.as_secs_f64() * 1000.0;
            let remaining_ms = due_ms - self.now_ms();
            if remaining_ms > 0.0 {
                std::thread::sleep(Duration::from_secs_f64(remaining_ms / 1000.0));
            }
        }
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        if let Pacing::Fixed { step_ms } = self.pacing {
            if self.frame_index > 0 {
                self.virtual_ms += step_ms;
            }
        }

        let now_ms = self.now_ms();
        let dt_ms = if self.frame_index == 0 {
            0.0
        } else {
            (now_ms - self.last_ms).clamp(self.dt_min_ms, self.dt_max_ms)
        };
        self.last_ms = now_ms;

        let ft = FrameTime {
            dt_ms,
            now_ms,
            frame_index: self.frame_index,
        };

        self.frame_index = self
            .frame_index
            .wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(Pacing::default())
    }
}
