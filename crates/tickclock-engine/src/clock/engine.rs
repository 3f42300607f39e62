use std::cell::RefCell;

use crate::config::EngineConfig;
use crate::error::{validate_rate, ClockError};
use crate::player::{Player, PlayerError};

use super::skip::{clamp_target, requested_seconds, Direction, SkipOutcome, SkipUnit};
use super::snapshot::{ClockView, DisplayCache, Snapshot};
use super::state::ClockState;

/// Session clock: a wall clock and an independent tick clock, optionally
/// mirrored onto an external player.
///
/// All timestamps are monotonic milliseconds supplied by the caller. The
/// engine is the only mutator of its state; player calls are best effort and
/// never affect the outcome of an operation.
pub struct ClockEngine {
    state: ClockState,
    base_rate: f64,
    player: Option<Box<dyn Player>>,
    display: RefCell<DisplayCache>,
}

impl ClockEngine {
    /// Creates a stopped engine at zero.
    ///
    /// Unusable rates in `config` fall back to [`EngineConfig::default`] values.
    pub fn new(config: EngineConfig) -> Self {
        let defaults = EngineConfig::default();
        let applied_rate = validate_rate(config.default_rate).unwrap_or_else(|e| {
            log::warn!("{e}; using {}", defaults.default_rate);
            defaults.default_rate
        });
        let base_rate = validate_rate(config.base_rate).unwrap_or_else(|e| {
            log::warn!("{e}; using base rate {}", defaults.base_rate);
            defaults.base_rate
        });

        Self {
            state: ClockState::new(applied_rate),
            base_rate,
            player: None,
            display: RefCell::new(DisplayCache::default()),
        }
    }

    pub fn with_player(mut self, player: impl Player + 'static) -> Self {
        self.attach_player(player);
        self
    }

    pub fn attach_player(&mut self, player: impl Player + 'static) {
        self.player = Some(Box::new(player));
    }

    pub fn detach_player(&mut self) -> Option<Box<dyn Player>> {
        self.player.take()
    }

    pub fn has_player(&self) -> bool {
        self.player.is_some()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn tick_count(&self) -> u64 {
        self.state.tick_count
    }

    pub fn applied_rate(&self) -> f64 {
        self.state.applied_rate
    }

    pub fn base_rate(&self) -> f64 {
        self.base_rate
    }

    pub fn wall_elapsed_ms(&self, now: f64) -> f64 {
        self.state.wall_elapsed_ms(now)
    }

    pub fn snapshot(&self, now: f64) -> Snapshot {
        let tick_count = self.state.tick_count;
        Snapshot {
            wall_elapsed_ms: self.state.wall_elapsed_ms(now),
            tick_count,
            applied_rate: self.state.applied_rate,
            derived_tick_time_ms: (tick_count as f64 / self.base_rate * 1000.0).round(),
            running: self.state.running,
        }
    }

    /// Snapshot plus formatted clocks for a presentation layer.
    ///
    /// Only touches the display cache; clock state is left alone.
    pub fn view(&self, now: f64) -> ClockView {
        let snapshot = self.snapshot(now);
        let (derived, tick_changed) = self.display.borrow_mut().derived(&snapshot);
        ClockView {
            wall: crate::format::format_clock(snapshot.wall_elapsed_ms),
            derived,
            tick_changed,
            snapshot,
        }
    }

    // ── Frame hook ────────────────────────────────────────────────────────

    /// Advances the tick clock to `now`. Call once per frame.
    pub fn advance(&mut self, now: f64) {
        if !now.is_finite() {
            log::warn!("ignoring non-finite frame timestamp {now}");
            return;
        }
        self.state.advance(now);
    }

    // ── Commands ──────────────────────────────────────────────────────────

    pub fn play(&mut self, now: f64) {
        if !self.state.running {
            log::debug!("play at {now:.3}ms");
        }
        self.state.start(now);
        self.player_call("play", |p| p.play());
    }

    pub fn stop(&mut self, now: f64) {
        if self.state.running {
            log::debug!("stop at {now:.3}ms");
        }
        self.state.stop(now);
        self.player_call("pause", |p| p.pause());
    }

    /// Zeroes both clocks and starts running. The only path that couples them.
    pub fn reset(&mut self, now: f64) {
        log::debug!("reset at {now:.3}ms");
        self.state.reset(now);
        self.display.borrow_mut().clear();
        self.player_call("seek_to", |p| p.seek_to(0.0, true));
        self.player_call("play", |p| p.play());
    }

    /// Switches the tick clock to `rate` ticks per second.
    ///
    /// The sub-tick residue is dropped and the accumulation baseline restarts
    /// at `now`. The tick count itself is left untouched.
    pub fn commit_rate(&mut self, rate: f64, now: f64) -> Result<(), ClockError> {
        let rate = validate_rate(rate)?;
        log::debug!("rate {} -> {rate}", self.state.applied_rate);
        self.state.applied_rate = rate;
        self.state.tick_accumulator_ms = 0.0;
        self.state.rebaseline(now);
        Ok(())
    }

    /// Seeks both clocks and the player by a relative amount.
    ///
    /// The jump actually applied is derived once from the clamped player
    /// target and used for both clocks. Invalid amounts are ignored and
    /// return `None` without touching state.
    pub fn skip_by(
        &mut self,
        amount: f64,
        unit: SkipUnit,
        direction: Direction,
        now: f64,
    ) -> Option<SkipOutcome> {
        let requested = match requested_seconds(amount, unit, self.base_rate) {
            Ok(s) => s,
            Err(e) => {
                log::debug!("skip ignored: {e}");
                return None;
            }
        };
        let delta = direction.sign() * requested;

        let wall_seconds = self.state.wall_elapsed_ms(now) / 1000.0;
        let current = self
            .player_call("current_time", |p| p.current_time())
            .filter(|t| t.is_finite() && *t >= 0.0)
            .unwrap_or(wall_seconds);
        let duration = self
            .player_call("duration", |p| p.duration())
            .filter(|d| d.is_finite() && *d > 0.0);

        let (target, jumped) = clamp_target(current, delta, duration);
        let jump_ms = jumped * 1000.0;
        if !(wall_seconds * 1000.0 + jump_ms).is_finite() {
            log::debug!("skip ignored: {amount} {unit} overflows the wall clock");
            return None;
        }

        let tick_rate = match unit {
            SkipUnit::Ticks => self.base_rate,
            SkipUnit::Seconds => self.state.applied_rate,
        };
        let tick_delta = (jumped * tick_rate).round() as i64;
        self.state.shift_ticks(tick_delta);

        let max_ms = duration.map_or(f64::INFINITY, |d| d * 1000.0);
        self.state.shift_wall(jump_ms, max_ms, now);
        self.state.rebaseline(now);

        log::debug!(
            "skip {amount} {unit} {direction:?}: player {current:.3}s -> {target:.3}s, ticks {tick_delta:+}"
        );
        self.player_call("seek_to", |p| p.seek_to(target, true));

        Some(SkipOutcome {
            requested_seconds: requested,
            target_player_seconds: target,
            actual_jumped_seconds: jumped,
            tick_delta,
        })
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Runs one player call, discarding failures.
    fn player_call<T, F>(&mut self, op: &str, f: F) -> Option<T>
    where
        F: FnOnce(&mut (dyn Player + 'static)) -> Result<T, PlayerError>,
    {
        let player = self.player.as_deref_mut()?;
        match f(player) {
            Ok(v) => Some(v),
            Err(e) => {
                log::debug!("player {op} ignored: {e}");
                None
            }
        }
    }
}

impl Default for ClockEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
impl ClockEngine {
    pub(crate) fn state(&self) -> &ClockState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::SimulatedPlayer;

    const FRAME: f64 = 1000.0 / 60.0;

    fn running(rate: f64) -> ClockEngine {
        let mut e = ClockEngine::new(EngineConfig::default().default_rate(rate));
        e.play(0.0);
        e
    }

    #[test]
    fn starts_stopped_at_zero() {
        let e = ClockEngine::new(EngineConfig::default().default_rate(64.0));
        let s = e.snapshot(1_000.0);
        assert!(!s.running);
        assert_eq!(s.tick_count, 0);
        assert_eq!(s.wall_elapsed_ms, 0.0);
        assert_eq!(s.applied_rate, 64.0);
    }

    #[test]
    fn bad_config_falls_back() {
        let e = ClockEngine::new(EngineConfig { default_rate: f64::NAN, base_rate: 0.0 });
        assert_eq!(e.applied_rate(), 60.0);
        assert_eq!(e.base_rate(), 60.0);
    }

    #[test]
    fn one_frame_at_sixty_hz_is_one_tick() {
        let mut e = running(60.0);
        e.advance(0.0);
        e.advance(16.67);
        assert_eq!(e.tick_count(), 1);
    }

    #[test]
    fn ticks_track_elapsed_time_at_fixed_rate() {
        for rate in [30.0, 60.0, 64.0, 128.0] {
            let mut e = running(rate);
            let mut now = 0.0;
            let mut prev = 0;
            // Irregular frame pacing, including a long stall.
            for (i, step) in [16.0, 17.0, 16.5, 33.4, 8.2, 500.0].iter().cycle().take(300).enumerate() {
                now += step;
                e.advance(now);
                assert!(e.tick_count() >= prev, "tick count went backwards at frame {i}");
                prev = e.tick_count();
            }
            let expected = (now / (1000.0 / rate)).floor() as i64;
            let diff = (e.tick_count() as i64 - expected).abs();
            assert!(diff <= 1, "rate {rate}: got {} expected {expected}", e.tick_count());
        }
    }

    #[test]
    fn wall_clock_pauses_while_stopped() {
        let mut e = running(60.0);
        e.stop(1_000.0);
        assert_eq!(e.wall_elapsed_ms(5_000.0), 1_000.0);
        e.play(6_000.0);
        assert_eq!(e.wall_elapsed_ms(6_500.0), 1_500.0);
    }

    #[test]
    fn resume_after_stop_does_not_jump() {
        let mut e = running(60.0);
        e.advance(100.0);
        let before = e.tick_count();
        e.stop(100.0);
        e.advance(120.0);
        e.play(10_000.0);
        e.advance(10_000.0);
        assert_eq!(e.tick_count(), before);
    }

    #[test]
    fn stop_keeps_tick_count() {
        let mut e = running(60.0);
        e.advance(1_000.0);
        let ticks = e.tick_count();
        e.stop(1_000.0);
        e.advance(2_000.0);
        assert_eq!(e.tick_count(), ticks);
        assert_eq!(e.wall_elapsed_ms(2_000.0), 1_000.0);
    }

    #[test]
    fn play_is_idempotent() {
        let player = SimulatedPlayer::new(60.0);
        let mut e = ClockEngine::default().with_player(player.clone());
        e.play(0.0);
        e.play(500.0);
        assert_eq!(e.wall_elapsed_ms(1_000.0), 1_000.0);
        assert_eq!(player.play_calls(), 2);
    }

    #[test]
    fn stop_pauses_player() {
        let player = SimulatedPlayer::new(60.0);
        let mut e = ClockEngine::default().with_player(player.clone());
        e.play(0.0);
        assert!(player.is_playing());
        e.stop(1_500.0);
        assert_eq!(player.pause_calls(), 1);
        assert!(!player.is_playing());
        assert!(!e.is_running());
        assert_eq!(e.state().accumulated_ms, 1_500.0);
        assert_eq!(e.wall_elapsed_ms(4_000.0), 1_500.0);
    }

    #[test]
    fn failing_player_does_not_block_commands() {
        let player = SimulatedPlayer::new(60.0);
        player.set_failing(true);
        let mut e = ClockEngine::default().with_player(player.clone());

        e.play(0.0);
        assert!(e.is_running());
        e.advance(1_000.0);
        assert_eq!(e.tick_count(), 60);

        e.stop(1_000.0);
        assert!(!e.is_running());
        assert_eq!(e.wall_elapsed_ms(2_000.0), 1_000.0);

        e.reset(2_000.0);
        assert!(e.is_running());
        assert_eq!(e.tick_count(), 0);
        assert_eq!(e.wall_elapsed_ms(2_500.0), 500.0);

        assert_eq!(player.play_calls(), 2);
        assert_eq!(player.pause_calls(), 1);
        assert_eq!(player.seeks(), vec![0.0]);
        assert!(!player.is_playing());
    }

    #[test]
    fn detached_player_is_left_alone() {
        let player = SimulatedPlayer::new(60.0);
        let mut e = ClockEngine::default().with_player(player.clone());
        assert!(e.has_player());
        assert!(e.detach_player().is_some());
        assert!(!e.has_player());

        e.play(0.0);
        e.skip_by(2.0, SkipUnit::Seconds, Direction::Forward, 0.0);
        assert_eq!(player.play_calls(), 0);
        assert!(player.seeks().is_empty());
        assert_eq!(e.wall_elapsed_ms(0.0), 2_000.0);
    }

    #[test]
    fn reset_zeroes_everything_and_runs() {
        let player = SimulatedPlayer::new(60.0);
        let mut e = ClockEngine::default().with_player(player.clone());
        e.play(0.0);
        e.advance(2_000.0);
        e.skip_by(3.0, SkipUnit::Seconds, Direction::Forward, 2_000.0);
        e.stop(2_500.0);

        e.reset(3_000.0);
        let s = e.state();
        assert_eq!(s.tick_count, 0);
        assert_eq!(s.accumulated_ms, 0.0);
        assert_eq!(s.tick_accumulator_ms, 0.0);
        assert!(s.running);
        assert_eq!(e.wall_elapsed_ms(3_000.0), 0.0);
        assert_eq!(player.seeks().last(), Some(&0.0));
        assert!(player.is_playing());
    }

    #[test]
    fn commit_rate_rejects_invalid() {
        let mut e = running(60.0);
        e.advance(50.0);
        let before = e.state().clone();
        for bad in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            assert!(e.commit_rate(bad, 60.0).is_err());
        }
        assert_eq!(e.state(), &before);
    }

    #[test]
    fn commit_rate_never_moves_tick_count() {
        let mut e = running(60.0);
        e.advance(0.0);
        e.advance(1_000.0);
        let ticks = e.tick_count();

        e.commit_rate(128.0, 1_000.0).unwrap();
        assert_eq!(e.tick_count(), ticks);
        e.commit_rate(20.0, 1_000.0).unwrap();
        assert_eq!(e.tick_count(), ticks);

        // 20 Hz: one tick per 50 ms.
        e.advance(1_020.0);
        assert_eq!(e.tick_count(), ticks);
        e.advance(1_050.0);
        assert_eq!(e.tick_count(), ticks + 1);
    }

    #[test]
    fn commit_rate_discards_residue() {
        let mut e = running(60.0);
        e.advance(10.0);
        assert!(e.state().tick_accumulator_ms > 0.0);
        e.commit_rate(64.0, 10.0).unwrap();
        assert_eq!(e.state().tick_accumulator_ms, 0.0);
        assert_eq!(e.state().last_tick, Some(10.0));

        e.stop(20.0);
        e.commit_rate(60.0, 30.0).unwrap();
        assert_eq!(e.state().last_tick, None);
    }

    #[test]
    fn rate_round_trip_restores_rate_only() {
        let mut e = running(60.0);
        e.advance(2_000.0);
        let ticks = e.tick_count();
        e.commit_rate(64.0, 2_000.0).unwrap();
        e.commit_rate(128.0, 2_000.0).unwrap();
        e.commit_rate(64.0, 2_000.0).unwrap();
        assert_eq!(e.applied_rate(), 64.0);
        assert_eq!(e.tick_count(), ticks);
    }

    #[test]
    fn invalid_skip_is_a_no_op() {
        let player = SimulatedPlayer::new(60.0);
        let mut e = ClockEngine::default().with_player(player.clone());
        e.play(0.0);
        e.advance(750.0);
        let before = e.state().clone();

        for bad in [-1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(e.skip_by(bad, SkipUnit::Seconds, Direction::Forward, 800.0), None);
            assert_eq!(e.skip_by(bad, SkipUnit::Ticks, Direction::Backward, 800.0), None);
        }
        assert_eq!(e.state(), &before);
        assert!(player.seeks().is_empty());
    }

    #[test]
    fn skip_clamps_at_duration() {
        let player = SimulatedPlayer::new(10.0);
        let mut e = ClockEngine::new(EngineConfig::default().default_rate(64.0))
            .with_player(player.clone());
        e.skip_by(9.0, SkipUnit::Seconds, Direction::Forward, 0.0);
        assert_eq!(player.position(), 9.0);
        let ticks = e.tick_count();

        let out = e.skip_by(5.0, SkipUnit::Seconds, Direction::Forward, 0.0).unwrap();
        assert_eq!(out.target_player_seconds, 10.0);
        assert_eq!(out.actual_jumped_seconds, 1.0);
        assert_eq!(out.tick_delta, 64);
        assert_eq!(e.tick_count(), ticks + 64);
        assert_eq!(e.wall_elapsed_ms(0.0), 10_000.0);
        assert_eq!(player.position(), 10.0);
    }

    #[test]
    fn skip_wall_never_exceeds_duration_while_running() {
        let player = SimulatedPlayer::new(10.0);
        let mut e = ClockEngine::default().with_player(player.clone());
        e.play(0.0);
        // Player lags the wall clock; the wall clamp still applies.
        player.set_position(4.0);
        e.skip_by(6.0, SkipUnit::Seconds, Direction::Forward, 8_000.0);
        assert_eq!(e.wall_elapsed_ms(8_000.0), 10_000.0);
    }

    #[test]
    fn skip_ticks_without_player_uses_wall_clock() {
        let mut e = ClockEngine::default();
        e.play(0.0);
        e.advance(500.0);
        let wall = e.wall_elapsed_ms(500.0);
        let ticks = e.tick_count();

        let out = e.skip_by(120.0, SkipUnit::Ticks, Direction::Forward, 500.0).unwrap();
        assert_eq!(out.requested_seconds, 2.0);
        assert_eq!(e.wall_elapsed_ms(500.0), wall + 2_000.0);
        assert_eq!(e.tick_count(), ticks + 120);
    }

    #[test]
    fn overflowing_skip_is_a_no_op() {
        let mut e = running(60.0);
        e.advance(1_000.0);
        let before = e.state().clone();
        assert_eq!(e.skip_by(f64::MAX / 2.0, SkipUnit::Seconds, Direction::Forward, 1_000.0), None);
        assert_eq!(e.state(), &before);

        let out = e.skip_by(10.0, SkipUnit::Seconds, Direction::Backward, 1_000.0).unwrap();
        assert_eq!(out.actual_jumped_seconds, -1.0);
        assert_eq!(e.state().accumulated_ms, 0.0);
        assert_eq!(e.wall_elapsed_ms(1_000.0), 0.0);
    }

    #[test]
    fn skip_back_past_start_clamps_to_zero() {
        let mut e = running(60.0);
        e.advance(1_000.0);
        let out = e.skip_by(5.0, SkipUnit::Seconds, Direction::Backward, 1_000.0).unwrap();
        assert_eq!(out.target_player_seconds, 0.0);
        assert_eq!(out.actual_jumped_seconds, -1.0);
        assert_eq!(e.wall_elapsed_ms(1_000.0), 0.0);
        assert_eq!(e.tick_count(), 0);
    }

    #[test]
    fn skip_seconds_uses_applied_rate_and_ticks_use_base_rate() {
        let mut e = ClockEngine::new(EngineConfig::default().default_rate(128.0).base_rate(64.0));
        e.stop(0.0);
        e.skip_by(1.0, SkipUnit::Seconds, Direction::Forward, 0.0);
        assert_eq!(e.tick_count(), 128);
        e.skip_by(64.0, SkipUnit::Ticks, Direction::Forward, 0.0);
        assert_eq!(e.tick_count(), 192);
        assert_eq!(e.wall_elapsed_ms(0.0), 2_000.0);
    }

    #[test]
    fn skip_rebaselines_tick_accumulation() {
        let mut e = running(60.0);
        e.advance(10.0);
        e.skip_by(1.0, SkipUnit::Seconds, Direction::Forward, 10.0);
        assert_eq!(e.state().last_tick, Some(10.0));
        e.stop(20.0);
        e.skip_by(1.0, SkipUnit::Seconds, Direction::Forward, 30.0);
        assert_eq!(e.state().last_tick, None);
    }

    #[test]
    fn failing_player_falls_back_to_wall_clock() {
        let player = SimulatedPlayer::new(10.0);
        player.set_position(8.0);
        player.set_failing(true);
        let mut e = ClockEngine::default().with_player(player.clone());
        e.play(0.0);
        e.stop(3_000.0);

        let out = e.skip_by(20.0, SkipUnit::Seconds, Direction::Forward, 3_000.0).unwrap();
        // No position or duration: unbounded jump from the 3s wall position.
        assert_eq!(out.target_player_seconds, 23.0);
        assert_eq!(out.actual_jumped_seconds, 20.0);
        assert_eq!(e.wall_elapsed_ms(3_000.0), 23_000.0);
        assert_eq!(player.seeks(), vec![23.0]);
        assert_eq!(player.position(), 8.0);
    }

    #[test]
    fn unknown_duration_is_unbounded() {
        let player = SimulatedPlayer::without_duration();
        let mut e = ClockEngine::default().with_player(player.clone());
        let out = e.skip_by(90.0, SkipUnit::Seconds, Direction::Forward, 0.0).unwrap();
        assert_eq!(out.target_player_seconds, 90.0);
        assert_eq!(e.tick_count(), 5_400);
    }

    #[test]
    fn derived_time_uses_base_rate() {
        let mut e = ClockEngine::new(EngineConfig::default().default_rate(128.0).base_rate(64.0));
        e.play(0.0);
        e.advance(1_000.0);
        assert_eq!(e.tick_count(), 128);
        assert_eq!(e.snapshot(1_000.0).derived_tick_time_ms, 2_000.0);
    }

    #[test]
    fn view_formats_and_flags_changes() {
        let mut e = running(60.0);
        let v = e.view(0.0);
        assert_eq!(v.derived, "00:00:00");
        assert!(v.tick_changed);
        assert!(!e.view(5.0).tick_changed);

        e.advance(1_000.0);
        let v = e.view(1_000.0);
        assert!(v.tick_changed);
        assert_eq!(v.wall, "00:01:00");
        assert_eq!(v.derived, "00:01:00");
    }

    #[test]
    fn non_finite_timestamp_is_ignored() {
        let mut e = running(60.0);
        e.advance(100.0);
        let before = e.state().clone();
        e.advance(f64::NAN);
        assert_eq!(e.state(), &before);
    }
}
