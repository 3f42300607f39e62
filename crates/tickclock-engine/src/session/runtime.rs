use anyhow::{ensure, Result};

use crate::clock::{ClockEngine, Direction, SkipUnit};
use crate::core::{App, AppControl, FrameCtx};
use crate::time::{FrameClock, Pacing};

/// Frame loop configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub pacing: Pacing,
    /// Stop after this many frames. `None` runs until the app exits.
    pub max_frames: Option<u64>,
    pub dt_min_ms: f64,
    pub dt_max_ms: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            pacing: Pacing::default(),
            max_frames: None,
            dt_min_ms: 0.1,
            dt_max_ms: 250.0,
        }
    }
}

impl RuntimeConfig {
    fn validate(&self) -> Result<()> {
        match self.pacing {
            Pacing::Fixed { step_ms } => ensure!(
                step_ms.is_finite() && step_ms > 0.0,
                "fixed frame step must be positive, got {step_ms}"
            ),
            Pacing::Realtime { interval } => ensure!(!interval.is_zero(), "frame interval must be non-zero"),
        }
        ensure!(
            self.dt_min_ms >= 0.0 && self.dt_min_ms <= self.dt_max_ms,
            "invalid dt clamps [{}, {}]",
            self.dt_min_ms,
            self.dt_max_ms
        );
        Ok(())
    }
}

/// Commands an app can queue against the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play,
    Stop,
    Reset,
    CommitRate(f64),
    SkipBy {
        amount: f64,
        unit: SkipUnit,
        direction: Direction,
    },
    Exit,
}

/// Command buffer handed to the app.
///
/// Commands are applied in order after the current callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn play(&mut self) {
        self.commands.push(Command::Play);
    }

    pub fn stop(&mut self) {
        self.commands.push(Command::Stop);
    }

    pub fn reset(&mut self) {
        self.commands.push(Command::Reset);
    }

    pub fn commit_rate(&mut self, rate: f64) {
        self.commands.push(Command::CommitRate(rate));
    }

    pub fn skip_by(&mut self, amount: f64, unit: SkipUnit, direction: Direction) {
        self.commands.push(Command::SkipBy { amount, unit, direction });
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }
}

/// Entry point for the frame loop.
///
/// Each frame: tick the frame clock, advance the engine, hand the app a fresh
/// view, then apply whatever commands it queued.
pub struct Runtime;

impl Runtime {
    /// Runs until the app exits or `max_frames` is reached, then returns the
    /// engine so callers can inspect the final state.
    pub fn run<A>(config: RuntimeConfig, mut engine: ClockEngine, app: &mut A) -> Result<ClockEngine>
    where
        A: App + ?Sized,
    {
        config.validate()?;

        let mut clock = FrameClock::with_clamps(config.pacing, config.dt_min_ms, config.dt_max_ms);
        let mut ctx = RuntimeCtx::default();

        app.on_start(&mut ctx);
        if apply_commands(&mut engine, &mut ctx, clock.now_ms()) {
            return Ok(engine);
        }

        let mut frames = 0u64;
        loop {
            if config.max_frames.is_some_and(|max| frames >= max) {
                log::debug!("frame limit reached after {frames} frames");
                break;
            }

            clock.wait_for_next_frame();
            let time = clock.tick();
            frames += 1;

            engine.advance(time.now_ms);
            let view = engine.view(time.now_ms);

            let control = app.on_frame(&mut FrameCtx {
                time,
                view: &view,
                runtime: &mut ctx,
            });

            let exit_requested = apply_commands(&mut engine, &mut ctx, time.now_ms);
            if control == AppControl::Exit || exit_requested {
                log::debug!("runtime exit at frame {}", time.frame_index);
                break;
            }
        }

        Ok(engine)
    }
}

/// Applies queued commands at `now`. Returns true if an exit was requested.
fn apply_commands(engine: &mut ClockEngine, ctx: &mut RuntimeCtx, now: f64) -> bool {
    let mut exit = false;
    for cmd in ctx.commands.drain(..) {
        match cmd {
            Command::Play => engine.play(now),
            Command::Stop => engine.stop(now),
            Command::Reset => engine.reset(now),
            Command::CommitRate(rate) => {
                if let Err(e) = engine.commit_rate(rate, now) {
                    log::warn!("rate change rejected: {e}");
                }
            }
            Command::SkipBy { amount, unit, direction } => {
                engine.skip_by(amount, unit, direction, now);
            }
            Command::Exit => exit = true,
        }
    }
    exit
}
