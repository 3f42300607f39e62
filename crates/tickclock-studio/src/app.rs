use std::collections::VecDeque;

use tickclock_engine::convert::TickRateConverter;
use tickclock_engine::core::{App, AppControl, FrameCtx};
use tickclock_engine::player::SimulatedPlayer;
use tickclock_engine::session::Command;

use crate::script::Step;

/// Script-driven observer: feeds steps to the runtime and renders the clocks.
pub struct StudioApp {
    steps:    VecDeque<Step>,
    waiting:  u64,
    player:   SimulatedPlayer,
    /// Converts applied-rate ticks to base-rate ticks for display.
    base:     TickRateConverter,
    /// Print on the frame after a command took effect.
    dirty:    bool,
    lines:    Vec<String>,
    echo:     bool,
}

impl StudioApp {
    pub fn new(steps: Vec<Step>, player: SimulatedPlayer, base: TickRateConverter) -> Self {
        Self {
            steps: steps.into(),
            waiting: 0,
            player,
            base,
            dirty: true,
            lines: Vec::new(),
            echo: true,
        }
    }

    /// Keeps rendered lines in memory instead of printing them.
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    /// Every line rendered so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn render(&mut self, ctx: &FrameCtx<'_>) {
        let snap = ctx.snapshot();
        let base_ticks = self
            .base
            .convert_ticks_from_rate(snap.tick_count, snap.applied_rate)
            .unwrap_or(0);
        let line = format!(
            "[{:>6}] {} wall {} tick {} ({} @ {}Hz, {} @ base) player {:>8.3}s drift {:+.0}ms",
            ctx.time.frame_index,
            if snap.running { "▶" } else { "■" },
            ctx.view.wall,
            ctx.view.derived,
            snap.tick_count,
            snap.applied_rate,
            base_ticks,
            self.player.position(),
            snap.drift_ms(),
        );
        if self.echo {
            println!("  {line}");
        }
        self.lines.push(line);
    }
}

impl App for StudioApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        self.player.advance_by(ctx.time.dt_ms);

        if self.dirty {
            self.render(ctx);
            self.dirty = false;
        }

        if self.waiting > 0 {
            self.waiting -= 1;
            return AppControl::Continue;
        }

        // Run steps until one needs a frame boundary.
        while let Some(step) = self.steps.pop_front() {
            match step {
                Step::Wait(frames) => {
                    self.waiting = frames.saturating_sub(1);
                    self.dirty = true;
                    return AppControl::Continue;
                }
                // Queued commands land after this frame; the next frame renders.
                Step::Print if self.dirty => return AppControl::Continue,
                Step::Print => self.render(ctx),
                Step::Run(Command::Exit) => {
                    ctx.runtime.exit();
                    return AppControl::Continue;
                }
                Step::Run(cmd) => {
                    log::debug!("script: {cmd:?}");
                    ctx.runtime.push(cmd);
                    self.dirty = true;
                }
            }
        }

        // Script exhausted.
        AppControl::Exit
    }
}
