use anyhow::{anyhow, bail, Context, Result};

use tickclock_engine::clock::{Direction, SkipUnit};
use tickclock_engine::session::Command;

/// One line of a session script.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Queue an engine command.
    Run(Command),
    /// Let this many frames pass.
    Wait(u64),
    /// Print the current clocks.
    Print,
}

/// Parses a session script.
///
/// ```text
/// # comment
/// play
/// wait 120
/// rate 64
/// skip 5 seconds -
/// skip 128 ticks +
/// stop
/// print
/// exit
/// ```
pub fn parse_script(src: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (idx, raw) in src.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let step = parse_line(line).with_context(|| format!("line {}: {line:?}", idx + 1))?;
        steps.push(step);
    }
    Ok(steps)
}

fn parse_line(line: &str) -> Result<Step> {
    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default().to_ascii_lowercase();
    let args: Vec<&str> = words.collect();

    let step = match (verb.as_str(), args.as_slice()) {
        ("play", []) => Step::Run(Command::Play),
        ("stop", []) => Step::Run(Command::Stop),
        ("reset", []) => Step::Run(Command::Reset),
        ("exit", []) => Step::Run(Command::Exit),
        ("print", []) => Step::Print,
        ("wait", [frames]) => Step::Wait(
            frames.parse().with_context(|| format!("bad frame count {frames:?}"))?,
        ),
        ("rate", [rate]) => Step::Run(Command::CommitRate(
            rate.parse().with_context(|| format!("bad rate {rate:?}"))?,
        )),
        ("skip", [amount, unit, dir]) => Step::Run(Command::SkipBy {
            amount: amount.parse().with_context(|| format!("bad amount {amount:?}"))?,
            unit: unit.parse::<SkipUnit>().map_err(|e| anyhow!(e))?,
            direction: parse_direction(dir)?,
        }),
        (verb, _) => bail!("unknown command or wrong arguments for '{verb}'"),
    };
    Ok(step)
}

fn parse_direction(s: &str) -> Result<Direction> {
    let sign = match s {
        "+" | "fwd" | "forward" => 1,
        "-" | "back" | "backward" => -1,
        other => other
            .parse::<i32>()
            .with_context(|| format!("bad direction {other:?}"))?,
    };
    Direction::from_sign(sign).ok_or_else(|| anyhow!("direction must be -1 or +1, got {sign}"))
}
