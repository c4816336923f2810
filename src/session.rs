//! The boundary between the engine and whatever drives it.
//!
//! A session owns no game rules. It serializes two event sources (a fixed
//! period gravity timer and an input source) into [`Command`]s for a single
//! [`Game`], and hands a fresh [`GameSnapshot`] to a renderer after each one.

use std::{
    io,
    time::{Duration, Instant},
};

use tracing::trace;

use crate::{
    command::Command,
    config::SessionConfig,
    game::{Game, GameStatus},
    snapshot::GameSnapshot,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Input {
    Command(Command),
    /// Pause when playing, resume when paused.
    TogglePause,
    Quit,
}

pub trait InputSource {
    /// Waits at most `timeout` for the next input.
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<Input>>;
}

pub trait Renderer {
    fn render(&mut self, snapshot: &GameSnapshot) -> io::Result<()>;
}

/// Turns an input into the command it stands for in `status`.
pub fn resolve(input: Input, status: GameStatus) -> Option<Command> {
    match input {
        Input::Command(command) => Some(command),
        Input::TogglePause => match status {
            GameStatus::Playing => Some(Command::Pause),
            GameStatus::Paused => Some(Command::Resume),
            GameStatus::Idle | GameStatus::GameOver => None,
        },
        Input::Quit => None,
    }
}

// ============================================================================
// Timer
// ============================================================================

/// Fixed-period gravity clock. Time is passed in, so tests can drive it
/// without sleeping.
#[derive(Clone, Copy, Debug)]
pub struct TickTimer {
    interval: Duration,
    last_tick: Instant,
}

impl TickTimer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_tick: now,
        }
    }

    pub fn time_until_tick(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.saturating_duration_since(self.last_tick))
    }

    /// Returns `true` and restarts the period if a tick is due at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_tick) >= self.interval {
            self.last_tick = now;
            true
        } else {
            false
        }
    }
}

// ============================================================================
// Main Loop
// ============================================================================

/// Drives `game` until the input source reports [`Input::Quit`].
pub fn run<I, R>(
    game: &mut Game,
    input: &mut I,
    renderer: &mut R,
    config: &SessionConfig,
) -> io::Result<()>
where
    I: InputSource,
    R: Renderer,
{
    let mut timer = TickTimer::new(config.tick_interval, Instant::now());

    loop {
        renderer.render(&game.snapshot())?;

        let timeout = timer.time_until_tick(Instant::now());
        match input.poll(timeout)? {
            Some(Input::Quit) => break,
            Some(other) => {
                if let Some(command) = resolve(other, game.status()) {
                    trace!(%command, "dispatch");
                    game.apply(command);
                }
            }
            None => {}
        }

        if timer.poll(Instant::now()) {
            game.apply(Command::Tick);
        }
    }

    Ok(())
}
