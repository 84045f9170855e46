/// Fixed-timestep session driver.
///
/// A `Session` owns the scene, the player and the dice for one game.  The
/// platform plugs in through three small traits: where intents come from,
/// where finished frames go, and how time passes.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;

use crate::compute::{self, TickReport};
use crate::config::GameConfig;
use crate::dice::{self, Dice};
use crate::entities::{Intents, Scene, Wings};
use crate::error::Result;
use crate::sprites::{SpriteLoader, SpriteSet};
use crate::vector::Rect;

// ── Collaborators ─────────────────────────────────────────────────────────────

/// Input sampled at the start of a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub intents: Intents,
    pub quit: bool,
}

pub trait InputSource {
    /// Drain pending events and report the held intents.
    fn poll(&mut self) -> Result<InputState>;
}

/// Read-only view of a finished tick, handed to the renderer.
pub struct Frame<'a> {
    pub scene: &'a Scene,
    pub wings: &'a Wings,
    pub tick: u64,
}

pub trait FrameSink {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()>;
}

pub trait Clock {
    /// Time elapsed since some fixed origin.
    fn now(&self) -> Duration;
    fn sleep(&mut self, d: Duration);
}

/// Wall-clock time with real sleeping.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, d: Duration) {
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}

/// How long to wait until `deadline`.  Zero once it has passed.
pub fn time_left(deadline: Duration, now: Duration) -> Duration {
    deadline.saturating_sub(now)
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The last life was lost.
    GameOver,
    /// The player asked to leave.  The tick that saw the request is not
    /// simulated or presented.
    Quit,
}

pub struct Session<D = StdRng> {
    pub scene: Scene,
    pub wings: Wings,
    pub dice: D,
    pub tick_len: Duration,
    pub ticks: u64,
}

impl Session<StdRng> {
    /// Load sprites, seed the dice and lay out the field described by
    /// `config`.
    pub fn new(config: &GameConfig, loader: &impl SpriteLoader) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(dice::time_seed);
        log::info!("session seed {seed}");
        let field = Rect::new(0, 0, config.field_width, config.field_height);
        Ok(Self::with_dice(
            field,
            SpriteSet::load(loader)?,
            config.laser_cap(),
            config.lives,
            Duration::from_millis(config.tick_ms),
            dice::session_rng(seed),
        ))
    }
}

impl<D: Dice> Session<D> {
    pub fn with_dice(
        field: Rect,
        sprites: SpriteSet,
        laser_cap: Option<usize>,
        lives: i32,
        tick_len: Duration,
        mut dice: D,
    ) -> Self {
        let ship = sprites.ship.clone();
        let scene = compute::init_scene(field, sprites, laser_cap, &mut dice);
        let wings = compute::init_wings(ship, &field, lives);
        Session {
            scene,
            wings,
            dice,
            tick_len,
            ticks: 0,
        }
    }

    /// One simulation tick, without pacing or rendering.
    pub fn step(&mut self, intents: &Intents) -> TickReport {
        self.ticks += 1;
        compute::tick(&mut self.scene, &mut self.wings, intents, &mut self.dice)
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            scene: &self.scene,
            wings: &self.wings,
            tick: self.ticks,
        }
    }

    /// Run until the player is destroyed or quits.
    ///
    /// Each tick is input, simulation, render hand-off, then a sleep to the
    /// next deadline.  The deadline advances by exactly one tick each time;
    /// an overrunning tick is not caught up.
    pub fn run(
        &mut self,
        input: &mut impl InputSource,
        sink: &mut impl FrameSink,
        clock: &mut impl Clock,
    ) -> Result<Outcome> {
        let mut deadline = clock.now() + self.tick_len;

        while self.wings.alive {
            let state = input.poll()?;
            if state.quit {
                log::info!("quit after {} ticks", self.ticks);
                return Ok(Outcome::Quit);
            }

            let report = self.step(&state.intents);
            if !report.wings_hits.is_empty() {
                log::debug!("tick {}: {:?}", self.ticks, report);
            }

            sink.present(&self.frame())?;
            compute::advance_thruster(&mut self.wings);

            let now = clock.now();
            let wait = time_left(deadline, now);
            if wait.is_zero() {
                log::debug!("tick {} overran by {:?}", self.ticks, now - deadline);
            }
            clock.sleep(wait);
            deadline += self.tick_len;
        }

        log::info!("game over after {} ticks", self.ticks);
        Ok(Outcome::GameOver)
    }
}
