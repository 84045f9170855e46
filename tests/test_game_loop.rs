use std::cell::{Cell, RefCell};
use std::time::Duration;

use wings::config::GameConfig;
use wings::entities::*;
use wings::error::{GameError, Result};
use wings::game_loop::*;
use wings::sprites::{BuiltinSprites, Sprite, SpriteLoader, SpriteSet};
use wings::vector::Rect;

use rand::rngs::StdRng;
use rand::SeedableRng;

const TICK: Duration = Duration::from_millis(40);

fn session() -> Session {
    Session::with_dice(
        Rect::new(0, 0, 1024, 768),
        SpriteSet::load(&BuiltinSprites::default()).unwrap(),
        Some(64),
        3,
        TICK,
        StdRng::seed_from_u64(42),
    )
}

/// Session with no meteors, so nothing can hurt the ship.
fn quiet_session() -> Session {
    let mut s = session();
    s.scene.meteors = Vec::new().into_boxed_slice();
    s
}

// ── Fakes ─────────────────────────────────────────────────────────────────────

/// Replays scripted inputs, then asks to quit.
struct Script {
    inputs: Vec<InputState>,
    polls: usize,
}

impl Script {
    fn idle_then_quit(ticks: usize) -> Self {
        Self {
            inputs: vec![InputState::default(); ticks],
            polls: 0,
        }
    }
}

impl InputSource for Script {
    fn poll(&mut self) -> Result<InputState> {
        let state = self
            .inputs
            .get(self.polls)
            .copied()
            .unwrap_or(InputState { quit: true, ..InputState::default() });
        self.polls += 1;
        Ok(state)
    }
}

/// Records what each presented frame looked like.
#[derive(Default)]
struct Recorder {
    ticks: Vec<u64>,
    thruster: Vec<usize>,
    lasers: Vec<usize>,
}

impl FrameSink for Recorder {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.ticks.push(frame.tick);
        self.thruster.push(frame.wings.thruster_frame);
        self.lasers.push(frame.scene.lasers.len());
        Ok(())
    }
}

/// Manual clock.  Every `now()` call costs `work`, standing in for the
/// time a tick spends computing; `sleep` just advances time.
struct FakeClock {
    t: Cell<Duration>,
    work: Duration,
    sleeps: RefCell<Vec<Duration>>,
}

impl FakeClock {
    fn with_work(work: Duration) -> Self {
        Self {
            t: Cell::new(Duration::ZERO),
            work,
            sleeps: RefCell::new(Vec::new()),
        }
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        let t = self.t.get();
        self.t.set(t + self.work);
        t
    }

    fn sleep(&mut self, d: Duration) {
        self.sleeps.borrow_mut().push(d);
        self.t.set(self.t.get() + d);
    }
}

// ── Pacing ────────────────────────────────────────────────────────────────────

#[test]
fn time_left_never_goes_negative() {
    let ms = Duration::from_millis;
    assert_eq!(time_left(ms(80), ms(50)), ms(30));
    assert_eq!(time_left(ms(80), ms(80)), Duration::ZERO);
    assert_eq!(time_left(ms(80), ms(120)), Duration::ZERO);
}

#[test]
fn idle_ticks_sleep_a_full_tick() {
    let mut s = quiet_session();
    let mut clock = FakeClock::with_work(Duration::ZERO);
    let outcome = s
        .run(&mut Script::idle_then_quit(4), &mut Recorder::default(), &mut clock)
        .unwrap();

    assert_eq!(outcome, Outcome::Quit);
    assert_eq!(clock.sleeps.into_inner(), vec![TICK; 4]);
}

#[test]
fn deadlines_advance_without_drift() {
    let mut s = quiet_session();
    let mut clock = FakeClock::with_work(Duration::from_millis(10));
    s.run(&mut Script::idle_then_quit(3), &mut Recorder::default(), &mut clock)
        .unwrap();

    // 10 ms of work per tick leaves 30 ms to sleep, tick after tick.
    assert_eq!(clock.sleeps.into_inner(), vec![Duration::from_millis(30); 3]);
}

#[test]
fn overrun_ticks_do_not_catch_up() {
    let mut s = quiet_session();
    let mut input = Script::idle_then_quit(5);
    let mut clock = FakeClock::with_work(Duration::from_millis(50));
    s.run(&mut input, &mut Recorder::default(), &mut clock).unwrap();

    assert_eq!(clock.sleeps.into_inner(), vec![Duration::ZERO; 5]);
    // one simulation step per poll, no extra catch-up steps
    assert_eq!(s.ticks, 5);
    assert_eq!(input.polls, 6);
}

// ── Termination ───────────────────────────────────────────────────────────────

#[test]
fn quit_leaves_player_alive() {
    let mut s = session();
    let mut rec = Recorder::default();
    let outcome = s
        .run(&mut Script::idle_then_quit(0), &mut rec, &mut FakeClock::with_work(Duration::ZERO))
        .unwrap();

    assert_eq!(outcome, Outcome::Quit);
    assert!(s.wings.alive);
    assert_eq!(s.ticks, 0);
    assert!(rec.ticks.is_empty());
}

#[test]
fn losing_the_last_life_ends_the_run() {
    let mut s = quiet_session();
    s.wings.lives = 0;
    s.wings.health = 10;
    let bounds = s.wings.bounds();
    s.scene.meteors = vec![Meteor {
        rect: bounds,
        vx: 0,
        vy: 0,
        visible: true,
        sprite: 0,
    }]
    .into_boxed_slice();

    let mut rec = Recorder::default();
    let outcome = s
        .run(&mut Script::idle_then_quit(100), &mut rec, &mut FakeClock::with_work(Duration::ZERO))
        .unwrap();

    assert_eq!(outcome, Outcome::GameOver);
    assert!(!s.wings.alive);
    assert_eq!(s.wings.health, 0);
    assert_eq!(rec.ticks, vec![1]);
}

#[test]
fn spare_life_keeps_the_loop_going() {
    let mut s = quiet_session();
    s.wings.lives = 1;
    s.wings.health = 10;
    let bounds = s.wings.bounds();
    s.scene.meteors = vec![Meteor {
        rect: bounds,
        vx: 0,
        vy: 0,
        visible: true,
        sprite: 0,
    }]
    .into_boxed_slice();

    let outcome = s
        .run(
            &mut Script::idle_then_quit(3),
            &mut Recorder::default(),
            &mut FakeClock::with_work(Duration::ZERO),
        )
        .unwrap();

    assert_eq!(outcome, Outcome::Quit);
    assert!(s.wings.alive);
    assert_eq!(s.wings.lives, 0);
    assert_eq!(s.wings.health, 100);
}

// ── Frame hand-off ────────────────────────────────────────────────────────────

#[test]
fn every_tick_is_presented_in_order() {
    let mut s = quiet_session();
    let fire = InputState {
        intents: Intents { fire: true, ..Intents::default() },
        quit: false,
    };
    let mut input = Script { inputs: vec![fire; 10], polls: 0 };
    let mut rec = Recorder::default();
    s.run(&mut input, &mut rec, &mut FakeClock::with_work(Duration::ZERO))
        .unwrap();

    assert_eq!(rec.ticks, (1..=10).collect::<Vec<u64>>());
    assert_eq!(rec.lasers, (1..=10).collect::<Vec<usize>>());
    assert_eq!(rec.thruster, vec![0, 1, 2, 3, 4, 5, 6, 7, 0, 1]);
}

#[test]
fn sink_errors_stop_the_run() {
    struct Broken;
    impl FrameSink for Broken {
        fn present(&mut self, _: &Frame<'_>) -> Result<()> {
            Err(GameError::Io(std::io::Error::new(std::io::ErrorKind::Other, "gone")))
        }
    }

    let mut s = quiet_session();
    let result = s.run(
        &mut Script::idle_then_quit(5),
        &mut Broken,
        &mut FakeClock::with_work(Duration::ZERO),
    );
    assert!(matches!(result, Err(GameError::Io(_))));
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn session_from_config() {
    let config = GameConfig {
        seed: Some(3),
        field_width: 512,
        field_height: 384,
        lives: 5,
        ..GameConfig::default()
    };
    let s = Session::new(&config, &BuiltinSprites::default()).unwrap();
    assert_eq!(s.scene.meteors.len(), 4);
    assert_eq!(s.wings.lives, 5);
    assert_eq!(s.tick_len, TICK);
    assert_eq!(s.scene.laser_cap, Some(64));

    let again = Session::new(&config, &BuiltinSprites::default()).unwrap();
    assert_eq!(s.scene.meteors, again.scene.meteors);
}

#[test]
fn missing_sprite_aborts_session() {
    struct Empty;
    impl SpriteLoader for Empty {
        fn load(&self, name: &str) -> Result<Sprite> {
            Err(GameError::ResourceLoadFailure { name: name.to_string() })
        }
    }

    let result = Session::new(&GameConfig::default(), &Empty);
    assert!(matches!(result, Err(GameError::ResourceLoadFailure { .. })));
}
