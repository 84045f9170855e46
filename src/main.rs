mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};

use wings::config::GameConfig;
use wings::entities::Intents;
use wings::error::{GameError, Result};
use wings::game_loop::{InputSource, InputState, Outcome, Session, SystemClock};
use wings::sprites::BuiltinSprites;

use display::TerminalRenderer;

/// A key counts as held if its last press/repeat event arrived within this
/// many ticks.  Covers terminals that never send key-release events: OS key
/// repeat refreshes a held key well inside the window.
const HOLD_WINDOW: u64 = 4;

/// How long the game-over screen waits for a key before exiting anyway.
const GAME_OVER_LINGER: Duration = Duration::from_secs(10);

// ── Input ─────────────────────────────────────────────────────────────────────

/// Intents from terminal key events, fed by a reader thread.
struct TerminalInput {
    rx: mpsc::Receiver<Event>,
    /// Each held key → the tick it was last seen on.
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
}

impl TerminalInput {
    fn new(rx: mpsc::Receiver<Event>) -> Self {
        Self { rx, key_frame: HashMap::new(), frame: 0 }
    }

    fn is_held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|key| {
            self.key_frame
                .get(key)
                .is_some_and(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
        })
    }
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> Result<InputState> {
        self.frame += 1;
        let mut quit = false;

        loop {
            match self.rx.try_recv() {
                Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) => match kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        quit |= is_quit(code, modifiers);
                        self.key_frame.insert(code, self.frame);
                    }
                    KeyEventKind::Release => {
                        self.key_frame.remove(&code);
                    }
                },
                Ok(_) => {}
                Err(mpsc::TryRecvError::Empty) => break,
                // Reader thread gone: the terminal closed under us.
                Err(mpsc::TryRecvError::Disconnected) => {
                    quit = true;
                    break;
                }
            }
        }

        let intents = Intents {
            up: self.is_held(&[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')]),
            down: self.is_held(&[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')]),
            left: self.is_held(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]),
            right: self.is_held(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]),
            fire: self.is_held(&[KeyCode::Char(' ')]),
        };
        Ok(InputState { intents, quit })
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal belongs to the game, so log lines go to a file.  Runs
/// before raw mode, so a file that cannot be created is reported on stderr.
fn init_logging(path: &Path) {
    let file = match File::create(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("wings: logging disabled, cannot create {}: {e}", path.display());
            return;
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    if std::env::args().skip(1).any(|a| a == "--version" || a == "-V") {
        println!("wings {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let (config, source) = GameConfig::load()?;
    init_logging(&config.log_path(source.as_deref()));
    log::info!("wings {} starting", env!("CARGO_PKG_VERSION"));

    // All sprites are resolved before the terminal is touched.
    let mut session = Session::new(&config, &BuiltinSprites::new(config.sprites.clone()))?;

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode().map_err(GameError::platform)?;
    let setup = out
        .execute(terminal::EnterAlternateScreen)
        .and_then(|o| o.execute(cursor::Hide))
        .map(|_| ())
        .map_err(GameError::platform);

    // Key-release events where the terminal supports them; others fall
    // back to the hold window.
    let keyboard_enhanced = setup.is_ok()
        && out
            .execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
            .is_ok();

    let result = setup.and_then(|_| play(&mut out, &mut session));

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("{e}");
    }
    result
}

fn play<W: Write>(out: &mut W, session: &mut Session) -> Result<()> {
    // Blocking reads live on their own thread so the loop never stalls.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let mut input = TerminalInput::new(rx);
    let mut renderer = TerminalRenderer::new(&mut *out);
    let outcome = session.run(&mut input, &mut renderer, &mut SystemClock::new())?;

    if outcome == Outcome::GameOver {
        display::draw_game_over(renderer.writer(), session.ticks)?;
        // Drop keys still buffered from play, then wait for a fresh one.
        while input.rx.try_recv().is_ok() {}
        let _ = input.rx.recv_timeout(GAME_OVER_LINGER);
    }
    Ok(())
}
