mod display;

use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};

use quick_draw::compute::{init_state, tick, GameState};
use quick_draw::config::GameConfig;
use quick_draw::context::{SimContext, SimEvent};
use quick_draw::entities::{GameStatus, InputEvent};
use quick_draw::save::{load_game, save_game, PlainText};
use quick_draw::upgrade::StatKey;

use display::Viewport;

const LOG_FILE: &str = "quick_draw.log";

/// Longest step handed to the simulation; a stalled terminal should not
/// teleport every enemy onto the package.
const MAX_FRAME_DT: f32 = 0.25;

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    NewGame,
    LoadGame,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    notice: &str,
) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  QUICK!  DRAW!  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(title))?;

    let options: &[(&str, &str, Color, &str)] = &[
        ("N", "New Game ", Color::Green, "Defend a fresh package"),
        ("L", "Load Game", Color::Cyan, "Resume the last saved session"),
        ("Q", "Quit     ", Color::Red, "Leave the saloon"),
    ];

    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(3) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(18), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(label))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" — {}", desc)))?;
    }

    if !notice.is_empty() {
        out.queue(cursor::MoveTo(
            cx.saturating_sub(notice.chars().count() as u16 / 2),
            cy + 2,
        ))?;
        out.queue(style::SetForegroundColor(Color::Red))?;
        out.queue(Print(notice))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(18), cy + 4))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Click enemies to shoot them, click + to heal the package."))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, modifiers, .. })) => match code {
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(MenuResult::Quit)
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Enter => {
                    return Ok(MenuResult::NewGame)
                }
                KeyCode::Char('l') | KeyCode::Char('L') => return Ok(MenuResult::LoadGame),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit)
                }
                _ => {}
            },
            Ok(_) => {}
            Err(_) => return Ok(MenuResult::Quit),
        }
    }
}

// ── Input normalization ──────────────────────────────────────────────────────

/// Turn one terminal event into the core's input vocabulary.  Ctrl-C is
/// treated like Q: the session is saved and play returns to the menu.
fn normalize(event: Event, view: &Viewport) -> Option<InputEvent> {
    match event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => Some(InputEvent::PointerDown(view.to_world(column, row))),
        Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers,
            ..
        }) => match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(InputEvent::Quit),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(InputEvent::Reload),
            KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('P') => Some(InputEvent::Pause),
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(InputEvent::Quit),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                StatKey::ALL.get(index).map(|&stat| InputEvent::Purchase(stat))
            }
            _ => None,
        },
        _ => None,
    }
}

/// One-line summary of the most interesting event this frame.
fn describe(event: &SimEvent) -> Option<String> {
    match event {
        SimEvent::LevelUp { level } => Some(format!("Difficulty up! Level {}", level)),
        SimEvent::ShotFired { critical: true, damage, .. } => {
            Some(format!("Critical hit for {:.0}!", damage))
        }
        SimEvent::ReloadStarted => Some("Reloading...".into()),
        SimEvent::ReloadFinished => Some("Reload complete".into()),
        SimEvent::PickupCollected { healed } => Some(format!("Package healed +{:.0}", healed)),
        SimEvent::UpgradePurchased { stat, value, next_cost } => Some(format!(
            "{} → {} (next ${})",
            stat.label(),
            value,
            next_cost
        )),
        SimEvent::PurchaseFailed { reason, .. } => Some(reason.clone()),
        _ => None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    ctx: &mut SimContext,
    config: &GameConfig,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    let frame = Duration::from_secs_f32(config.frame_seconds());
    let (width, height) = terminal::size()?;
    let mut view = Viewport::fit(*ctx.arena(), width, height);
    let mut message = String::new();
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last_frame).as_secs_f32().min(MAX_FRAME_DT);
        last_frame = frame_start;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        let mut input = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            if let Event::Resize(w, h) = ev {
                view = Viewport::fit(*ctx.arena(), w, h);
                continue;
            }
            if state.status == GameStatus::PackageLost {
                if let Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) = ev {
                    match code {
                        KeyCode::Enter | KeyCode::Char('m') | KeyCode::Char('M') => return Ok(false),
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
                        _ => {}
                    }
                }
                continue;
            }
            if let Some(event) = normalize(ev, &view) {
                input.push(event);
            }
        }

        let before = state.status;
        *state = tick(state, &input, dt, ctx);
        for event in ctx.drain_events() {
            if let Some(text) = describe(&event) {
                message = text;
            }
        }

        match state.status {
            GameStatus::Quit => {
                persist(state, config);
                return Ok(false);
            }
            GameStatus::Paused if before == GameStatus::Playing => persist(state, config),
            _ => {}
        }

        display::render(out, state, &view, &message)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            std::thread::sleep(frame - elapsed);
        }
    }
}

fn persist(state: &GameState, config: &GameConfig) {
    if let Err(e) = save_game(&config.save_path, state, &PlainText) {
        log::warn!("Failed to save game: {}", e);
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    // Logging to stderr would scribble over the alternate screen.
    if let Ok(file) = std::fs::File::create(LOG_FILE) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
}

fn main() -> std::io::Result<()> {
    init_logging();
    let config = GameConfig::load_or_init();
    log::info!("Starting Quick Draw ({} fps)", config.frame_rate);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(EnableMouseCapture)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &config);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> std::io::Result<()> {
    let arena = config.arena();
    let mut notice = String::new();

    loop {
        let mut state = match show_menu(out, rx, &notice)? {
            MenuResult::Quit => break,
            MenuResult::NewGame => init_state(config, &arena),
            MenuResult::LoadGame => match load_game(&config.save_path, &PlainText, config, &arena) {
                Ok(state) => state,
                Err(e) => {
                    // Fall back to a fresh session
                    log::warn!("Load failed, starting new game: {}", e);
                    notice = format!("Load failed ({}), started a new game", e);
                    init_state(config, &arena)
                }
            },
        };

        let mut ctx = match config.seed {
            Some(seed) => SimContext::new(arena, seed),
            None => SimContext::from_entropy(arena),
        };
        let quit = game_loop(out, &mut state, &mut ctx, config, rx)?;
        if quit {
            break;
        }
        if state.status != GameStatus::PackageLost {
            notice.clear();
        }
    }
    Ok(())
}
