//! Fenix Tetris - the Campus Fenix falling-block mini-game
//!
//! Terminal host around the engine: sets up logging and the terminal, feeds
//! key presses and frame ticks into the session, and credits the profile
//! when a game ends.

mod board;
mod game;
mod generator;
mod input;
mod piece;
mod placement;
mod score;
mod settings;
mod tetromino;
mod ui;

use anyhow::Context;
use crossterm::{
    event::{self, DisableFocusChange, EnableFocusChange, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use game::Game;
use input::{Command, InputHandler};
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::Settings;
use std::{
    io::{self, stdout},
    sync::mpsc::{self, Receiver},
    time::Duration,
};
use ui::HostStatus;

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Notifications the session pushes back to the host
#[derive(Debug, Clone, Copy)]
enum HostEvent {
    ScoreChanged(u64),
    Finished(u64),
}

/// Get the fenix-tetris temp directory, creating it if needed
fn log_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("fenix-tetris");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Warning: could not create log dir {}: {}", dir.display(), e);
    }
    dir
}

fn main() -> anyhow::Result<()> {
    let session_id: u32 = rand::random();

    let dir = log_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Setup tracing to log file
    let file_appender = tracing_appender::rolling::never(&dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fenix_tetris=debug".parse().context("invalid log directive")?),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "fenix-tetris starting up, session={:08x}, log={}",
        session_id,
        dir.join(&log_file).display()
    );

    let mut settings = Settings::load();

    let result = play(&mut settings);

    if result.is_ok() {
        let profile = &settings.profile;
        println!("\nThanks for playing Fenix Tetris!");
        println!("Best Score: {}", profile.best_score);
        println!("Coins: {} | Games: {}", profile.coins, profile.games_played);
    }

    result
}

/// Restores the terminal when dropped, including on early returns
struct TerminalGuard {
    restore: fn() -> io::Result<()>,
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // The error that ended the session takes precedence
        if let Err(e) = (self.restore)() {
            tracing::warn!("failed to restore terminal: {}", e);
        }
    }
}

fn restore_terminal() -> io::Result<()> {
    let raw = disable_raw_mode();
    execute!(stdout(), LeaveAlternateScreen, DisableFocusChange)?;
    raw
}

/// Run the game in the alternate screen; the terminal is restored before this returns
fn play(settings: &mut Settings) -> anyhow::Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let _guard = TerminalGuard {
        restore: restore_terminal,
    };
    execute!(stdout(), EnterAlternateScreen, EnableFocusChange)
        .context("failed to enter alternate screen")?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout())).context("failed to create terminal")?;
    terminal.clear().context("failed to clear terminal")?;
    run_app(&mut terminal, settings)
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &mut Settings,
) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel();
    let score_tx = tx.clone();

    let mut game = Game::new()
        .on_score_change(move |score| {
            // The receiver lives as long as the loop below
            let _ = score_tx.send(HostEvent::ScoreChanged(score));
        })
        .on_game_over(move |score| {
            let _ = tx.send(HostEvent::Finished(score));
        });
    let input = InputHandler::from_settings(settings);

    let mut status = HostStatus {
        best_score: settings.profile.best_score,
        coins: settings.profile.coins,
        last_reward: None,
    };

    loop {
        let snapshot = game.snapshot();
        terminal
            .draw(|frame| ui::render_game(frame, &snapshot, settings, &status))
            .context("failed to draw frame")?;

        if event::poll(FRAME_DURATION).context("failed to poll events")? {
            match event::read().context("failed to read event")? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match input.key_down(key) {
                        Some(Command::Game(action)) => game.process_action(action),
                        Some(Command::Start) => game.start(),
                        Some(Command::Restart) => {
                            status.last_reward = None;
                            game.restart();
                        }
                        Some(Command::Quit) => return Ok(()),
                        None => {}
                    }
                }
                // Pause when the terminal loses focus
                Event::FocusLost if game.is_running() => game.toggle_pause(),
                _ => {}
            }
        }

        game.update();
        drain_events(&rx, &game, settings, &mut status);
    }
}

/// Apply everything the session reported since the last frame
fn drain_events(rx: &Receiver<HostEvent>, game: &Game, settings: &mut Settings, status: &mut HostStatus) {
    for event in rx.try_iter() {
        match event {
            HostEvent::ScoreChanged(score) => {
                status.best_score = status.best_score.max(score);
            }
            HostEvent::Finished(score) => {
                let coins = settings
                    .profile
                    .record_game(score, game.score.lines, game.score.level);
                status.last_reward = Some(coins);
                status.best_score = settings.profile.best_score;
                status.coins = settings.profile.coins;

                if score > 0 {
                    if let Err(e) = settings.save() {
                        tracing::warn!("could not save profile: {}", e);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static RESTORES: AtomicUsize = AtomicUsize::new(0);

    fn failing_restore() -> io::Result<()> {
        RESTORES.fetch_add(1, Ordering::SeqCst);
        Err(io::Error::other("terminal gone"))
    }

    fn session(fail_setup: bool) -> anyhow::Result<()> {
        let _guard = TerminalGuard {
            restore: failing_restore,
        };
        if fail_setup {
            Err::<(), _>(io::Error::other("no alternate screen")).context("failed to enter alternate screen")?;
        }
        Ok(())
    }

    #[test]
    fn test_guard_restores_and_keeps_first_error() {
        let before = RESTORES.load(Ordering::SeqCst);

        let err = session(true).expect_err("setup failure");
        assert_eq!(err.to_string(), "failed to enter alternate screen");
        assert_eq!(RESTORES.load(Ordering::SeqCst), before + 1);

        // A failed restore never turns a clean exit into an error
        assert!(session(false).is_ok());
        assert_eq!(RESTORES.load(Ordering::SeqCst), before + 2);
    }
}
