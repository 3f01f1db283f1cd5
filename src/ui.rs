//! Terminal UI rendering with ratatui
//!
//! Everything drawn here comes from a [`Snapshot`]; rendering never touches
//! the live session.

use crate::board::{Cell, BOARD_HEIGHT, BOARD_WIDTH};
use crate::game::{GameState, Snapshot};
use crate::piece::Piece;
use crate::settings::Settings;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Total width needed: board(22) + side panel(18) = 40
const GAME_WIDTH: u16 = 40;
/// Board rows plus borders
const GAME_HEIGHT: u16 = BOARD_HEIGHT as u16 + 2;

/// Host-side numbers shown next to the board
#[derive(Debug, Clone, Copy, Default)]
pub struct HostStatus {
    pub best_score: u64,
    pub coins: u64,
    /// Coins credited for the game that just ended
    pub last_reward: Option<u64>,
}

/// Render the entire game UI
pub fn render_game(frame: &mut Frame, snapshot: &Snapshot, settings: &Settings, status: &HostStatus) {
    let area = frame.area();
    let (block_char, empty_char) = settings.visual.block_chars();

    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    // Create main layout: board | next + stats
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BOARD_WIDTH as u16 * 2 + 2),
            Constraint::Length(18),
        ])
        .split(game_area);

    render_board(frame, main_layout[0], snapshot, block_char, empty_char);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Next piece
            Constraint::Min(8),    // Stats
        ])
        .split(main_layout[1]);

    if settings.visual.show_next {
        render_next(frame, right_layout[0], snapshot.next_piece.as_ref(), block_char);
    }
    render_stats(frame, right_layout[1], snapshot, status);

    // Overlays
    match snapshot.state {
        GameState::NotStarted => render_overlay(frame, area, "FENIX TETRIS", "Press Enter to start"),
        GameState::Paused => {
            let subtitle = format!("Press {} to resume", key_label(&settings.keys.pause));
            render_overlay(frame, area, "PAUSED", &subtitle);
        }
        GameState::GameOver => {
            let restart = key_label(&settings.keys.restart);
            let subtitle = match status.last_reward {
                Some(coins) if coins > 0 => format!("+{} coins | {} to restart", coins, restart),
                _ => format!("{} to restart | {} to quit", restart, key_label(&settings.keys.quit)),
            };
            render_overlay(frame, area, "GAME OVER", &subtitle);
        }
        GameState::Running => {}
    }
}

/// Display name of the first key bound to an action
fn key_label(keys: &[String]) -> String {
    match keys.first() {
        Some(key) if key.chars().count() == 1 => key.to_uppercase(),
        Some(key) => key.clone(),
        None => "?".to_string(),
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the piece on deck
fn render_next(frame: &mut Frame, area: Rect, next: Option<&Piece>, block_char: &str) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(piece) = next else {
        return;
    };

    let lines: Vec<Line> = (0..piece.shape.height())
        .map(|y| {
            let spans: Vec<Span> = (0..piece.shape.width())
                .map(|x| {
                    if piece.shape.is_set(x, y) {
                        Span::styled(block_char, Style::default().fg(piece.color))
                    } else {
                        Span::raw("  ")
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

/// Render the game board
fn render_board(frame: &mut Frame, area: Rect, snapshot: &Snapshot, block_char: &str, empty_char: &str) {
    let block = Block::default()
        .title(" TETRIS ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = snapshot
        .cells
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Filled(color) => Span::styled(block_char, Style::default().fg(*color)),
                    Cell::Empty => Span::styled(empty_char, Style::default().fg(Color::DarkGray)),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render stats panel
fn render_stats(frame: &mut Frame, area: Rect, snapshot: &Snapshot, status: &HostStatus) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    let mut stat = |label: &'static str, value: String, style: Style| {
        if !lines.is_empty() {
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(Span::styled(label, Style::default().fg(Color::Gray))));
        lines.push(Line::from(Span::styled(value, style)));
    };

    stat("SCORE", snapshot.score.to_string(), Style::default().fg(Color::Yellow).bold());
    stat("LEVEL", snapshot.level.to_string(), Style::default().fg(Color::Cyan));
    stat("LINES", snapshot.lines.to_string(), Style::default().fg(Color::Green));
    stat(
        "BEST",
        status.best_score.max(snapshot.score).to_string(),
        Style::default().fg(Color::Magenta),
    );
    stat("COINS", status.coins.to_string(), Style::default().fg(Color::Yellow));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render an overlay (for start/pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = 30u16;
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle.to_string(), Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(snapshot: &Snapshot, status: &HostStatus) -> String {
        draw_with(snapshot, &Settings::default(), status)
    }

    fn draw_with(snapshot: &Snapshot, settings: &Settings, status: &HostStatus) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 26)).expect("terminal");
        terminal
            .draw(|frame| render_game(frame, snapshot, settings, status))
            .expect("draw");
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_not_started_shows_prompt() {
        let game = Game::with_seed(1);
        let screen = draw(&game.snapshot(), &HostStatus::default());
        assert!(screen.contains("Press Enter to start"));
    }

    #[test]
    fn test_running_shows_stats() {
        let mut game = Game::with_seed(1);
        game.start();
        game.score.points = 1234;
        let status = HostStatus {
            best_score: 5000,
            coins: 42,
            last_reward: None,
        };
        let screen = draw(&game.snapshot(), &status);
        assert!(screen.contains("SCORE"));
        assert!(screen.contains("1234"));
        assert!(screen.contains("5000"));
        assert!(screen.contains("42"));
        assert!(!screen.contains("PAUSED"));
    }

    #[test]
    fn test_game_over_shows_reward() {
        let mut game = Game::with_seed(1);
        game.state = GameState::GameOver;
        let status = HostStatus {
            last_reward: Some(7),
            ..HostStatus::default()
        };
        let screen = draw(&game.snapshot(), &status);
        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("+7 coins"));
    }

    #[test]
    fn test_overlays_name_bound_keys() {
        let mut settings = Settings::default();
        settings.keys.pause = vec!["Esc".to_string(), "p".to_string()];
        settings.keys.restart = vec!["n".to_string()];
        settings.keys.quit = vec!["x".to_string()];

        let mut game = Game::with_seed(1);
        game.start();
        game.toggle_pause();
        let screen = draw_with(&game.snapshot(), &settings, &HostStatus::default());
        assert!(screen.contains("Press Esc to resume"));

        game.state = GameState::GameOver;
        let screen = draw_with(&game.snapshot(), &settings, &HostStatus::default());
        assert!(screen.contains("N to restart | X to quit"));

        let status = HostStatus {
            last_reward: Some(3),
            ..HostStatus::default()
        };
        let screen = draw_with(&game.snapshot(), &settings, &status);
        assert!(screen.contains("+3 coins | N to restart"));
    }

    #[test]
    fn test_key_label() {
        assert_eq!(key_label(&["p".to_string()]), "P");
        assert_eq!(key_label(&["Space".to_string(), "w".to_string()]), "Space");
        assert_eq!(key_label(&[]), "?");
    }
}
