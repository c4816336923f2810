use std::{
    io::{self, Stdout},
    time::Duration,
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use blockfall::{
    grid::EMPTY,
    session::{Input, InputSource, Renderer},
    snapshot::{CellView, GameSnapshot, PieceSnapshot},
    Command, GameStatus, PieceType,
};

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const GHOST_CHAR: &str = "░░";
const EMPTY_CHAR: &str = "  ";
const LOCKED_COLOR: Color = Color::Gray;

fn piece_color(kind: PieceType) -> Color {
    kind.color().parse().unwrap_or(Color::White)
}

// ============================================================================
// Keyboard input
// ============================================================================

pub struct KeyboardInput;

impl InputSource for KeyboardInput {
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<Input>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(map_key(key.code)),
            _ => Ok(None),
        }
    }
}

fn map_key(code: KeyCode) -> Option<Input> {
    let input = match code {
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h' | 'H') => Input::Command(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l' | 'L') => {
            Input::Command(Command::MoveRight)
        }
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j' | 'J') => Input::Command(Command::MoveDown),
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k' | 'K') => Input::Command(Command::Rotate),
        KeyCode::Char(' ') | KeyCode::Enter => Input::Command(Command::Drop),
        KeyCode::Char('n' | 'N') => Input::Command(Command::Start),
        KeyCode::Char('r' | 'R') => Input::Command(Command::Reset),
        KeyCode::Char('p' | 'P') | KeyCode::Esc => Input::TogglePause,
        KeyCode::Char('q' | 'Q') => Input::Quit,
        _ => return None,
    };
    Some(input)
}

// ============================================================================
// Terminal renderer
// ============================================================================

pub struct TerminalRenderer {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalRenderer {
    /// Switches the terminal to raw mode on the alternate screen.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        io::stdout().execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self { terminal })
    }

    pub fn leave(mut self) -> io::Result<()> {
        disable_raw_mode()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        self.terminal.show_cursor()
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, snapshot: &GameSnapshot) -> io::Result<()> {
        self.terminal.draw(|frame| draw(frame, snapshot))?;
        Ok(())
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn draw(frame: &mut Frame, snapshot: &GameSnapshot) {
    let area = frame.size();
    draw_game(frame, snapshot, area);

    match snapshot.status {
        GameStatus::Playing => {}
        GameStatus::Idle => draw_popup(
            frame,
            area,
            " Blockfall ",
            vec![
                Line::from(""),
                Line::from(Span::styled("READY", Style::default().fg(Color::Cyan))),
                Line::from(""),
                hint("Press N to start"),
                hint("Press Q to quit"),
            ],
        ),
        GameStatus::Paused => draw_popup(
            frame,
            area,
            " Paused ",
            vec![
                Line::from(""),
                Line::from(Span::styled("PAUSED", Style::default().fg(Color::Yellow))),
                Line::from(""),
                hint("Press P to continue"),
                hint("Press Q to quit"),
            ],
        ),
        GameStatus::GameOver => draw_popup(
            frame,
            area,
            " Game Over ",
            vec![
                Line::from(""),
                Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
                Line::from(""),
                Line::from(format!("Score: {}", snapshot.score)),
                Line::from(format!("Lines: {}", snapshot.lines_cleared)),
                Line::from(format!("Level: {}", snapshot.level)),
                Line::from(""),
                hint("N: new game  Q: quit"),
            ],
        ),
    }
}

fn draw_game(frame: &mut Frame, snapshot: &GameSnapshot, area: Rect) {
    let grid_display_width = snapshot.grid_width as u16 * CELL_WIDTH + 2;
    let grid_display_height = snapshot.grid_height as u16 + 2;
    let side_width = 14;
    let total_width = grid_display_width + side_width + 2;
    let total_height = grid_display_height + 2;

    let main_area = centered_rect(total_width, total_height, area);
    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height.min(main_area.height)),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(side_width),
    ])
    .split(vertical[0]);

    let side = Layout::vertical([Constraint::Length(6), Constraint::Fill(1)]).split(horizontal[1]);

    draw_board(frame, snapshot, horizontal[0]);
    draw_next(frame, snapshot.next_piece.as_ref(), side[0]);
    draw_info(frame, snapshot, side[1]);

    let controls = Paragraph::new(Line::from(
        "←→: Move  ↓: Soft drop  ↑: Rotate  Space: Drop  P: Pause  R: Reset",
    ))
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(controls, vertical[1]);
}

fn draw_board(frame: &mut Frame, snapshot: &GameSnapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Blockfall ")
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = snapshot
        .board_view()
        .into_iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .into_iter()
                .map(|cell| match cell {
                    CellView::Empty => Span::raw(EMPTY_CHAR),
                    CellView::Locked => {
                        Span::styled(BLOCK_CHAR, Style::default().fg(LOCKED_COLOR))
                    }
                    CellView::Ghost(kind) => Span::styled(
                        GHOST_CHAR,
                        Style::default()
                            .fg(piece_color(kind))
                            .add_modifier(Modifier::DIM),
                    ),
                    CellView::Active(kind) => {
                        Span::styled(BLOCK_CHAR, Style::default().fg(piece_color(kind)))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_next(frame: &mut Frame, piece: Option<&PieceSnapshot>, area: Rect) {
    let title = match piece {
        Some(piece) => format!(" Next: {} ", piece.kind.letter()),
        None => " Next ".to_owned(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(piece) = piece else {
        return;
    };
    let style = Style::default().fg(piece_color(piece.kind));
    let lines: Vec<Line> = piece
        .shape
        .iter()
        .filter(|row| row.iter().any(|&cell| cell != EMPTY))
        .map(|row| {
            let mut spans = vec![Span::raw(" ")];
            spans.extend(row.iter().map(|&cell| {
                if cell == EMPTY {
                    Span::raw(EMPTY_CHAR)
                } else {
                    Span::styled(BLOCK_CHAR, style)
                }
            }));
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_info(frame: &mut Frame, snapshot: &GameSnapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(snapshot.score.to_string()),
        Line::from(""),
        Line::from(Span::styled("Lines", Style::default().fg(Color::Cyan))),
        Line::from(snapshot.lines_cleared.to_string()),
        Line::from(""),
        Line::from(Span::styled("Level", Style::default().fg(Color::Green))),
        Line::from(snapshot.level.to_string()),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn draw_popup(frame: &mut Frame, area: Rect, title: &str, text: Vec<Line>) {
    let height = text.len() as u16 + 2;
    let popup_area = centered_rect(24, height, area);
    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );
    frame.render_widget(Clear, popup_area);
    frame.render_widget(paragraph, popup_area);
}

fn hint(text: &str) -> Line<'_> {
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}
