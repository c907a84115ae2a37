use super::board_widget::board_lines;
use crate::game::{Outcome, Phase, Status};
use crate::play::SessionSnapshot;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Everything the game screen shows for one frame.
pub struct GameView<'a> {
    pub snapshot: &'a SessionSnapshot,
    pub selected_column: usize,
    pub message: Option<&'a str>,
    pub popup: Option<&'a str>,
    pub oracle_ready: bool,
    pub thinking: bool,
}

pub fn render(frame: &mut Frame, view: &GameView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(12),   // Board
            Constraint::Length(3), // Message
            Constraint::Length(4), // Controls
        ])
        .split(frame.area());

    render_header(frame, view, chunks[0]);
    render_board(frame, view, chunks[1]);
    render_message(frame, view.message, chunks[2]);
    render_controls(frame, chunks[3]);

    if let Some(text) = view.popup {
        render_popup(frame, text, chunks[1]);
    }
}

fn turn_line(view: &GameView) -> (String, Color) {
    let snapshot = view.snapshot;
    let bot = snapshot.bot.display_name();

    if !view.oracle_ready {
        return ("Waiting for the oracle...".to_string(), Color::DarkGray);
    }
    if snapshot.halted {
        return ("Game halted".to_string(), Color::Magenta);
    }
    match snapshot.status {
        Status::Ended(Outcome::HumanWin) => ("You won".to_string(), Color::Red),
        Status::Ended(Outcome::AutomatedWin) => (format!("{bot} won"), Color::Blue),
        Status::Ended(Outcome::Draw) => ("Draw".to_string(), Color::Gray),
        Status::Active(Phase::WaitingForHuman) if !view.thinking => {
            ("Your turn".to_string(), Color::Red)
        }
        Status::Active(_) => (format!("{bot} is thinking..."), Color::Blue),
    }
}

fn render_header(frame: &mut Frame, view: &GameView, area: Rect) {
    let snapshot = view.snapshot;
    let (turn, color) = turn_line(view);

    let line = Line::from(vec![
        Span::styled("You", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {}  ", snapshot.scores)),
        Span::styled(
            snapshot.bot.display_name(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" ({} playouts)  |  ", snapshot.bot.effort())),
        Span::styled(turn, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ]);

    let header = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Connect Four"));

    frame.render_widget(header, area);
}

fn render_board(frame: &mut Frame, view: &GameView, area: Rect) {
    let lines = board_lines(&view.snapshot.board, view.selected_column);
    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(frame: &mut Frame, message: Option<&str>, area: Rect) {
    let msg_widget = Paragraph::new(message.unwrap_or(""))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let line1 = Line::from("←/→: Move  |  Enter: Drop  |  N: New game  |  Q: Quit");
    let line2 = Line::from("B / 1-5: Choose opponent  |  T: Retry bot move");

    let controls = Paragraph::new(vec![line1, line2])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}

fn render_popup(frame: &mut Frame, text: &str, area: Rect) {
    let popup_area = centered(area, 30, 5);
    let popup = Paragraph::new(vec![
        Line::from(Span::styled(
            text.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "press any key",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Game over"));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

/// A `width` x `height` rectangle centered in `area`, clipped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, BotProfile, Player, Scores};
    use ratatui::{backend::TestBackend, Terminal};

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            generation: 0,
            board: Board::new(),
            status: Status::Active(Phase::WaitingForHuman),
            current_player: Player::Human,
            scores: Scores::default(),
            bot: BotProfile::default(),
            thinking: false,
            halted: false,
        }
    }

    fn view(snapshot: &SessionSnapshot) -> GameView<'_> {
        GameView {
            snapshot,
            selected_column: 3,
            message: None,
            popup: None,
            oracle_ready: true,
            thinking: false,
        }
    }

    fn screen(view: &GameView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render(f, view)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_turn_line_follows_status() {
        let mut snap = snapshot();
        assert_eq!(turn_line(&view(&snap)).0, "Your turn");

        let mut thinking = view(&snap);
        thinking.thinking = true;
        assert_eq!(turn_line(&thinking).0, "Arnie is thinking...");

        let mut waiting = view(&snap);
        waiting.oracle_ready = false;
        assert_eq!(turn_line(&waiting).0, "Waiting for the oracle...");

        snap.status = Status::Ended(Outcome::AutomatedWin);
        assert_eq!(turn_line(&view(&snap)).0, "Arnie won");

        snap.halted = true;
        assert_eq!(turn_line(&view(&snap)).0, "Game halted");
    }

    #[test]
    fn test_render_shows_scores_and_bot() {
        let mut snap = snapshot();
        snap.scores = Scores { human: 1.5, automated: 2.0 };
        let text = screen(&view(&snap));
        assert!(text.contains("1.5 : 2"));
        assert!(text.contains("Arnie (200 playouts)"));
    }

    #[test]
    fn test_render_draws_popup() {
        let snap = snapshot();
        let mut v = view(&snap);
        v.popup = Some("Draw!");
        let text = screen(&v);
        assert!(text.contains("Game over"));
        assert!(text.contains("Draw!"));
    }

    #[test]
    fn test_centered_clips_to_area() {
        let area = Rect::new(0, 0, 10, 4);
        assert_eq!(centered(area, 30, 5), area);
        assert_eq!(centered(Rect::new(0, 0, 40, 10), 30, 5), Rect::new(5, 2, 30, 5));
    }
}
