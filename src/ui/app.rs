use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::io;

use crate::game::{BotProfile, Phase, Status, COLS};
use crate::oracle::SharedOracle;
use crate::play::session_msg::outcome_message;
use crate::play::{SessionCommand, SessionHandle, SessionSnapshot, SessionUpdate};

/// What to do after an oracle failure, given the status it left behind.
fn retry_hint(status: Status) -> &'static str {
    match status {
        Status::Active(Phase::WaitingForAutomated) => "Press 't' to retry the bot's move.",
        Status::Active(Phase::WaitingForHuman) => "Nothing was played; drop again.",
        Status::Ended(_) => "Press 'n' for a new game.",
    }
}

pub struct App {
    session: SessionHandle,
    oracle: SharedOracle,
    snapshot: SessionSnapshot,
    selected_column: usize,
    /// A drop was sent and no snapshot has answered it yet.
    awaiting_reply: bool,
    should_quit: bool,
    message: Option<String>,
    popup: Option<String>,
}

impl App {
    pub fn new(session: SessionHandle, oracle: SharedOracle, snapshot: SessionSnapshot) -> Self {
        App {
            session,
            oracle,
            snapshot,
            selected_column: 3, // Start in middle
            awaiting_reply: false,
            should_quit: false,
            message: None,
            popup: None,
        }
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.drain_updates();
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                self.session.send(SessionCommand::Shutdown);
                break;
            }
            if self.session.is_finished() {
                return Err(io::Error::other("session worker stopped unexpectedly"));
            }

            self.handle_events()?;
        }
        Ok(())
    }

    fn drain_updates(&mut self) {
        while let Some(update) = self.session.try_recv() {
            self.apply_update(update);
        }
    }

    fn apply_update(&mut self, update: SessionUpdate) {
        // Leftovers from a game that has since been replaced.
        if update.generation() < self.snapshot.generation {
            return;
        }

        match update {
            SessionUpdate::Snapshot(snapshot) => {
                if snapshot.generation > self.snapshot.generation {
                    self.popup = None;
                }
                self.awaiting_reply = false;
                self.snapshot = snapshot;
            }
            SessionUpdate::Rejected { error, .. } => {
                self.awaiting_reply = false;
                self.message = Some(format!("Can't drop there: {error}"));
            }
            SessionUpdate::OracleFailed { error, .. } => {
                self.awaiting_reply = false;
                self.message = Some(format!("{error}. {}", retry_hint(self.snapshot.status)));
            }
            SessionUpdate::Halted { error, .. } => {
                self.awaiting_reply = false;
                self.message = Some(format!("{error}. Press 'n' for a new game."));
            }
            SessionUpdate::GameOver { outcome, bot, .. } => {
                self.popup = Some(outcome_message(outcome, &bot));
            }
        }
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        if self.popup.is_some() {
            // Any key dismisses the result popup; q still quits.
            self.popup = None;
            if !matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                return;
            }
        }

        self.message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                }
            }
            KeyCode::Right => {
                if self.selected_column < COLS - 1 {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_token();
            }
            KeyCode::Char('n') | KeyCode::Char('r') => {
                self.session.send(SessionCommand::NewGame);
                self.selected_column = 3;
                self.message = Some("New game started!".to_string());
            }
            KeyCode::Char('b') => {
                self.select_bot(self.snapshot.bot.next());
            }
            KeyCode::Char(c @ '1'..='5') => {
                let idx = (c as usize) - ('1' as usize);
                if let Some(&bot) = BotProfile::all().get(idx) {
                    self.select_bot(bot);
                }
            }
            KeyCode::Char('t') => {
                self.session.send(SessionCommand::RetryReply);
            }
            _ => {}
        }
    }

    /// Drop a token in the selected column. Ignored while it is not the
    /// human's turn.
    fn drop_token(&mut self) {
        if matches!(self.snapshot.status, Status::Ended(_)) {
            self.message = Some("Game over! Press 'n' to start a new game.".to_string());
            return;
        }
        if !self.oracle.is_ready() {
            self.message = Some("The bot is still warming up...".to_string());
            return;
        }
        if self.awaiting_reply || !self.snapshot.accepts_human_move() {
            return;
        }

        if self.session.send(SessionCommand::Drop(self.selected_column)) {
            self.awaiting_reply = true;
        }
    }

    fn select_bot(&mut self, bot: BotProfile) {
        self.session.send(SessionCommand::SelectBot(bot));
        self.message = Some(format!("{} takes a seat ({} playouts)", bot.display_name(), bot.effort()));
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let view = super::game_view::GameView {
            snapshot: &self.snapshot,
            selected_column: self.selected_column,
            message: self.message.as_deref(),
            popup: self.popup.as_deref(),
            oracle_ready: self.oracle.is_ready(),
            thinking: self.awaiting_reply || self.snapshot.thinking,
        };
        super::game_view::render(frame, &view);
    }
}
