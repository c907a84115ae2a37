use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::session_msg::{SessionCommand, SessionSnapshot, SessionUpdate};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::game::{GameSession, MoveOutcome, Phase, Status};

/// Presentation delays applied around the bot's reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkerTiming {
    pub reply_delay: Duration,
    pub result_delay: Duration,
}

impl From<&SessionConfig> for WorkerTiming {
    fn from(config: &SessionConfig) -> Self {
        WorkerTiming {
            reply_delay: Duration::from_millis(config.reply_delay_ms),
            result_delay: Duration::from_millis(config.result_delay_ms),
        }
    }
}

/// UI side of a running session worker.
pub struct SessionHandle {
    commands: UnboundedSender<SessionCommand>,
    updates: UnboundedReceiver<SessionUpdate>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Returns false once the worker has stopped.
    pub fn send(&self, command: SessionCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    /// Next pending update, without waiting.
    pub fn try_recv(&mut self) -> Option<SessionUpdate> {
        match self.updates.try_recv() {
            Ok(update) => Some(update),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Wait for the next update. `None` once the worker has stopped.
    pub async fn recv(&mut self) -> Option<SessionUpdate> {
        self.updates.recv().await
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Move `session` onto a task of `runtime` and return the handle used to
/// drive it.
pub fn spawn_session_worker(
    runtime: &Handle,
    session: GameSession,
    timing: WorkerTiming,
) -> SessionHandle {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();

    let worker = Worker {
        session,
        timing,
        updates: update_tx,
    };
    let task = runtime.spawn(worker.run(command_rx));

    SessionHandle {
        commands: command_tx,
        updates: update_rx,
        task,
    }
}

struct Worker {
    session: GameSession,
    timing: WorkerTiming,
    updates: UnboundedSender<SessionUpdate>,
}

impl Worker {
    async fn run(mut self, mut commands: UnboundedReceiver<SessionCommand>) {
        info!("session worker started");
        self.publish(false);

        while let Some(command) = commands.recv().await {
            debug!(?command, "session command");
            match command {
                SessionCommand::Drop(column) => self.human_turn(column).await,
                SessionCommand::NewGame => {
                    self.session.new_game();
                    self.publish(false);
                }
                SessionCommand::SelectBot(bot) => {
                    self.session.select_bot(bot);
                    self.publish(false);
                }
                SessionCommand::RetryReply => self.bot_turn().await,
                SessionCommand::Shutdown => break,
            }
            if self.updates.is_closed() {
                break;
            }
        }

        info!("session worker stopped");
    }

    async fn human_turn(&mut self, column: usize) {
        match self.session.submit_human_move(column).await {
            // Still answered, so the UI stops waiting on this drop.
            Ok(MoveOutcome::Ignored) => self.publish(false),
            Ok(MoveOutcome::Rejected(error)) => {
                self.send(SessionUpdate::Rejected {
                    generation: self.session.generation(),
                    error,
                });
            }
            Ok(MoveOutcome::Applied(_)) => {
                if self.bot_to_move() {
                    self.publish(true);
                    self.bot_turn().await;
                } else {
                    self.publish(false);
                    self.announce_result().await;
                }
            }
            Err(error) => self.report(error),
        }
    }

    async fn bot_turn(&mut self) {
        if !self.bot_to_move() {
            return;
        }
        if !self.timing.reply_delay.is_zero() {
            tokio::time::sleep(self.timing.reply_delay).await;
        }

        match self.session.play_automated_move().await {
            Ok(_) => {
                self.publish(false);
                self.announce_result().await;
            }
            Err(error) => {
                self.publish(false);
                self.report(error);
            }
        }
    }

    async fn announce_result(&mut self) {
        let Status::Ended(outcome) = self.session.status() else {
            return;
        };
        if !self.timing.result_delay.is_zero() {
            tokio::time::sleep(self.timing.result_delay).await;
        }
        self.send(SessionUpdate::GameOver {
            generation: self.session.generation(),
            outcome,
            bot: self.session.active_bot(),
        });
    }

    fn bot_to_move(&self) -> bool {
        self.session.status() == Status::Active(Phase::WaitingForAutomated)
    }

    fn report(&self, error: SessionError) {
        let generation = self.session.generation();
        let update = match error {
            SessionError::Oracle(_) => SessionUpdate::OracleFailed { generation, error },
            SessionError::OracleContractViolation { .. } | SessionError::Halted => {
                SessionUpdate::Halted { generation, error }
            }
        };
        self.send(update);
    }

    fn publish(&self, thinking: bool) {
        let mut snapshot = SessionSnapshot::of(&self.session);
        snapshot.thinking = thinking;
        self.send(SessionUpdate::Snapshot(snapshot));
    }

    fn send(&self, update: SessionUpdate) {
        // A closed channel means the UI is gone; the run loop notices.
        let _ = self.updates.send(update);
    }
}
