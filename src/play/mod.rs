//! Background driver for a game session: a tokio task that owns the
//! [`GameSession`](crate::game::GameSession) and talks to the UI over channels.

pub mod session_msg;
mod worker;

pub use session_msg::{SessionCommand, SessionSnapshot, SessionUpdate};
pub use worker::{spawn_session_worker, SessionHandle, WorkerTiming};
