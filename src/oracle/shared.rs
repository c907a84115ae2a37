use std::sync::{Arc, OnceLock};

use tracing::info;

use super::{Oracle, TerminalSignal};
use crate::error::OracleError;
use crate::game::{EncodedBoard, Player};

/// Handle to an oracle that is installed after startup.
///
/// Calls fail fast with [`OracleError::Unavailable`] until [`SharedOracle::install`]
/// has run. Cloning shares the same slot.
#[derive(Clone, Default)]
pub struct SharedOracle {
    slot: Arc<OnceLock<Arc<dyn Oracle>>>,
}

impl SharedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the backing oracle. Returns false if one was already installed.
    pub fn install(&self, oracle: Arc<dyn Oracle>) -> bool {
        let name = oracle.name().to_string();
        let installed = self.slot.set(oracle).is_ok();
        if installed {
            info!(oracle = %name, "oracle ready");
        }
        installed
    }

    pub fn is_ready(&self) -> bool {
        self.slot.get().is_some()
    }

    fn get(&self) -> Result<&Arc<dyn Oracle>, OracleError> {
        self.slot.get().ok_or(OracleError::Unavailable)
    }
}

#[async_trait::async_trait]
impl Oracle for SharedOracle {
    async fn evaluate_terminal(&self, board: &EncodedBoard) -> Result<TerminalSignal, OracleError> {
        self.get()?.evaluate_terminal(board).await
    }

    async fn recommend_move(
        &self,
        board: &EncodedBoard,
        player: Player,
        effort: u32,
    ) -> Result<usize, OracleError> {
        self.get()?.recommend_move(board, player, effort).await
    }

    fn name(&self) -> &str {
        match self.slot.get() {
            Some(oracle) => oracle.name(),
            None => "uninitialized",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::ScriptedOracle;

    #[tokio::test]
    async fn fails_fast_until_installed() {
        let shared = SharedOracle::new();
        let board = EncodedBoard::from_raw(".......\n".repeat(6));

        assert!(!shared.is_ready());
        assert_eq!(shared.evaluate_terminal(&board).await, Err(OracleError::Unavailable));
        assert_eq!(
            shared.recommend_move(&board, Player::Automated, 10).await,
            Err(OracleError::Unavailable)
        );

        let handle = shared.clone();
        assert!(handle.install(Arc::new(ScriptedOracle::new())));
        assert!(shared.is_ready());
        assert_eq!(shared.name(), "scripted");
        assert_eq!(shared.evaluate_terminal(&board).await, Ok(TerminalSignal::None));
        assert_eq!(shared.recommend_move(&board, Player::Automated, 10).await, Ok(0));

        assert!(!shared.install(Arc::new(ScriptedOracle::new())));
    }
}
