//! Monte Carlo tree search oracle.
//!
//! Each iteration walks down the tree by UCB1, expands the first unexpanded
//! node it reaches, runs random playouts from it and backs the results up the
//! path. The recommended move is the most visited child of the root.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::position::Position;
use super::{Oracle, TerminalSignal};
use crate::error::OracleError;
use crate::game::{EncodedBoard, Player};

/// Upper bound accepted for [`MctsConfig::rollouts_per_iteration`].
pub const MAX_ROLLOUTS_PER_ITERATION: u32 = 1_000;

/// Search settings shared by every call to one oracle.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Random playouts run from each newly expanded node.
    pub rollouts_per_iteration: u32,
    /// UCB1 exploration constant.
    pub exploration: f32,
    /// Fixed RNG seed; searches are reproducible when set.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        MctsConfig {
            rollouts_per_iteration: 1,
            exploration: 2.0 * std::f32::consts::SQRT_2,
            seed: None,
        }
    }
}

impl MctsConfig {
    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    position: Position,
    /// Player to move in `position`.
    to_move: i8,
    /// Cached `position.winner()`.
    winner: i8,
    /// Column played to reach this node.
    column: usize,
    visits: u64,
    /// Playouts won by the player who moved into this node.
    wins: u64,
    losses: u64,
    expanded: bool,
    first_child: usize,
    child_count: usize,
}

impl Node {
    fn new(position: Position, to_move: i8, column: usize) -> Self {
        Node {
            winner: position.winner(),
            position,
            to_move,
            column,
            visits: 0,
            wins: 0,
            losses: 0,
            expanded: false,
            first_child: 0,
            child_count: 0,
        }
    }

    fn ucb(&self, parent_visits: u64, exploration: f32) -> f32 {
        if self.visits == 0 {
            return f32::INFINITY;
        }
        let visits = self.visits as f32;
        let balance = self.wins as f32 - self.losses as f32;
        balance / visits + exploration * ((parent_visits as f32).ln() / visits).sqrt()
    }
}

/// Arena of nodes; children of a node are stored contiguously.
struct SearchTree {
    nodes: Vec<Node>,
    exploration: f32,
}

impl SearchTree {
    fn new(root: Position, to_move: i8, exploration: f32) -> Self {
        SearchTree {
            nodes: vec![Node::new(root, to_move, 0)],
            exploration,
        }
    }

    fn expand(&mut self, idx: usize) {
        let parent = self.nodes[idx].clone();
        let first_child = self.nodes.len();

        if parent.winner == 0 {
            for col in parent.position.available() {
                let mut position = parent.position;
                position.play(col, parent.to_move);
                self.nodes.push(Node::new(position, -parent.to_move, col));
            }
        }

        let child_count = self.nodes.len() - first_child;
        let node = &mut self.nodes[idx];
        node.expanded = true;
        node.first_child = first_child;
        node.child_count = child_count;
    }

    fn children(&self, idx: usize) -> std::ops::Range<usize> {
        let node = &self.nodes[idx];
        node.first_child..node.first_child + node.child_count
    }

    /// Unvisited children first, in random order; otherwise the best UCB score.
    fn select_child(&self, idx: usize, rng: &mut StdRng) -> Option<usize> {
        let children = self.children(idx);
        if children.is_empty() {
            return None;
        }

        let unvisited: Vec<usize> = children
            .clone()
            .filter(|&child| self.nodes[child].visits == 0)
            .collect();
        if !unvisited.is_empty() {
            return Some(unvisited[rng.random_range(0..unvisited.len())]);
        }

        let parent_visits = self.nodes[idx].visits;
        let mut best = children.start;
        let mut best_score = f32::NEG_INFINITY;
        for child in children {
            let score = self.nodes[child].ucb(parent_visits, self.exploration);
            if score > best_score {
                best_score = score;
                best = child;
            }
        }
        Some(best)
    }

    fn rollout(&self, idx: usize, rng: &mut StdRng) -> i8 {
        let node = &self.nodes[idx];
        let mut position = node.position;
        let mut player = node.to_move;

        loop {
            let winner = position.winner();
            if winner != 0 {
                return winner;
            }
            let available = position.available();
            if available.is_empty() {
                return 0;
            }
            let col = available[rng.random_range(0..available.len())];
            position.play(col, player);
            player = -player;
        }
    }

    fn iterate(&mut self, rollouts: u64, rng: &mut StdRng) {
        let mut path = vec![0];
        let mut idx = 0;
        // (wins for 1, wins for -1)
        let mut results = (0u64, 0u64);

        loop {
            let node = &self.nodes[idx];
            if node.winner == 1 {
                results = (rollouts, 0);
                break;
            }
            if node.winner == -1 {
                results = (0, rollouts);
                break;
            }
            if !node.expanded {
                self.expand(idx);
                for _ in 0..rollouts {
                    match self.rollout(idx, rng) {
                        1 => results.0 += 1,
                        -1 => results.1 += 1,
                        _ => {}
                    }
                }
                break;
            }
            match self.select_child(idx, rng) {
                Some(child) => {
                    path.push(child);
                    idx = child;
                }
                // Full board, nobody won
                None => break,
            }
        }

        for &idx in &path {
            let node = &mut self.nodes[idx];
            node.visits += rollouts;
            if node.to_move == -1 {
                node.wins += results.0;
                node.losses += results.1;
            } else {
                node.wins += results.1;
                node.losses += results.0;
            }
        }
    }

    fn most_visited_column(&self) -> Option<usize> {
        let mut best: Option<&Node> = None;
        for child in self.children(0) {
            let node = &self.nodes[child];
            if best.map_or(true, |b| node.visits > b.visits) {
                best = Some(node);
            }
        }
        best.map(|node| node.column)
    }
}

/// Oracle backed by Monte Carlo tree search. `effort` is the iteration count.
#[derive(Debug, Clone, Default)]
pub struct MctsOracle {
    config: MctsConfig,
}

impl MctsOracle {
    pub fn new(config: MctsConfig) -> Self {
        MctsOracle { config }
    }

    /// Run a search synchronously. `None` when `player` has nothing to play:
    /// the position is already won or the board is full.
    pub fn best_move(&self, position: &Position, player: i8, effort: u32) -> Option<usize> {
        if position.winner() != 0 || position.available().is_empty() {
            return None;
        }

        let mut rng = self.config.rng();
        let mut tree = SearchTree::new(*position, player, self.config.exploration);
        let rollouts = u64::from(self.config.rollouts_per_iteration.max(1));
        for _ in 0..effort.max(1) {
            tree.iterate(rollouts, &mut rng);
        }
        debug!(nodes = tree.nodes.len(), root_visits = tree.nodes[0].visits, "search finished");
        tree.most_visited_column()
    }
}

#[async_trait::async_trait]
impl Oracle for MctsOracle {
    async fn evaluate_terminal(&self, board: &EncodedBoard) -> Result<TerminalSignal, OracleError> {
        let position = Position::parse(board.as_str())?;
        TerminalSignal::from_wire(position.winner())
            .ok_or_else(|| OracleError::Rejected("winner out of range".into()))
    }

    async fn recommend_move(
        &self,
        board: &EncodedBoard,
        player: Player,
        effort: u32,
    ) -> Result<usize, OracleError> {
        if effort == 0 {
            return Err(OracleError::Rejected("effort must be positive".into()));
        }
        let position = Position::parse(board.as_str())?;
        let oracle = self.clone();
        let player = player.wire_value();

        tokio::task::spawn_blocking(move || oracle.best_move(&position, player, effort))
            .await
            .map_err(|e| OracleError::TaskFailed(e.to_string()))?
            .ok_or(OracleError::NoMove)
    }

    fn name(&self) -> &str {
        "mcts"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> MctsOracle {
        MctsOracle::new(MctsConfig {
            seed: Some(seed),
            ..MctsConfig::default()
        })
    }

    fn position(text: &str) -> Position {
        Position::parse(text).unwrap()
    }

    #[test]
    fn ucb_prefers_unvisited_then_balance() {
        let mut node = Node::new(Position::empty(), 1, 0);
        assert_eq!(node.ucb(1, 2.8284), f32::INFINITY);

        node.visits = 1;
        node.wins = 1;
        assert!((node.ucb(1, 2.8284) - 1.0).abs() < 1e-4);

        node.visits = 2;
        node.wins = 1;
        assert!((node.ucb(2, 2.8284) - 2.1651).abs() < 1e-3);

        node.visits = 5;
        node.wins = 1;
        node.losses = 2;
        assert!((node.ucb(10, 2.8284) - 1.7194).abs() < 1e-3);
    }

    #[test]
    fn expand_creates_one_child_per_open_column() {
        let mut tree = SearchTree::new(
            position(
                "\
X......
O......
X......
O......
X......
O......
",
            ),
            1,
            2.8,
        );
        tree.expand(0);
        let columns: Vec<usize> = tree.children(0).map(|i| tree.nodes[i].column).collect();
        assert_eq!(columns, vec![1, 2, 3, 4, 5, 6]);
        assert!(tree.children(0).all(|i| tree.nodes[i].to_move == -1));
    }

    #[test]
    fn visits_accumulate_along_path() {
        let oracle = seeded(3);
        let mut rng = oracle.config.rng();
        let mut tree = SearchTree::new(Position::empty(), 1, 2.8);
        for _ in 0..50 {
            tree.iterate(2, &mut rng);
        }
        let root_visits = tree.nodes[0].visits;
        assert_eq!(root_visits, 100);
        let child_visits: u64 = tree.children(0).map(|i| tree.nodes[i].visits).sum();
        // The first iteration expands the root without visiting a child.
        assert_eq!(child_visits, root_visits - 2);
    }

    #[test]
    fn counters_hold_more_than_u32_playouts() {
        // A decided root is backed up without running playouts.
        let won = position(
            "\
.......
.......
X......
X......
X......
X......
",
        );
        let mut rng = seeded(1).config.rng();
        let mut tree = SearchTree::new(won, -1, 2.8);
        let rollouts = u64::from(u32::MAX);
        tree.iterate(rollouts, &mut rng);
        tree.iterate(rollouts, &mut rng);
        assert_eq!(tree.nodes[0].visits, 2 * rollouts);
        assert_eq!(tree.nodes[0].wins, 2 * rollouts);
    }

    #[test]
    fn takes_immediate_win() {
        let board = position(
            "\
.......
.......
.......
.......
......O
.OXX.XO
",
        );
        assert_eq!(seeded(11).best_move(&board, 1, 2000), Some(4));
    }

    #[test]
    fn blocks_immediate_loss() {
        let board = position(
            "\
.......
.......
.......
.......
......O
.OXX.XO
",
        );
        assert_eq!(seeded(5).best_move(&board, -1, 3000), Some(4));
    }

    #[test]
    fn completes_vertical_four() {
        let board = position(
            "\
.......
.......
.......
O.....X
O.....X
O.....X
",
        );
        assert_eq!(seeded(2).best_move(&board, 1, 2000), Some(6));
    }

    #[test]
    fn no_move_on_decided_or_full_board() {
        let won = position(
            "\
.......
.......
.......
.......
.......
XXXX...
",
        );
        assert_eq!(seeded(1).best_move(&won, -1, 100), None);

        let full = position(
            "\
XOXOXOX
XOXOXOX
OXOXOXO
OXOXOXO
XOXOXOX
XOXOXOX
",
        );
        assert_eq!(full.winner(), 0);
        assert_eq!(seeded(1).best_move(&full, 1, 100), None);
    }

    #[test]
    fn tiny_effort_still_returns_legal_move() {
        let board = Position::empty();
        let column = seeded(9).best_move(&board, -1, 1).unwrap();
        assert!(column < 7);
    }

    #[tokio::test]
    async fn oracle_trait_round_trip() {
        let oracle = seeded(4);
        let board = EncodedBoard::from_raw(
            "\
.......
.......
.......
.......
.......
OOOO...
",
        );
        assert_eq!(
            oracle.evaluate_terminal(&board).await,
            Ok(TerminalSignal::Wins(Player::Automated))
        );
        assert_eq!(
            oracle.recommend_move(&board, Player::Human, 10).await,
            Err(OracleError::NoMove)
        );

        let open = EncodedBoard::from_raw(".......\n".repeat(6));
        assert_eq!(oracle.evaluate_terminal(&open).await, Ok(TerminalSignal::None));
        let column = oracle.recommend_move(&open, Player::Automated, 50).await.unwrap();
        assert!(column < 7);
    }

    #[tokio::test]
    async fn oracle_rejects_bad_input() {
        let oracle = seeded(4);
        let garbage = EncodedBoard::from_raw("not a board");
        assert!(matches!(
            oracle.evaluate_terminal(&garbage).await,
            Err(OracleError::Rejected(_))
        ));
        let open = EncodedBoard::from_raw(".......\n".repeat(6));
        assert!(matches!(
            oracle.recommend_move(&open, Player::Human, 0).await,
            Err(OracleError::Rejected(_))
        ));
    }
}
