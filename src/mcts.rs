//! Monte Carlo tree search for the two-player race.
//!
//! Each iteration walks down the tree by UCT, expands one untried move, finishes the game
//! with uniformly random moves, and credits the result back up the path. The move played
//! is the root child visited most often.
//!
//! A side with no legal move passes, and the pass is an edge in the tree like any move.
//! A position is terminal once a goal vehicle is home or neither side can move.
use crate::engine::{Board, Move, Player};
use crate::error::BoardError;
use crate::movegen::{has_legal_move, legal_moves, Actor};
use log::debug;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

pub const DEFAULT_ITERATIONS: u32 = 200;
pub const DEFAULT_EXPLORATION: f64 = 1.2;

// Random playouts longer than this are scored as a draw.
const ROLLOUT_PLY_LIMIT: usize = 200;

/// Search parameters for [`mcts`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MctsConfig {
    /// Playouts per decision. Zero is treated as one.
    pub iterations: u32,
    /// UCT exploration constant.
    pub exploration: f64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        MctsConfig {
            iterations: DEFAULT_ITERATIONS,
            exploration: DEFAULT_EXPLORATION,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MctsResult {
    /// `None` when the side to move must pass or the root is already terminal.
    pub best_move: Option<Move>,
    /// Tree nodes created, the root included.
    pub nodes: usize,
}

// `None` is a pass.
type Action = Option<Move>;

struct Node {
    board: Board,
    to_move: Player,
    action: Action,
    parent: Option<usize>,
    children: Vec<usize>,
    // Reversed, so popping yields generator order.
    untried: Vec<Action>,
    terminal: bool,
    visits: u32,
    // Credit for the side that played `action`.
    value_sum: f64,
}

impl Node {
    fn new(board: Board, to_move: Player, action: Action, parent: Option<usize>) -> Self {
        let terminal = is_terminal(&board);
        let mut untried: Vec<Action> = if terminal {
            Vec::new()
        } else {
            let moves = legal_moves(&board, Actor::Player(to_move));
            if moves.is_empty() {
                vec![None]
            } else {
                moves.into_iter().map(Some).collect()
            }
        };
        untried.reverse();
        Node {
            board,
            to_move,
            action,
            parent,
            children: Vec::new(),
            untried,
            terminal,
            visits: 0,
            value_sum: 0.0,
        }
    }

    fn uct(&self, parent_visits: u32, exploration: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let visits = f64::from(self.visits);
        self.value_sum / visits + exploration * (f64::from(parent_visits).ln() / visits).sqrt()
    }
}

fn is_terminal(board: &Board) -> bool {
    board.winner().is_some()
        || (!has_legal_move(board, Actor::Player(Player::One)) && !has_legal_move(board, Actor::Player(Player::Two)))
}

// 1 for a win by `player`, 0 for a loss, one half otherwise.
fn reward(board: &Board, player: Player) -> f64 {
    match board.winner() {
        Some(winner) if winner == player => 1.0,
        Some(_) => 0.0,
        None => 0.5,
    }
}

/// Chooses a move for `side` by Monte Carlo tree search.
///
/// Playouts draw from `rng`, so a seeded generator makes the choice reproducible.
pub fn mcts(board: &Board, side: Player, config: &MctsConfig, rng: &mut SmallRng) -> Result<MctsResult, BoardError> {
    let mut tree = vec![Node::new(board.clone(), side, None, None)];
    for _ in 0..config.iterations.max(1) {
        let leaf = select_and_expand(&mut tree, config.exploration)?;
        let score = rollout(&tree[leaf].board, tree[leaf].to_move, rng)?;
        backpropagate(&mut tree, leaf, score);
    }

    let mut best: Option<&Node> = None;
    for &child in &tree[0].children {
        let node = &tree[child];
        if best.map_or(true, |b| node.visits > b.visits) {
            best = Some(node);
        }
    }
    let best_move = best.and_then(|node| node.action);
    debug!(
        "mcts for {}: {} nodes, best {:?} after {} visits",
        side,
        tree.len(),
        best_move.map(|mv| board.describe_move(mv)),
        best.map_or(0, |node| node.visits)
    );
    Ok(MctsResult {
        best_move,
        nodes: tree.len(),
    })
}

fn select_and_expand(tree: &mut Vec<Node>, exploration: f64) -> Result<usize, BoardError> {
    let mut current = 0;
    loop {
        if tree[current].terminal {
            return Ok(current);
        }
        if let Some(action) = tree[current].untried.pop() {
            let mut board = tree[current].board.clone();
            if let Some(mv) = action {
                board.make_move(mv)?;
            }
            let to_move = tree[current].to_move.opponent();
            let child = tree.len();
            tree.push(Node::new(board, to_move, action, Some(current)));
            tree[current].children.push(child);
            return Ok(child);
        }

        let parent_visits = tree[current].visits;
        let mut best = None;
        let mut best_value = f64::NEG_INFINITY;
        for &child in &tree[current].children {
            let value = tree[child].uct(parent_visits, exploration);
            if value > best_value {
                best_value = value;
                best = Some(child);
            }
        }
        match best {
            Some(child) => current = child,
            None => return Ok(current),
        }
    }
}

// Plays random moves to the end and returns player one's reward.
fn rollout(board: &Board, to_move: Player, rng: &mut SmallRng) -> Result<f64, BoardError> {
    let mut board = board.clone();
    let mut side = to_move;
    let mut passes = 0;
    for _ in 0..ROLLOUT_PLY_LIMIT {
        if board.winner().is_some() {
            break;
        }
        match legal_moves(&board, Actor::Player(side)).choose(rng).copied() {
            Some(mv) => {
                board.make_move(mv)?;
                passes = 0;
            }
            None => {
                passes += 1;
                if passes == 2 {
                    break;
                }
            }
        }
        side = side.opponent();
    }
    Ok(reward(&board, Player::One))
}

fn backpropagate(tree: &mut [Node], leaf: usize, score_for_one: f64) {
    let mut current = Some(leaf);
    while let Some(index) = current {
        let node = &mut tree[index];
        node.visits += 1;
        node.value_sum += match node.to_move.opponent() {
            Player::One => score_for_one,
            Player::Two => 1.0 - score_for_one,
        };
        current = node.parent;
    }
}
