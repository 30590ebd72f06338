//! Two-player race: depth-limited minimax with alpha-beta pruning, and a match driver.
//!
//! Player one races `X` to the right edge, player two races `Y` to the bottom edge. A side
//! may move any vehicle except the opponent's goal vehicle.
//!
//! Conventions used by [`minimax`]:
//! - The side passed in is the maximizer. `depth` counts full rounds: it drops by one only
//!   after the minimizing side's ply, so both sides see the same number of their own moves.
//! - A position is terminal at depth zero or once either goal vehicle is home.
//! - A side with no legal move passes. Two passes in a row are a draw.
//! - The tree is walked with `make_move`/`unmake_move` on one private copy of the board, so
//!   the caller's board is never touched.
use crate::engine::{Board, Move, Player};
use crate::error::BoardError;
use crate::heuristics::Evaluation;
use crate::mcts::{mcts, MctsConfig};
use crate::movegen::{legal_moves, Actor};
use log::{debug, trace, warn};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::{Duration, Instant};

/// Search parameters for [`minimax`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinimaxConfig {
    /// Look-ahead in full rounds (one move by each side).
    pub depth: u32,
    pub evaluation: Evaluation,
    /// Cut off branches once `beta <= alpha`. Disabling it gives plain minimax with the
    /// same value.
    pub pruning: bool,
}

/// The value of the root position and the move that achieves it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinimaxResult {
    pub value: i32,
    /// `None` when the root is terminal or the maximizer has to pass.
    pub best_move: Option<Move>,
    /// Positions visited, including the root.
    pub nodes: usize,
}

struct Search<'a> {
    config: &'a MinimaxConfig,
    maximizer: Player,
    nodes: usize,
}

impl Search<'_> {
    fn run(
        &mut self,
        board: &mut Board,
        depth: u32,
        side: Player,
        mut alpha: i32,
        mut beta: i32,
        after_pass: bool,
    ) -> Result<(i32, Option<Move>), BoardError> {
        self.nodes += 1;
        if depth == 0 || board.is_goal_reached(Player::One) || board.is_goal_reached(Player::Two) {
            return Ok((self.config.evaluation.evaluate(board, self.maximizer), None));
        }

        let maximizing = side == self.maximizer;
        let child_depth = if maximizing { depth } else { depth - 1 };
        let moves = legal_moves(board, Actor::Player(side));

        if moves.is_empty() {
            if after_pass {
                trace!("both sides are stuck at depth {}; scoring a draw", depth);
                return Ok((self.config.evaluation.draw_value(), None));
            }
            let (value, _) = self.run(board, child_depth, side.opponent(), alpha, beta, true)?;
            return Ok((value, None));
        }

        let mut best_value = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_move = None;
        for mv in moves {
            board.make_move(mv)?;
            let searched = self.run(board, child_depth, side.opponent(), alpha, beta, false);
            board.unmake_move(mv)?;
            let (value, _) = searched?;

            if maximizing {
                if value > best_value {
                    best_value = value;
                    best_move = Some(mv);
                }
                alpha = alpha.max(best_value);
            } else {
                if value < best_value {
                    best_value = value;
                    best_move = Some(mv);
                }
                beta = beta.min(best_value);
            }
            if self.config.pruning && beta <= alpha {
                trace!("cutoff at depth {} (alpha {}, beta {})", depth, alpha, beta);
                break;
            }
        }
        Ok((best_value, best_move))
    }
}

/// Searches `board` with `side` to move and maximizing.
///
/// # Errors
/// Only if a generated move fails to apply, which indicates a bug.
pub fn minimax(board: &Board, side: Player, config: &MinimaxConfig) -> Result<MinimaxResult, BoardError> {
    let mut scratch = board.clone();
    let mut search = Search {
        config,
        maximizer: side,
        nodes: 0,
    };
    let (value, best_move) = search.run(&mut scratch, config.depth, side, i32::MIN, i32::MAX, false)?;
    debug!(
        "minimax for {}: value {} after {} nodes (depth {}, {})",
        side, value, search.nodes, config.depth, config.evaluation
    );
    Ok(MinimaxResult {
        value,
        best_move,
        nodes: search.nodes,
    })
}

/// Decision procedure for one side of a match.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Agent {
    /// Alpha-beta search with the given look-ahead and evaluation. A depth of zero searches
    /// one round, since a depth-zero search never picks a move.
    AlphaBeta { depth: u32, evaluation: Evaluation },
    /// Monte Carlo tree search with UCT selection and seeded random playouts.
    Mcts { iterations: u32, exploration: f64, seed: u64 },
    /// Uniformly random legal move from a seeded generator.
    Random { seed: u64 },
}

/// Why a match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchEnd {
    Won(Player),
    /// Neither side could move.
    Deadlock,
    MoveLimit,
}

/// Record of a finished match.
#[derive(Clone, Debug)]
pub struct MatchReport {
    /// Moves in play order, tagged with the side that made them. Passes are not recorded.
    pub moves: Vec<(Player, Move)>,
    pub end: MatchEnd,
    /// Positions searched by alpha-beta agents plus tree nodes built by MCTS agents.
    pub nodes: usize,
    pub elapsed: Duration,
}

impl MatchReport {
    pub fn winner(&self) -> Option<Player> {
        match self.end {
            MatchEnd::Won(player) => Some(player),
            _ => None,
        }
    }
}

enum Seat {
    Search(MinimaxConfig),
    Mcts(MctsConfig, SmallRng),
    Random(SmallRng),
}

impl Seat {
    fn new(agent: Agent) -> Self {
        match agent {
            Agent::AlphaBeta { depth, evaluation } => Seat::Search(MinimaxConfig {
                depth: depth.max(1),
                evaluation,
                pruning: true,
            }),
            Agent::Mcts {
                iterations,
                exploration,
                seed,
            } => Seat::Mcts(
                MctsConfig {
                    iterations,
                    exploration,
                },
                SmallRng::seed_from_u64(seed),
            ),
            Agent::Random { seed } => Seat::Random(SmallRng::seed_from_u64(seed)),
        }
    }

    // Only called when `legal` is non-empty.
    fn choose(&mut self, board: &Board, side: Player, legal: &[Move], nodes: &mut usize) -> Result<Option<Move>, BoardError> {
        match self {
            Seat::Search(config) => {
                let result = minimax(board, side, config)?;
                *nodes += result.nodes;
                Ok(result.best_move)
            }
            Seat::Mcts(config, rng) => {
                let result = mcts(board, side, config, rng)?;
                *nodes += result.nodes;
                Ok(result.best_move)
            }
            Seat::Random(rng) => Ok(legal.choose(rng).copied()),
        }
    }
}

/// Plays a race from `board`, player one first, until a goal is reached, both sides are
/// stuck, or `move_limit` moves have been made.
///
/// `agents[0]` plays for player one and `agents[1]` for player two. A side passes only
/// when it has no legal move.
pub fn play_match(board: &Board, agents: [Agent; 2], move_limit: usize) -> Result<MatchReport, BoardError> {
    let started = Instant::now();
    let mut seats = agents.map(Seat::new);
    let mut board = board.clone();
    let mut moves = Vec::new();
    let mut nodes = 0;
    let mut side = Player::One;
    let mut passes = 0;

    let end = loop {
        if let Some(winner) = board.winner() {
            break MatchEnd::Won(winner);
        }
        if moves.len() >= move_limit {
            warn!("match stopped at the move limit of {}", move_limit);
            break MatchEnd::MoveLimit;
        }
        let legal = legal_moves(&board, Actor::Player(side));
        if legal.is_empty() {
            debug!("{} has no legal move and passes", side);
            passes += 1;
            if passes == 2 {
                break MatchEnd::Deadlock;
            }
            side = side.opponent();
            continue;
        }
        let seat = match side {
            Player::One => &mut seats[0],
            Player::Two => &mut seats[1],
        };
        let mv = match seat.choose(&board, side, &legal, &mut nodes)? {
            Some(mv) => mv,
            None => {
                warn!("{} agent returned no move; playing the first legal one", side);
                legal[0]
            }
        };
        debug!("{} plays {}", side, board.describe_move(mv));
        board.make_move(mv)?;
        moves.push((side, mv));
        passes = 0;
        side = side.opponent();
    };

    Ok(MatchReport {
        moves,
        end,
        nodes,
        elapsed: started.elapsed(),
    })
}
