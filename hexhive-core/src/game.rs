//! Game state and turn sequencing

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::GameError;
use crate::hex::Hex;
use crate::movement::{valid_moves, valid_throws};
use crate::pieces::{create_initial_hand, Bug, Color, Piece};
use crate::placement::valid_placements;
use crate::rules::Rules;
use crate::win::check_winner;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    WhiteWins,
    BlackWins,
    Draw,
}

/// Whether moves are still accepted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Playing,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    White,
    Black,
    Draw,
}

impl GameResult {
    pub fn status(self) -> Status {
        match self {
            GameResult::Ongoing => Status::Playing,
            _ => Status::Finished,
        }
    }

    pub fn winner(self) -> Option<Winner> {
        match self {
            GameResult::Ongoing => None,
            GameResult::WhiteWins => Some(Winner::White),
            GameResult::BlackWins => Some(Winner::Black),
            GameResult::Draw => Some(Winner::Draw),
        }
    }
}

/// A move descriptor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Move {
    /// Enter a piece from hand
    Place { piece: Piece, to: Hex },
    /// Move a piece on the board; `from` is checked when given
    Move {
        piece: Piece,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<Hex>,
        to: Hex,
    },
    /// Pillbug special: `by` relocates the adjacent `piece`
    Throw { by: Piece, piece: Piece, to: Hex },
    /// Only legal when nothing else is
    Pass,
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Game state. Transitions return a new value; the old one is untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    hands: [Vec<Piece>; 2],
    rules: Rules,
    current_player: Color,

    /// Global ply number, starting at 1. Passes count.
    turn: u32,

    queen_placed: [bool; 2],
    result: GameResult,

    /// Piece moved or thrown on the previous ply
    last_moved: Option<Piece>,

    /// Piece thrown on the previous ply; it sits out the next ply
    #[serde(default)]
    last_thrown: Option<Piece>,

    /// Piece each color moved or threw on its own previous turn
    #[serde(default)]
    moved_by: [Option<Piece>; 2],
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Empty board, full hands, white to move
    pub fn new(rules: Rules) -> Self {
        let hands = [
            create_initial_hand(Color::White, rules.expansions),
            create_initial_hand(Color::Black, rules.expansions),
        ];
        Self {
            board: Board::new(),
            hands,
            rules,
            current_player: Color::White,
            turn: 1,
            queen_placed: [false, false],
            result: GameResult::Ongoing,
            last_moved: None,
            last_thrown: None,
            moved_by: [None, None],
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hand(&self, color: Color) -> &[Piece] {
        &self.hands[color.index()]
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// The current player's own turn count (1 on each color's first turn)
    pub fn player_turn(&self) -> u32 {
        (self.turn + 1) / 2
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn status(&self) -> Status {
        self.result.status()
    }

    pub fn winner(&self) -> Option<Winner> {
        self.result.winner()
    }

    pub fn is_active(&self) -> bool {
        self.result == GameResult::Ongoing
    }

    pub fn last_moved(&self) -> Option<Piece> {
        self.last_moved
    }

    pub fn queen_placed(&self, color: Color) -> bool {
        self.queen_placed[color.index()]
    }

    /// The current player's own piece from their previous turn, which
    /// `freeze_last_moved` keeps in place for this turn
    pub fn frozen(&self) -> Option<Piece> {
        if self.rules.freeze_last_moved {
            self.moved_by[self.current_player.index()]
        } else {
            None
        }
    }

    /// Whether a piece may not move or be thrown this ply. A piece thrown on
    /// the previous ply always sits out.
    pub fn is_frozen(&self, piece: Piece) -> bool {
        self.frozen() == Some(piece) || self.last_thrown == Some(piece)
    }

    // ========================================================================
    // RULE HELPERS
    // ========================================================================

    /// The current player has hit the queen deadline without placing her
    fn queen_forced(&self) -> bool {
        !self.queen_placed(self.current_player)
            && self
                .rules
                .queen_deadline
                .map_or(false, |deadline| self.player_turn() >= deadline)
    }

    fn opening_queen_forbidden(&self) -> bool {
        self.rules.forbid_opening_queen && self.player_turn() == 1
    }

    fn ensure_active(&self) -> Result<(), GameError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(GameError::GameNotActive)
        }
    }

    fn ensure_turn(&self, color: Color) -> Result<(), GameError> {
        if color == self.current_player {
            Ok(())
        } else {
            Err(GameError::WrongTurn { expected: self.current_player, got: color })
        }
    }

    /// Board pieces of the current player may move at all
    fn ensure_can_move(&self) -> Result<(), GameError> {
        let queen_missing = !self.queen_placed(self.current_player);
        if self.queen_forced() || (self.rules.movement_requires_queen && queen_missing) {
            return Err(GameError::QueenRequired(self.current_player));
        }
        Ok(())
    }

    /// Selection checks shared by moves and throws
    fn ensure_selectable(&self, piece: Piece) -> Result<(), GameError> {
        self.ensure_active()?;
        self.ensure_turn(piece.color)?;
        if !self.board.contains(piece) {
            return Err(GameError::PieceNotFound(piece));
        }
        if self.board.is_covered(piece) {
            return Err(GameError::PieceCovered(piece));
        }
        if self.is_frozen(piece) {
            return Err(GameError::PieceFrozen(piece));
        }
        self.ensure_can_move()
    }

    /// Throw targets for a thrower that passed selection. The piece moved on
    /// the previous ply can neither throw nor be thrown.
    fn throw_targets(&self, thrower: Piece) -> BTreeMap<Piece, BTreeSet<Hex>> {
        if self.is_frozen(thrower) || self.last_moved == Some(thrower) {
            return BTreeMap::new();
        }
        let mut throws = valid_throws(&self.board, thrower, self.last_moved);
        throws.retain(|&piece, _| !self.is_frozen(piece));
        throws
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Pieces in the current player's hand that may be placed this turn
    pub fn placeable_pieces(&self) -> Vec<Piece> {
        if !self.is_active() {
            return vec![];
        }
        let forced = self.queen_forced();
        let no_queen = self.opening_queen_forbidden();
        self.hand(self.current_player)
            .iter()
            .copied()
            .filter(|p| if forced { p.is_queen() } else { !(no_queen && p.is_queen()) })
            .collect()
    }

    /// Cells where the current player may place a piece
    pub fn valid_placements(&self) -> BTreeSet<Hex> {
        if self.placeable_pieces().is_empty() {
            return BTreeSet::new();
        }
        valid_placements(&self.board, self.current_player, self.turn)
    }

    /// Destinations for a board piece, or why it cannot be selected.
    /// A selectable piece with nowhere to go is `NoLegalMoves`.
    pub fn destinations(&self, piece: Piece) -> Result<BTreeSet<Hex>, GameError> {
        self.ensure_selectable(piece)?;
        let moves = valid_moves(&self.board, piece, None);
        if moves.is_empty() {
            return Err(GameError::NoLegalMoves(piece));
        }
        Ok(moves)
    }

    /// Pieces a pillbug (or borrowing mosquito) may relocate, with their cells.
    /// The piece moved on the previous ply can neither throw nor be thrown,
    /// whatever `freeze_last_moved` says.
    pub fn throws(&self, thrower: Piece) -> Result<BTreeMap<Piece, BTreeSet<Hex>>, GameError> {
        if !matches!(thrower.bug, Bug::Pillbug | Bug::Mosquito) {
            return Err(GameError::NotAThrower(thrower));
        }
        self.ensure_selectable(thrower)?;
        if self.last_moved == Some(thrower) {
            return Err(GameError::PieceFrozen(thrower));
        }
        let throws = self.throw_targets(thrower);
        if throws.is_empty() {
            return Err(GameError::NoLegalMoves(thrower));
        }
        Ok(throws)
    }

    /// Every legal action for the current player. Placements are listed once
    /// per kind. `[Pass]` when stuck, empty once the game is over.
    pub fn legal_moves(&self) -> Vec<Move> {
        if !self.is_active() {
            return vec![];
        }
        let mut moves = Vec::new();

        let mut kinds = BTreeSet::new();
        let candidates: Vec<Piece> = self
            .placeable_pieces()
            .into_iter()
            .filter(|p| kinds.insert(p.bug))
            .collect();
        if !candidates.is_empty() {
            for to in valid_placements(&self.board, self.current_player, self.turn) {
                for &piece in &candidates {
                    moves.push(Move::Place { piece, to });
                }
            }
        }

        if self.ensure_can_move().is_ok() {
            let mut own: Vec<(Piece, Hex)> = self
                .board
                .tops()
                .filter(|t| t.piece.color == self.current_player)
                .map(|t| (t.piece, t.hex))
                .collect();
            own.sort();

            for &(piece, from) in &own {
                if self.is_frozen(piece) {
                    continue;
                }
                for to in valid_moves(&self.board, piece, None) {
                    moves.push(Move::Move { piece, from: Some(from), to });
                }
            }
            for &(by, _) in &own {
                for (piece, cells) in self.throw_targets(by) {
                    for to in cells {
                        moves.push(Move::Throw { by, piece, to });
                    }
                }
            }
        }

        if moves.is_empty() {
            moves.push(Move::Pass);
        }
        moves
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Validate and execute a move, returning the successor state
    pub fn apply(&self, mv: Move) -> Result<Self, GameError> {
        self.ensure_active()?;

        let mut next = self.clone();
        let mover = self.current_player.index();
        next.last_thrown = None;
        match mv {
            Move::Place { piece, to } => {
                self.check_placement(piece, to)?;
                let hand = &mut next.hands[piece.color.index()];
                hand.retain(|&p| p != piece);
                next.board.place(piece, to);
                if piece.is_queen() {
                    next.queen_placed[piece.color.index()] = true;
                }
                next.last_moved = None;
                next.moved_by[mover] = None;
            }

            Move::Move { piece, from, to } => {
                let legal = match self.destinations(piece) {
                    Ok(cells) => cells,
                    Err(GameError::NoLegalMoves(_)) => BTreeSet::new(),
                    Err(e) => return Err(e),
                };
                let origin_matches = from.map_or(true, |f| self.board.position(piece) == Some(f));
                if !origin_matches || !legal.contains(&to) {
                    return Err(GameError::IllegalMove { piece, to });
                }
                next.board.move_piece(piece, to);
                next.last_moved = Some(piece);
                next.moved_by[mover] = Some(piece);
            }

            Move::Throw { by, piece, to } => {
                let throws = match self.throws(by) {
                    Ok(throws) => throws,
                    Err(GameError::NoLegalMoves(_)) => BTreeMap::new(),
                    Err(e) => return Err(e),
                };
                if !throws.get(&piece).map_or(false, |cells| cells.contains(&to)) {
                    return Err(GameError::IllegalMove { piece, to });
                }
                next.board.move_piece(piece, to);
                next.last_moved = Some(piece);
                next.last_thrown = Some(piece);
                next.moved_by[mover] = Some(piece);
            }

            Move::Pass => {
                if self.legal_moves() != [Move::Pass] {
                    return Err(GameError::PassNotAllowed);
                }
                next.last_moved = None;
                next.moved_by[mover] = None;
            }
        }

        next.end_turn();
        tracing::debug!(turn = self.turn, ?mv, result = ?next.result, "applied move");
        Ok(next)
    }

    fn check_placement(&self, piece: Piece, to: Hex) -> Result<(), GameError> {
        self.ensure_turn(piece.color)?;
        if !self.hand(piece.color).contains(&piece) {
            return Err(GameError::PieceNotInHand(piece));
        }
        // a due queen overrides the opening restriction
        if self.queen_forced() {
            if !piece.is_queen() {
                return Err(GameError::QueenRequired(piece.color));
            }
        } else if self.opening_queen_forbidden() && piece.is_queen() {
            return Err(GameError::OpeningQueen);
        }
        if !valid_placements(&self.board, self.current_player, self.turn).contains(&to) {
            return Err(GameError::IllegalMove { piece, to });
        }
        Ok(())
    }

    fn end_turn(&mut self) {
        self.result = check_winner(&self.board);
        self.current_player = self.current_player.opponent();
        self.turn += 1;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================
