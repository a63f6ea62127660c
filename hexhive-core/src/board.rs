//! Board with stacking
//!
//! Placed pieces live in an arena; a per-hex index lists arena slots from
//! bottom to top. Pieces never leave the board once placed, so arena slots
//! stay valid for the whole game.

use std::collections::VecDeque;
use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::hex::Hex;
use crate::pieces::Piece;

/// A piece on the board. `height` 0 is ground level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub piece: Piece,
    pub hex: Hex,
    pub height: u32,
}

/// Board state (clone to mutate)
#[derive(Clone, Debug, Default)]
pub struct Board {
    pieces: Vec<PlacedPiece>,
    stacks: FxHashMap<Hex, Vec<usize>>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Number of pieces on the board
    pub fn len(&self) -> usize {
        self.stacks.values().map(Vec::len).sum()
    }

    /// All pieces on the board, in no particular order
    pub fn pieces(&self) -> impl Iterator<Item = &PlacedPiece> + '_ {
        self.stacks
            .values()
            .flatten()
            .map(|&i| &self.pieces[i])
    }

    /// Stack at a hex, bottom to top
    pub fn stack(&self, hex: Hex) -> impl Iterator<Item = &PlacedPiece> + '_ {
        self.stacks
            .get(&hex)
            .into_iter()
            .flatten()
            .map(|&i| &self.pieces[i])
    }

    /// Number of pieces stacked at a hex
    pub fn height_at(&self, hex: Hex) -> usize {
        self.stacks.get(&hex).map_or(0, Vec::len)
    }

    pub fn is_occupied(&self, hex: Hex) -> bool {
        self.height_at(hex) > 0
    }

    /// The only visible and actionable piece at a hex
    pub fn top_at(&self, hex: Hex) -> Option<&PlacedPiece> {
        self.stacks
            .get(&hex)
            .and_then(|s| s.last())
            .map(|&i| &self.pieces[i])
    }

    /// Occupied hexes
    pub fn occupied(&self) -> impl Iterator<Item = Hex> + '_ {
        self.stacks.keys().copied()
    }

    /// Top piece of every occupied hex
    pub fn tops(&self) -> impl Iterator<Item = &PlacedPiece> + '_ {
        self.stacks
            .values()
            .filter_map(|s| s.last())
            .map(|&i| &self.pieces[i])
    }

    /// Occupied neighbors of a hex
    pub fn occupied_neighbors(&self, hex: Hex) -> impl Iterator<Item = Hex> + '_ {
        hex.neighbors().into_iter().filter(|&n| self.is_occupied(n))
    }

    /// Empty hexes touching the hive
    pub fn perimeter(&self) -> FxHashSet<Hex> {
        self.occupied()
            .flat_map(|h| h.neighbors())
            .filter(|&n| !self.is_occupied(n))
            .collect()
    }

    pub fn find(&self, piece: Piece) -> Option<&PlacedPiece> {
        self.pieces().find(|p| p.piece == piece)
    }

    pub fn position(&self, piece: Piece) -> Option<Hex> {
        self.find(piece).map(|p| p.hex)
    }

    pub fn contains(&self, piece: Piece) -> bool {
        self.find(piece).is_some()
    }

    /// Whether a piece on the board has something stacked on it
    pub fn is_covered(&self, piece: Piece) -> bool {
        match self.find(piece) {
            Some(placed) => self.top_at(placed.hex).map(|t| t.piece) != Some(piece),
            None => false,
        }
    }

    // ========================================================================
    // CONNECTIVITY
    // ========================================================================

    /// One-hive check over the current occupancy
    pub fn is_connected(&self) -> bool {
        self.is_connected_with(None)
    }

    /// One-hive check with one extra hex counted as occupied
    pub fn is_connected_with(&self, extra: Option<Hex>) -> bool {
        let occupied = |h: Hex| self.is_occupied(h) || Some(h) == extra;
        let start = match self.occupied().next().or(extra) {
            Some(h) => h,
            None => return true,
        };
        let total = self.stacks.len()
            + usize::from(matches!(extra, Some(e) if !self.is_occupied(e)));

        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::new();
        seen.insert(start);
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            for n in current.neighbors() {
                if occupied(n) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen.len() == total
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Put a piece on top of whatever is at `hex`
    pub fn place(&mut self, piece: Piece, hex: Hex) {
        let height = self.height_at(hex) as u32;
        self.pieces.push(PlacedPiece { piece, hex, height });
        let slot = self.pieces.len() - 1;
        self.stacks.entry(hex).or_default().push(slot);
    }

    /// Take the top piece off a hex. The arena keeps the slot, so this is
    /// meant for scratch boards used during move generation.
    pub fn lift(&mut self, hex: Hex) -> Option<PlacedPiece> {
        let stack = self.stacks.get_mut(&hex)?;
        let slot = stack.pop()?;
        if stack.is_empty() {
            self.stacks.remove(&hex);
        }
        Some(self.pieces[slot])
    }

    /// Move a top piece to `to`, stacking if occupied. Returns the origin.
    pub fn move_piece(&mut self, piece: Piece, to: Hex) -> Option<Hex> {
        let from = self.position(piece)?;
        let slot = *self.stacks.get(&from)?.last()?;
        if self.pieces[slot].piece != piece {
            return None;
        }
        self.lift(from)?;
        let height = self.height_at(to) as u32;
        self.pieces[slot].hex = to;
        self.pieces[slot].height = height;
        self.stacks.entry(to).or_default().push(slot);
        Some(from)
    }
}

impl FromIterator<(Piece, Hex)> for Board {
    fn from_iter<I: IntoIterator<Item = (Piece, Hex)>>(iter: I) -> Self {
        let mut board = Board::new();
        for (piece, hex) in iter {
            board.place(piece, hex);
        }
        board
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.stacks.len() == other.stacks.len()
            && self.stacks.keys().all(|&h| self.stack(h).eq(other.stack(h)))
    }
}

impl Eq for Board {}

// Serialized as the flat list of placed pieces; the index is rebuilt from
// explicit heights so replayed or hand-written boards resolve unambiguously.

impl Serialize for Board {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut list: Vec<PlacedPiece> = self.pieces().copied().collect();
        list.sort_by_key(|p| (p.height, p.hex));
        list.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut list = Vec::<PlacedPiece>::deserialize(deserializer)?;
        list.sort_by_key(|p| p.height);
        let mut board = Board::new();
        for placed in list {
            if board.contains(placed.piece) {
                return Err(serde::de::Error::custom(format!("{} appears twice", placed.piece)));
            }
            if placed.height as usize != board.height_at(placed.hex) {
                return Err(serde::de::Error::custom(format!(
                    "{} at {} has height {} but the stack below it has {} pieces",
                    placed.piece,
                    placed.hex,
                    placed.height,
                    board.height_at(placed.hex)
                )));
            }
            board.place(placed.piece, placed.hex);
        }
        Ok(board)
    }
}

/// ASCII rendering in a staggered layout, top pieces only.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "(empty)");
        }
        // doubled-width column: x = 2q + r
        let min_r = self.occupied().map(|h| h.r).min().unwrap_or(0) - 1;
        let max_r = self.occupied().map(|h| h.r).max().unwrap_or(0) + 1;
        let min_x = self.occupied().map(|h| 2 * h.q + h.r).min().unwrap_or(0) - 2;
        let max_x = self.occupied().map(|h| 2 * h.q + h.r).max().unwrap_or(0) + 2;

        for r in min_r..=max_r {
            let mut line = String::new();
            for x in min_x..=max_x {
                if (x - r).rem_euclid(2) != 0 {
                    continue;
                }
                let hex = Hex::new((x - r) / 2, r);
                let column = ((x - min_x) * 3) as usize;
                while line.len() < column {
                    line.push(' ');
                }
                match self.top_at(hex) {
                    Some(top) if self.height_at(hex) > 1 => {
                        line.push_str(&format!("{}^", top.piece))
                    }
                    Some(top) => line.push_str(&top.piece.to_string()),
                    None => line.push('.'),
                }
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
