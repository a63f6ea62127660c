//! Placement rules: where a new piece from hand may enter the board

use std::collections::BTreeSet;

use crate::board::Board;
use crate::hex::Hex;
use crate::pieces::Color;

/// Legal empty cells for a new piece of `color` on global turn `turn`.
///
/// - empty board: the origin only
/// - turn 2: any cell touching the opening piece
/// - otherwise: touching an own top piece and no opposing top piece
pub fn valid_placements(board: &Board, color: Color, turn: u32) -> BTreeSet<Hex> {
    if board.is_empty() {
        return BTreeSet::from([Hex::ORIGIN]);
    }

    let perimeter = board.perimeter();
    if turn <= 2 {
        return perimeter.into_iter().collect();
    }

    perimeter
        .into_iter()
        .filter(|&cell| {
            let mut touches_own = false;
            for n in cell.neighbors() {
                match board.top_at(n) {
                    Some(top) if top.piece.color == color => touches_own = true,
                    Some(_) => return false,
                    None => {}
                }
            }
            touches_own
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{Bug, Piece};

    #[test]
    fn test_first_turn_is_origin() {
        let cells = valid_placements(&Board::new(), Color::White, 1);
        assert_eq!(cells, BTreeSet::from([Hex::ORIGIN]));
    }

    #[test]
    fn test_second_turn_touches_opening_piece() {
        let board: Board = [(Piece::new(Color::White, Bug::Ant, 1), Hex::ORIGIN)]
            .into_iter()
            .collect();
        let cells = valid_placements(&board, Color::Black, 2);
        let expected: BTreeSet<Hex> = Hex::ORIGIN.neighbors().into_iter().collect();
        assert_eq!(cells, expected);
    }

    #[test]
    fn test_no_touching_opponent_later() {
        let board: Board = [
            (Piece::queen(Color::White), Hex::ORIGIN),
            (Piece::queen(Color::Black), Hex::new(1, 0)),
        ]
        .into_iter()
        .collect();

        let white = valid_placements(&board, Color::White, 3);
        // the three cells behind the white queen
        let expected = BTreeSet::from([Hex::new(-1, 0), Hex::new(0, -1), Hex::new(-1, 1)]);
        assert_eq!(white, expected);

        for cell in &white {
            for n in cell.neighbors() {
                if let Some(top) = board.top_at(n) {
                    assert_eq!(top.piece.color, Color::White);
                }
            }
        }
    }

    #[test]
    fn test_only_top_color_counts() {
        // black beetle on top of the white queen turns that cell black
        let board: Board = [
            (Piece::queen(Color::White), Hex::ORIGIN),
            (Piece::queen(Color::Black), Hex::new(1, 0)),
            (Piece::new(Color::Black, Bug::Beetle, 1), Hex::ORIGIN),
        ]
        .into_iter()
        .collect();

        assert!(valid_placements(&board, Color::White, 5).is_empty());
        let black = valid_placements(&board, Color::Black, 5);
        assert_eq!(black.len(), 8);
    }
}
