//! Win detection

use crate::board::Board;
use crate::game::GameResult;
use crate::pieces::{Color, Piece};

/// Whether `color`'s queen is on the board with all six neighbors occupied
pub fn is_surrounded(board: &Board, color: Color) -> bool {
    board
        .position(Piece::queen(color))
        .map_or(false, |hex| hex.neighbors().iter().all(|&n| board.is_occupied(n)))
}

/// Both queens are always evaluated, so a move that closes both rings is a
/// draw rather than a win for the mover.
pub fn check_winner(board: &Board) -> GameResult {
    let white_lost = is_surrounded(board, Color::White);
    let black_lost = is_surrounded(board, Color::Black);
    match (white_lost, black_lost) {
        (true, true) => GameResult::Draw,
        (true, false) => GameResult::BlackWins,
        (false, true) => GameResult::WhiteWins,
        (false, false) => GameResult::Ongoing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::Hex;
    use crate::pieces::Bug;

    fn filler(color: Color, n: u8) -> Piece {
        // any distinct ids will do
        let bugs = [Bug::Ant, Bug::Grasshopper, Bug::Spider, Bug::Beetle];
        let bug = bugs[(n as usize / 3) % bugs.len()];
        Piece::new(color, bug, n % bug.count() + 1)
    }

    fn surround(board: &mut Board, center: Hex, color: Color, skip: &[Hex]) {
        let mut n = 0;
        for cell in center.neighbors() {
            if board.is_occupied(cell) || skip.contains(&cell) {
                continue;
            }
            board.place(filler(color, n), cell);
            n += 1;
        }
    }

    #[test]
    fn test_no_queens_is_ongoing() {
        assert_eq!(check_winner(&Board::new()), GameResult::Ongoing);
    }

    #[test]
    fn test_single_surround_wins() {
        let mut board = Board::new();
        board.place(Piece::queen(Color::White), Hex::ORIGIN);
        board.place(Piece::queen(Color::Black), Hex::new(3, 0));
        surround(&mut board, Hex::ORIGIN, Color::Black, &[]);
        assert!(is_surrounded(&board, Color::White));
        assert!(!is_surrounded(&board, Color::Black));
        assert_eq!(check_winner(&board), GameResult::BlackWins);
    }

    #[test]
    fn test_both_surrounded_is_draw() {
        let mut board = Board::new();
        board.place(Piece::queen(Color::White), Hex::ORIGIN);
        board.place(Piece::queen(Color::Black), Hex::new(1, 0));
        surround(&mut board, Hex::ORIGIN, Color::White, &[]);
        surround(&mut board, Hex::new(1, 0), Color::Black, &[]);
        assert_eq!(check_winner(&board), GameResult::Draw);
    }

    #[test]
    fn test_covered_queen_still_counts() {
        let mut board = Board::new();
        board.place(Piece::queen(Color::Black), Hex::ORIGIN);
        board.place(Piece::new(Color::White, Bug::Beetle, 1), Hex::ORIGIN);
        surround(&mut board, Hex::ORIGIN, Color::White, &[Hex::new(1, 0)]);
        assert_eq!(check_winner(&board), GameResult::Ongoing);
        board.place(Piece::queen(Color::White), Hex::new(1, 0));
        assert_eq!(check_winner(&board), GameResult::WhiteWins);
    }
}
