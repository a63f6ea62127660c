//! Movement rules for pieces already on the board
//!
//! Every generator works on a scratch board with the mover lifted off its
//! origin. Two hive checks apply to every piece:
//! - lifting the mover must leave the hive connected (one hive in transit)
//! - dropping it on a candidate must leave the hive connected
//!
//! Ground movement ("crawling") between adjacent cells needs exactly one of
//! the two gate cells occupied: both occupied means the gap is too narrow,
//! both empty means the piece would lose contact with the hive. Movement at
//! height (climbing) is blocked only when both gates are stacked higher than
//! both ends of the step.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use rustc_hash::FxHashSet;

use crate::board::Board;
use crate::hex::Hex;
use crate::pieces::{Bug, Piece};

/// Legal destinations for a piece on the board.
///
/// Empty when the piece is not on the board, is covered, is `frozen`, or
/// holds the hive together.
pub fn valid_moves(board: &Board, piece: Piece, frozen: Option<Piece>) -> BTreeSet<Hex> {
    let placed = match board.find(piece) {
        Some(p) => *p,
        None => return BTreeSet::new(),
    };
    if frozen == Some(piece) || board.is_covered(piece) {
        return BTreeSet::new();
    }

    let origin = placed.hex;
    let mut scratch = board.clone();
    scratch.lift(origin);
    if !scratch.is_connected() {
        return BTreeSet::new();
    }

    let candidates = match piece.bug {
        Bug::Mosquito if placed.height > 0 => beetle_moves(&scratch, origin),
        Bug::Mosquito => mosquito_moves(board, &scratch, origin),
        bug => moves_as(bug, &scratch, origin),
    };

    candidates
        .into_iter()
        .filter(|&to| to != origin && scratch.is_connected_with(Some(to)))
        .collect()
}

/// Pillbug special: adjacent pieces the thrower may relocate, with the
/// cells each may be dropped on. A mosquito touching a pillbug gets the same
/// ability. Empty for anything else.
pub fn valid_throws(
    board: &Board,
    thrower: Piece,
    frozen: Option<Piece>,
) -> BTreeMap<Piece, BTreeSet<Hex>> {
    let mut throws = BTreeMap::new();

    let placed = match board.find(thrower) {
        Some(p) => *p,
        None => return throws,
    };
    if frozen == Some(thrower)
        || placed.height > 0
        || board.is_covered(thrower)
        || !can_throw(board, placed.piece, placed.hex)
    {
        return throws;
    }
    let center = placed.hex;

    for from in center.neighbors() {
        if board.height_at(from) != 1 {
            continue;
        }
        let target = match board.top_at(from) {
            Some(t) if frozen != Some(t.piece) => t.piece,
            _ => continue,
        };

        let mut scratch = board.clone();
        scratch.lift(from);
        if !scratch.is_connected() || !climb_ok(&scratch, from, center) {
            continue;
        }

        let cells: BTreeSet<Hex> = center
            .neighbors()
            .into_iter()
            .filter(|&to| to != from && !scratch.is_occupied(to))
            .filter(|&to| climb_ok(&scratch, center, to))
            .filter(|&to| scratch.is_connected_with(Some(to)))
            .collect();
        if !cells.is_empty() {
            throws.insert(target, cells);
        }
    }

    throws
}

fn can_throw(board: &Board, piece: Piece, at: Hex) -> bool {
    match piece.bug {
        Bug::Pillbug => true,
        Bug::Mosquito => at
            .neighbors()
            .into_iter()
            .filter_map(|n| board.top_at(n))
            .any(|t| t.piece.bug == Bug::Pillbug),
        _ => false,
    }
}

// ============================================================================
// PER-KIND GENERATION
// ============================================================================

fn moves_as(bug: Bug, scratch: &Board, origin: Hex) -> FxHashSet<Hex> {
    match bug {
        Bug::Queen | Bug::Pillbug => crawls(scratch, origin).collect(),
        Bug::Beetle => beetle_moves(scratch, origin),
        Bug::Grasshopper => grasshopper_moves(scratch, origin),
        Bug::Spider => spider_moves(scratch, origin),
        Bug::Ant => ant_moves(scratch, origin),
        Bug::Ladybug => ladybug_moves(scratch, origin),
        // a mosquito copying a mosquito gains nothing
        Bug::Mosquito => FxHashSet::default(),
    }
}

/// Ground-level mosquito: union of the movements of adjacent kinds
fn mosquito_moves(board: &Board, scratch: &Board, origin: Hex) -> FxHashSet<Hex> {
    let kinds: BTreeSet<Bug> = origin
        .neighbors()
        .into_iter()
        .filter_map(|n| board.top_at(n))
        .map(|t| t.piece.bug)
        .collect();

    kinds
        .into_iter()
        .flat_map(|bug| moves_as(bug, scratch, origin))
        .collect()
}

fn beetle_moves(scratch: &Board, origin: Hex) -> FxHashSet<Hex> {
    let on_ground = !scratch.is_occupied(origin);
    origin
        .neighbors()
        .into_iter()
        .filter(|&to| {
            if on_ground && !scratch.is_occupied(to) {
                can_crawl(scratch, origin, to)
            } else {
                climb_ok(scratch, origin, to)
            }
        })
        .collect()
}

fn grasshopper_moves(scratch: &Board, origin: Hex) -> FxHashSet<Hex> {
    let mut out = FxHashSet::default();
    for dir in 0..6u8 {
        let mut current = origin.neighbor(dir);
        if !scratch.is_occupied(current) {
            continue;
        }
        while scratch.is_occupied(current) {
            current = current.neighbor(dir);
        }
        out.insert(current);
    }
    out
}

fn spider_moves(scratch: &Board, origin: Hex) -> FxHashSet<Hex> {
    fn walk(scratch: &Board, path: &mut Vec<Hex>, out: &mut FxHashSet<Hex>) {
        let last = match path.last() {
            Some(&h) => h,
            None => return,
        };
        if path.len() == 4 {
            out.insert(last);
            return;
        }
        for next in crawls(scratch, last) {
            if !path.contains(&next) {
                path.push(next);
                walk(scratch, path, out);
                path.pop();
            }
        }
    }

    let mut out = FxHashSet::default();
    walk(scratch, &mut vec![origin], &mut out);
    out
}

fn ant_moves(scratch: &Board, origin: Hex) -> FxHashSet<Hex> {
    let mut seen = FxHashSet::default();
    let mut queue = VecDeque::from([origin]);
    seen.insert(origin);
    while let Some(current) = queue.pop_front() {
        for next in crawls(scratch, current) {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen.remove(&origin);
    seen
}

/// Two steps across the top of the hive, then one step down
fn ladybug_moves(scratch: &Board, origin: Hex) -> FxHashSet<Hex> {
    let mut out = FxHashSet::default();
    for first in origin.neighbors() {
        if !scratch.is_occupied(first) || !climb_ok(scratch, origin, first) {
            continue;
        }
        for second in first.neighbors() {
            if second == origin || !scratch.is_occupied(second) || !climb_ok(scratch, first, second) {
                continue;
            }
            for down in second.neighbors() {
                if down != first && !scratch.is_occupied(down) && climb_ok(scratch, second, down) {
                    out.insert(down);
                }
            }
        }
    }
    out
}

// ============================================================================
// STEP PRIMITIVES
// ============================================================================

/// Ground cells reachable by one crawl from `from`
fn crawls(scratch: &Board, from: Hex) -> impl Iterator<Item = Hex> + '_ {
    from.neighbors()
        .into_iter()
        .filter(move |&to| can_crawl(scratch, from, to))
}

fn can_crawl(scratch: &Board, from: Hex, to: Hex) -> bool {
    let dir = match from.direction_to(to) {
        Some(d) => d,
        None => return false,
    };
    if scratch.is_occupied(to) {
        return false;
    }
    let (left, right) = from.gates(dir);
    scratch.is_occupied(left) != scratch.is_occupied(right)
}

/// Step between adjacent cells at height. The mover sits on whatever is
/// left at `from` and lands on whatever is at `to`.
fn climb_ok(scratch: &Board, from: Hex, to: Hex) -> bool {
    let dir = match from.direction_to(to) {
        Some(d) => d,
        None => return false,
    };
    let (left, right) = from.gates(dir);
    let level = scratch.height_at(from).max(scratch.height_at(to));
    if level == 0 {
        return can_crawl(scratch, from, to);
    }
    !(scratch.height_at(left) > level && scratch.height_at(right) > level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::Color::{Black, White};

    fn p(id: &str) -> Piece {
        id.parse().unwrap()
    }

    fn board(pieces: &[(&str, (i32, i32))]) -> Board {
        pieces.iter().map(|&(id, (q, r))| (p(id), Hex::new(q, r))).collect()
    }

    fn hexes(cells: &[(i32, i32)]) -> BTreeSet<Hex> {
        cells.iter().map(|&(q, r)| Hex::new(q, r)).collect()
    }

    /// Queens side by side with a third piece west of the white queen
    fn domino_with(id: &str) -> Board {
        board(&[("wQ", (0, 0)), ("bQ", (1, 0)), (id, (-1, 0))])
    }

    #[test]
    fn test_queen_crawls_around_partner() {
        let b = board(&[("wQ", (0, 0)), ("bQ", (1, 0))]);
        let moves = valid_moves(&b, Piece::queen(White), None);
        assert_eq!(moves, hexes(&[(1, -1), (0, 1)]));
    }

    #[test]
    fn test_queen_cannot_squeeze_through_gate() {
        // five neighbors filled in a ring, the open side is gated
        let b = board(&[
            ("wQ", (0, 0)),
            ("wA1", (1, 0)),
            ("wA2", (0, 1)),
            ("bA1", (-1, 1)),
            ("bA2", (-1, 0)),
            ("bQ", (0, -1)),
        ]);
        assert!(valid_moves(&b, Piece::queen(White), None).is_empty());
    }

    #[test]
    fn test_beetle_climbs_and_crawls() {
        let b = domino_with("wB1");
        let moves = valid_moves(&b, p("wB1"), None);
        assert_eq!(moves, hexes(&[(0, 0), (0, -1), (-1, 1)]));
    }

    #[test]
    fn test_beetle_on_top_reaches_every_neighbor() {
        let b = board(&[("wQ", (0, 0)), ("bQ", (1, 0)), ("wB1", (0, 0))]);
        let moves = valid_moves(&b, p("wB1"), None);
        let expected: BTreeSet<Hex> = Hex::ORIGIN.neighbors().into_iter().collect();
        assert_eq!(moves, expected);
        // the queen underneath is pinned
        assert!(valid_moves(&b, Piece::queen(White), None).is_empty());
    }

    #[test]
    fn test_beetle_blocked_between_taller_stacks() {
        // beetle on the white queen; the step east passes between two 2-high stacks
        let gated = board(&[
            ("wQ", (0, 0)),
            ("wB1", (0, 0)),
            ("bQ", (1, -1)),
            ("bB1", (1, -1)),
            ("wA1", (0, 1)),
            ("wB2", (0, 1)),
        ]);
        let moves = valid_moves(&gated, p("wB1"), None);
        assert_eq!(moves, hexes(&[(-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1)]));

        // same layout with single pieces on the sides: the step is open
        let open = board(&[("wQ", (0, 0)), ("wB1", (0, 0)), ("bQ", (1, -1)), ("wA1", (0, 1))]);
        assert!(valid_moves(&open, p("wB1"), None).contains(&Hex::new(1, 0)));
    }

    #[test]
    fn test_grasshopper_lands_past_single_neighbor() {
        let b = board(&[("wG1", (-1, 0)), ("wQ", (0, 0)), ("bQ", (0, 1))]);
        let moves = valid_moves(&b, p("wG1"), None);
        assert_eq!(moves, hexes(&[(1, 0)]));
        assert!(!moves.contains(&Hex::ORIGIN));
    }

    #[test]
    fn test_grasshopper_jumps_over_a_line() {
        let b = domino_with("wG1");
        assert_eq!(valid_moves(&b, p("wG1"), None), hexes(&[(2, 0)]));
    }

    #[test]
    fn test_spider_walks_exactly_three() {
        let b = domino_with("wS1");
        assert_eq!(valid_moves(&b, p("wS1"), None), hexes(&[(2, -1), (1, 1)]));
    }

    #[test]
    fn test_ant_reaches_whole_perimeter() {
        let b = domino_with("wA1");
        let moves = valid_moves(&b, p("wA1"), None);
        let expected = hexes(&[(0, -1), (1, -1), (2, -1), (2, 0), (1, 1), (0, 1), (-1, 1)]);
        assert_eq!(moves, expected);
    }

    #[test]
    fn test_ant_cannot_enter_enclosed_hole() {
        // ring of six around an empty center; the ant sits outside
        let mut b = board(&[
            ("wQ", (1, 0)),
            ("wA1", (0, 1)),
            ("wA2", (-1, 1)),
            ("bA1", (-1, 0)),
            ("bA2", (0, -1)),
            ("bQ", (1, -1)),
        ]);
        b.place(p("wA3"), Hex::new(2, 0));
        let moves = valid_moves(&b, p("wA3"), None);
        assert!(!moves.is_empty());
        assert!(!moves.contains(&Hex::ORIGIN));
    }

    #[test]
    fn test_ladybug_over_and_down() {
        let b = domino_with("wL");
        let moves = valid_moves(&b, p("wL"), None);
        assert_eq!(moves, hexes(&[(2, -1), (2, 0), (1, 1), (0, 1), (1, -1)]));
    }

    #[test]
    fn test_ladybug_cannot_drop_through_gate() {
        // the only way over the hive is across the white queen at the origin
        let gated = board(&[
            ("wL", (-2, 0)),
            ("wA1", (-1, 0)),
            ("wQ", (0, 0)),
            ("bQ", (1, -1)),
            ("bB1", (1, -1)),
            ("wA2", (0, 1)),
            ("wB1", (0, 1)),
        ]);
        assert_eq!(valid_moves(&gated, p("wL"), None), hexes(&[(-1, 1), (0, -1)]));

        let open = board(&[
            ("wL", (-2, 0)),
            ("wA1", (-1, 0)),
            ("wQ", (0, 0)),
            ("bQ", (1, -1)),
            ("wA2", (0, 1)),
        ]);
        assert_eq!(valid_moves(&open, p("wL"), None), hexes(&[(-1, 1), (0, -1), (1, 0)]));
    }

    #[test]
    fn test_mosquito_copies_neighbors() {
        let b = board(&[("wM", (-1, 0)), ("wG1", (0, 0)), ("bQ", (1, 0))]);
        assert_eq!(valid_moves(&b, p("wM"), None), hexes(&[(2, 0)]));

        let lonely = board(&[("wM", (-1, 0)), ("bM", (0, 0)), ("bQ", (1, 0))]);
        assert!(valid_moves(&lonely, p("wM"), None).is_empty());
    }

    #[test]
    fn test_mosquito_on_top_moves_as_beetle() {
        let b = board(&[("wQ", (0, 0)), ("bQ", (1, 0)), ("wM", (0, 0))]);
        assert_eq!(valid_moves(&b, p("wM"), None).len(), 6);
    }

    #[test]
    fn test_bridge_piece_is_pinned() {
        // two clusters of three joined through the origin
        let b = board(&[
            ("wQ", (-1, 0)),
            ("wS1", (-2, 0)),
            ("wS2", (-2, 1)),
            ("wA1", (0, 0)),
            ("bQ", (1, 0)),
            ("bS1", (2, 0)),
            ("bS2", (2, -1)),
        ]);
        assert!(valid_moves(&b, p("wA1"), None).is_empty());

        let beetle_bridge = board(&[
            ("wQ", (-1, 0)),
            ("wS1", (-2, 0)),
            ("wS2", (-2, 1)),
            ("wB1", (0, 0)),
            ("bQ", (1, 0)),
            ("bS1", (2, 0)),
            ("bS2", (2, -1)),
        ]);
        assert!(valid_moves(&beetle_bridge, p("wB1"), None).is_empty());
    }

    #[test]
    fn test_every_destination_keeps_hive_connected() {
        let b = board(&[
            ("wQ", (0, 0)),
            ("bQ", (1, 0)),
            ("wA1", (-1, 0)),
            ("bA1", (2, 0)),
            ("wB1", (-1, 1)),
            ("bG1", (2, -1)),
            ("wS1", (0, -1)),
        ]);
        for placed in b.tops() {
            for to in valid_moves(&b, placed.piece, None) {
                let mut after = b.clone();
                after.move_piece(placed.piece, to).unwrap();
                assert!(after.is_connected(), "{} to {} split the hive", placed.piece, to);
                assert_eq!(after.top_at(to).map(|t| t.piece), Some(placed.piece));
            }
        }
    }

    #[test]
    fn test_frozen_piece_has_no_moves() {
        let b = domino_with("wA1");
        assert!(valid_moves(&b, p("wA1"), Some(p("wA1"))).is_empty());
        assert!(!valid_moves(&b, p("wA1"), Some(p("bQ"))).is_empty());
    }

    #[test]
    fn test_queries_are_repeatable() {
        let b = domino_with("wA1");
        assert_eq!(valid_moves(&b, p("wA1"), None), valid_moves(&b, p("wA1"), None));
    }

    #[test]
    fn test_pillbug_throws() {
        let b = board(&[("wP", (0, 0)), ("bQ", (1, 0)), ("wQ", (-1, 0))]);
        let throws = valid_throws(&b, p("wP"), None);
        let cells = hexes(&[(0, 1), (-1, 1), (0, -1), (1, -1)]);
        assert_eq!(throws.get(&Piece::queen(Black)), Some(&cells));
        assert_eq!(throws.get(&Piece::queen(White)), Some(&cells));

        let frozen = valid_throws(&b, p("wP"), Some(Piece::queen(Black)));
        assert!(!frozen.contains_key(&Piece::queen(Black)));
        assert!(frozen.contains_key(&Piece::queen(White)));

        assert!(valid_throws(&b, p("wP"), Some(p("wP"))).is_empty());
        assert!(valid_throws(&b, Piece::queen(White), None).is_empty());
    }

    #[test]
    fn test_throw_respects_gates_at_height() {
        // drop east of the pillbug passes between two 2-high stacks
        let b = board(&[
            ("wP", (0, 0)),
            ("wA1", (-1, 0)),
            ("bQ", (1, -1)),
            ("bB1", (1, -1)),
            ("wQ", (0, 1)),
            ("wB1", (0, 1)),
        ]);
        let throws = valid_throws(&b, p("wP"), None);
        assert_eq!(throws.len(), 1);
        assert_eq!(throws.get(&p("wA1")), Some(&hexes(&[(-1, 1), (0, -1)])));

        // climb onto the pillbug squeezes between two 2-high stacks
        let b = board(&[
            ("wP", (0, 0)),
            ("wA1", (-1, 0)),
            ("bQ", (0, -1)),
            ("bB1", (0, -1)),
            ("wQ", (-1, 1)),
            ("wB1", (-1, 1)),
        ]);
        assert!(valid_throws(&b, p("wP"), None).is_empty());
    }

    #[test]
    fn test_pillbug_cannot_throw_stacked() {
        let b = board(&[("wP", (0, 0)), ("bQ", (1, 0)), ("bB1", (1, 0)), ("wQ", (-1, 0))]);
        let throws = valid_throws(&b, p("wP"), None);
        assert!(!throws.contains_key(&p("bB1")));
        assert!(!throws.contains_key(&Piece::queen(Black)));
    }

    #[test]
    fn test_mosquito_borrows_throw() {
        let b = board(&[("wM", (0, 0)), ("bP", (1, 0)), ("wQ", (-1, 0))]);
        let throws = valid_throws(&b, p("wM"), None);
        assert!(throws.contains_key(&Piece::queen(White)));

        let no_pillbug = board(&[("wM", (0, 0)), ("bQ", (1, 0)), ("wQ", (-1, 0))]);
        assert!(valid_throws(&no_pillbug, p("wM"), None).is_empty());
    }
}
