//! Properties checked over seeded random games

use hexhive_core::{
    check_winner, Color, GameResult, GameState, Move, Piece, RandomPlayer, Rules,
};

const SEEDS: [u64; 6] = [1, 2, 3, 17, 42, 1234];
const MAX_TURNS: u32 = 120;

/// Step through a random game, handing every position to `check`
fn walk(rules: Rules, seed: u64, mut check: impl FnMut(&GameState, Move, &GameState)) {
    let mut player = RandomPlayer::new(seed);
    let mut state = GameState::new(rules);
    for _ in 0..MAX_TURNS {
        let Some(mv) = player.choose(&state) else {
            break;
        };
        let next = state
            .apply(mv)
            .unwrap_or_else(|e| panic!("seed {seed}: generated {mv:?} rejected: {e}"));
        check(&state, mv, &next);
        state = next;
    }
}

fn all_rules() -> Vec<Rules> {
    vec![Rules::standard(), Rules::tournament(), Rules::casual()]
}

#[test]
fn hive_stays_connected() {
    for rules in all_rules() {
        for seed in SEEDS {
            walk(rules.clone(), seed, |_, mv, next| {
                assert!(next.board().is_connected(), "seed {seed}: {mv:?} split the hive");
            });
        }
    }
}

#[test]
fn placements_never_touch_opponent_after_second_turn() {
    for seed in SEEDS {
        walk(Rules::tournament(), seed, |state, _, _| {
            if state.turn() <= 2 {
                return;
            }
            let color = state.current_player();
            for cell in state.valid_placements() {
                assert!(!state.board().is_occupied(cell));
                for n in cell.neighbors() {
                    if let Some(top) = state.board().top_at(n) {
                        assert_eq!(top.piece.color, color, "seed {seed}: {cell} touches opponent");
                    }
                }
            }
        });
    }
}

#[test]
fn moved_piece_lands_on_top() {
    for seed in SEEDS {
        walk(Rules::tournament(), seed, |_, mv, next| {
            let (piece, to) = match mv {
                Move::Place { piece, to } | Move::Move { piece, to, .. } | Move::Throw { piece, to, .. } => {
                    (piece, to)
                }
                Move::Pass => return,
            };
            assert_eq!(next.board().top_at(to).map(|t| t.piece), Some(piece));
        });
    }
}

#[test]
fn pieces_are_conserved() {
    for rules in all_rules() {
        let start = GameState::new(rules.clone());
        let total = start.hand(Color::White).len() + start.hand(Color::Black).len();
        for seed in SEEDS {
            walk(rules.clone(), seed, |_, _, next| {
                let in_hand = next.hand(Color::White).len() + next.hand(Color::Black).len();
                assert_eq!(in_hand + next.board().len(), total);
            });
        }
    }
}

#[test]
fn queen_is_down_by_the_deadline() {
    for seed in SEEDS {
        walk(Rules::standard(), seed, |_, mv, next| {
            // the mover's fourth own turn has just ended
            let mover = next.current_player().opponent();
            if next.turn() >= 8 && mv != Move::Pass {
                assert!(next.queen_placed(mover), "seed {seed}: {mover:?} has no queen");
            }
        });
    }
}

#[test]
fn result_matches_checker_and_stops_play() {
    for rules in all_rules() {
        for seed in SEEDS {
            walk(rules.clone(), seed, |_, _, next| {
                assert_eq!(next.result(), check_winner(next.board()));
                if next.result() != GameResult::Ongoing {
                    assert!(next.legal_moves().is_empty());
                }
            });
        }
    }
}

#[test]
fn apply_leaves_source_untouched_and_queries_repeat() {
    for seed in SEEDS {
        walk(Rules::tournament(), seed, |state, mv, _| {
            let copy = state.clone();
            let _ = state.apply(mv);
            assert_eq!(*state, copy);
            assert_eq!(state.legal_moves(), copy.legal_moves());
        });
    }
}

#[test]
fn frozen_piece_never_offered() {
    for seed in SEEDS {
        walk(Rules::tournament(), seed, |state, _, _| {
            let stuck = |piece: Piece| state.is_frozen(piece) || state.last_moved() == Some(piece);
            for mv in state.legal_moves() {
                match mv {
                    Move::Move { piece, .. } => assert!(!state.is_frozen(piece), "{:?}", mv),
                    Move::Throw { by, piece, .. } => {
                        assert!(!stuck(by), "{:?}", mv);
                        assert!(!stuck(piece), "{:?}", mv);
                    }
                    _ => {}
                }
            }
        });
    }
}

#[test]
fn own_last_piece_rests_under_standard_rules() {
    for seed in SEEDS {
        walk(Rules::standard(), seed, |state, _, _| {
            let Some(frozen) = state.frozen() else {
                return;
            };
            assert_eq!(frozen.color, state.current_player());
            assert!(!state
                .legal_moves()
                .iter()
                .any(|m| matches!(m, Move::Move { piece, .. } if *piece == frozen)));
        });
    }
}
