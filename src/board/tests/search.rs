use std::str::FromStr;
use std::time::Duration;

use crate::board::search::MATE_SCORE;
use crate::board::{find_best_move, find_best_move_depth, Board, Square};
use crate::tt::TranspositionTable;

fn square(s: &str) -> Square {
    Square::from_str(s).unwrap()
}

#[test]
fn test_returns_legal_move_from_start() {
    let mut board = Board::new();
    let mut tt = TranspositionTable::new(1);
    let result = find_best_move_depth(&mut board, &mut tt, 3);

    let best = result.best_move.expect("the start position has moves");
    assert!(board.find_move(best.from, best.to, best.promotion).is_some());
    assert_eq!(result.stats.depth_reached, 3);
    assert!(result.stats.nodes > 0);
    // The start position is balanced; no material swing at shallow depth.
    assert_eq!(result.score, 0);
}

#[test]
fn test_finds_mate_in_one() {
    // Ra8 is the only mate.
    let mut board = Board::try_from_fen("7k/8/6K1/8/8/8/8/R7 w - - 0 1").unwrap();
    let mut tt = TranspositionTable::new(1);
    let result = find_best_move_depth(&mut board, &mut tt, 3);

    let best = result.best_move.expect("white has moves");
    assert_eq!(best.from, square("a1"));
    assert_eq!(best.to, square("a8"));
    assert!(best.is_checkmate());
    assert!(best.gives_check());
    assert_eq!(result.score, MATE_SCORE - 1);
}

#[test]
fn test_queen_mate_in_one_is_flagged() {
    // Both Qb8 and Qg7 mate; either answer must carry the checkmate flag.
    let mut board = Board::try_from_fen("7k/8/6K1/8/8/8/1Q6/8 w - - 0 1").unwrap();
    let mut tt = TranspositionTable::new(1);
    let result = find_best_move_depth(&mut board, &mut tt, 2);

    let best = result.best_move.expect("white has moves");
    assert!(best.is_checkmate());
    assert!(best.gives_check());
    assert_eq!(result.score, MATE_SCORE - 1);
}

#[test]
fn test_prefers_winning_a_queen() {
    // White to move; the black queen on d5 hangs to the rook on d1.
    let mut board = Board::try_from_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").unwrap();
    let mut tt = TranspositionTable::new(1);
    let result = find_best_move_depth(&mut board, &mut tt, 4);

    let best = result.best_move.expect("white has moves");
    assert_eq!(best.from, square("d1"));
    assert_eq!(best.to, square("d5"));
    assert!(best.is_capture());
}

#[test]
fn test_checkmated_position_reports_mate_score() {
    // Fool's mate; white to move has no legal reply.
    let mut board =
        Board::try_from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
    let mut tt = TranspositionTable::new(1);
    let result = find_best_move_depth(&mut board, &mut tt, 3);

    assert!(result.best_move.is_none());
    assert_eq!(result.score, -MATE_SCORE);
}

#[test]
fn test_stalemate_position_reports_draw_score() {
    let mut board = Board::try_from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let mut tt = TranspositionTable::new(1);
    let result = find_best_move_depth(&mut board, &mut tt, 3);

    assert!(result.best_move.is_none());
    assert_eq!(result.score, 0);
}

#[test]
fn test_exhausted_budget_still_returns_a_move() {
    let mut board = Board::new();
    let mut tt = TranspositionTable::new(1);
    let result = find_best_move(&mut board, &mut tt, Duration::ZERO);

    // Depth 1 always completes, clock or no clock.
    assert!(result.best_move.is_some());
    assert!(result.stats.depth_reached >= 1);
}

#[test]
fn test_time_budget_is_roughly_respected() {
    let mut board = Board::new();
    let mut tt = TranspositionTable::new(16);
    let budget = Duration::from_millis(200);

    let started = std::time::Instant::now();
    let result = find_best_move(&mut board, &mut tt, budget);
    let elapsed = started.elapsed();

    assert!(result.best_move.is_some());
    // Overshoot is bounded by one clock-check interval of nodes, which is
    // far below a second even in debug builds.
    assert!(elapsed < budget + Duration::from_secs(2));
}

#[test]
fn test_search_leaves_board_unchanged() {
    let mut board = Board::try_from_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").unwrap();
    let fen_before = board.to_fen();
    let hash_before = board.hash();

    let mut tt = TranspositionTable::new(1);
    find_best_move_depth(&mut board, &mut tt, 4);

    assert_eq!(board.to_fen(), fen_before);
    assert_eq!(board.hash(), hash_before);
}

#[test]
fn test_repeat_search_reuses_table() {
    let mut board = Board::new();
    let mut tt = TranspositionTable::new(16);

    let first = find_best_move_depth(&mut board, &mut tt, 4);
    let second = find_best_move_depth(&mut board, &mut tt, 4);

    // Same position and depth must agree on move and score; the warm
    // table only changes how fast the answer arrives.
    assert_eq!(first.best_move, second.best_move);
    assert_eq!(first.score, second.score);
    assert!(second.stats.nodes <= first.stats.nodes);
}

#[test]
fn test_mate_score_prefers_shortest_mate() {
    // Deep search of a mate-in-one position must still report the one-ply
    // mate; the ply offset makes longer mates score strictly lower.
    let mut board = Board::try_from_fen("7k/8/6K1/8/8/8/8/R7 w - - 0 1").unwrap();
    let mut tt = TranspositionTable::new(1);
    let result = find_best_move_depth(&mut board, &mut tt, 6);

    assert_eq!(result.score, MATE_SCORE - 1);
    assert_eq!(result.best_move.expect("white has moves").to, square("a8"));
}
