use std::str::FromStr;

use crate::board::{Board, Color, Move, Piece, Square};

fn find(board: &mut Board, from: &str, to: &str) -> Move {
    let from = Square::from_str(from).unwrap();
    let to = Square::from_str(to).unwrap();
    board
        .find_move(from, to, None)
        .unwrap_or_else(|| panic!("{from}{to} should be legal"))
}

fn find_promo(board: &mut Board, from: &str, to: &str, promo: Piece) -> Move {
    let from = Square::from_str(from).unwrap();
    let to = Square::from_str(to).unwrap();
    board
        .find_move(from, to, Some(promo))
        .unwrap_or_else(|| panic!("{from}{to} promotion should be legal"))
}

#[test]
fn test_make_unmake_restores_position() {
    let mut board = Board::new();
    let fen_before = board.to_fen();
    let hash_before = board.hash();

    let m = find(&mut board, "e2", "e4");
    let info = board.make_move(m);
    assert_ne!(board.hash(), hash_before);
    board.unmake_move(m, &info);

    assert_eq!(board.to_fen(), fen_before);
    assert_eq!(board.hash(), hash_before);
}

#[test]
fn test_incremental_hash_matches_recompute() {
    let mut board = Board::new();
    for (from, to) in [("e2", "e4"), ("e7", "e5"), ("g1", "f3"), ("b8", "c6")] {
        let m = find(&mut board, from, to);
        board.make_move(m);
        assert_eq!(board.hash(), board.recompute_hash());
    }
}

#[test]
fn test_capture_updates_material() {
    // White pawn e4 takes black pawn d5.
    let mut board =
        Board::try_from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2")
            .unwrap();
    assert_eq!(board.material(), 0);
    let m = find(&mut board, "e4", "d5");
    assert!(m.is_capture());
    assert_eq!(m.captured, Some(Piece::Pawn));
    let info = board.make_move(m);
    assert_eq!(board.material(), 100);
    board.unmake_move(m, &info);
    assert_eq!(board.material(), 0);
}

#[test]
fn test_double_push_sets_en_passant_target() {
    let mut board = Board::new();
    let m = find(&mut board, "e2", "e4");
    assert!(m.is_double_pawn_push());
    board.make_move(m);
    assert_eq!(board.en_passant_target(), Some(Square::from_str("e3").unwrap()));

    // The window closes after the reply.
    let reply = find(&mut board, "g8", "f6");
    board.make_move(reply);
    assert_eq!(board.en_passant_target(), None);
}

#[test]
fn test_en_passant_capture_removes_victim() {
    // White pawn on e5, black just played d7d5.
    let mut board =
        Board::try_from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3")
            .unwrap();
    let m = find(&mut board, "e5", "d6");
    assert!(m.is_en_passant());
    assert!(m.is_capture());

    let fen_before = board.to_fen();
    let info = board.make_move(m);
    // The captured pawn sat on d5, not on the destination square.
    assert!(board.is_empty(Square::from_str("d5").unwrap()));
    assert_eq!(
        board.piece_at(Square::from_str("d6").unwrap()),
        Some((Color::White, Piece::Pawn))
    );
    assert_eq!(board.material(), 100);

    board.unmake_move(m, &info);
    assert_eq!(board.to_fen(), fen_before);
}

#[test]
fn test_promotion_swaps_pawn_for_piece() {
    let mut board = Board::try_from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
    let m = find_promo(&mut board, "a7", "a8", Piece::Queen);
    let info = board.make_move(m);
    assert_eq!(
        board.piece_at(Square::from_str("a8").unwrap()),
        Some((Color::White, Piece::Queen))
    );
    assert_eq!(board.material(), 900);
    board.unmake_move(m, &info);
    assert_eq!(
        board.piece_at(Square::from_str("a7").unwrap()),
        Some((Color::White, Piece::Pawn))
    );
    assert_eq!(board.material(), 100);
}

#[test]
fn test_underpromotion_to_knight() {
    let mut board = Board::try_from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
    let m = find_promo(&mut board, "a7", "a8", Piece::Knight);
    board.make_move(m);
    assert_eq!(
        board.piece_at(Square::from_str("a8").unwrap()),
        Some((Color::White, Piece::Knight))
    );
    assert_eq!(board.material(), 320);
}

#[test]
fn test_castling_moves_rook_and_clears_rights() {
    let mut board = Board::try_from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let m = find(&mut board, "e1", "g1");
    assert!(m.is_castling());

    let info = board.make_move(m);
    assert_eq!(
        board.piece_at(Square::from_str("f1").unwrap()),
        Some((Color::White, Piece::Rook))
    );
    assert!(board.is_empty(Square::from_str("h1").unwrap()));
    // White rights gone, black rights intact.
    assert!(board.to_fen().contains(" kq "));

    board.unmake_move(m, &info);
    assert!(board.to_fen().contains(" KQkq "));
}

#[test]
fn test_queenside_castling() {
    let mut board = Board::try_from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
    let m = find(&mut board, "e8", "c8");
    assert!(m.is_castling());
    board.make_move(m);
    assert_eq!(
        board.piece_at(Square::from_str("d8").unwrap()),
        Some((Color::Black, Piece::Rook))
    );
    assert!(board.is_empty(Square::from_str("a8").unwrap()));
}

#[test]
fn test_rook_move_revokes_one_right() {
    let mut board = Board::try_from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let m = find(&mut board, "h1", "h8");
    let info = board.make_move(m);
    // Kingside rights fall on both sides: the white rook left h1 and
    // captured the rook on h8.
    assert!(board.to_fen().contains(" Qq "));
    board.unmake_move(m, &info);
    assert!(board.to_fen().contains(" KQkq "));
}

#[test]
fn test_king_move_revokes_both_rights() {
    let mut board = Board::try_from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let m = find(&mut board, "e1", "e2");
    board.make_move(m);
    assert!(board.to_fen().contains(" kq "));
}

#[test]
fn test_halfmove_clock_resets_on_pawn_move_and_capture() {
    let mut board =
        Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 10 6").unwrap();
    let m = find(&mut board, "g1", "f3");
    board.make_move(m);
    assert_eq!(board.halfmove_clock(), 11);

    let m = find(&mut board, "e7", "e5");
    board.make_move(m);
    assert_eq!(board.halfmove_clock(), 0);
}

#[test]
fn test_fullmove_number_increments_after_black() {
    let mut board = Board::new();
    let m = find(&mut board, "e2", "e4");
    board.make_move(m);
    assert_eq!(board.fullmove_number(), 1);
    let m = find(&mut board, "e7", "e5");
    board.make_move(m);
    assert_eq!(board.fullmove_number(), 2);
}

#[test]
fn test_side_to_move_flips_hash() {
    // Identical placement, opposite side to move.
    let white = Board::try_from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let black = Board::try_from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
    assert_ne!(white.hash(), black.hash());
}

#[test]
fn test_en_passant_target_changes_hash() {
    let without =
        Board::try_from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq - 0 3")
            .unwrap();
    let with =
        Board::try_from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3")
            .unwrap();
    assert_ne!(without.hash(), with.hash());
}

#[test]
fn test_play_move_and_take_back() {
    let mut board = Board::new();
    let fen_before = board.to_fen();

    let e4 = find(&mut board, "e2", "e4");
    board.play_move(e4);
    let e5 = find(&mut board, "e7", "e5");
    board.play_move(e5);
    assert_eq!(board.played_moves(), 2);

    board.take_back();
    board.take_back();
    assert_eq!(board.played_moves(), 0);
    assert_eq!(board.to_fen(), fen_before);
}

#[test]
#[should_panic(expected = "take_back")]
fn test_take_back_on_fresh_board_panics() {
    let mut board = Board::new();
    board.take_back();
}

#[test]
fn test_null_move_round_trip() {
    let mut board =
        Board::try_from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3")
            .unwrap();
    let hash_before = board.hash();

    let info = board.make_null_move();
    assert!(!board.white_to_move());
    assert_eq!(board.en_passant_target(), None);
    assert_ne!(board.hash(), hash_before);
    assert_eq!(board.hash(), board.recompute_hash());

    board.unmake_null_move(info);
    assert!(board.white_to_move());
    assert_eq!(board.hash(), hash_before);
}

#[test]
fn test_transposition_reaches_same_hash() {
    // 1. Nf3 Nf6 2. Ng1 Ng8 returns to the start position.
    let mut board = Board::new();
    for (from, to) in [("g1", "f3"), ("g8", "f6"), ("f3", "g1"), ("f6", "g8")] {
        let m = find(&mut board, from, to);
        board.make_move(m);
    }
    // Clocks differ, but placement, rights, and side match the start.
    assert_eq!(board.hash(), Board::new().hash());
}
