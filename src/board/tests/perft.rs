use crate::board::Board;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

#[test]
fn test_perft_initial_position() {
    let mut board = Board::new();
    assert_eq!(board.perft(1), 20);
    assert_eq!(board.perft(2), 400);
    assert_eq!(board.perft(3), 8_902);
}

#[test]
fn test_perft_kiwipete() {
    // Heavy on castling, pins, promotions, and en passant.
    let mut board = Board::try_from_fen(KIWIPETE).unwrap();
    assert_eq!(board.perft(1), 48);
    assert_eq!(board.perft(2), 2_039);
}

#[test]
fn test_perft_en_passant_position() {
    // Position 3 from the standard perft suite.
    let mut board = Board::try_from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap();
    assert_eq!(board.perft(1), 14);
    assert_eq!(board.perft(2), 191);
    assert_eq!(board.perft(3), 2_812);
}

#[test]
fn test_perft_promotion_position() {
    // Position 4 from the standard perft suite; promotion heavy.
    let mut board =
        Board::try_from_fen("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1")
            .unwrap();
    assert_eq!(board.perft(1), 6);
    assert_eq!(board.perft(2), 264);
}

#[test]
fn test_perft_leaves_board_unchanged() {
    let mut board = Board::try_from_fen(KIWIPETE).unwrap();
    let fen_before = board.to_fen();
    let hash_before = board.hash();
    board.perft(2);
    assert_eq!(board.to_fen(), fen_before);
    assert_eq!(board.hash(), hash_before);
}
