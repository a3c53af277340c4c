use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tempo::{find_best_move_depth, init_tables, Board, TranspositionTable};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn bench_move_generation(c: &mut Criterion) {
    init_tables();
    let mut start = Board::new();
    let mut kiwipete = Board::try_from_fen(KIWIPETE).expect("valid FEN");

    c.bench_function("movegen_start_position", |b| {
        b.iter(|| black_box(start.generate_moves().len()))
    });
    c.bench_function("movegen_kiwipete", |b| {
        b.iter(|| black_box(kiwipete.generate_moves().len()))
    });
}

fn bench_make_unmake(c: &mut Criterion) {
    init_tables();
    let mut board = Board::new();
    let moves = board.generate_moves();

    c.bench_function("make_unmake_twenty_moves", |b| {
        b.iter(|| {
            for &m in &moves {
                let info = board.make_move(m);
                board.unmake_move(m, &info);
            }
            black_box(board.hash())
        })
    });
}

fn bench_perft(c: &mut Criterion) {
    init_tables();
    let mut board = Board::new();

    c.bench_function("perft_3_start_position", |b| {
        b.iter(|| black_box(board.perft(3)))
    });
}

fn bench_search(c: &mut Criterion) {
    init_tables();

    c.bench_function("search_depth_4_start_position", |b| {
        b.iter(|| {
            let mut board = Board::new();
            let mut tt = TranspositionTable::new(16);
            black_box(find_best_move_depth(&mut board, &mut tt, 4).score)
        })
    });
}

criterion_group!(
    benches,
    bench_move_generation,
    bench_make_unmake,
    bench_perft,
    bench_search
);
criterion_main!(benches);
