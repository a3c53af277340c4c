mod make_unmake;
mod perft;
mod search;
