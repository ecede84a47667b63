use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use rust_boardplay::core::{Action, Board, Color, Move, Piece, Position};
use rust_boardplay::movetree::{MoveChooser, MoveTree};

/// Multi-jump style moves: every move starts with one of `starts` jumps and
/// continues with up to two follow-up jumps.
fn jump_moves(starts: i32) -> Vec<Move> {
    let mut moves = Vec::new();
    for s in 0..starts {
        let from = Position::new(0, s);
        let mid = Position::new(2, s);
        moves.push(Move::play([Action::jump(from, mid)]));
        for a in 0..4 {
            let second = Position::new(4, a);
            moves.push(Move::play([Action::jump(from, mid), Action::jump(mid, second)]));
            for b in 0..4 {
                let third = Position::new(6, b);
                moves.push(Move::play([
                    Action::jump(from, mid),
                    Action::jump(mid, second),
                    Action::jump(second, third),
                ]));
            }
        }
    }
    moves
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_tree_build");
    for starts in [2, 8, 32] {
        let moves = jump_moves(starts);
        group.throughput(Throughput::Elements(moves.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(starts), &moves, |b, moves| {
            b.iter(|| MoveTree::build(black_box(moves.clone())));
        });
    }
    group.finish();
}

fn bench_chooser_walk(c: &mut Criterion) {
    let moves = jump_moves(8);
    let mut board = Board::rect(8, 40);
    for s in 0..8 {
        board.put(Position::new(0, s), Piece::new(0, Color::new(0)));
    }

    c.bench_function("chooser_walk_and_back", |b| {
        b.iter(|| {
            let (chooser, _waiter) = MoveChooser::new(moves.clone(), board.clone());
            chooser.select(&[Position::new(0, 3)]).ok();
            chooser.jump_selection(Position::new(2, 3)).ok();
            chooser.select(&[Position::new(2, 3)]).ok();
            chooser.jump_selection(Position::new(4, 1)).ok();
            chooser.back().ok();
            black_box(chooser.back().ok())
        });
    });
}

criterion_group!(benches, bench_build, bench_chooser_walk);
criterion_main!(benches);
