//! Property tests for the move tree, board inverses and chooser undo.
//!
//! Increase cases locally with: PROPTEST_CASES=1000 cargo test

use std::env;

use proptest::prelude::*;

use rust_boardplay::core::{Action, Board, Color, Dir, Move, Piece, Position};
use rust_boardplay::movetree::{MoveChooser, MoveTree, NodeId};

const SIDE: i32 = 4;

fn proptest_config() -> ProptestConfig {
    let cases = env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(128);

    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}

// =============================================================================
// Generators
// =============================================================================

fn position() -> impl Strategy<Value = Position> {
    (0..SIDE, 0..SIDE).prop_map(|(row, col)| Position::new(row, col))
}

fn piece() -> impl Strategy<Value = Piece> {
    (0..3u8, 0..2u8).prop_map(|(species, color)| Piece::new(species, Color::new(color)))
}

fn positions() -> impl Strategy<Value = Vec<Position>> {
    prop::collection::vec(position(), 1..4)
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (piece(), position()).prop_map(|(piece, pos)| Action::add(piece, pos)),
        positions().prop_map(|cells| Action::remove(&cells)),
        (prop::sample::select(Dir::ALL.to_vec()), 1..3u32, positions())
            .prop_map(|(dir, steps, cells)| Action::move_pieces(dir, steps, &cells)),
        (position(), position()).prop_map(|(from, to)| Action::jump(from, to)),
        (piece(), positions()).prop_map(|(piece, cells)| Action::swap(piece, &cells)),
    ]
}

fn play_moves() -> impl Strategy<Value = Vec<Move>> {
    prop::collection::vec(prop::collection::vec(action(), 1..4).prop_map(Move::play), 0..12)
}

fn board() -> impl Strategy<Value = Board> {
    prop::collection::vec((position(), piece()), 0..10).prop_map(|pieces| {
        let mut board = Board::rect(SIDE, SIDE);
        for (pos, piece) in pieces {
            board.put(pos, piece);
        }
        board
    })
}

/// Commit the chooser to the child whose sub-move starts with `first`.
fn follow(chooser: &MoveChooser, first: &Action) -> Option<Vec<Action>> {
    let mut key: Vec<Position> = first.positions().to_vec();
    key.sort();
    key.dedup();
    chooser.select(&key).ok()?;
    match first {
        Action::Add { piece, .. } | Action::Swap { piece, .. } => chooser.do_selection(Some(*piece)),
        Action::Remove { .. } => chooser.do_selection(None),
        Action::Jump { to, .. } => chooser.jump_selection(*to),
        Action::Move { dir, steps, .. } => chooser.move_selection(*dir, *steps),
    }
    .ok()
    .flatten()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn prop_tree_flattens_to_its_moves(moves in play_moves()) {
        let tree = MoveTree::build(moves.clone());

        let mut expected = moves;
        expected.sort();
        expected.dedup();
        let mut flat = tree.moves();
        flat.sort();
        prop_assert_eq!(flat, expected);
    }

    #[test]
    fn prop_tree_shape(moves in play_moves()) {
        let tree = MoveTree::build(moves);

        for id in (0..tree.len() as u32).map(NodeId::new) {
            let node = tree.get(id);
            let mut firsts: Vec<&Action> =
                tree.children(id).iter().map(|&c| &tree.sub_move(c)[0]).collect();
            let count = firsts.len();
            firsts.sort();
            firsts.dedup();
            prop_assert_eq!(firsts.len(), count, "siblings share a first action");

            if !node.is_final {
                prop_assert!(tree.children(id).len() >= 2, "non-final node without a branch");
            }
            if let Some(parent) = tree.parent(id) {
                prop_assert!(!tree.sub_move(id).is_empty());
                prop_assert!(node.actions.starts_with(&tree.get(parent).actions));
            }
        }
    }

    #[test]
    fn prop_inverse_restores_board(before in board(), action in action()) {
        let undo = before.inverse(&action);

        let mut board = before.clone();
        board.apply(&action);
        board.apply_all(&undo);
        prop_assert_eq!(board, before);
    }

    #[test]
    fn prop_chooser_walk_and_back(moves in play_moves(), start in board()) {
        let (chooser, _waiter) = MoveChooser::new(moves, start.clone());
        let initial = chooser.board().unwrap();

        let mut expected = start;
        expected.apply_all(&chooser.sub_move().unwrap());
        prop_assert_eq!(&initial, &expected);

        let mut depth = 0;
        loop {
            let children = chooser.children_sub_moves().unwrap();
            let Some(first) = children.first().map(|sub| sub[0].clone()) else {
                break;
            };
            let Some(applied) = follow(&chooser, &first) else {
                break;
            };
            expected.apply_all(&applied);
            prop_assert_eq!(chooser.board().unwrap(), expected.clone());
            depth += 1;
        }

        for _ in 0..depth {
            chooser.back().unwrap();
        }
        prop_assert_eq!(chooser.back().unwrap(), None);
        prop_assert_eq!(chooser.board().unwrap(), initial);
    }
}
