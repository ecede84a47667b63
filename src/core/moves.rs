//! Full moves: one player's complete turn.

use serde::{Deserialize, Serialize};

use super::action::Action;

/// A complete turn.
///
/// `Play` moves always carry at least one action; use [`Move::play`] to
/// build them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Move {
    /// Skip the turn.
    Pass,
    /// Give up the match.
    Resign,
    /// An ordered, non-empty sequence of actions.
    Play(Vec<Action>),
}

impl Move {
    /// Create an action move.
    ///
    /// # Panics
    ///
    /// Panics if `actions` is empty.
    #[must_use]
    pub fn play(actions: impl IntoIterator<Item = Action>) -> Self {
        let actions: Vec<Action> = actions.into_iter().collect();
        assert!(!actions.is_empty(), "A played move needs at least one action");
        Move::Play(actions)
    }

    /// The actions of a `Play` move; empty for `Pass` and `Resign`.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        match self {
            Move::Play(actions) => actions,
            Move::Pass | Move::Resign => &[],
        }
    }

    /// True for `Pass` and `Resign`.
    #[must_use]
    pub fn is_control(&self) -> bool {
        !matches!(self, Move::Play(_))
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Pass => write!(f, "pass"),
            Move::Resign => write!(f, "resign"),
            Move::Play(actions) => {
                let kinds: Vec<_> = actions.iter().map(Action::kind_name).collect();
                write!(f, "play[{}]", kinds.join(","))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Color, Piece, Position};

    #[test]
    fn test_play_move() {
        let add = Action::add(Piece::new(0, Color::new(0)), Position::new(1, 1));
        let mv = Move::play([add.clone()]);

        assert_eq!(mv.actions(), &[add]);
        assert!(!mv.is_control());
        assert_eq!(mv.to_string(), "play[add]");
    }

    #[test]
    fn test_control_moves() {
        assert!(Move::Pass.is_control());
        assert!(Move::Resign.is_control());
        assert!(Move::Pass.actions().is_empty());
        assert_ne!(Move::Pass, Move::Resign);
    }

    #[test]
    #[should_panic(expected = "at least one action")]
    fn test_empty_play_rejected() {
        let _ = Move::play(Vec::new());
    }
}
