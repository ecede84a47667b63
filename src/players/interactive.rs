//! Human player driven through a [`MoveChooser`].
//!
//! On its turn the player builds a chooser over its own engine copy, sends
//! it to the front-end over a channel, and blocks until the front-end makes
//! the move. If the front-end is gone (its receiver or the chooser dropped),
//! the player resigns.

use std::sync::mpsc::Sender;

use tracing::{debug, info, warn};

use super::Player;
use crate::core::{Move, PlayerId};
use crate::error::Result;
use crate::movetree::MoveChooser;
use crate::rules::{GameRuler, PlayerFactory};

/// Player whose moves come from a front-end.
pub struct InteractivePlayer {
    name: String,
    front_end: Sender<MoveChooser>,
    game: Option<Box<dyn GameRuler>>,
}

impl InteractivePlayer {
    #[must_use]
    pub fn new(name: impl Into<String>, front_end: Sender<MoveChooser>) -> Self {
        Self {
            name: name.into(),
            front_end,
            game: None,
        }
    }
}

impl Player for InteractivePlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_game(&mut self, game: Box<dyn GameRuler>) {
        self.game = Some(game);
    }

    fn get_move(&mut self) -> Move {
        let Some(game) = &self.game else {
            warn!(player = %self.name, "asked to move before receiving a game");
            return Move::Resign;
        };

        let (chooser, waiter) = MoveChooser::new(game.valid_moves(), game.board());
        if self.front_end.send(chooser).is_err() {
            info!(player = %self.name, "front-end gone, resigning");
            return Move::Resign;
        }
        waiter.wait().unwrap_or_else(|| {
            info!(player = %self.name, "chooser dropped, resigning");
            Move::Resign
        })
    }

    fn moved(&mut self, player: PlayerId, mv: &Move) {
        if let Some(game) = &mut self.game {
            if !game.apply_move(mv) {
                debug!(player = %self.name, mover = %player, %mv, "own copy rejected move");
            }
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

/// Builds [`InteractivePlayer`]s sharing one front-end channel.
pub struct InteractivePlayerFactory {
    front_end: Sender<MoveChooser>,
}

impl InteractivePlayerFactory {
    pub const NAME: &'static str = "human";

    #[must_use]
    pub fn new(front_end: Sender<MoveChooser>) -> Self {
        Self { front_end }
    }
}

impl PlayerFactory for InteractivePlayerFactory {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn new_player(&mut self, _game: &str, name: &str) -> Result<Box<dyn Player>> {
        Ok(Box::new(InteractivePlayer::new(name, self.front_end.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Position;
    use crate::games::tictactoe::TicTacToeFactory;
    use crate::rules::GameFactory;
    use std::sync::mpsc;
    use std::thread;

    fn game() -> Box<dyn GameRuler> {
        let mut factory = TicTacToeFactory::new();
        factory
            .set_player_names(&["h".to_string(), "r".to_string()])
            .unwrap();
        factory.new_game().unwrap()
    }

    #[test]
    fn test_move_comes_from_front_end() {
        let (tx, rx) = mpsc::channel::<MoveChooser>();
        let mut player = InteractivePlayerFactory::new(tx)
            .new_player(TicTacToeFactory::NAME, "h")
            .unwrap();
        player.set_game(game());
        assert!(player.is_interactive());

        let front_end = thread::spawn(move || {
            let chooser = rx.recv().unwrap();
            let cell = Position::new(1, 1);
            chooser.select(&[cell]).unwrap();
            let pieces = chooser.selection_pieces().unwrap();
            chooser.do_selection(pieces[0]).unwrap();
            chooser.choose().unwrap()
        });

        let mv = player.get_move();
        assert_eq!(mv, front_end.join().unwrap());
        assert_eq!(mv.actions()[0].positions(), &[Position::new(1, 1)]);
    }

    #[test]
    fn test_resigns_when_front_end_gone() {
        let (tx, rx) = mpsc::channel::<MoveChooser>();
        drop(rx);
        let mut player = InteractivePlayer::new("h", tx);
        player.set_game(game());

        assert_eq!(player.get_move(), Move::Resign);
    }

    #[test]
    fn test_resigns_when_chooser_dropped() {
        let (tx, rx) = mpsc::channel::<MoveChooser>();
        let mut player = InteractivePlayer::new("h", tx);
        player.set_game(game());

        let front_end = thread::spawn(move || drop(rx.recv().unwrap()));
        assert_eq!(player.get_move(), Move::Resign);
        front_end.join().unwrap();
    }
}
