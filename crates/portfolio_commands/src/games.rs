//! Game launchers.

use std::rc::Rc;

use terminal_games::{SnakeGame, TetrisGame};
use terminal_shell::CommandInvocation;
use terminal_shell_contract::{
    CommandAction, CommandDescriptor, CommandGroup, CommandResult, GameHandle,
};

use crate::CommandRegistration;

pub(crate) fn registrations() -> Vec<CommandRegistration> {
    vec![
        game_registration("snake", "Play Snake", || GameHandle::new(SnakeGame::new())),
        game_registration("tetris", "Play Tetris", || GameHandle::new(TetrisGame::new())),
    ]
}

/// Each invocation starts a fresh game from `spawn`.
fn game_registration(
    game_id: &'static str,
    description: &'static str,
    spawn: fn() -> GameHandle,
) -> CommandRegistration {
    CommandRegistration {
        descriptor: CommandDescriptor::new(game_id, description, CommandGroup::Games),
        handler: Rc::new(move |_: CommandInvocation| {
            CommandResult::empty()
                .with_action(CommandAction::StartGame {
                    game_id: game_id.to_string(),
                    handler: spawn(),
                })
                .into()
        }),
    }
}
