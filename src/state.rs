//! Read-only view of the game state and the intent channel back to the
//! rules engine.
//!
//! The rules/AI engine is an external collaborator: it overwrites the
//! [`GameSnapshot`] resource whenever the game advances and consumes
//! [`GameIntent`] events sent by the UI. Nothing in this crate mutates the
//! snapshot; every module downstream only reads it.
use bevy::prelude::{Plugin as BevyPlugin, *};
#[cfg(feature = "debug")]
use bevy_inspector_egui::Inspectable;

/// A player mark on the board. The AI always plays [`Mark::Nought`].
#[cfg_attr(feature = "debug", derive(Inspectable))]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mark {
    Cross,
    Nought,
}

/// How a finished game ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Won(Mark),
    Draw,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameMode {
    VsHuman,
    VsAi,
}

/// Win/draw tallies across successive games.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Score {
    pub cross: u32,
    pub nought: u32,
    pub draws: u32,
}

/// Immutable view of the game at one instant, owned by the rules engine.
///
/// `board` holds 9 cells for levels 1 to 3, in row-major order. Levels 2
/// and 3 are morris-style: after placement, moves vacate one cell and
/// occupy another within the same snapshot transition.
#[derive(Clone, PartialEq, Debug)]
pub struct GameSnapshot {
    pub board: Vec<Option<Mark>>,
    pub current_player: Mark,
    pub winner: Option<Outcome>,
    pub game_mode: GameMode,
    pub game_level: u8,
    pub score: Score,
    pub coins: u32,
    pub is_game_active: bool,
}
impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: vec![None; 9],
            current_player: Mark::Cross,
            winner: None,
            game_mode: GameMode::VsAi,
            game_level: 1,
            score: Score::default(),
            coins: 0,
            is_game_active: true,
        }
    }
}
impl GameSnapshot {
    pub fn occupied_cells(&self) -> usize {
        self.board.iter().filter(|c| c.is_some()).count()
    }
}

/// Rule mutation requests, sent by the UI and consumed by the rules engine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameIntent {
    ResetGame,
    SetGameLevel(u8),
    Play(usize),
}

pub struct Plugin;
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameSnapshot>().add_event::<GameIntent>();
    }
}
