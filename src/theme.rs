//! Colors and shared UI assets, injected rather than fetched ambiently so
//! every surface can be themed (and tested) from one place.
use bevy::prelude::{Plugin as BevyPlugin, *};

use crate::state::{GameMode, GameSnapshot, Mark, Outcome};

/// The resolved theme colors. The hosting application may replace this
/// resource wholesale; the defaults are the dark slate palette.
pub struct Palette {
    pub background: Color,
    pub card: Color,
    pub text: Color,
    pub card_subtext: Color,
    pub border: Color,
    pub primary: Color,
    /// Coin amber, also the draw status color.
    pub accent: Color,
    pub win: Color,
    pub loss: Color,
    pub turn: Color,
}
impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::rgb_u8(0x0f, 0x17, 0x2a),
            card: Color::rgb_u8(0x1e, 0x29, 0x3b),
            text: Color::rgb_u8(0xf8, 0xfa, 0xfc),
            card_subtext: Color::rgb_u8(0x94, 0xa3, 0xb8),
            border: Color::rgb_u8(0x33, 0x41, 0x55),
            primary: Color::rgb_u8(0x3b, 0x82, 0xf6),
            accent: Color::rgb_u8(0xf5, 0x9e, 0x0b),
            win: Color::rgb_u8(0x10, 0xb9, 0x81),
            loss: Color::rgb_u8(0xef, 0x44, 0x44),
            turn: Color::rgb_u8(0x60, 0xa5, 0xfa),
        }
    }
}
impl Palette {
    pub fn mark_color(&self, mark: Mark) -> Color {
        match mark {
            Mark::Cross => self.win,
            Mark::Nought => self.loss,
        }
    }

    /// Color of the header status pill for the given snapshot.
    pub fn status_color(&self, snapshot: &GameSnapshot) -> Color {
        match snapshot.winner {
            Some(Outcome::Won(Mark::Cross)) => self.win,
            Some(Outcome::Won(Mark::Nought)) => self.loss,
            Some(Outcome::Draw) => self.accent,
            None => self.turn,
        }
    }
}

/// Wording of the header status pill.
pub fn status_text(snapshot: &GameSnapshot) -> &'static str {
    match (snapshot.winner, snapshot.current_player, snapshot.game_mode) {
        (Some(Outcome::Draw), ..) => "It's a Draw!",
        (Some(Outcome::Won(Mark::Cross)), ..) => "You Win!",
        (Some(Outcome::Won(Mark::Nought)), _, GameMode::VsAi) => "AI Wins!",
        (Some(Outcome::Won(Mark::Nought)), ..) => "Player O Wins!",
        (None, Mark::Cross, _) => "Your Turn",
        (None, Mark::Nought, GameMode::VsAi) => "AI Turn",
        (None, Mark::Nought, GameMode::VsHuman) => "Player O's Turn",
    }
}

pub struct UiAssets {
    pub font: Handle<Font>,
}
impl FromWorld for UiAssets {
    fn from_world(world: &mut World) -> Self {
        let assets = world.get_resource::<AssetServer>().unwrap();
        Self { font: assets.load("Inter-SemiBold.ttf") }
    }
}

impl UiAssets {
    pub fn text_bundle(&self, content: &str, font_size: f32, color: Color) -> TextBundle {
        let style = TextStyle { color, font: self.font.clone(), font_size };
        let align = TextAlignment {
            horizontal: HorizontalAlign::Center,
            ..Default::default()
        };
        let text = Text::with_section(content, style, align);
        TextBundle { text, ..Default::default() }
    }
}

pub struct Plugin;
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Palette>().init_resource::<UiAssets>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_winner_then_turn() {
        let mut snapshot = GameSnapshot::default();
        assert_eq!(status_text(&snapshot), "Your Turn");
        snapshot.current_player = Mark::Nought;
        assert_eq!(status_text(&snapshot), "AI Turn");
        snapshot.game_mode = GameMode::VsHuman;
        assert_eq!(status_text(&snapshot), "Player O's Turn");

        snapshot.winner = Some(Outcome::Won(Mark::Cross));
        assert_eq!(status_text(&snapshot), "You Win!");
        snapshot.winner = Some(Outcome::Won(Mark::Nought));
        assert_eq!(status_text(&snapshot), "Player O Wins!");
        snapshot.game_mode = GameMode::VsAi;
        assert_eq!(status_text(&snapshot), "AI Wins!");
        snapshot.winner = Some(Outcome::Draw);
        assert_eq!(status_text(&snapshot), "It's a Draw!");
    }
}
