//! The 3x3 board surface: renders the snapshot and turns taps into intents.
//!
//! The board never applies a move itself; a tap becomes a
//! [`GameIntent::Play`] for the rules engine plus a [`SemanticEvent::MoveMade`]
//! for the feedback bus, and the board waits for the next snapshot to show
//! the result.
use std::fmt::Write;

use bevy::prelude::{Plugin as BevyPlugin, *};

use crate::{
    diff::SemanticEvent,
    state::{GameIntent, GameMode, GameSnapshot, Mark},
    theme::{Palette, UiAssets},
};

const BOARD_SIZE: f32 = 280.0;
const CELL_GAP: f32 = 2.0;

#[derive(Component, Clone)]
struct BoardRoot;

#[derive(Component)]
struct Cell(usize);

#[derive(Component)]
struct CellGlyph(usize);

fn spawn_board(mut cmds: Commands, palette: Res<Palette>, assets: Res<UiAssets>) {
    let cell_size = BOARD_SIZE / 3.0 - CELL_GAP * 2.0;
    let glyph_style = TextStyle {
        color: palette.text,
        font: assets.font.clone(),
        font_size: 48.0,
    };
    cmds.spawn_bundle(NodeBundle {
        color: Color::NONE.into(),
        style: Style {
            size: Size::new(Val::Percent(100.0), Val::Percent(100.0)),
            position_type: PositionType::Absolute,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..Default::default()
        },
        ..Default::default()
    })
    .insert_bundle((BoardRoot, Name::new("Board root")))
    .with_children(|cmds| {
        cmds.spawn_bundle(NodeBundle {
            // The border color shows through the gaps as grid lines.
            color: palette.border.into(),
            style: Style {
                size: Size::new(Val::Px(BOARD_SIZE), Val::Px(BOARD_SIZE)),
                flex_direction: FlexDirection::Row,
                // WrapReverse stacks wrapped rows top-down, keeping cell 0
                // in the top-left corner like the snapshot's row-major order.
                flex_wrap: FlexWrap::WrapReverse,
                ..Default::default()
            },
            ..Default::default()
        })
        .with_children(|cmds| {
            for index in 0..9 {
                cmds.spawn_bundle(ButtonBundle {
                    color: palette.background.into(),
                    style: Style {
                        size: Size::new(Val::Px(cell_size), Val::Px(cell_size)),
                        margin: Rect::all(Val::Px(CELL_GAP)),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..Default::default()
                    },
                    ..Default::default()
                })
                .insert(Cell(index))
                .with_children(|cmds| {
                    let align = TextAlignment::default();
                    cmds.spawn_bundle(TextBundle {
                        text: Text::with_section("", glyph_style.clone(), align),
                        ..Default::default()
                    })
                    .insert(CellGlyph(index));
                });
            }
        });
    });
}

fn update_cells(
    snapshot: Res<GameSnapshot>,
    palette: Res<Palette>,
    mut glyphs: Query<(&mut Text, &CellGlyph)>,
) {
    if !snapshot.is_changed() {
        return;
    }
    for (mut text, CellGlyph(index)) in glyphs.iter_mut() {
        let section = &mut text.sections[0];
        section.value.clear();
        match snapshot.board.get(*index) {
            Some(Some(mark)) => {
                let glyph = match mark {
                    Mark::Cross => 'X',
                    Mark::Nought => 'O',
                };
                section.style.color = palette.mark_color(*mark);
                write!(section.value, "{glyph}").unwrap();
            }
            _ => {}
        }
    }
}

fn handle_taps(
    snapshot: Res<GameSnapshot>,
    cells: Query<(&Interaction, &Cell), Changed<Interaction>>,
    mut intents: EventWriter<GameIntent>,
    mut events: EventWriter<SemanticEvent>,
) {
    let ai_turn = snapshot.game_mode == GameMode::VsAi
        && snapshot.current_player == Mark::Nought;
    for (interaction, Cell(index)) in cells.iter() {
        if *interaction != Interaction::Clicked {
            continue;
        }
        let occupied = !matches!(snapshot.board.get(*index), Some(None));
        if !snapshot.is_game_active || ai_turn || occupied {
            continue;
        }
        events.send(SemanticEvent::MoveMade);
        intents.send(GameIntent::Play(*index));
    }
}

pub struct Plugin;
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_startup_system(spawn_board)
            .add_system(update_cells)
            .add_system(handle_taps.before("snapshot_diff"));
    }
}
