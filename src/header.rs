//! Header surface: status pill, coin counter, score row, reset button.
use std::fmt::Write;

use bevy::prelude::{Plugin as BevyPlugin, *};
use bevy_debug_text_overlay::screen_print;
use bevy_ui_build_macros::{build_ui, rect, size, style, unit};

use crate::{
    audio::{AudioRequest, SoundCue},
    haptics::{Haptic, HapticRequest},
    state::{GameIntent, GameMode, GameSnapshot},
    theme::{status_text, Palette, UiAssets},
};

#[derive(Component, Clone)]
struct HeaderRoot;

#[derive(Component, Clone)]
struct StatusPill;

#[derive(Component, Clone)]
struct StatusText;

#[derive(Component, Clone)]
enum HeaderInfo {
    Coins,
    CrossScore,
    NoughtScore,
    Draws,
}

#[derive(Component, Clone)]
struct ResetButton;

fn spawn_header(mut cmds: Commands, palette: Res<Palette>, assets: Res<UiAssets>) {
    let text = |content: &str, size: f32| assets.text_bundle(content, size, palette.text);
    let subtext = |content: &str| assets.text_bundle(content, 14.0, palette.card_subtext);
    let reset_button = cmds
        .spawn_bundle(ButtonBundle {
            color: palette.card.into(),
            style: style! {
                size: size!(44 px, 44 px),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
            },
            ..Default::default()
        })
        .insert_bundle((ResetButton, Name::new("Reset button")))
        .with_children(|cmds| {
            cmds.spawn_bundle(assets.text_bundle("R", 20.0, palette.text));
        })
        .id();
    let node = NodeBundle {
        color: Color::NONE.into(),
        style: style! {
            display: Display::Flex,
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
        },
        ..Default::default()
    };
    build_ui! {
        #[cmd(cmds)]
        node{
            size: size!(100 pct, auto),
            position_type: PositionType::Absolute,
            position: Rect { top: Val::Px(40.0), left: Val::Px(0.0), ..Default::default() },
            flex_direction: FlexDirection::ColumnReverse,
            padding: rect!(16 px)
        }[; HeaderRoot, Name::new("Header root")](
            node{
                size: size!(100 pct, auto),
                justify_content: JustifyContent::SpaceBetween,
                margin: Rect { bottom: Val::Px(20.0), ..Default::default() }
            }[; Name::new("Status row")](
                node{ padding: rect!(8 px) }[; StatusPill, UiColor(palette.turn)](
                    entity[text("Your Turn", 14.0); StatusText]
                ),
                node{ padding: rect!(8 px) }[; UiColor(palette.card), Name::new("Coin display")](
                    entity[text("0", 14.0); HeaderInfo::Coins]
                )
            ),
            node{
                size: size!(100 pct, auto),
                justify_content: JustifyContent::SpaceBetween,
                padding: rect!(16 px)
            }[; UiColor(palette.card), Name::new("Score row")](
                node(entity[subtext("You: 0"); HeaderInfo::CrossScore]),
                node(entity[subtext("Draw: 0"); HeaderInfo::Draws]),
                node(entity[subtext("AI: 0"); HeaderInfo::NoughtScore]),
                id(reset_button)
            )
        )
    };
}

fn update_header(
    snapshot: Res<GameSnapshot>,
    palette: Res<Palette>,
    mut infos: Query<(&mut Text, &HeaderInfo)>,
    mut pill: Query<&mut UiColor, With<StatusPill>>,
    mut status: Query<&mut Text, (With<StatusText>, Without<HeaderInfo>)>,
) {
    if !snapshot.is_changed() {
        return;
    }
    if let Ok(mut color) = pill.get_single_mut() {
        *color = UiColor(palette.status_color(&snapshot));
    }
    if let Ok(mut text) = status.get_single_mut() {
        let section = &mut text.sections[0];
        section.value.clear();
        write!(section.value, "{}", status_text(&snapshot)).unwrap();
    }
    let oppo_label = match snapshot.game_mode {
        GameMode::VsAi => "AI",
        GameMode::VsHuman => "Player 2",
    };
    for (mut text, info) in infos.iter_mut() {
        let txt = &mut text.sections[0].value;
        txt.clear();
        match info {
            HeaderInfo::Coins => write!(txt, "{}", snapshot.coins).unwrap(),
            HeaderInfo::CrossScore => write!(txt, "You: {}", snapshot.score.cross).unwrap(),
            HeaderInfo::Draws => write!(txt, "Draw: {}", snapshot.score.draws).unwrap(),
            HeaderInfo::NoughtScore => {
                write!(txt, "{oppo_label}: {}", snapshot.score.nought).unwrap()
            }
        }
    }
}

fn handle_reset(
    buttons: Query<&Interaction, (Changed<Interaction>, With<ResetButton>)>,
    mut intents: EventWriter<GameIntent>,
    mut audio_requests: EventWriter<AudioRequest>,
    mut haptic_requests: EventWriter<HapticRequest>,
) {
    for interaction in buttons.iter() {
        if *interaction == Interaction::Clicked {
            screen_print!("player reset the game");
            audio_requests.send(AudioRequest::PlayCue(SoundCue::Reset));
            haptic_requests.send(HapticRequest(Haptic::Medium));
            intents.send(GameIntent::ResetGame);
        }
    }
}

pub struct Plugin;
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_startup_system(spawn_header)
            .add_system(update_header)
            .add_system(handle_reset);
    }
}
