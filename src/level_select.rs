//! Level selector row: L1 to L3 playable, L4/L5 greyed-out teasers.
use bevy::prelude::{Plugin as BevyPlugin, *};
use bevy_debug_text_overlay::screen_print;
use bevy_ui_build_macros::{rect, size, style, unit};

use crate::{
    audio::{AudioRequest, SoundCue},
    haptics::{Haptic, HapticRequest},
    state::{GameIntent, GameSnapshot},
    theme::{Palette, UiAssets},
};

const LEVELS: [(u8, &str, bool); 5] = [
    (1, "L1", false),
    (2, "L2", false),
    (3, "L3", false),
    (4, "L4", true),
    (5, "L5", true),
];

#[derive(Component, Clone)]
struct SelectorRoot;

#[derive(Component)]
struct LevelButton {
    level: u8,
    disabled: bool,
}

fn spawn_selector(mut cmds: Commands, palette: Res<Palette>, assets: Res<UiAssets>) {
    let root = cmds
        .spawn_bundle(NodeBundle {
            color: Color::NONE.into(),
            style: style! {
                size: size!(100 pct, auto),
                position_type: PositionType::Absolute,
                position: Rect { bottom: Val::Px(40.0), left: Val::Px(0.0), ..Default::default() },
                flex_direction: FlexDirection::Row,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
            },
            ..Default::default()
        })
        .insert_bundle((SelectorRoot, Name::new("Level selector")))
        .id();
    for (level, label, disabled) in LEVELS {
        let mut color = palette.card;
        if disabled {
            color.set_a(0.3);
        }
        let button = cmds
            .spawn_bundle(ButtonBundle {
                color: color.into(),
                style: style! {
                    size: size!(40 px, 40 px),
                    margin: rect!(4 px),
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                },
                ..Default::default()
            })
            .insert(LevelButton { level, disabled })
            .with_children(|cmds| {
                cmds.spawn_bundle(assets.text_bundle(label, 12.0, palette.text));
            })
            .id();
        cmds.entity(root).push_children(&[button]);
    }
}

/// Mirror the selected level onto the button backgrounds.
fn update_selector(
    snapshot: Res<GameSnapshot>,
    palette: Res<Palette>,
    mut buttons: Query<(&mut UiColor, &LevelButton)>,
) {
    if !snapshot.is_changed() {
        return;
    }
    for (mut color, button) in buttons.iter_mut() {
        if button.disabled {
            continue;
        }
        let selected = snapshot.game_level == button.level;
        *color = UiColor(if selected { palette.primary } else { palette.card });
    }
}

fn handle_level_taps(
    snapshot: Res<GameSnapshot>,
    buttons: Query<(&Interaction, &LevelButton), Changed<Interaction>>,
    mut intents: EventWriter<GameIntent>,
    mut audio_requests: EventWriter<AudioRequest>,
    mut haptic_requests: EventWriter<HapticRequest>,
) {
    for (interaction, button) in buttons.iter() {
        if *interaction != Interaction::Clicked || button.disabled {
            continue;
        }
        if snapshot.game_level == button.level {
            continue;
        }
        screen_print!("switching to level {}", button.level);
        audio_requests.send(AudioRequest::PlayCue(SoundCue::Move));
        haptic_requests.send(HapticRequest(Haptic::Light));
        intents.send(GameIntent::SetGameLevel(button.level));
    }
}

pub struct Plugin;
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_startup_system(spawn_selector)
            .add_system(update_selector)
            .add_system(handle_level_taps);
    }
}
