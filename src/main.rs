use bevy::prelude::*;
use bevy_debug_text_overlay::OverlayPlugin;

mod audio;
mod board;
mod coin_popup;
mod confetti;
mod diff;
mod feedback;
mod haptics;
mod header;
mod level_select;
mod state;
mod theme;

use audio::AudioRequest;
use theme::Palette;

fn setup(
    mut cmds: Commands,
    mut clear_color: ResMut<ClearColor>,
    palette: Res<Palette>,
    mut audio_requests: EventWriter<AudioRequest>,
) {
    clear_color.0 = palette.background;
    cmds.spawn_bundle(OrthographicCameraBundle::new_2d());
    cmds.spawn_bundle(UiCameraBundle::default());
    audio_requests.send(AudioRequest::StartMusic);
}

fn main() {
    let mut app = App::new();
    app.insert_resource(Msaa { samples: 4 })
        .insert_resource(WindowDescriptor {
            title: "Nine Holes".to_owned(),
            width: 390.0,
            height: 844.0,
            #[cfg(target_os = "linux")]
            present_mode: bevy::window::PresentMode::Immediate, // workaround for https://github.com/bevyengine/bevy/issues/1908 (seems to be Mesa bug with X11 + Vulkan)
            ..Default::default()
        })
        .add_plugins(DefaultPlugins)
        .add_plugin(OverlayPlugin::default())
        .add_plugin(state::Plugin)
        .add_plugin(theme::Plugin)
        .add_plugin(audio::Plugin)
        .add_plugin(haptics::Plugin)
        .add_plugin(diff::Plugin)
        .add_plugin(feedback::Plugin)
        .add_plugin(board::Plugin)
        .add_plugin(header::Plugin)
        .add_plugin(level_select::Plugin)
        .add_plugin(coin_popup::Plugin)
        .add_plugin(confetti::Plugin)
        .add_startup_system(setup);

    #[cfg(feature = "debug")]
    app.add_plugin(bevy_inspector_egui::WorldInspectorPlugin::new());

    app.run();
}
