use bevy::prelude::{Plugin as BevyPlugin, *};
use bevy_debug_text_overlay::screen_print;
use bevy_kira_audio::{Audio, AudioChannel as KiraChannel, AudioPlugin, AudioSource};
use enum_map::{enum_map, Enum, EnumMap};

/// Short sound effects the feedback bus can request.
#[derive(Enum, Clone, Copy, PartialEq, Eq, Debug)]
pub enum SoundCue {
    Move,
    Win,
    Draw,
    Reset,
}
impl SoundCue {
    fn file_name(self) -> &'static str {
        match self {
            SoundCue::Move => "move",
            SoundCue::Win => "win",
            SoundCue::Draw => "draw",
            SoundCue::Reset => "reset",
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
pub enum AudioChannel {
    Master,
    Sfx,
    Music,
}
struct ChannelVolumes {
    master: f32,
    sfx: f32,
    music: f32,
}
struct AudioChannels {
    sfx: KiraChannel,
    music: KiraChannel,
    volumes: ChannelVolumes,
}
impl Default for AudioChannels {
    fn default() -> Self {
        Self {
            sfx: KiraChannel::new("sfx".to_owned()),
            music: KiraChannel::new("music".to_owned()),
            volumes: ChannelVolumes { master: 1.0, sfx: 0.5, music: 0.5 },
        }
    }
}

struct AudioAssets {
    cues: EnumMap<SoundCue, Handle<AudioSource>>,
    music: Handle<AudioSource>,
}
impl FromWorld for AudioAssets {
    fn from_world(world: &mut World) -> Self {
        let assets = world.get_resource::<AssetServer>().unwrap();
        Self {
            music: assets.load("sfx/music.ogg"),
            cues: enum_map! { cue => assets.load(&format!("sfx/{}.ogg", SoundCue::file_name(cue))) },
        }
    }
}

pub enum AudioRequest {
    PlayCue(SoundCue),
    StartMusic,
    SetChannelVolume(AudioChannel, f32),
}
fn play_audio(
    assets: Option<Res<AudioAssets>>,
    audio: Res<Audio>,
    mut channels: ResMut<AudioChannels>,
    mut events: EventReader<AudioRequest>,
) {
    for event in events.iter() {
        // The collaborator being unavailable skips feedback, it is never an
        // error the player sees.
        let assets = match &assets {
            Some(assets) => assets,
            None => {
                screen_print!(sec: 5.0, "audio assets unavailable, skipping playback");
                continue;
            }
        };
        match event {
            AudioRequest::StartMusic => {
                audio.play_looped_in_channel(assets.music.clone(), &channels.music);
            }
            AudioRequest::SetChannelVolume(AudioChannel::Sfx, volume) => {
                channels.volumes.sfx = *volume;
                let master = channels.volumes.master;
                audio.set_volume_in_channel(volume * master, &channels.sfx);
            }
            AudioRequest::SetChannelVolume(AudioChannel::Music, volume) => {
                channels.volumes.music = *volume;
                let master = channels.volumes.master;
                audio.set_volume_in_channel(volume * master, &channels.music);
            }
            AudioRequest::SetChannelVolume(AudioChannel::Master, volume) => {
                channels.volumes.master = *volume;
                let music_volume = volume * channels.volumes.music;
                let sfx_volume = volume * channels.volumes.sfx;
                audio.set_volume_in_channel(music_volume, &channels.music);
                audio.set_volume_in_channel(sfx_volume, &channels.sfx);
            }
            AudioRequest::PlayCue(cue) => {
                audio.play_in_channel(assets.cues[*cue].clone(), &channels.sfx);
            }
        }
    }
}

pub struct Plugin;
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_plugin(AudioPlugin)
            .init_resource::<AudioChannels>()
            .init_resource::<AudioAssets>()
            .add_event::<AudioRequest>()
            .add_system(play_audio);
    }
}
