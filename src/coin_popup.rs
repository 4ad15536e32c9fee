//! Coin award popup: a time-bounded notification with a guaranteed-once
//! completion.
//!
//! # Architecture
//!
//! The animation is a [`Sequence`] state machine owned by the popup entity:
//!
//! ```text
//! Entering -> Holding -> Exiting -> Done
//!    (spring in)  (3s)   (300ms fade)
//! ```
//!
//! [`Sequence::tick`] drives every phase from frame deltas and reports the
//! natural finish exactly once; [`Sequence::cancel`] (or despawning the
//! entity, which drops the whole state) guarantees the finish is never
//! reported afterwards. The [`award_coins`] system watches the snapshot's
//! coin counter and owns the previous value, the same held-state pattern as
//! [`crate::diff::Dispatcher`]; awards landing while a popup is still on
//! screen accumulate into the next popup.
use bevy::prelude::{Plugin as BevyPlugin, *};
use bevy_debug_text_overlay::screen_print;
#[cfg(feature = "debug")]
use bevy_inspector_egui::{Inspectable, RegisterInspectable};

use crate::{
    audio::{AudioRequest, SoundCue},
    haptics::{Haptic, HapticRequest},
    state::GameSnapshot,
    theme::{Palette, UiAssets},
};

const HOLD_SECS: f32 = 3.0;
const EXIT_SECS: f32 = 0.3;
/// Rest offset reached by the enter spring, in px above the base position.
const ENTER_OFFSET: f32 = 20.0;
const EXIT_OFFSET: f32 = -20.0;
const SPRING_RATE: f32 = 12.0;
/// Distance of the popup base from the bottom of the window.
const BOTTOM_MARGIN: f32 = 90.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Entering,
    Holding,
    Exiting,
    Done,
}

/// The notification state machine. Pure: time comes in through
/// [`Sequence::tick`], the animated values come out of the fields.
#[cfg_attr(feature = "debug", derive(Inspectable))]
#[derive(Component)]
pub struct Sequence {
    #[cfg_attr(feature = "debug", inspectable(ignore))]
    phase: Phase,
    hold_remaining: f32,
    exit_elapsed: f32,
    pub scale: f32,
    pub offset: f32,
    pub opacity: f32,
}
impl Default for Sequence {
    fn default() -> Self {
        Self {
            phase: Phase::Entering,
            hold_remaining: HOLD_SECS,
            exit_elapsed: 0.0,
            scale: 0.8,
            offset: 0.0,
            opacity: 1.0,
        }
    }
}
impl Sequence {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Abandon the sequence. Idempotent, and a cancelled sequence never
    /// reports completion, even if a pending tick lands afterwards.
    pub fn cancel(&mut self) {
        self.phase = Phase::Done;
    }

    /// Advance the animation by `dt` seconds. Returns `true` exactly once,
    /// on the tick where the exit animation completes naturally.
    pub fn tick(&mut self, dt: f32) -> bool {
        match self.phase {
            Phase::Done => false,
            Phase::Exiting => {
                self.exit_elapsed += dt;
                let progress = (self.exit_elapsed / EXIT_SECS).min(1.0);
                self.opacity = 1.0 - progress;
                self.offset = ENTER_OFFSET + (EXIT_OFFSET - ENTER_OFFSET) * progress;
                if progress >= 1.0 {
                    self.phase = Phase::Done;
                    true
                } else {
                    false
                }
            }
            Phase::Entering | Phase::Holding => {
                // Exponential approach stands in for the spring: frame-rate
                // independent and close enough at damping 15.
                let approach = 1.0 - (-SPRING_RATE * dt).exp();
                self.scale += (1.0 - self.scale) * approach;
                self.offset += (ENTER_OFFSET - self.offset) * approach;
                let settled =
                    (1.0 - self.scale).abs() < 0.01 && (ENTER_OFFSET - self.offset).abs() < 0.5;
                if self.phase == Phase::Entering && settled {
                    self.phase = Phase::Holding;
                }
                self.hold_remaining -= dt;
                if self.hold_remaining <= 0.0 {
                    self.phase = Phase::Exiting;
                }
                false
            }
        }
    }
}

#[derive(Component)]
pub struct CoinPopup {
    pub amount: u32,
}

/// Sent exactly once per popup, when its exit animation completes.
pub struct CoinPopupFinished;

/// Watch the snapshot's coin counter and spawn a popup for each award.
fn award_coins(
    snapshot: Res<GameSnapshot>,
    mut seen_coins: Local<Option<u32>>,
    mut pending: Local<u32>,
    live_popup: Query<(), With<CoinPopup>>,
    mut cmds: Commands,
    mut audio_requests: EventWriter<AudioRequest>,
    mut haptic_requests: EventWriter<HapticRequest>,
    windows: Res<Windows>,
    palette: Res<Palette>,
    assets: Res<UiAssets>,
) {
    let coins = snapshot.coins;
    let prev = seen_coins.replace(coins);
    if let Some(prev) = prev {
        if coins > prev {
            *pending += coins - prev;
        }
    }
    if *pending == 0 || !live_popup.is_empty() {
        return;
    }
    let amount = std::mem::take(&mut *pending);
    screen_print!("awarding {amount} coins");
    audio_requests.send(AudioRequest::PlayCue(SoundCue::Win));
    haptic_requests.send(HapticRequest(Haptic::Success));

    let base_y = windows
        .get_primary()
        .map_or(0.0, |window| BOTTOM_MARGIN - window.height() / 2.0);
    let text_style = TextStyle {
        font: assets.font.clone(),
        font_size: 24.0,
        color: palette.text,
    };
    let align = TextAlignment {
        vertical: VerticalAlign::Center,
        horizontal: HorizontalAlign::Center,
    };
    cmds.spawn_bundle(SpriteBundle {
        sprite: Sprite {
            color: palette.card,
            custom_size: Some(Vec2::new(180.0, 48.0)),
            ..Default::default()
        },
        transform: Transform::from_xyz(0.0, base_y, 10.0),
        ..Default::default()
    })
    .insert_bundle((CoinPopup { amount }, Sequence::default(), Name::new("Coin popup")))
    .with_children(|cmds| {
        cmds.spawn_bundle(SpriteBundle {
            sprite: Sprite {
                color: palette.accent,
                custom_size: Some(Vec2::new(24.0, 24.0)),
                ..Default::default()
            },
            transform: Transform::from_xyz(-65.0, 0.0, 1.0),
            ..Default::default()
        });
        cmds.spawn_bundle(Text2dBundle {
            text: Text::with_section(format!("+{amount} coins"), text_style, align),
            transform: Transform::from_xyz(10.0, 0.0, 1.0),
            ..Default::default()
        });
    });
}

/// Drive live popups and report finished ones.
fn run_popup(
    time: Res<Time>,
    mut popups: Query<(&mut Sequence, &mut Transform, &mut Sprite, &Children), With<CoinPopup>>,
    mut texts: Query<&mut Text>,
    mut sprites: Query<&mut Sprite, Without<CoinPopup>>,
    mut finished: EventWriter<CoinPopupFinished>,
) {
    let dt = time.delta_seconds();
    for (mut sequence, mut transform, mut backdrop, children) in popups.iter_mut() {
        let base_y = transform.translation.y - sequence.offset;
        let finished_now = sequence.tick(dt);
        transform.translation.y = base_y + sequence.offset;
        transform.scale = Vec3::splat(sequence.scale);
        backdrop.color.set_a(sequence.opacity);
        for &child in children.iter() {
            if let Ok(mut sprite) = sprites.get_mut(child) {
                sprite.color.set_a(sequence.opacity);
            }
            if let Ok(mut text) = texts.get_mut(child) {
                for section in text.sections.iter_mut() {
                    section.style.color.set_a(sequence.opacity);
                }
            }
        }
        if finished_now {
            finished.send(CoinPopupFinished);
        }
    }
}

/// The controlling side of the completion contract: remove the display
/// once the sequence reports its natural finish.
fn clear_finished(
    mut events: EventReader<CoinPopupFinished>,
    popups: Query<Entity, With<CoinPopup>>,
    mut cmds: Commands,
) {
    for _ in events.iter() {
        for popup in popups.iter() {
            cmds.entity(popup).despawn_recursive();
        }
    }
}

pub struct Plugin;
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        #[cfg(feature = "debug")]
        app.register_inspectable::<Sequence>();

        app.add_event::<CoinPopupFinished>()
            .add_system(award_coins)
            .add_system(run_popup)
            .add_system(clear_finished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn run_to_completion(sequence: &mut Sequence, budget_secs: f32) -> usize {
        let mut completions = 0;
        let mut elapsed = 0.0;
        while elapsed < budget_secs {
            if sequence.tick(FRAME) {
                completions += 1;
            }
            elapsed += FRAME;
        }
        completions
    }

    #[test]
    fn happy_path_completes_exactly_once() {
        let mut sequence = Sequence::default();
        // Generous budget: hold + exit is 3.3s, run for 10s.
        assert_eq!(run_to_completion(&mut sequence, 10.0), 1);
        assert_eq!(sequence.phase(), Phase::Done);
        assert!(sequence.opacity <= f32::EPSILON);
    }

    #[test]
    fn phases_advance_in_order() {
        let mut sequence = Sequence::default();
        assert_eq!(sequence.phase(), Phase::Entering);
        // The spring settles well before the hold elapses.
        run_to_completion(&mut sequence, 1.0);
        assert_eq!(sequence.phase(), Phase::Holding);
        assert!((sequence.scale - 1.0).abs() < 0.01);
        run_to_completion(&mut sequence, 2.1);
        assert_eq!(sequence.phase(), Phase::Exiting);
    }

    #[test]
    fn teardown_mid_hold_never_completes() {
        let mut sequence = Sequence::default();
        run_to_completion(&mut sequence, 1.5);
        assert_eq!(sequence.phase(), Phase::Holding);
        sequence.cancel();
        // A stale tick racing the cancellation is a no-op.
        assert_eq!(run_to_completion(&mut sequence, 10.0), 0);
    }

    #[test]
    fn teardown_mid_exit_never_completes() {
        let mut sequence = Sequence::default();
        run_to_completion(&mut sequence, 3.1);
        assert_eq!(sequence.phase(), Phase::Exiting);
        sequence.cancel();
        assert_eq!(run_to_completion(&mut sequence, 10.0), 0);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut sequence = Sequence::default();
        sequence.cancel();
        sequence.cancel();
        assert_eq!(sequence.phase(), Phase::Done);
        assert!(!sequence.tick(FRAME));
    }

    #[test]
    fn completion_does_not_repeat_after_done() {
        let mut sequence = Sequence::default();
        assert_eq!(run_to_completion(&mut sequence, 5.0), 1);
        assert_eq!(run_to_completion(&mut sequence, 5.0), 0);
    }
}
