//! Routes semantic events to the audio and haptic collaborators.
//!
//! The event-to-feedback policy is one table held in a resource, so the
//! mapping is data, not control flow: adding an event or swapping a cue is
//! a table edit. Each event is routed exactly once, in the order it was
//! emitted by the dispatcher.
use bevy::prelude::{Plugin as BevyPlugin, *};
use enum_map::{enum_map, Enum, EnumMap};

use crate::{
    audio::{AudioRequest, SoundCue},
    diff::SemanticEvent,
    haptics::{Haptic, HapticRequest},
};

/// The table key: a [`SemanticEvent`] stripped of its payload.
#[derive(Enum, Clone, Copy, PartialEq, Eq, Debug)]
pub enum EventKind {
    MoveMade,
    OpponentMoveDetected,
    GameWon,
    GameDrawn,
}
impl From<&SemanticEvent> for EventKind {
    fn from(event: &SemanticEvent) -> Self {
        match event {
            SemanticEvent::MoveMade => EventKind::MoveMade,
            SemanticEvent::OpponentMoveDetected => EventKind::OpponentMoveDetected,
            SemanticEvent::GameWon { .. } => EventKind::GameWon,
            SemanticEvent::GameDrawn => EventKind::GameDrawn,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Feedback {
    pub sound: Option<SoundCue>,
    pub haptic: Option<Haptic>,
}
impl Feedback {
    const fn new(sound: Option<SoundCue>, haptic: Option<Haptic>) -> Self {
        Self { sound, haptic }
    }
}

/// Event → feedback policy. Replace the resource to change the policy.
pub struct FeedbackMap(EnumMap<EventKind, Feedback>);
impl Default for FeedbackMap {
    fn default() -> Self {
        use EventKind::*;
        Self(enum_map! {
            MoveMade => Feedback::new(Some(SoundCue::Move), None),
            OpponentMoveDetected => Feedback::new(Some(SoundCue::Move), None),
            GameWon => Feedback::new(Some(SoundCue::Win), Some(Haptic::Success)),
            GameDrawn => Feedback::new(Some(SoundCue::Draw), None),
        })
    }
}
impl FeedbackMap {
    pub fn feedback_for(&self, event: &SemanticEvent) -> Feedback {
        self.0[EventKind::from(event)]
    }
}

fn route_feedback(
    map: Res<FeedbackMap>,
    mut events: EventReader<SemanticEvent>,
    mut audio_requests: EventWriter<AudioRequest>,
    mut haptic_requests: EventWriter<HapticRequest>,
) {
    for event in events.iter() {
        let Feedback { sound, haptic } = map.feedback_for(event);
        if let Some(cue) = sound {
            audio_requests.send(AudioRequest::PlayCue(cue));
        }
        if let Some(strength) = haptic {
            haptic_requests.send(HapticRequest(strength));
        }
    }
}

pub struct Plugin;
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FeedbackMap>()
            .add_system(route_feedback.after("snapshot_diff"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::Dispatcher;
    use crate::state::{GameSnapshot, Mark, Outcome};

    macro_rules! assert_feedback {
        ($event:expr, $sound:expr, $haptic:expr) => {
            let feedback = FeedbackMap::default().feedback_for(&$event);
            assert_eq!(feedback.sound, $sound, "sound for {:?}", $event);
            assert_eq!(feedback.haptic, $haptic, "haptic for {:?}", $event);
        };
    }

    #[test]
    fn default_policy_matches_design() {
        use SemanticEvent::*;
        assert_feedback!(MoveMade, Some(SoundCue::Move), None);
        assert_feedback!(OpponentMoveDetected, Some(SoundCue::Move), None);
        assert_feedback!(GameWon { by: Mark::Cross }, Some(SoundCue::Win), Some(Haptic::Success));
        assert_feedback!(GameWon { by: Mark::Nought }, Some(SoundCue::Win), Some(Haptic::Success));
        assert_feedback!(GameDrawn, Some(SoundCue::Draw), None);
    }

    // End to end: snapshot stream through the dispatcher into the policy
    // table, as the systems compose at runtime.
    #[test]
    fn ai_move_reaches_the_move_cue() {
        let mut dispatcher = Dispatcher::default();
        let map = FeedbackMap::default();

        dispatcher.observe(&GameSnapshot::default());
        let mut moved = GameSnapshot::default();
        moved.board[4] = Some(Mark::Nought);

        let cues: Vec<_> = dispatcher
            .observe(&moved)
            .iter()
            .filter_map(|event| map.feedback_for(event).sound)
            .collect();
        assert_eq!(cues, vec![SoundCue::Move]);
    }

    #[test]
    fn win_and_draw_route_differently() {
        let mut dispatcher = Dispatcher::default();
        let map = FeedbackMap::default();

        dispatcher.observe(&GameSnapshot::default());
        let mut drawn = GameSnapshot::default();
        drawn.winner = Some(Outcome::Draw);
        let feedback: Vec<_> = dispatcher
            .observe(&drawn)
            .iter()
            .map(|event| map.feedback_for(event))
            .collect();
        assert_eq!(feedback, vec![Feedback::new(Some(SoundCue::Draw), None)]);

        let mut dispatcher = Dispatcher::default();
        dispatcher.observe(&GameSnapshot::default());
        let mut won = GameSnapshot::default();
        won.winner = Some(Outcome::Won(Mark::Cross));
        let feedback: Vec<_> = dispatcher
            .observe(&won)
            .iter()
            .map(|event| map.feedback_for(event))
            .collect();
        assert_eq!(
            feedback,
            vec![Feedback::new(Some(SoundCue::Win), Some(Haptic::Success))]
        );
    }
}
