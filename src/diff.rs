//! Infer discrete events from successive game snapshots.
//!
//! # Architecture
//!
//! The rules engine pushes whole snapshots, it never tells us *what*
//! happened. This module recovers that information in two layers:
//!
//! * [`diff`]: pure comparison of two snapshots, returns the events implied
//!   by the transition.
//! * [`Dispatcher`]: owns the previously observed fields and feeds them to
//!   [`diff`] on every new snapshot, so each transition is reported exactly
//!   once no matter how often the same snapshot is observed.
//!
//! The [`dispatch_snapshots`] system wraps a [`Dispatcher`] in a `Local` and
//! forwards events to the rest of the crate ([`crate::feedback`] for
//! sound/haptics, [`crate::confetti`] for the win burst).
use bevy::prelude::{Plugin as BevyPlugin, *};
use bevy_debug_text_overlay::screen_print;

use crate::state::{GameMode, GameSnapshot, Mark, Outcome};

/// A discrete occurrence inferred from comparing two snapshots.
///
/// `MoveMade` is the exception: taps are observed directly by the board, so
/// it is sent by [`crate::board`] rather than inferred here.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SemanticEvent {
    MoveMade,
    OpponentMoveDetected,
    GameWon { by: Mark },
    GameDrawn,
}

/// The snapshot fields the differ compares.
#[derive(Clone, PartialEq, Debug)]
pub struct Observed {
    pub board: Vec<Option<Mark>>,
    pub winner: Option<Outcome>,
    pub game_mode: GameMode,
}
impl From<&GameSnapshot> for Observed {
    fn from(snapshot: &GameSnapshot) -> Self {
        Self {
            board: snapshot.board.clone(),
            winner: snapshot.winner,
            game_mode: snapshot.game_mode,
        }
    }
}

/// Compare two consecutive snapshots, returning all implied events.
///
/// Total and pure: a malformed transition (board length changed under us)
/// degrades to winner detection only instead of failing.
pub fn diff(prev: &Observed, next: &Observed) -> Vec<SemanticEvent> {
    let mut events = Vec::new();
    if next.winner != prev.winner {
        match next.winner {
            Some(Outcome::Draw) => events.push(SemanticEvent::GameDrawn),
            Some(Outcome::Won(by)) => events.push(SemanticEvent::GameWon { by }),
            None => {}
        }
    }
    let occupied = |board: &[Option<Mark>]| board.iter().filter(|c| c.is_some()).count();
    // A reset clears the board; the vanishing marks are not moves. Length
    // mismatch means the collaborator broke its own precondition, skip the
    // cell scan for this cycle rather than guessing.
    let is_reset = occupied(&next.board) == 0 && occupied(&prev.board) > 0;
    let malformed = next.board.len() != prev.board.len();
    if next.game_mode == GameMode::VsAi && !is_reset && !malformed {
        let ai_moved = next
            .board
            .iter()
            .zip(prev.board.iter())
            .any(|(next, prev)| *next == Some(Mark::Nought) && *prev != Some(Mark::Nought));
        // A morris move vacates one cell and occupies another in the same
        // transition; both changes are one move.
        if ai_moved {
            events.push(SemanticEvent::OpponentMoveDetected);
        }
    }
    events
}

/// Holds the last observed snapshot fields and reports each transition once.
///
/// The held [`Observed`] is owned exclusively by the dispatcher; it advances
/// only after the events of the current transition have been handed out.
#[derive(Default)]
pub struct Dispatcher {
    prev: Option<Observed>,
}
impl Dispatcher {
    /// Observe a new snapshot, returning the events since the last one.
    ///
    /// The very first observation only primes the dispatcher. Observing an
    /// unchanged snapshot again returns nothing.
    pub fn observe(&mut self, snapshot: &GameSnapshot) -> Vec<SemanticEvent> {
        let next = Observed::from(snapshot);
        let events = match &self.prev {
            Some(prev) if *prev == next => return Vec::new(),
            Some(prev) => diff(prev, &next),
            None => Vec::new(),
        };
        self.prev = Some(next);
        events
    }
}

fn dispatch_snapshots(
    snapshot: Res<GameSnapshot>,
    mut dispatcher: Local<Dispatcher>,
    mut events: EventWriter<SemanticEvent>,
) {
    if !snapshot.is_changed() {
        return;
    }
    for event in dispatcher.observe(&snapshot) {
        screen_print!(sec: 1.0, "snapshot event: {event:?}");
        events.send(event);
    }
}

pub struct Plugin;
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SemanticEvent>()
            .add_system(dispatch_snapshots.label("snapshot_diff"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Mark::{Cross, Nought};

    // `snap!(X . O ...)` builds a board from 9 cell tokens.
    macro_rules! snap {
        ($($cell:tt)*) => {{
            let mut snapshot = GameSnapshot::default();
            snapshot.board = vec![$(cell!($cell)),*];
            snapshot
        }};
    }
    macro_rules! cell {
        (X) => {
            Some(Cross)
        };
        (O) => {
            Some(Nought)
        };
        (.) => {
            None
        };
    }
    fn observe(snapshot: &GameSnapshot) -> Observed {
        Observed::from(snapshot)
    }

    #[test]
    fn winner_change_emits_drawn_or_won() {
        let prev = snap!(X O X O X O O X .);
        let mut next = prev.clone();
        next.winner = Some(Outcome::Draw);
        assert_eq!(diff(&observe(&prev), &observe(&next)), vec![SemanticEvent::GameDrawn]);

        next.winner = Some(Outcome::Won(Cross));
        assert_eq!(
            diff(&observe(&prev), &observe(&next)),
            vec![SemanticEvent::GameWon { by: Cross }]
        );
    }

    #[test]
    fn unchanged_snapshot_is_silent() {
        let snapshot = snap!(X . O . X . . . .);
        assert!(diff(&observe(&snapshot), &observe(&snapshot)).is_empty());
    }

    #[test]
    fn single_ai_placement_is_one_move() {
        let prev = snap!(X . . . . . . . .);
        let next = snap!(X . . . O . . . .);
        assert_eq!(
            diff(&observe(&prev), &observe(&next)),
            vec![SemanticEvent::OpponentMoveDetected]
        );
    }

    #[test]
    fn morris_vacate_and_occupy_collapse_to_one_move() {
        // Level 2/3 move phase: the nought at 4 moves to 5.
        let prev = snap!(X X O . O . . . .);
        let next = snap!(X X O . . O . . .);
        assert_eq!(
            diff(&observe(&prev), &observe(&next)),
            vec![SemanticEvent::OpponentMoveDetected]
        );
    }

    #[test]
    fn human_moves_are_not_opponent_moves() {
        let mut prev = snap!(. . . . . . . . .);
        prev.game_mode = GameMode::VsHuman;
        let mut next = snap!(X . . . . . . . .);
        next.game_mode = GameMode::VsHuman;
        assert!(diff(&observe(&prev), &observe(&next)).is_empty());

        // Even a nought is not "the opponent" outside of vs-AI mode.
        let mut next = snap!(. . . . O . . . .);
        next.game_mode = GameMode::VsHuman;
        assert!(diff(&observe(&prev), &observe(&next)).is_empty());
    }

    #[test]
    fn reset_does_not_count_as_a_move() {
        let prev = snap!(X O X . O . . . .);
        let next = snap!(. . . . . . . . .);
        assert!(diff(&observe(&prev), &observe(&next)).is_empty());
    }

    #[test]
    fn reset_clearing_a_win_emits_nothing() {
        let mut prev = snap!(O O O X X . . . .);
        prev.winner = Some(Outcome::Won(Nought));
        let next = snap!(. . . . . . . . .);
        assert!(diff(&observe(&prev), &observe(&next)).is_empty());
    }

    #[test]
    fn board_length_mismatch_skips_move_detection() {
        let prev = snap!(. . . . . . . . .);
        let mut next = snap!(. . . . . . . . .);
        next.board = vec![Some(Nought); 16];
        assert!(diff(&observe(&prev), &observe(&next)).is_empty());
    }

    #[test]
    fn dispatcher_reports_each_transition_once() {
        let mut dispatcher = Dispatcher::default();
        let first = snap!(. . . . . . . . .);
        // Priming observation, nothing to compare against.
        assert!(dispatcher.observe(&first).is_empty());

        let moved = snap!(. . . . O . . . .);
        assert_eq!(dispatcher.observe(&moved), vec![SemanticEvent::OpponentMoveDetected]);
        // Same snapshot re-observed on following frames: no re-emission.
        assert!(dispatcher.observe(&moved).is_empty());
        assert!(dispatcher.observe(&moved).is_empty());
    }

    #[test]
    fn dispatcher_orders_win_before_advancing() {
        let mut dispatcher = Dispatcher::default();
        dispatcher.observe(&snap!(X X . O O . . . .));
        let mut won = snap!(X X . O O O . . .);
        won.winner = Some(Outcome::Won(Nought));
        assert_eq!(
            dispatcher.observe(&won),
            vec![SemanticEvent::GameWon { by: Nought }, SemanticEvent::OpponentMoveDetected]
        );
        assert!(dispatcher.observe(&won).is_empty());
    }
}
