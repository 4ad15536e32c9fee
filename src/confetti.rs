//! Confetti burst overlay shown for non-draw wins.
//!
//! # Architecture
//!
//! One burst is a root entity with [`NUM_CONFETTI`] particle children. Each
//! particle is parameterized once at spawn by an immutable [`Plan`] and then
//! animated statelessly: every frame its transform is recomputed from the
//! time elapsed since the burst spawned, so there is no per-particle timer
//! to leak. Dismissing the burst despawns the root recursively, which
//! cancels every particle in the same step.
//!
//! The fall completes after `duration`; rotation and sway loop until the
//! burst is dismissed. Finished particles stay parked below the window and
//! are discarded with the burst rather than recycled one by one.
use std::f32::consts::TAU;

use bevy::prelude::{Plugin as BevyPlugin, *};
use bevy_debug_text_overlay::screen_print;

use crate::{
    diff::SemanticEvent,
    state::GameSnapshot,
};

pub const NUM_CONFETTI: usize = 50;
const COLORS: [Color; 6] = [
    Color::rgb(0.937, 0.267, 0.267),
    Color::rgb(0.063, 0.725, 0.506),
    Color::rgb(0.231, 0.510, 0.965),
    Color::rgb(0.961, 0.620, 0.043),
    Color::rgb(0.545, 0.361, 0.965),
    Color::rgb(0.925, 0.282, 0.600),
];
const SWAY_AMPLITUDE: f32 = 30.0;
/// One full sway cycle: start -> +30 -> start -> -30 -> start.
const SWAY_PERIOD: f32 = 4.0;

/// Per-particle randomized parameters, generated once at spawn and never
/// mutated afterwards.
#[derive(Component, Clone, Debug)]
pub struct Plan {
    start_x: f32,
    start_y: f32,
    end_y: f32,
    size: f32,
    color: Color,
    round: bool,
    /// Fall time in seconds.
    duration: f32,
    /// Seconds before any of the three motions start.
    delay: f32,
    /// Seconds per full revolution.
    rotate_duration: f32,
}
impl Plan {
    /// Draw a random plan for a window of the given logical size.
    ///
    /// Starts 50 to 150 px above the top edge and falls to 100 px below the
    /// bottom edge, matching the overlay being clipped to the window.
    pub fn sample(width: f32, height: f32) -> Self {
        Self {
            start_x: (fastrand::f32() - 0.5) * width,
            start_y: height / 2.0 + 50.0 + fastrand::f32() * 100.0,
            end_y: -height / 2.0 - 100.0,
            size: 6.0 + fastrand::f32() * 8.0,
            color: COLORS[fastrand::usize(..COLORS.len())],
            round: fastrand::bool(),
            duration: 2.0 + fastrand::f32() * 2.0,
            delay: fastrand::f32() * 0.5,
            rotate_duration: 1.0 + fastrand::f32() * 1.0,
        }
    }

    /// Particle position `t` seconds after the burst spawned.
    pub fn translation(&self, t: f32) -> Vec2 {
        let active = (t - self.delay).max(0.0);
        let progress = (active / self.duration).min(1.0);
        Vec2::new(
            self.start_x + SWAY_AMPLITUDE * (TAU * active / SWAY_PERIOD).sin(),
            self.start_y + (self.end_y - self.start_y) * progress,
        )
    }

    /// Rotation in radians `t` seconds after the burst spawned; loops
    /// indefinitely.
    pub fn rotation(&self, t: f32) -> f32 {
        let active = (t - self.delay).max(0.0);
        (active / self.rotate_duration).fract() * TAU
    }
}

/// Generate the plans for one burst. A zero count is a valid burst that
/// renders nothing and schedules nothing.
pub fn burst_plans(count: usize, width: f32, height: f32) -> Vec<Plan> {
    (0..count).map(|_| Plan::sample(width, height)).collect()
}

/// Cleanup marker for the burst root.
#[derive(Component, Clone)]
struct ConfettiBurst;

#[derive(Component)]
struct SpawnedAt(f64);

fn spawn_burst(
    mut events: EventReader<SemanticEvent>,
    live_burst: Query<(), With<ConfettiBurst>>,
    windows: Res<Windows>,
    time: Res<Time>,
    mut cmds: Commands,
) {
    let won = events
        .iter()
        .any(|event| matches!(event, SemanticEvent::GameWon { .. }));
    if !won || !live_burst.is_empty() {
        return;
    }
    let (width, height) = windows
        .get_primary()
        .map_or((390.0, 844.0), |window| (window.width(), window.height()));
    let plans = burst_plans(NUM_CONFETTI, width, height);
    if plans.is_empty() {
        return;
    }
    screen_print!("confetti burst: {} pieces", plans.len());
    let now = time.seconds_since_startup();
    cmds.spawn_bundle((
        ConfettiBurst,
        SpawnedAt(now),
        Transform::default(),
        GlobalTransform::default(),
        Name::new("Confetti burst"),
    ))
    .with_children(|cmds| {
        for plan in plans {
            let start = plan.translation(0.0);
            // Round pieces approximated by a smaller square footprint; the
            // shape difference is invisible at confetti scale.
            let size = if plan.round { plan.size * 0.8 } else { plan.size };
            cmds.spawn_bundle(SpriteBundle {
                sprite: Sprite {
                    color: plan.color,
                    custom_size: Some(Vec2::splat(size)),
                    ..Default::default()
                },
                transform: Transform::from_xyz(start.x, start.y, 20.0),
                ..Default::default()
            })
            .insert(plan);
        }
    });
}

fn run_particles(
    time: Res<Time>,
    bursts: Query<&SpawnedAt, With<ConfettiBurst>>,
    mut particles: Query<(&Parent, &Plan, &mut Transform)>,
) {
    for (Parent(parent), plan, mut transform) in particles.iter_mut() {
        if let Ok(SpawnedAt(spawned)) = bursts.get(*parent) {
            let t = (time.seconds_since_startup() - spawned) as f32;
            let position = plan.translation(t);
            transform.translation.x = position.x;
            transform.translation.y = position.y;
            transform.rotation = Quat::from_rotation_z(plan.rotation(t));
        }
    }
}

/// Dismiss the burst when the win it celebrated is gone (reset or new
/// game). Despawning the root reaches every live particle at once.
fn dismiss_burst(
    snapshot: Res<GameSnapshot>,
    bursts: Query<Entity, With<ConfettiBurst>>,
    mut cmds: Commands,
) {
    if snapshot.winner.is_none() {
        for burst in bursts.iter() {
            cmds.entity(burst).despawn_recursive();
        }
    }
}

pub struct Plugin;
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_system(spawn_burst.after("snapshot_diff"))
            .add_system(run_particles)
            .add_system(dismiss_burst);
    }
}
