use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

pub mod ball;
pub mod collision;
pub mod court;
pub mod hud;
pub mod input;
pub mod player;
pub mod score;
pub mod settings;

use crate::score::MatchState;

pub const PIXELS_PER_METER: f32 = 10.0;

// Rapier in the fixed loop, pair it with `GameSettings::timestep` so a tick is one step
pub fn physics_plugin() -> RapierPhysicsPlugin<NoUserData> {
    RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(PIXELS_PER_METER).in_fixed_schedule()
}

// Systemset to help group systems in a defined order of operation inside one fixed tick, rapier
// runs in the same schedule so the collision events it writes are read in the same tick
#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub enum FixedGameSystem {
    // Sample the keyboard into player intents
    Input,

    // Player kinematics, has to land before rapier syncs the kinematic bodies
    GameLogic,

    // Physics -> https://docs.rs/bevy_rapier2d/latest/bevy_rapier2d/plugin/enum.PhysicsSet.html
    // This is for processing the rapier collision events into ball contacts for all of the
    // downstream consumers (ie rebound and scoring)
    Collision,

    // Ball rebounds, points and resets
    Scoring,
}

pub struct FixedGameSystemPlugin;
impl Plugin for FixedGameSystemPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<MatchState>()
            .configure_sets(FixedUpdate, (
                FixedGameSystem::Input.before(FixedGameSystem::GameLogic),
                FixedGameSystem::GameLogic.before(PhysicsSet::SyncBackend),
                FixedGameSystem::Collision.after(PhysicsSet::Writeback),
                FixedGameSystem::Scoring.after(FixedGameSystem::Collision),
            ))
            // Players stand still once the match is decided
            .configure_sets(FixedUpdate, (
                FixedGameSystem::Input.run_if(in_state(MatchState::Playing)),
                FixedGameSystem::GameLogic.run_if(in_state(MatchState::Playing)),
            ));
    }
}
