use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::FixedGameSystem;
use crate::ball::Ball;
use crate::ball::serve;
use crate::collision::BallContact;
use crate::court::Side;
use crate::player::Kinematics;
use crate::player::Player;
use crate::player::reset_players;
use crate::settings::GameSettings;

pub struct ScorePlugin;
impl Plugin for ScorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Score>()
            .add_event::<PointScored>()
            .add_observer(process_point_scored)
            .add_systems(FixedUpdate, (
                award_point.in_set(FixedGameSystem::Scoring),
            ))
            .add_systems(OnEnter(MatchState::GameOver), pause_physics)
            .add_systems(OnExit(MatchState::GameOver), resume_physics)
            .add_systems(Update, (
                restart_match.run_if(in_state(MatchState::GameOver)),
            ));
    }
}

#[derive(States, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchState {
    #[default]
    Playing,
    GameOver,
}

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn award(&mut self, side: Side) {
        match side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
    }

    pub fn of(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    // Endless rally when there is no target
    pub fn winner(&self, target: Option<u32>) -> Option<Side> {
        let target = target?;
        [Side::Left, Side::Right].into_iter().find(|side| self.of(*side) >= target)
    }
}

// 0 - side that won the point
#[derive(Event, Copy, Clone, Debug, PartialEq)]
pub struct PointScored(pub Side);

// The ball landing on one half is a point for the other half
pub(crate) fn award_point(
    mut commands: Commands,
    mut contacts: EventReader<BallContact>,
) {
    for contact in contacts.read() {
        if let BallContact::Floor { x } = contact {
            commands.trigger(PointScored(Side::of(*x).opponent()));
        }
    }
}

pub fn process_point_scored(
    trigger: Trigger<PointScored>,
    settings: Res<GameSettings>,
    mut score: ResMut<Score>,
    mut next_state: ResMut<NextState<MatchState>>,
    mut balls: Query<(&mut Transform, &mut Velocity), With<Ball>>,
) {
    let PointScored(side) = *trigger.event();

    score.award(side);
    info!("Point {} - score {} - {}", side, score.left, score.right);

    for (mut transform, mut velocity) in balls.iter_mut() {
        serve(&mut transform, &mut velocity, settings.serve_position());
    }

    if let Some(winner) = score.winner(settings.target_score) {
        info!("{} wins {} - {}", winner, score.left, score.right);
        next_state.set(MatchState::GameOver);
    }
}

pub(crate) fn restart_match(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<GameSettings>,
    mut score: ResMut<Score>,
    mut next_state: ResMut<NextState<MatchState>>,
    mut balls: Query<(&mut Transform, &mut Velocity), (With<Ball>, Without<Player>)>,
    mut players: Query<(&Player, &mut Kinematics, &mut Transform), Without<Ball>>,
) {
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }

    info!("Restarting match");
    *score = Score::default();
    reset_players(&settings, &mut players);
    for (mut transform, mut velocity) in balls.iter_mut() {
        serve(&mut transform, &mut velocity, settings.serve_position());
    }
    next_state.set(MatchState::Playing);
}

// Freeze the ball where it is until the match restarts
fn pause_physics(mut query: Query<&mut RapierConfiguration>) {
    for mut config in query.iter_mut() {
        config.physics_pipeline_active = false;
    }
}

fn resume_physics(mut query: Query<&mut RapierConfiguration>) {
    for mut config in query.iter_mut() {
        config.physics_pipeline_active = true;
    }
}
