use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::FixedGameSystem;
use crate::collision::Collision;
use crate::court::Side;
use crate::input::Controls;
use crate::input::PlayerIntent;
use crate::settings::GameSettings;
use crate::settings::Lane;
use crate::settings::PlayerTuning;

const FIGURE: Color = Color::BLACK;
const FIGURE_HIT: Color = Color::srgb(0.85, 0.1, 0.1);
const FIGURE_LINE_WIDTH: f32 = 3.0;

// Stick figure art is drawn in a 54 unit tall box, x grows right and y grows down from the top of
// the head, the head is a 20 unit circle whose centre sits at (10, 10)
const FIGURE_HEIGHT: f32 = 54.0;
const HEAD: Vec2 = Vec2::new(10., 10.);
const HEAD_RADIUS: f32 = 10.;

const STANDING: [(Vec2, Vec2); 5] = [
    (Vec2::new(9., 34.), Vec2::new(9., 14.)),
    (Vec2::new(9., 34.), Vec2::new(19., 54.)),
    (Vec2::new(9., 34.), Vec2::new(-1., 54.)),
    (Vec2::new(9., 14.), Vec2::new(17., 34.)),
    (Vec2::new(9., 14.), Vec2::new(1., 34.)),
];

// Arms up towards the net
const JUMPING_LEFT: [(Vec2, Vec2); 7] = [
    (Vec2::new(14., 36.), Vec2::new(10., 14.)),
    (Vec2::new(9., 22.), Vec2::new(-3., 19.)),
    (Vec2::new(-3., 19.), Vec2::new(-6., 3.)),
    (Vec2::new(9., 22.), Vec2::new(26., 25.)),
    (Vec2::new(13., 36.), Vec2::new(4., 54.)),
    (Vec2::new(13., 36.), Vec2::new(22., 38.)),
    (Vec2::new(22., 38.), Vec2::new(16., 50.)),
];

const JUMPING_RIGHT: [(Vec2, Vec2); 7] = [
    (Vec2::new(6., 36.), Vec2::new(10., 14.)),
    (Vec2::new(11., 22.), Vec2::new(23., 19.)),
    (Vec2::new(23., 19.), Vec2::new(26., 3.)),
    (Vec2::new(11., 22.), Vec2::new(-6., 25.)),
    (Vec2::new(7., 36.), Vec2::new(16., 54.)),
    (Vec2::new(7., 36.), Vec2::new(-2., 38.)),
    (Vec2::new(-2., 38.), Vec2::new(4., 50.)),
];

pub struct PlayerPlugin;
impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (
                configure_gizmos,
                add_players,
            ))
            .add_systems(FixedUpdate, (
                apply_player_movement.in_set(FixedGameSystem::GameLogic),
            ))
            .add_systems(Update, (
                draw_players,
            ));
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
#[require(Kinematics, Collision)]
pub struct Player {
    pub side: Side,
}

// Simulation state of a player, the physics body just follows `position`
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub position: Vec2,
    pub vertical: f32,
    pub airborne: bool,
}

impl Kinematics {
    pub fn at(position: Vec2) -> Kinematics {
        Kinematics {
            position,
            ..default()
        }
    }

    pub fn step(self, intent: PlayerIntent, lane: &Lane, tuning: &PlayerTuning, dt: f32) -> Kinematics {
        let mut next = self;

        // Only jump off the ground
        if intent.jump && !self.airborne {
            next.vertical = tuning.jump_speed;
            next.airborne = true;
        }

        next.vertical -= tuning.gravity * dt;
        let y = next.position.y + next.vertical * dt;
        if y <= lane.ground_y {
            next.position.y = lane.ground_y;
            next.vertical = 0.0;
            next.airborne = false;
        } else {
            next.position.y = y;
        }

        next.position.x = lane.clamp_x(next.position.x + intent.horizontal * tuning.speed * dt);
        next
    }
}

pub fn configure_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<DefaultGizmoConfigGroup>();
    config.line_width = FIGURE_LINE_WIDTH;
}

pub fn add_players(mut commands: Commands, settings: Res<GameSettings>) {
    let size = settings.player.size;

    for (side, controls) in [(Side::Left, Controls::WASD), (Side::Right, Controls::ARROWS)] {
        let position = settings.spawn(side);

        commands.spawn((
            Player { side },
            controls,
            Kinematics::at(position),
            Transform::from_translation(position.extend(0.)),
        ))
        // Kinematic so the ball bounces off but never shoves the player around
        .insert(RigidBody::KinematicPositionBased)
        .insert(Collider::cuboid(size.x / 2.0, size.y / 2.0))
        .insert(Restitution::coefficient(settings.player_restitution))
        .insert(Friction::coefficient(settings.player_friction));
    }
}

// Put both players back on their spawn, standing still
pub fn reset_players<F: QueryFilter>(
    settings: &GameSettings,
    query: &mut Query<(&Player, &mut Kinematics, &mut Transform), F>,
) {
    for (player, mut kinematics, mut transform) in query.iter_mut() {
        *kinematics = Kinematics::at(settings.spawn(player.side));
        transform.translation = kinematics.position.extend(transform.translation.z);
    }
}

pub(crate) fn apply_player_movement(
    settings: Res<GameSettings>,
    fixed_time: Res<Time<Fixed>>,
    mut query: Query<(&Player, &PlayerIntent, &mut Kinematics, &mut Transform)>,
) {
    let dt = fixed_time.delta_secs();

    for (player, intent, mut kinematics, mut transform) in query.iter_mut() {
        let lane = settings.lane(player.side);

        *kinematics = kinematics.step(*intent, &lane, &settings.player, dt);
        transform.translation = kinematics.position.extend(transform.translation.z);
    }
}

// Pose lines in figure space, pick the side specific jump when off the ground
fn pose(side: Side, airborne: bool) -> &'static [(Vec2, Vec2)] {
    match (airborne, side) {
        (false, _) => &STANDING,
        (true, Side::Left) => &JUMPING_LEFT,
        (true, Side::Right) => &JUMPING_RIGHT,
    }
}

// Map figure space onto the player box, the figure fills the box top to bottom
fn to_world(center: Vec2, height: f32, point: Vec2) -> Vec2 {
    let scale = height / FIGURE_HEIGHT;
    center + Vec2::new((point.x - HEAD.x) * scale, height / 2.0 - point.y * scale)
}

pub(crate) fn draw_players(
    mut gizmos: Gizmos,
    settings: Res<GameSettings>,
    query: Query<(&Player, &Kinematics, &Collision)>,
) {
    let height = settings.player.size.y;
    let scale = height / FIGURE_HEIGHT;

    for (player, kinematics, collision) in query.iter() {
        let color = if settings.debug && collision.0 > 0 {
            FIGURE_HIT
        } else {
            FIGURE
        };
        let center = kinematics.position;

        for (from, to) in pose(player.side, kinematics.airborne) {
            gizmos.line_2d(to_world(center, height, *from), to_world(center, height, *to), color);
        }

        // Gizmos don't fill, stack rings for a solid head
        let head = to_world(center, height, HEAD);
        let mut radius = HEAD_RADIUS * scale;
        while radius > 0.0 {
            gizmos.circle_2d(Isometry2d::from_translation(head), radius, color);
            radius -= FIGURE_LINE_WIDTH / 2.0;
        }
    }
}
