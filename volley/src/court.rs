use std::fmt;

use bevy::prelude::*;
use bevy_prototype_lyon::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::settings::GameSettings;

// rgb(79, 220, 255) and rgb(65, 66, 66)
const SKY: Color = Color::srgb(0.31, 0.863, 1.0);
const NET: Color = Color::srgb(0.255, 0.259, 0.259);

#[derive(Component)]
struct CameraMarker;

pub struct CourtPlugin;
impl Plugin for CourtPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(SKY))
            .add_systems(Startup, (
                camera_setup,
                add_court,
            ))
            .add_systems(FixedUpdate, (
                configure_gravity.before(PhysicsSet::SyncBackend),
            ));
    }
}

// Half of the court, split by the net at x = 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    // The net centre itself counts as the right half
    pub fn of(x: f32) -> Side {
        if x < 0.0 {
            Side::Left
        } else {
            Side::Right
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    // Sign of the x axis pointing over the net at the opponent
    pub fn attack(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Left => write!(f, "Left"),
            Side::Right => write!(f, "Right"),
        }
    }
}

// Static colliders the ball can touch, used to tell contacts apart
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Floor,
    Wall,
    Net,
}

fn camera_setup(mut commands: Commands) {
    commands.spawn((
        Camera2d::default(),
        CameraMarker,
    ));
}

// Rapier owns the context entity, pick it up the first time it shows up
fn configure_gravity(
    settings: Res<GameSettings>,
    mut query: Query<&mut RapierConfiguration, Added<RapierConfiguration>>,
) {
    for mut config in query.iter_mut() {
        config.gravity = Vec2::new(0., -settings.gravity);
        info!("Gravity set to {}", config.gravity);
    }
}

fn add_court(mut commands: Commands, settings: Res<GameSettings>) {
    let court = settings.court;
    let thickness = settings.wall_thickness;

    // Floor, its top face is the bottom edge of the court
    commands.spawn(surface(
        Surface::Floor,
        Vec2::new(0., settings.floor_y() - thickness / 2.0),
        Vec2::new(court.x + thickness * 2.0, thickness),
        1.0,
    ));

    // Walls, twice the court height so a high ball can't leave over them
    for sign in [-1.0, 1.0] {
        commands.spawn(surface(
            Surface::Wall,
            Vec2::new(sign * (court.x + thickness) / 2.0, court.y / 2.0),
            Vec2::new(thickness, court.y * 2.0),
            1.0,
        ));
    }

    // Net, the only static piece that gets drawn
    let net = shapes::Rectangle {
        extents: settings.net,
        ..default()
    };

    commands.spawn((
        ShapeBundle {
            path: GeometryBuilder::build_as(&net),
            ..default()
        },
        Fill::color(NET),
    ))
    .insert(surface(
        Surface::Net,
        Vec2::new(0., settings.net_top() - settings.net.y / 2.0),
        settings.net,
        settings.net_restitution,
    ));
}

fn surface(
    kind: Surface,
    center: Vec2,
    size: Vec2,
    restitution: f32,
) -> (Surface, RigidBody, Collider, Restitution, Transform) {
    (
        kind,
        RigidBody::Fixed,
        Collider::cuboid(size.x / 2.0, size.y / 2.0),
        Restitution::coefficient(restitution),
        Transform::from_translation(center.extend(0.)),
    )
}
