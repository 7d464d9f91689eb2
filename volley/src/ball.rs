use bevy::prelude::*;
use bevy_prototype_lyon::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::FixedGameSystem;
use crate::collision::BallContact;
use crate::court::Side;
use crate::settings::GameSettings;

const BALL: Color = Color::BLACK;

pub struct BallPlugin;
impl Plugin for BallPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (
                add_ball,
            ))
            .add_systems(FixedUpdate, (
                apply_player_rebound.in_set(FixedGameSystem::Scoring),
            ))
            .add_systems(Update, (
                debug_ball_gizmos,
            ));
    }
}

#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Ball;

#[derive(Component, Clone, Copy)]
pub struct BallDebug;

pub fn add_ball(mut commands: Commands, settings: Res<GameSettings>) {
    let circle = shapes::Circle {
        radius: settings.ball_radius,
        center: Vec2::ZERO,
    };

    let mut ball = commands.spawn((
        ShapeBundle {
            path: GeometryBuilder::build_as(&circle),
            ..default()
        },
        Fill::color(BALL),
    ));

    ball.insert((
            Ball,
            Transform::from_translation(settings.serve_position().extend(1.)),
        ))
        .insert(RigidBody::Dynamic)
        .insert(Collider::ball(settings.ball_radius))
        .insert(ColliderMassProperties::Mass(1.0))
        // Multiply so the other surface decides, a perfect bounce off the floor and half off the net
        .insert(Restitution {
            coefficient: 1.0,
            combine_rule: CoefficientCombineRule::Multiply,
        })
        .insert(Friction {
            coefficient: 0.0,
            combine_rule: CoefficientCombineRule::Min,
        })
        .insert(Velocity::zero())
        // Fast enough to tunnel through the net at low tick rates
        .insert(Ccd::enabled())
        .insert(ActiveEvents::COLLISION_EVENTS);

    if settings.debug {
        ball.insert(BallDebug);
    }
}

// Teleport the ball to the serve spot and let it drop from rest
pub fn serve(transform: &mut Transform, velocity: &mut Velocity, position: Vec2) {
    transform.translation = position.extend(transform.translation.z);
    transform.rotation = Quat::IDENTITY;
    *velocity = Velocity::zero();
}

// Velocity the ball leaves a player with, over the net and upwards
pub fn rebound(side: Side, rebound: Vec2) -> Vec2 {
    Vec2::new(side.attack() * rebound.x, rebound.y)
}

pub(crate) fn apply_player_rebound(
    settings: Res<GameSettings>,
    mut contacts: EventReader<BallContact>,
    mut query: Query<&mut Velocity, With<Ball>>,
) {
    for contact in contacts.read() {
        let BallContact::Player(side) = contact else {
            continue;
        };

        for mut velocity in query.iter_mut() {
            velocity.linvel = rebound(*side, settings.rebound);
        }
    }
}

pub(crate) fn debug_ball_gizmos(
    query: Query<(&Transform, &Velocity), With<BallDebug>>,
    mut gizmos: Gizmos,
) {
    for (tran, vel) in query.iter() {
        let base = tran.translation.truncate();

        // Velocity direction, length scaled down to stay on screen
        if vel.linvel != Vec2::ZERO {
            gizmos.arrow_2d(
                base,
                base + vel.linvel * 0.1,
                bevy::color::palettes::css::RED,
            );
        }
    }
}

#[cfg(test)]
mod test_ball {
    use super::*;

    #[test]
    fn test_rebound() {
        let settings = GameSettings::default();

        assert_eq!(rebound(Side::Left, settings.rebound), Vec2::new(600., 300.));
        assert_eq!(rebound(Side::Right, settings.rebound), Vec2::new(-600., 300.));
    }

    #[test]
    fn test_serve() {
        let mut transform = Transform::from_xyz(300., -290., 1.).with_rotation(Quat::from_rotation_z(1.0));
        let mut velocity = Velocity {
            linvel: Vec2::new(10., -20.),
            angvel: 3.0,
        };

        serve(&mut transform, &mut velocity, Vec2::new(0., 100.));

        assert_eq!(transform.translation, Vec3::new(0., 100., 1.));
        assert_eq!(transform.rotation, Quat::IDENTITY);
        assert_eq!(velocity.linvel, Vec2::ZERO);
        assert_eq!(velocity.angvel, 0.0);
    }

    #[test]
    fn test_apply_player_rebound() {
        let mut app = App::new();
        app.insert_resource(GameSettings::default())
            .add_event::<BallContact>()
            .add_systems(Update, apply_player_rebound);

        let ball = app.world_mut().spawn((Ball, Velocity::zero())).id();

        app.world_mut().send_event(BallContact::Player(Side::Right));
        app.update();
        assert_eq!(app.world().get::<Velocity>(ball).unwrap().linvel, Vec2::new(-600., 300.));

        // The floor is not the ball's business
        app.world_mut().send_event(BallContact::Floor { x: 10. });
        app.update();
        assert_eq!(app.world().get::<Velocity>(ball).unwrap().linvel, Vec2::new(-600., 300.));
    }

    #[test]
    fn test_add_ball() {
        let mut app = App::new();
        let mut settings = GameSettings::default();
        settings.debug = true;
        app.insert_resource(settings)
            .add_systems(Startup, add_ball);
        app.update();

        let world = app.world_mut();
        let (transform, velocity) = world
            .query_filtered::<(&Transform, &Velocity), (With<Ball>, With<BallDebug>)>()
            .single(world);

        assert_eq!(transform.translation, Vec3::new(15., 100., 1.));
        assert_eq!(velocity.linvel, Vec2::ZERO);
    }
}
