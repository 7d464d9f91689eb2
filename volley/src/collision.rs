use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::FixedGameSystem;
use crate::ball::Ball;
use crate::court::Side;
use crate::court::Surface;
use crate::player::Player;

pub struct CollisionPlugin;
impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BallContact>()
            .add_systems(FixedUpdate, (
                process_collision_event.in_set(FixedGameSystem::Collision),
            ));
    }
}

// Ref-counted collision, if greater than zero, its colliding with the ball
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct Collision(pub u32);

// The ball started touching something the game cares about
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum BallContact {
    Player(Side),
    // x is where the ball touched down
    Floor { x: f32 },
}

// What the other collider in a ball contact is
enum Touched {
    Player(Side),
    Surface(Surface),
}

pub(crate) fn process_collision_event(
    mut collision_events: EventReader<CollisionEvent>,
    mut contacts: EventWriter<BallContact>,
    balls: Query<&Transform, With<Ball>>,
    surfaces: Query<&Surface>,
    mut players: Query<(&Player, &mut Collision)>,
) {
    for collision_event in collision_events.read() {
        let (e1, e2, started) = match collision_event {
            CollisionEvent::Started(e1, e2, _) => (*e1, *e2, true),
            CollisionEvent::Stopped(e1, e2, _) => (*e1, *e2, false),
        };

        // Rapier gives no ordering guarantee on the pair
        let (ball, other) = if balls.contains(e1) {
            (e1, e2)
        } else if balls.contains(e2) {
            (e2, e1)
        } else {
            continue;
        };

        let touched = if let Ok((player, mut collision)) = players.get_mut(other) {
            if started {
                collision.0 += 1;
            } else {
                collision.0 = collision.0.saturating_sub(1);
            }
            Touched::Player(player.side)
        } else if let Ok(surface) = surfaces.get(other) {
            Touched::Surface(*surface)
        } else {
            warn!("Ball collision with unknown entity - {:?}", collision_event);
            continue;
        };

        if !started {
            continue;
        }

        match touched {
            Touched::Player(side) => {
                debug!("Ball hit by {} player", side);
                contacts.send(BallContact::Player(side));
            },
            Touched::Surface(Surface::Floor) => {
                let Ok(transform) = balls.get(ball) else {
                    warn!("Ball vanished - {:?}", ball);
                    continue;
                };
                contacts.send(BallContact::Floor { x: transform.translation.x });
            },
            Touched::Surface(surface) => {
                debug!("Ball bounced off {:?}", surface);
            },
        }
    }
}
