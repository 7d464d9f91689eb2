use bevy::prelude::*;

use crate::FixedGameSystem;

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, (
                read_player_input.in_set(FixedGameSystem::Input),
            ))
            .add_systems(Update, (
                exit_on_escape,
                toggle_pause,
            ));
    }
}

// Key bindings of one player
#[derive(Component, Debug, Clone, Copy, PartialEq)]
#[require(PlayerIntent)]
pub struct Controls {
    pub left: KeyCode,
    pub right: KeyCode,
    pub jump: KeyCode,
}

impl Controls {
    pub const WASD: Controls = Controls {
        left: KeyCode::KeyA,
        right: KeyCode::KeyD,
        jump: KeyCode::KeyW,
    };

    pub const ARROWS: Controls = Controls {
        left: KeyCode::ArrowLeft,
        right: KeyCode::ArrowRight,
        jump: KeyCode::ArrowUp,
    };
}

// What the player wants to do this tick
// horizontal: -1 left, 0 idle, 1 right
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct PlayerIntent {
    pub horizontal: f32,
    pub jump: bool,
}

impl PlayerIntent {
    pub fn sample(controls: &Controls, keys: &ButtonInput<KeyCode>) -> PlayerIntent {
        let mut horizontal = 0.0;
        if keys.pressed(controls.left) {
            horizontal = -1.0;
        }
        // Right wins when both are held
        if keys.pressed(controls.right) {
            horizontal = 1.0;
        }

        PlayerIntent {
            horizontal,
            jump: keys.pressed(controls.jump),
        }
    }
}

// Held state only, so sampling inside the fixed loop doesn't miss anything
pub(crate) fn read_player_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut query: Query<(&Controls, &mut PlayerIntent)>,
) {
    for (controls, mut intent) in query.iter_mut() {
        *intent = PlayerIntent::sample(controls, &keys);
    }
}

pub(crate) fn exit_on_escape(
    keys: Res<ButtonInput<KeyCode>>,
    mut exit: EventWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        info!("Escape pressed, exiting");
        exit.send(AppExit::Success);
    }
}

// Pausing virtual time stops the fixed loop, which holds both physics and players
pub(crate) fn toggle_pause(
    keys: Res<ButtonInput<KeyCode>>,
    mut time: ResMut<Time<Virtual>>,
) {
    if !keys.just_pressed(KeyCode::KeyP) {
        return;
    }

    if time.is_paused() {
        info!("Resumed");
        time.unpause();
    } else {
        info!("Paused");
        time.pause();
    }
}

#[cfg(test)]
mod test_input {
    use super::*;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ButtonInput<KeyCode>>()
            .add_event::<AppExit>()
            .add_systems(Update, (read_player_input, exit_on_escape, toggle_pause));
        app
    }

    fn press(app: &mut App, key: KeyCode) {
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(key);
    }

    #[test]
    fn test_sample() {
        let mut keys = ButtonInput::<KeyCode>::default();
        assert_eq!(PlayerIntent::sample(&Controls::WASD, &keys), PlayerIntent::default());

        keys.press(KeyCode::KeyA);
        assert_eq!(PlayerIntent::sample(&Controls::WASD, &keys).horizontal, -1.0);

        keys.press(KeyCode::KeyD);
        keys.press(KeyCode::KeyW);
        assert_eq!(
            PlayerIntent::sample(&Controls::WASD, &keys),
            PlayerIntent { horizontal: 1.0, jump: true },
        );

        // The other player's keys are not ours
        assert_eq!(PlayerIntent::sample(&Controls::ARROWS, &keys), PlayerIntent::default());
    }

    #[test]
    fn test_read_player_input() {
        let mut app = app();
        let left = app.world_mut().spawn(Controls::WASD).id();
        let right = app.world_mut().spawn(Controls::ARROWS).id();

        press(&mut app, KeyCode::ArrowLeft);
        press(&mut app, KeyCode::ArrowUp);
        app.update();

        assert_eq!(*app.world().get::<PlayerIntent>(left).unwrap(), PlayerIntent::default());
        assert_eq!(
            *app.world().get::<PlayerIntent>(right).unwrap(),
            PlayerIntent { horizontal: -1.0, jump: true },
        );
    }

    #[test]
    fn test_toggle_pause() {
        let mut app = app();

        press(&mut app, KeyCode::KeyP);
        app.update();
        assert!(app.world().resource::<Time<Virtual>>().is_paused());

        // Still held, no second toggle
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().clear();
        app.update();
        assert!(app.world().resource::<Time<Virtual>>().is_paused());

        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.release(KeyCode::KeyP);
            keys.clear();
            keys.press(KeyCode::KeyP);
        }
        app.update();
        assert!(!app.world().resource::<Time<Virtual>>().is_paused());
    }

    #[test]
    fn test_exit_on_escape() {
        let mut app = app();

        press(&mut app, KeyCode::Escape);
        app.update();

        let events = app.world().resource::<Events<AppExit>>();
        assert_eq!(events.iter_current_update_events().count(), 1);
    }
}
