use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::diagnostic::LogDiagnosticsPlugin;
use bevy::log::Level;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_prototype_lyon::prelude::ShapePlugin;
use bevy_rapier2d::prelude::*;

use clap::Parser;

use volley::FixedGameSystemPlugin;
use volley::physics_plugin;

use volley::ball::BallPlugin;
use volley::collision::CollisionPlugin;
use volley::court::CourtPlugin;
use volley::hud::HudPlugin;
use volley::input::InputPlugin;
use volley::player::PlayerPlugin;
use volley::score::ScorePlugin;

use volley::settings::Cli;
use volley::settings::GameSettings;

fn main() -> AppExit {
    let cli = Cli::parse();
    let settings = match GameSettings::try_from(&cli) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("volley: {}", err);
            return AppExit::error();
        },
    };

    let mut app = App::new();
    app.insert_resource(settings.fixed_time())
        .insert_resource(settings.timestep())

        // Window + Logging
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Volleyball".to_string(),
                    resolution: WindowResolution::new(settings.court.x, settings.court.y),
                    resizable: false,
                    ..default()
                }),
                ..default()
            })
            .set(LogPlugin {
                filter: settings.log_filter.clone(),
                level: Level::INFO,
                ..default()
            }))

        // Graphics (lyon)
        .add_plugins(ShapePlugin)

        // Physics, stepped in the fixed loop alongside the players
        .add_plugins(physics_plugin());

    if settings.debug {
        app.add_plugins(RapierDebugRenderPlugin::default());
    }

    if settings.diagnostics {
        app.add_plugins(FrameTimeDiagnosticsPlugin)
            .add_plugins(LogDiagnosticsPlugin::default());
    }

    info!("Starting at {} ticks per second, target score {:?}", settings.fps, settings.target_score);

    app.insert_resource(settings)

        // Game bits
        .add_plugins(FixedGameSystemPlugin)
        .add_plugins(CourtPlugin)
        .add_plugins(InputPlugin)
        .add_plugins(PlayerPlugin)
        .add_plugins(BallPlugin)
        .add_plugins(CollisionPlugin)
        .add_plugins(ScorePlugin)
        .add_plugins(HudPlugin)
        .run()
}
