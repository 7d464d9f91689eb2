use bevy::prelude::*;
use bevy_rapier2d::prelude::TimestepMode;
use clap::Parser;
use thiserror::Error;

use crate::court::Side;

// Anything above this is just burning cpu, the display won't keep up
const MAX_FPS: f64 = 480.0;

/// Two player arcade volleyball, left player on A/D/W and right player on the arrow keys.
#[derive(Parser, Debug, Clone)]
#[command(name = "volley", version)]
pub struct Cli {
    /// Simulation ticks per second (physics and player movement)
    #[arg(long, default_value_t = 60.0)]
    pub fps: f64,

    /// End the match once a side reaches this many points, otherwise rally forever
    #[arg(long)]
    pub target_score: Option<u32>,

    /// Render the physics colliders and ball velocity
    #[arg(long)]
    pub debug: bool,

    /// Log frame time diagnostics
    #[arg(long)]
    pub diagnostics: bool,

    /// Log filter, same syntax as RUST_LOG
    #[arg(long, default_value = "info,wgpu=error,naga=warn")]
    pub log_filter: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("tick rate must be in (0, 480], got {0}")]
    TickRate(f64),

    #[error("target score must be at least 1")]
    TargetScore,

    #[error("{0} must be strictly positive")]
    Dimension(&'static str),

    #[error("player of width {player} does not fit on a {half_court} wide half court")]
    Lane { player: f32, half_court: f32 },
}

// Per player kinematics, everything is in pixels and seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerTuning {
    pub size: Vec2,
    pub speed: f32,
    pub jump_speed: f32,
    pub gravity: f32,
}

// Horizontal range a player centre may occupy and the height of its centre when standing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lane {
    pub min_x: f32,
    pub max_x: f32,
    pub ground_y: f32,
}

impl Lane {
    pub fn clamp_x(&self, x: f32) -> f32 {
        x.clamp(self.min_x, self.max_x)
    }
}

// World layout and tuning, the court is centered on the origin with +Y up
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameSettings {
    pub fps: f64,
    pub target_score: Option<u32>,
    pub debug: bool,
    pub diagnostics: bool,
    pub log_filter: String,

    pub court: Vec2,
    pub wall_thickness: f32,
    pub net: Vec2,
    pub net_restitution: f32,

    pub player: PlayerTuning,
    pub player_spawn_x: f32,
    pub player_restitution: f32,
    pub player_friction: f32,

    pub ball_radius: f32,
    pub gravity: f32,
    pub rebound: Vec2,
    // Offset from the top of the court
    pub serve_drop: f32,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            fps: 60.0,
            target_score: None,
            debug: false,
            diagnostics: false,
            log_filter: "info,wgpu=error,naga=warn".to_string(),

            court: Vec2::new(1200., 600.),
            wall_thickness: 10.,
            net: Vec2::new(20., 150.),
            net_restitution: 0.5,

            // 6 px/frame, 15 px/frame jump and 0.5 px/frame² at 60 fps
            player: PlayerTuning {
                size: Vec2::new(50., 100.),
                speed: 360.,
                jump_speed: 900.,
                gravity: 1800.,
            },
            player_spawn_x: 400.,
            player_restitution: 0.5,
            player_friction: 0.5,

            ball_radius: 10.,
            gravity: 500.,
            rebound: Vec2::new(600., 300.),
            serve_drop: 200.,
        }
    }
}

impl TryFrom<&Cli> for GameSettings {
    type Error = SettingsError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        let settings = GameSettings {
            fps: cli.fps,
            target_score: cli.target_score,
            debug: cli.debug,
            diagnostics: cli.diagnostics,
            log_filter: cli.log_filter.clone(),
            ..default()
        };

        settings.validate()?;
        Ok(settings)
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        // Written so NaN fails as well
        if !(self.fps > 0.0 && self.fps <= MAX_FPS) {
            return Err(SettingsError::TickRate(self.fps));
        }

        if self.target_score == Some(0) {
            return Err(SettingsError::TargetScore);
        }

        let dimensions = [
            ("court width", self.court.x),
            ("court height", self.court.y),
            ("net width", self.net.x),
            ("net height", self.net.y),
            ("player width", self.player.size.x),
            ("player height", self.player.size.y),
            ("ball radius", self.ball_radius),
            ("wall thickness", self.wall_thickness),
        ];
        for (name, value) in dimensions {
            if !(value > 0.0) {
                return Err(SettingsError::Dimension(name));
            }
        }

        let half_court = self.court.x / 2.0 - self.net.x / 2.0;
        if self.player.size.x >= half_court {
            return Err(SettingsError::Lane { player: self.player.size.x, half_court });
        }

        Ok(())
    }

    pub fn fixed_time(&self) -> Time<Fixed> {
        Time::<Fixed>::from_hz(self.fps)
    }

    // Rapier steps the same dt the player kinematics integrate with, its variable mode clamps
    // every step to 1/60 and would slow the ball down below 60 ticks per second
    pub fn timestep(&self) -> TimestepMode {
        TimestepMode::Fixed {
            dt: (1.0 / self.fps) as f32,
            substeps: 1,
        }
    }

    pub fn floor_y(&self) -> f32 {
        -(self.court.y / 2.0)
    }

    pub fn net_top(&self) -> f32 {
        self.floor_y() + self.net.y
    }

    // Player centre height while standing on the floor
    pub fn ground_y(&self) -> f32 {
        self.floor_y() + self.player.size.y / 2.0
    }

    pub fn lane(&self, side: Side) -> Lane {
        let half_width = self.player.size.x / 2.0;
        let wall = self.court.x / 2.0 - half_width;
        let net = self.net.x / 2.0 + half_width;

        let (min_x, max_x) = match side {
            Side::Left => (-wall, -net),
            Side::Right => (net, wall),
        };

        Lane { min_x, max_x, ground_y: self.ground_y() }
    }

    pub fn spawn(&self, side: Side) -> Vec2 {
        let x = match side {
            Side::Left => -self.player_spawn_x,
            Side::Right => self.player_spawn_x,
        };
        Vec2::new(self.lane(side).clamp_x(x), self.ground_y())
    }

    // Just right of the net's top corner, a ball dropped dead centre would settle on the flat top
    pub fn serve_position(&self) -> Vec2 {
        Vec2::new(self.net.x / 2.0 + self.ball_radius / 2.0, self.court.y / 2.0 - self.serve_drop)
    }
}

#[cfg(test)]
mod test_settings {
    use super::*;

    fn parse(args: &[&str]) -> Result<GameSettings, SettingsError> {
        let cli = Cli::try_parse_from(args).expect("cli should parse");
        GameSettings::try_from(&cli)
    }

    #[test]
    fn test_defaults() {
        let settings = parse(&["volley"]).unwrap();

        assert_eq!(settings.fps, 60.0);
        assert_eq!(settings.target_score, None);
        assert!(!settings.debug);
        assert_eq!(settings.court, GameSettings::default().court);
    }

    #[test]
    fn test_flags() {
        let settings = parse(&["volley", "--fps", "120", "--target-score", "7", "--debug"]).unwrap();

        assert_eq!(settings.fps, 120.0);
        assert_eq!(settings.target_score, Some(7));
        assert!(settings.debug);
    }

    #[test]
    fn test_bad_tick_rate() {
        assert_eq!(parse(&["volley", "--fps", "0"]), Err(SettingsError::TickRate(0.0)));
        assert_eq!(parse(&["volley", "--fps", "1000"]), Err(SettingsError::TickRate(1000.0)));
    }

    #[test]
    fn test_bad_target_score() {
        assert_eq!(parse(&["volley", "--target-score", "0"]), Err(SettingsError::TargetScore));
    }

    #[test]
    fn test_player_must_fit() {
        let mut settings = GameSettings::default();
        settings.player.size.x = 600.;

        assert!(matches!(settings.validate(), Err(SettingsError::Lane { .. })));

        settings.player.size.x = 0.;
        assert_eq!(settings.validate(), Err(SettingsError::Dimension("player width")));
    }

    #[test]
    fn test_physics_shares_the_tick() {
        let settings = parse(&["volley", "--fps", "30"]).unwrap();

        assert_eq!(settings.fixed_time().timestep(), std::time::Duration::from_secs_f64(1.0 / 30.0));
        match settings.timestep() {
            TimestepMode::Fixed { dt, substeps } => {
                assert!((dt - 1.0 / 30.0).abs() < 1e-6);
                assert_eq!(substeps, 1);
            },
            _ => panic!("rapier should step a fixed dt"),
        }
    }

    #[test]
    fn test_geometry() {
        let settings = GameSettings::default();

        assert_eq!(settings.floor_y(), -300.);
        assert_eq!(settings.net_top(), -150.);
        assert_eq!(settings.ground_y(), -250.);
        assert_eq!(settings.serve_position(), Vec2::new(15., 100.));
    }

    #[test]
    fn test_lanes() {
        let settings = GameSettings::default();

        let left = settings.lane(Side::Left);
        assert_eq!((left.min_x, left.max_x), (-575., -35.));

        let right = settings.lane(Side::Right);
        assert_eq!((right.min_x, right.max_x), (35., 575.));

        assert_eq!(settings.spawn(Side::Left), Vec2::new(-400., -250.));
        assert_eq!(settings.spawn(Side::Right), Vec2::new(400., -250.));
    }
}
