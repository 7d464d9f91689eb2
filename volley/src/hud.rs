use bevy::prelude::*;

use crate::score::MatchState;
use crate::score::Score;
use crate::settings::GameSettings;

const SCORE_FONT_SIZE: f32 = 74.0;
const BANNER_FONT_SIZE: f32 = 40.0;

pub struct HudPlugin;
impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, add_hud)
            .add_systems(Update, (
                update_scoreboard,
                update_banner,
            ));
    }
}

#[derive(Component)]
pub struct Scoreboard;

#[derive(Component)]
pub struct Banner;

pub fn scoreboard_text(score: &Score) -> String {
    format!("{} - {}", score.left, score.right)
}

// Nothing to say while the rally is on
pub fn banner_text(state: MatchState, paused: bool, score: &Score, settings: &GameSettings) -> Option<String> {
    match state {
        MatchState::GameOver => {
            let winner = score.winner(settings.target_score)?;
            Some(format!("{} wins! Press Space", winner))
        },
        MatchState::Playing if paused => Some("Paused".to_string()),
        MatchState::Playing => None,
    }
}

fn add_hud(mut commands: Commands, settings: Res<GameSettings>) {
    let top = settings.court.y / 2.0;

    commands.spawn((
        Text2d::new(scoreboard_text(&Score::default())),
        TextFont {
            font_size: SCORE_FONT_SIZE,
            ..default()
        },
        TextColor(Color::BLACK),
        Transform::from_xyz(0., top - 80., 2.),
        Scoreboard,
    ));

    commands.spawn((
        Text2d::default(),
        TextFont {
            font_size: BANNER_FONT_SIZE,
            ..default()
        },
        TextColor(Color::BLACK),
        Transform::from_xyz(0., top - 150., 2.),
        Visibility::Hidden,
        Banner,
    ));
}

pub(crate) fn update_scoreboard(
    score: Res<Score>,
    mut query: Query<&mut Text2d, With<Scoreboard>>,
) {
    if !score.is_changed() {
        return;
    }

    for mut text in query.iter_mut() {
        **text = scoreboard_text(&score);
    }
}

pub(crate) fn update_banner(
    state: Res<State<MatchState>>,
    time: Res<Time<Virtual>>,
    score: Res<Score>,
    settings: Res<GameSettings>,
    mut query: Query<(&mut Text2d, &mut Visibility), With<Banner>>,
) {
    let banner = banner_text(*state.get(), time.is_paused(), &score, &settings);

    for (mut text, mut visibility) in query.iter_mut() {
        match &banner {
            Some(message) => {
                if **text != *message {
                    **text = message.clone();
                }
                visibility.set_if_neq(Visibility::Inherited);
            },
            None => {
                visibility.set_if_neq(Visibility::Hidden);
            },
        }
    }
}
