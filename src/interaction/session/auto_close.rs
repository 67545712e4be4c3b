//! Timed exit for unattended demo runs. `--auto-close` on the command line wins
//! over `window.autoClose`; zero, negative and non-finite values leave it off.
use std::time::Duration;

use bevy::prelude::*;

use crate::core::config::PieceConfig;

/// Command-line override for `window.autoClose`, in seconds.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct AutoCloseOverride(pub Option<f32>);

#[derive(Resource, Debug)]
struct ExitCountdown(Timer);

pub struct AutoClosePlugin;

impl Plugin for AutoClosePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AutoCloseOverride>()
            .add_systems(Startup, arm_exit_countdown)
            .add_systems(Update, count_down_to_exit);
    }
}

pub fn exit_after(cfg: &PieceConfig, cli: AutoCloseOverride) -> Option<Duration> {
    let secs = cli.0.unwrap_or(cfg.window.auto_close);
    (secs.is_finite() && secs > 0.0).then(|| Duration::from_secs_f32(secs))
}

fn arm_exit_countdown(
    mut commands: Commands,
    cfg: Res<PieceConfig>,
    cli: Res<AutoCloseOverride>,
) {
    match exit_after(&cfg, *cli) {
        Some(after) => {
            info!(
                target: "session",
                "exiting after {:.1}s ({})",
                after.as_secs_f32(),
                if cli.0.is_some() { "--auto-close" } else { "window.autoClose" }
            );
            commands.insert_resource(ExitCountdown(Timer::new(after, TimerMode::Once)));
        }
        None => {
            if let Some(secs) = cli.0 {
                warn!(target: "config", "--auto-close {secs} ignored: expected seconds > 0");
            }
        }
    }
}

fn count_down_to_exit(
    mut commands: Commands,
    time: Res<Time>,
    countdown: Option<ResMut<ExitCountdown>>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(mut countdown) = countdown else { return };
    if countdown.0.tick(time.delta()).just_finished() {
        info!(target: "session", "countdown finished, requesting exit");
        exit.write(AppExit::Success);
        commands.remove_resource::<ExitCountdown>();
    }
}
