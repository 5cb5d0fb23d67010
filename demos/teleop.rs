// Keyboard teleop for the Limon bridge
//
// W/S drive, A/D steer, R/F change speed step, 0/1 select motion mode, Q quit.
// Releasing all keys stops the base within HOLD_TIMEOUT.

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::time::{Duration, Instant};
use tracing::info;
use zenoh::pubsub::Publisher;

use limon_zenoh_bridge::config::{
    MAX_ANGULAR_SPEED, MAX_LINEAR_SPEED, TOPIC_CMD_VEL, TOPIC_SETTING,
};
use limon_zenoh_bridge::messages::{LimonSetting, MotionCommand};
use limon_zenoh_bridge::mode::MotionMode;

type DemoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

const STEPS: usize = 4;
const HOLD_TIMEOUT: Duration = Duration::from_millis(100);
const PUBLISH_PERIOD: Duration = Duration::from_millis(20);

enum Action {
    Drive(f64),
    Steer(f64),
    Step(isize),
    Mode(MotionMode),
    Quit,
}

fn action_for(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Char('w') | KeyCode::Up => Action::Drive(1.0),
        KeyCode::Char('s') | KeyCode::Down => Action::Drive(-1.0),
        KeyCode::Char('a') | KeyCode::Left => Action::Steer(1.0),
        KeyCode::Char('d') | KeyCode::Right => Action::Steer(-1.0),
        KeyCode::Char('r') => Action::Step(1),
        KeyCode::Char('f') => Action::Step(-1),
        KeyCode::Char('0') => Action::Mode(MotionMode::FourWheelDifferential),
        KeyCode::Char('1') => Action::Mode(MotionMode::Ackermann),
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Held command, scaled to a fraction of the base limits
struct Teleop {
    step: usize,
    drive: f64,
    steer: f64,
    held_at: Instant,
}

impl Teleop {
    fn new() -> Self {
        Self {
            step: 1,
            drive: 0.0,
            steer: 0.0,
            held_at: Instant::now(),
        }
    }

    fn scale(&self) -> f64 {
        self.step as f64 / STEPS as f64
    }

    fn command(&mut self) -> MotionCommand {
        if self.held_at.elapsed() > HOLD_TIMEOUT {
            self.drive = 0.0;
            self.steer = 0.0;
        }
        MotionCommand {
            linear: self.drive * self.scale() * MAX_LINEAR_SPEED,
            angular: self.steer * self.scale() * MAX_ANGULAR_SPEED,
        }
    }
}

#[tokio::main]
async fn main() -> DemoResult<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let pub_cmd = session.declare_publisher(TOPIC_CMD_VEL).await?;
    let pub_setting = session.declare_publisher(TOPIC_SETTING).await?;

    info!("W/S drive, A/D steer, R/F speed step, 0 differential, 1 ackermann, Q quit");

    enable_raw_mode()?;
    let result = run_teleop(&pub_cmd, &pub_setting).await;
    disable_raw_mode()?;

    result
}

async fn run_teleop(pub_cmd: &Publisher<'_>, pub_setting: &Publisher<'_>) -> DemoResult<()> {
    let mut teleop = Teleop::new();

    loop {
        if event::poll(PUBLISH_PERIOD)? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let action = if kind == KeyEventKind::Release {
                    None
                } else {
                    action_for(code)
                };
                match action {
                    Some(Action::Drive(dir)) => {
                        teleop.drive = dir;
                        teleop.held_at = Instant::now();
                    }
                    Some(Action::Steer(dir)) => {
                        teleop.steer = dir;
                        teleop.held_at = Instant::now();
                    }
                    Some(Action::Step(delta)) => {
                        teleop.step = teleop.step.saturating_add_signed(delta).clamp(1, STEPS);
                        info!("Speed step {}/{}", teleop.step, STEPS);
                    }
                    Some(Action::Mode(mode)) => {
                        info!("Requesting {} mode", mode);
                        let setting = LimonSetting {
                            motion_mode: mode.code(),
                        };
                        pub_setting.put(serde_json::to_string(&setting)?).await?;
                    }
                    Some(Action::Quit) => break,
                    None => {}
                }
            }
        }

        pub_cmd.put(serde_json::to_string(&teleop.command())?).await?;
    }

    // Leave the base stopped
    let stop = MotionCommand {
        linear: 0.0,
        angular: 0.0,
    };
    pub_cmd.put(serde_json::to_string(&stop)?).await?;
    Ok(())
}
