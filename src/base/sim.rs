// Simulated Limon base
//
// Stands in for the vehicle controller when no hardware is attached.
// Commands are clamped to the base limits and a watchdog zeroes motion when
// commands stop arriving, like the firmware does.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::{debug, info, warn};

use super::controller::{BaseController, BaseError, MotionState, RawVehicleState, SystemState};
use crate::config::{CMD_TIMEOUT, MAX_ANGULAR_SPEED, MAX_CENTRAL_STEER_ANGLE, MAX_LINEAR_SPEED};
use crate::kinematics::VehicleGeometry;
use crate::mode::{ModeCell, MotionMode};

/// Vehicle state codes reported by the simulated base
pub const VEHICLE_STATE_NORMAL: u8 = 0;
pub const CONTROL_MODE_COMMAND: u8 = 1;

/// Nominal pack voltage
const BATTERY_VOLTAGE: f64 = 12.0;

/// Below this speed an Ackermann base cannot turn
const MIN_TURNING_SPEED: f64 = 1e-3;

#[derive(Debug, Default)]
struct Command {
    linear: f64,
    angular: f64,
    received_at: Option<Instant>,
    stale: bool,
}

/// In-process base that echoes back what it was told to do
pub struct SimBase {
    geometry: VehicleGeometry,
    mode: Arc<ModeCell>,
    cmd: Mutex<Command>,
}

impl SimBase {
    /// Create a simulated base reporting the mode held in `mode`
    pub fn new(geometry: VehicleGeometry, mode: Arc<ModeCell>) -> Self {
        info!("Starting simulated base in {} mode", mode.load());
        Self {
            geometry,
            mode,
            cmd: Mutex::new(Command {
                stale: true, // Start stale until first cmd
                ..Command::default()
            }),
        }
    }

    /// Motion the base would report while driving `linear`/`angular` in `mode`
    fn motion_state(&self, mode: MotionMode, linear: f64, angular: f64) -> MotionState {
        match mode {
            MotionMode::Ackermann => {
                if linear.abs() < MIN_TURNING_SPEED {
                    return MotionState::default();
                }

                // Steer the single-track wheel to realise the yaw rate, then
                // report the angle at the inner wheel like the encoder does
                let l = self.geometry.wheelbase();
                let phi = (angular * l / linear)
                    .atan()
                    .clamp(-MAX_CENTRAL_STEER_ANGLE, MAX_CENTRAL_STEER_ANGLE);
                let phi = if self.geometry.is_straight(phi) { 0.0 } else { phi };
                let phi_i = self.geometry.central_angle_to_inner(phi);

                MotionState {
                    linear_velocity: linear,
                    angular_velocity: linear * phi.tan() / l,
                    lateral_velocity: 0.0,
                    steering_angle: phi_i.to_degrees(),
                }
            }
            _ => MotionState {
                linear_velocity: linear,
                angular_velocity: angular,
                lateral_velocity: 0.0,
                steering_angle: 0.0,
            },
        }
    }
}

/// Clamp to `±limit`, treating NaN and infinities as a stop
fn clamp_finite(value: f64, limit: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-limit, limit)
    } else {
        0.0
    }
}

impl BaseController for SimBase {
    fn set_motion_command(&self, linear: f64, angular: f64) {
        let linear = clamp_finite(linear, MAX_LINEAR_SPEED);
        let angular = clamp_finite(angular, MAX_ANGULAR_SPEED);
        debug!("Sim base command: linear={}, angular={}", linear, angular);

        match self.cmd.lock() {
            Ok(mut cmd) => {
                cmd.linear = linear;
                cmd.angular = angular;
                cmd.received_at = Some(Instant::now());
            }
            Err(e) => warn!("Dropping command, sim state poisoned: {}", e),
        }
    }

    fn get_limon_state(&self) -> Result<RawVehicleState, BaseError> {
        let mut cmd = self
            .cmd
            .lock()
            .map_err(|e| BaseError::Query(e.to_string()))?;

        let fresh = cmd
            .received_at
            .is_some_and(|at| at.elapsed() <= CMD_TIMEOUT);

        let (linear, angular) = if fresh {
            cmd.stale = false;
            (cmd.linear, cmd.angular)
        } else {
            // Watchdog triggered - stop the base
            if !cmd.stale {
                warn!("Command stale (> {:?} old), stopping base", CMD_TIMEOUT);
            }
            cmd.stale = true;
            (0.0, 0.0)
        };

        let mode = self.mode.load();
        Ok(RawVehicleState {
            system_state: SystemState {
                vehicle_state: VEHICLE_STATE_NORMAL,
                control_mode: CONTROL_MODE_COMMAND,
                error_code: 0,
                battery_voltage: BATTERY_VOLTAGE,
                motion_mode: mode.code(),
            },
            motion_state: self.motion_state(mode, linear, angular),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim(mode: MotionMode) -> SimBase {
        SimBase::new(VehicleGeometry::limon(), Arc::new(ModeCell::new(mode)))
    }

    #[test]
    fn test_stale_until_first_command() {
        let base = sim(MotionMode::FourWheelDifferential);
        let state = base.get_limon_state().unwrap();
        assert_eq!(state.motion_state, MotionState::default());
        assert_eq!(state.system_state.motion_mode, MotionMode::FOUR_WHEEL_DIFF);
    }

    #[test]
    fn test_differential_echo() {
        let base = sim(MotionMode::FourWheelDifferential);
        base.set_motion_command(0.4, -0.2);
        let motion = base.get_limon_state().unwrap().motion_state;
        assert_eq!(motion.linear_velocity, 0.4);
        assert_eq!(motion.angular_velocity, -0.2);
        assert_eq!(motion.steering_angle, 0.0);
    }

    #[test]
    fn test_commands_clamped() {
        let base = sim(MotionMode::FourWheelDifferential);
        base.set_motion_command(10.0, -5.0);
        let motion = base.get_limon_state().unwrap().motion_state;
        assert_eq!(motion.linear_velocity, MAX_LINEAR_SPEED);
        assert_eq!(motion.angular_velocity, -MAX_ANGULAR_SPEED);

        base.set_motion_command(f64::NAN, 0.1);
        let motion = base.get_limon_state().unwrap().motion_state;
        assert_eq!(motion.linear_velocity, 0.0);
    }

    #[test]
    fn test_ackermann_reports_inner_angle() {
        let base = sim(MotionMode::Ackermann);
        base.set_motion_command(0.5, 0.3);
        let motion = base.get_limon_state().unwrap().motion_state;

        // Inner wheel turns further than the central wheel
        let phi = (0.3f64 * 0.2 / 0.5).atan();
        assert!(motion.steering_angle > phi.to_degrees());
        assert!((motion.angular_velocity - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_ackermann_cannot_turn_in_place() {
        let base = sim(MotionMode::Ackermann);
        base.set_motion_command(0.0, 0.5);
        let motion = base.get_limon_state().unwrap().motion_state;
        assert_eq!(motion, MotionState::default());
    }

    #[test]
    fn test_follows_mode_cell() {
        let mode = Arc::new(ModeCell::default());
        let base = SimBase::new(VehicleGeometry::limon(), Arc::clone(&mode));
        mode.store(MotionMode::Ackermann);
        let state = base.get_limon_state().unwrap();
        assert_eq!(state.system_state.motion_mode, MotionMode::ACKERMANN);
    }

    #[test]
    fn test_watchdog_stops_base() {
        let base = sim(MotionMode::FourWheelDifferential);
        base.set_motion_command(0.3, 0.0);
        std::thread::sleep(CMD_TIMEOUT + std::time::Duration::from_millis(50));
        let motion = base.get_limon_state().unwrap().motion_state;
        assert_eq!(motion.linear_velocity, 0.0);
    }
}
