// Define message types exchanged over the bus

use serde::{Deserialize, Serialize};

use crate::base::SystemState;
use crate::kinematics::DerivedMotionState;

// Velocity command from teleop/planners -> bridge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionCommand {
    pub linear: f64,  // m/s forward velocity
    pub angular: f64, // rad/s turning velocity
}

// Setting request from operators -> bridge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimonSetting {
    pub motion_mode: u8,
}

/// Status published by the bridge once per tick
///
/// Steering angle is in radians. Field names and units are a compatibility
/// contract with downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimonStatus {
    pub stamp_nanos: u64, // since Unix epoch

    // System state, copied verbatim
    pub vehicle_state: u8,
    pub control_mode: u8,
    pub error_code: u16,
    pub battery_voltage: f64,
    pub current_motion_mode: u8,

    // Motion state
    pub linear_velocity: f64,
    pub angular_velocity: f64,
    pub lateral_velocity: f64,
    pub steering_angle: f64,
    pub x_linear_vel: f64,
    pub y_linear_vel: f64,
    pub motion_radius: f64,
}

impl LimonStatus {
    pub fn new(stamp_nanos: u64, system: &SystemState, motion: &DerivedMotionState) -> Self {
        Self {
            stamp_nanos,
            vehicle_state: system.vehicle_state,
            control_mode: system.control_mode,
            error_code: system.error_code,
            battery_voltage: system.battery_voltage,
            current_motion_mode: system.motion_mode,
            linear_velocity: motion.linear_velocity,
            angular_velocity: motion.angular_velocity,
            lateral_velocity: motion.lateral_velocity,
            steering_angle: motion.steering_angle,
            x_linear_vel: motion.x_linear_vel,
            y_linear_vel: motion.y_linear_vel,
            motion_radius: motion.motion_radius,
        }
    }
}
