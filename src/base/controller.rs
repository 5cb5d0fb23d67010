// Boundary with the vehicle motion controller

/// Error types for controller queries
#[derive(Debug, thiserror::Error)]
pub enum BaseError {
    #[error("Base controller not connected")]
    NotConnected,

    #[error("State query failed: {0}")]
    Query(String),
}

/// System part of the vehicle state, published verbatim
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SystemState {
    pub vehicle_state: u8,
    pub control_mode: u8,
    pub error_code: u16,
    pub battery_voltage: f64, // volts
    pub motion_mode: u8,
}

/// Motion part of the vehicle state as reported by the controller
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionState {
    pub linear_velocity: f64,  // m/s
    pub angular_velocity: f64, // rad/s
    pub lateral_velocity: f64, // m/s
    pub steering_angle: f64,   // degrees, at the inner wheel
}

/// Snapshot taken once per status tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawVehicleState {
    pub system_state: SystemState,
    pub motion_state: MotionState,
}

/// Anything that can drive the base and report its state
///
/// Both calls are synchronous and expected to return quickly. Command
/// ingress and the status loop share one controller, so implementations
/// take `&self`.
pub trait BaseController: Send + Sync {
    /// Forward a body velocity command (m/s, rad/s). Range checks belong to
    /// the implementation.
    fn set_motion_command(&self, linear: f64, angular: f64);

    /// Read the current vehicle state
    fn get_limon_state(&self) -> Result<RawVehicleState, BaseError>;
}
