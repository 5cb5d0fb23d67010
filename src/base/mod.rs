// Vehicle controller boundary for the Limon base
//
// Provides:
// - The controller trait and the state it reports
// - A simulated base for running without hardware

mod controller;
#[cfg(test)]
pub(crate) mod mock;
pub mod sim;

pub use controller::{BaseController, BaseError, MotionState, RawVehicleState, SystemState};
pub use sim::SimBase;
