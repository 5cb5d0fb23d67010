// Kinematics for the Limon base
//
// Provides:
// - Steering geometry (inner wheel angle <-> single-track central angle)
// - Motion state derivation per motion mode

mod motion;
pub mod steering;

pub use motion::{derive_motion_state, DerivedMotionState};
pub use steering::VehicleGeometry;
