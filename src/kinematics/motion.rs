// Motion state derivation
// Turns the raw motion state of the base into the published kinematic
// quantities, depending on which kinematic model the base is driving with.

use tracing::info;

use super::steering::VehicleGeometry;
use crate::base::MotionState;
use crate::mode::MotionMode;

/// Yaw rates below this are treated as driving straight (rad/s)
const MIN_ANGULAR_RATE: f64 = 1e-6;

/// Kinematic quantities published with every status record
///
/// Every field defaults to 0.0. A straight-line motion radius is infinite
/// and published as 0.0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedMotionState {
    pub linear_velocity: f64,  // m/s
    pub angular_velocity: f64, // rad/s
    pub lateral_velocity: f64, // m/s
    pub x_linear_vel: f64,     // m/s, body frame
    pub y_linear_vel: f64,     // m/s, body frame
    pub steering_angle: f64,   // rad
    pub motion_radius: f64,    // m, positive = turning left
}

/// Derive the published motion state for `mode`
///
/// `motion.steering_angle` is in degrees and is converted to radians here
/// and nowhere else. Unsupported modes only carry the steering angle.
pub fn derive_motion_state(
    mode: MotionMode,
    motion: &MotionState,
    geometry: &VehicleGeometry,
) -> DerivedMotionState {
    let phi_i = motion.steering_angle.to_radians();

    match mode {
        MotionMode::FourWheelDifferential => differential(motion, phi_i),
        MotionMode::Ackermann => ackermann(motion, phi_i, geometry),
        MotionMode::Unsupported(code) => {
            info!("Motion mode not supported: {}", code);
            DerivedMotionState {
                steering_angle: phi_i,
                ..DerivedMotionState::default()
            }
        }
    }
}

/// Skid steering: the base reports body rates directly
fn differential(motion: &MotionState, phi_i: f64) -> DerivedMotionState {
    let linear = motion.linear_velocity;
    let angular = motion.angular_velocity;

    let motion_radius = if angular.abs() > MIN_ANGULAR_RATE {
        linear / angular
    } else {
        0.0
    };

    DerivedMotionState {
        linear_velocity: linear,
        angular_velocity: angular,
        lateral_velocity: 0.0,
        x_linear_vel: linear,
        y_linear_vel: 0.0,
        steering_angle: phi_i,
        motion_radius,
    }
}

/// Car-like steering: yaw rate follows from speed and the single-track angle.
/// Velocities refer to the rear axle centre, which never slips sideways.
fn ackermann(motion: &MotionState, phi_i: f64, geometry: &VehicleGeometry) -> DerivedMotionState {
    let linear = motion.linear_velocity;
    let phi = geometry.inner_angle_to_central(phi_i);

    let (angular, motion_radius) = if phi == 0.0 {
        (0.0, 0.0)
    } else {
        let tan_phi = phi.tan();
        (linear * tan_phi / geometry.wheelbase(), geometry.wheelbase() / tan_phi)
    };

    DerivedMotionState {
        linear_velocity: linear,
        angular_velocity: angular,
        lateral_velocity: 0.0,
        x_linear_vel: linear,
        y_linear_vel: 0.0,
        steering_angle: phi,
        motion_radius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motion(linear: f64, angular: f64, steering_deg: f64) -> MotionState {
        MotionState {
            linear_velocity: linear,
            angular_velocity: angular,
            lateral_velocity: 0.0,
            steering_angle: steering_deg,
        }
    }

    #[test]
    fn test_differential_passes_rates_through() {
        let geometry = VehicleGeometry::limon();
        let derived = derive_motion_state(
            MotionMode::FourWheelDifferential,
            &motion(0.6, 0.3, 0.0),
            &geometry,
        );
        assert_eq!(derived.linear_velocity, 0.6);
        assert_eq!(derived.angular_velocity, 0.3);
        assert_eq!(derived.x_linear_vel, 0.6);
        assert_eq!(derived.y_linear_vel, 0.0);
        assert!((derived.motion_radius - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_differential_straight_has_zero_radius() {
        let geometry = VehicleGeometry::limon();
        let derived = derive_motion_state(
            MotionMode::FourWheelDifferential,
            &motion(0.6, 0.0, 0.0),
            &geometry,
        );
        assert_eq!(derived.motion_radius, 0.0);
    }

    #[test]
    fn test_ackermann_steering_is_central_radians() {
        let geometry = VehicleGeometry::limon();
        let derived =
            derive_motion_state(MotionMode::Ackermann, &motion(0.0, 0.0, 10.0), &geometry);
        assert_eq!(
            derived.steering_angle,
            geometry.inner_angle_to_central(10f64.to_radians())
        );
        // Stationary: no yaw even though the wheels are turned
        assert_eq!(derived.angular_velocity, 0.0);
    }

    #[test]
    fn test_ackermann_turning() {
        let geometry = VehicleGeometry::limon();
        let derived =
            derive_motion_state(MotionMode::Ackermann, &motion(0.5, 0.0, -12.0), &geometry);

        let phi = derived.steering_angle;
        assert!(phi < 0.0);
        assert!(derived.motion_radius < 0.0, "right turn has negative radius");
        assert!(
            (derived.angular_velocity * derived.motion_radius - 0.5).abs() < 1e-9,
            "v = w * r"
        );
        assert_eq!(derived.x_linear_vel, 0.5);
    }

    #[test]
    fn test_ackermann_dead_band_drives_straight() {
        let geometry = VehicleGeometry::limon();
        let derived =
            derive_motion_state(MotionMode::Ackermann, &motion(0.5, 0.0, 0.05), &geometry);
        assert_eq!(derived.steering_angle, 0.0);
        assert_eq!(derived.angular_velocity, 0.0);
        assert_eq!(derived.motion_radius, 0.0);
        assert_eq!(derived.linear_velocity, 0.5);
    }

    #[test]
    fn test_unsupported_only_carries_steering() {
        let geometry = VehicleGeometry::limon();
        let derived = derive_motion_state(
            MotionMode::Unsupported(3),
            &motion(0.5, 0.2, 20.0),
            &geometry,
        );
        assert_eq!(
            derived,
            DerivedMotionState {
                steering_angle: 20f64.to_radians(),
                ..DerivedMotionState::default()
            }
        );
    }
}
