// Steering geometry for a car-like base
//
// The inner wheel of a turn pivots further than the idealised single-track
// ("bicycle") wheel sitting on the vehicle centreline. Both point at the same
// instantaneous centre of rotation on the rear axle line:
//   tan(phi_i) = l / (r - w/2)    inner wheel
//   tan(phi)   = l / r            central wheel
// where r is the turning radius of the centreline.

use crate::config::{STEER_ANGLE_TOLERANCE, TRACK, WHEELBASE};

/// Fixed geometry of the vehicle, set once at startup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleGeometry {
    wheelbase: f64,       // l, meters
    track: f64,           // w, meters
    steer_tolerance: f64, // dead band, radians
}

impl Default for VehicleGeometry {
    fn default() -> Self {
        Self::limon()
    }
}

impl VehicleGeometry {
    pub const fn new(wheelbase: f64, track: f64, steer_tolerance: f64) -> Self {
        Self {
            wheelbase,
            track,
            steer_tolerance,
        }
    }

    /// Geometry of the stock Limon base
    pub const fn limon() -> Self {
        Self::new(WHEELBASE, TRACK, STEER_ANGLE_TOLERANCE)
    }

    pub fn wheelbase(&self) -> f64 {
        self.wheelbase
    }

    pub fn track(&self) -> f64 {
        self.track
    }

    pub fn steer_tolerance(&self) -> f64 {
        self.steer_tolerance
    }

    /// True when the angle falls in the straight-line dead band
    pub fn is_straight(&self, angle: f64) -> bool {
        angle.abs() <= self.steer_tolerance
    }

    /// Convert an inner wheel steering angle to the central steering angle
    ///
    /// Both angles are in radians. Inputs must stay inside the mechanical
    /// steering envelope; `tan` is not guarded near ±90°.
    pub fn inner_angle_to_central(&self, phi_i: f64) -> f64 {
        if self.is_straight(phi_i) {
            return 0.0;
        }

        // Negative angles mirror the positive branch
        let r = self.wheelbase / phi_i.abs().tan() + self.track / 2.0;
        let phi = (self.wheelbase / r).atan();

        if phi_i > 0.0 { phi } else { -phi }
    }

    /// Convert a central steering angle to the inner wheel steering angle
    ///
    /// Exact inverse of [`Self::inner_angle_to_central`] outside the dead
    /// band. The denominator reaches zero at `atan(2l / w)`, far beyond any
    /// realistic steering angle.
    pub fn central_angle_to_inner(&self, phi: f64) -> f64 {
        if self.is_straight(phi) {
            return 0.0;
        }

        let a = phi.abs();
        let l = self.wheelbase;
        let half_w = self.track / 2.0;
        let phi_i = (l * a.sin() / (l * a.cos() - half_w * a.sin())).atan();

        if phi > 0.0 { phi_i } else { -phi_i }
    }
}
