// Timeouts, topics, vehicle geometry and startup overrides
use std::time::Duration;

use clap::Parser;

use crate::kinematics::VehicleGeometry;

// Status loop frequency
pub const LOOP_HZ: u64 = 50;
pub const MAX_LOOP_HZ: u64 = 1000;

// Command timeout for the simulated base watchdog
pub const CMD_TIMEOUT: Duration = Duration::from_millis(250);

// Zenoh topics
pub const TOPIC_CMD_VEL: &str = "limon/cmd_vel"; // motion commands
pub const TOPIC_SETTING: &str = "limon/setting"; // motion mode requests
pub const TOPIC_STATUS: &str = "limon/status"; // status records

// Limon base geometry
pub const WHEELBASE: f64 = 0.2; // meters (front & rear axle distance)
pub const TRACK: f64 = 0.172; // meters (left & right wheel distance)
pub const STEER_ANGLE_TOLERANCE: f64 = 0.002; // rad, straight-line dead band

// Steering envelope
pub const MAX_INNER_STEER_ANGLE: f64 = 0.488; // rad, at the inner wheel
pub const MAX_CENTRAL_STEER_ANGLE: f64 = 0.576; // rad, single-track equivalent

// Speed limits
pub const MAX_LINEAR_SPEED: f64 = 1.5; // m/s
pub const MAX_ANGULAR_SPEED: f64 = 0.7853; // rad/s

/// Rejected startup value
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a finite positive number, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("steer tolerance must be finite and non-negative, got {0}")]
    Tolerance(f64),

    #[error("loop rate must be between 1 and {MAX_LOOP_HZ} Hz, got {0}")]
    Rate(u64),
}

/// Command line overrides for the bridge
#[derive(Debug, Clone, Parser)]
#[command(name = "limon-zenoh-bridge", about = "Bridges a Limon base to a Zenoh bus")]
pub struct Args {
    /// Wheelbase in meters
    #[arg(long, default_value_t = WHEELBASE)]
    pub wheelbase: f64,

    /// Track width in meters
    #[arg(long, default_value_t = TRACK)]
    pub track: f64,

    /// Steering dead band in radians
    #[arg(long, default_value_t = STEER_ANGLE_TOLERANCE)]
    pub steer_tolerance: f64,

    /// Status publish rate in Hz
    #[arg(long, default_value_t = LOOP_HZ)]
    pub hz: u64,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            wheelbase: WHEELBASE,
            track: TRACK,
            steer_tolerance: STEER_ANGLE_TOLERANCE,
            hz: LOOP_HZ,
        }
    }
}

impl Args {
    /// Check every value before anything touches the bus
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("wheelbase", self.wheelbase), ("track", self.track)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        if !self.steer_tolerance.is_finite() || self.steer_tolerance < 0.0 {
            return Err(ConfigError::Tolerance(self.steer_tolerance));
        }
        if self.hz == 0 || self.hz > MAX_LOOP_HZ {
            return Err(ConfigError::Rate(self.hz));
        }
        Ok(())
    }

    pub fn geometry(&self) -> Result<VehicleGeometry, ConfigError> {
        self.validate()?;
        Ok(VehicleGeometry::new(
            self.wheelbase,
            self.track,
            self.steer_tolerance,
        ))
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.hz.clamp(1, MAX_LOOP_HZ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let args = Args::default();
        let geometry = args.geometry().expect("defaults should validate");
        assert_eq!(geometry.wheelbase(), WHEELBASE);
        assert_eq!(geometry.track(), TRACK);
        assert_eq!(args.tick_period(), Duration::from_millis(20));
    }

    #[test]
    fn test_cli_overrides() {
        let args = Args::parse_from([
            "limon-zenoh-bridge",
            "--wheelbase",
            "0.3",
            "--steer-tolerance",
            "0.01",
            "--hz",
            "10",
        ]);
        assert_eq!(args.wheelbase, 0.3);
        assert_eq!(args.track, TRACK);
        assert_eq!(args.steer_tolerance, 0.01);
        assert_eq!(args.tick_period(), Duration::from_millis(100));
    }

    #[test]
    fn test_rejects_bad_geometry() {
        let args = Args {
            track: 0.0,
            ..Args::default()
        };
        assert!(matches!(
            args.geometry(),
            Err(ConfigError::NotPositive { name: "track", .. })
        ));

        let args = Args {
            steer_tolerance: f64::NAN,
            ..Args::default()
        };
        assert!(matches!(args.validate(), Err(ConfigError::Tolerance(_))));

        let args = Args {
            hz: 0,
            ..Args::default()
        };
        assert!(matches!(args.validate(), Err(ConfigError::Rate(0))));
    }

    #[test]
    fn test_rate_bounds() {
        let args = Args {
            hz: 2000,
            ..Args::default()
        };
        assert!(matches!(args.geometry(), Err(ConfigError::Rate(2000))));
        assert!(!args.tick_period().is_zero());

        let args = Args {
            hz: MAX_LOOP_HZ,
            ..Args::default()
        };
        assert!(args.validate().is_ok());
        assert_eq!(args.tick_period(), Duration::from_millis(1));

        // Rates that do not divide a second keep sub-millisecond precision
        let args = Args {
            hz: 300,
            ..Args::default()
        };
        assert_eq!(args.tick_period(), Duration::from_nanos(3_333_333));
    }
}
