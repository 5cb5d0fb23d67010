// Motion mode codes and the shared cell holding the requested mode

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Kinematic model the base is driving with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionMode {
    FourWheelDifferential,
    Ackermann,
    /// Any code the bridge has no kinematics for
    Unsupported(u8),
}

impl MotionMode {
    pub const FOUR_WHEEL_DIFF: u8 = 0;
    pub const ACKERMANN: u8 = 1;

    pub fn from_code(code: u8) -> Self {
        match code {
            Self::FOUR_WHEEL_DIFF => Self::FourWheelDifferential,
            Self::ACKERMANN => Self::Ackermann,
            other => Self::Unsupported(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::FourWheelDifferential => Self::FOUR_WHEEL_DIFF,
            Self::Ackermann => Self::ACKERMANN,
            Self::Unsupported(code) => code,
        }
    }

    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

impl From<u8> for MotionMode {
    fn from(code: u8) -> Self {
        Self::from_code(code)
    }
}

impl fmt::Display for MotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FourWheelDifferential => write!(f, "four-wheel differential"),
            Self::Ackermann => write!(f, "ackermann"),
            Self::Unsupported(code) => write!(f, "unsupported ({code})"),
        }
    }
}

/// Latest accepted motion mode, shared between command ingress (writer)
/// and the status loop (reader)
#[derive(Debug)]
pub struct ModeCell(AtomicU8);

impl Default for ModeCell {
    fn default() -> Self {
        Self::new(MotionMode::FourWheelDifferential)
    }
}

impl ModeCell {
    pub fn new(mode: MotionMode) -> Self {
        Self(AtomicU8::new(mode.code()))
    }

    pub fn load(&self) -> MotionMode {
        MotionMode::from_code(self.0.load(Ordering::Acquire))
    }

    pub fn store(&self, mode: MotionMode) {
        self.0.store(mode.code(), Ordering::Release);
    }
}
