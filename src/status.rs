// Periodic vehicle state -> status record translation
//
// The loop owns no timer: every call to `tick` is one cycle. The first tick
// only records the time so that no record goes out with an undefined dt.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, trace, warn};

use crate::base::BaseController;
use crate::kinematics::{derive_motion_state, VehicleGeometry};
use crate::messages::LimonStatus;
use crate::mode::{ModeCell, MotionMode};

/// Nanoseconds since the Unix epoch
pub fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

pub struct StatusPublishLoop {
    base: Arc<dyn BaseController>,
    requested_mode: Arc<ModeCell>,
    geometry: VehicleGeometry,
    last_tick_nanos: u64,
    first_tick_done: bool,
    unsupported_ticks: u64,
}

impl StatusPublishLoop {
    pub fn new(
        base: Arc<dyn BaseController>,
        requested_mode: Arc<ModeCell>,
        geometry: VehicleGeometry,
    ) -> Self {
        Self {
            base,
            requested_mode,
            geometry,
            last_tick_nanos: 0,
            first_tick_done: false,
            unsupported_ticks: 0,
        }
    }

    /// Run one cycle at `now` (ns since epoch)
    ///
    /// Returns the record to publish, or None on the warm-up tick and when
    /// the controller could not be read. A failed read leaves the loop
    /// untouched.
    pub fn tick(&mut self, now: u64) -> Option<LimonStatus> {
        if !self.first_tick_done {
            self.last_tick_nanos = now;
            self.first_tick_done = true;
            return None;
        }

        let dt = now.saturating_sub(self.last_tick_nanos) as f64 * 1e-9;

        let state = match self.base.get_limon_state() {
            Ok(state) => state,
            Err(e) => {
                warn!("Skipping status tick: {}", e);
                return None;
            }
        };

        let mode = MotionMode::from_code(state.system_state.motion_mode);
        let requested = self.requested_mode.load();
        if mode != requested {
            debug!("Base reports {} mode, {} requested", mode, requested);
        }
        if !mode.is_supported() {
            self.unsupported_ticks += 1;
        }

        let motion = derive_motion_state(mode, &state.motion_state, &self.geometry);
        trace!(dt, ?motion, "Derived motion state");

        self.last_tick_nanos = now;
        Some(LimonStatus::new(now, &state.system_state, &motion))
    }

    /// Go back to warm-up; the next tick publishes nothing
    pub fn reset(&mut self) {
        self.first_tick_done = false;
        self.last_tick_nanos = 0;
    }

    /// Time of the last completed tick, None while warming up
    pub fn last_tick_nanos(&self) -> Option<u64> {
        self.first_tick_done.then_some(self.last_tick_nanos)
    }

    /// Ticks that derived state for a mode without kinematics
    pub fn unsupported_ticks(&self) -> u64 {
        self.unsupported_ticks
    }
}
