// Scripted base for unit tests

use std::sync::Mutex;

use super::controller::{BaseController, BaseError, RawVehicleState};

/// Returns a fixed state (or fails) and records every command
#[derive(Default)]
pub struct MockBase {
    state: Mutex<Option<RawVehicleState>>,
    commands: Mutex<Vec<(f64, f64)>>,
    queries: Mutex<usize>,
}

impl MockBase {
    pub fn with_state(state: RawVehicleState) -> Self {
        let base = Self::default();
        base.set_state(Some(state));
        base
    }

    /// A base whose state queries always fail
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn set_state(&self, state: Option<RawVehicleState>) {
        *self.state.lock().unwrap() = state;
    }

    pub fn commands(&self) -> Vec<(f64, f64)> {
        self.commands.lock().unwrap().clone()
    }

    pub fn queries(&self) -> usize {
        *self.queries.lock().unwrap()
    }
}

impl BaseController for MockBase {
    fn set_motion_command(&self, linear: f64, angular: f64) {
        self.commands.lock().unwrap().push((linear, angular));
    }

    fn get_limon_state(&self) -> Result<RawVehicleState, BaseError> {
        *self.queries.lock().unwrap() += 1;
        (*self.state.lock().unwrap()).ok_or(BaseError::NotConnected)
    }
}
