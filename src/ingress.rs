// Inbound commands and settings -> base controller
//
// Handlers never fail outward: malformed payloads and unknown modes are
// logged and dropped.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::base::BaseController;
use crate::messages::{LimonSetting, MotionCommand};
use crate::mode::{ModeCell, MotionMode};

pub struct CommandIngress {
    base: Arc<dyn BaseController>,
    mode: Arc<ModeCell>,
}

impl CommandIngress {
    pub fn new(base: Arc<dyn BaseController>, mode: Arc<ModeCell>) -> Self {
        Self { base, mode }
    }

    /// Forward a motion command untouched. Never changes the motion mode.
    pub fn on_motion_command(&self, cmd: &MotionCommand) {
        debug!("Received command: {:?}", cmd);
        self.base.set_motion_command(cmd.linear, cmd.angular);
    }

    /// Accept a motion mode request. Unknown modes leave the current one
    /// in place. Returns the accepted mode.
    pub fn on_setting(&self, setting: &LimonSetting) -> Option<MotionMode> {
        match MotionMode::from_code(setting.motion_mode) {
            MotionMode::Unsupported(code) => {
                warn!("Ignoring setting with unknown motion mode {}", code);
                None
            }
            mode => {
                info!("Got setting, motion mode -> {}", mode);
                self.mode.store(mode);
                Some(mode)
            }
        }
    }

    /// Parse and handle a raw command sample. Returns false if it was dropped.
    pub fn on_command_payload(&self, payload: &[u8]) -> bool {
        match serde_json::from_slice::<MotionCommand>(payload) {
            Ok(cmd) => {
                self.on_motion_command(&cmd);
                true
            }
            Err(e) => {
                warn!("Failed to parse command: {}", e);
                false
            }
        }
    }

    /// Parse and handle a raw setting sample
    pub fn on_setting_payload(&self, payload: &[u8]) -> Option<MotionMode> {
        match serde_json::from_slice::<LimonSetting>(payload) {
            Ok(setting) => self.on_setting(&setting),
            Err(e) => {
                warn!("Failed to parse setting: {}", e);
                None
            }
        }
    }
}
