//! Focused application lookup via active-win-pos-rs

use super::FocusInspector;
use crate::error::DesktopError;

/// Asks the window system for the frontmost window on every call
pub struct ActiveWindowInspector;

impl FocusInspector for ActiveWindowInspector {
    fn active_application_name(&self) -> Result<String, DesktopError> {
        active_win_pos_rs::get_active_window()
            .map(|window| window.app_name)
            .map_err(|_| DesktopError::Focus("no active window reported".to_string()))
    }
}
