//! Showcase mode flags and their coupling rules.

use crate::camera::CameraView;
use crate::decor::PAINTS;
use glam::Vec3;

/// Status line shown in the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SystemStatus {
    Online,
    WarpEngaged,
}

impl SystemStatus {
    pub fn label(self) -> &'static str {
        match self {
            SystemStatus::Online => "ONLINE",
            SystemStatus::WarpEngaged => "WARP ENGAGED",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            SystemStatus::Online => "#0f0",
            SystemStatus::WarpEngaged => "#ff0055",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ShowcaseState {
    pub warping: bool,
    pub xray: bool,
    pub auto_rotate: bool,
    pub paint_index: usize,
}

impl Default for ShowcaseState {
    fn default() -> Self {
        Self {
            warping: false,
            xray: false,
            auto_rotate: true,
            paint_index: 0,
        }
    }
}

impl ShowcaseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip warp mode. Engaging stops auto-rotation; disengaging resumes it.
    /// The caller resets the road scroll and cancels any camera glide.
    /// Returns the new warping flag.
    pub fn toggle_warp(&mut self) -> bool {
        self.warping = !self.warping;
        self.auto_rotate = !self.warping;
        self.warping
    }

    /// Flip the x-ray material override. Returns the new flag.
    pub fn toggle_xray(&mut self) -> bool {
        self.xray = !self.xray;
        self.xray
    }

    /// Select a body paint. Ignored while x-ray is active or the index is out
    /// of range; returns whether the selection was applied.
    pub fn select_paint(&mut self, index: usize) -> bool {
        if self.xray || index >= PAINTS.len() {
            return false;
        }
        self.paint_index = index;
        true
    }

    /// Select a camera preset. Disables warp and auto-rotation; for `Auto`
    /// re-enables auto-rotation. Returns the glide goal, if any.
    pub fn select_view(&mut self, view: CameraView) -> Option<Vec3> {
        self.warping = false;
        match view.goal() {
            Some(goal) => {
                self.auto_rotate = false;
                Some(goal)
            }
            None => {
                self.auto_rotate = true;
                None
            }
        }
    }

    pub fn status(&self) -> SystemStatus {
        if self.warping {
            SystemStatus::WarpEngaged
        } else {
            SystemStatus::Online
        }
    }
}
