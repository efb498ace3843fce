//! Platform cursor backed by a winit window

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use winit::dpi::PhysicalPosition;
use winit::window::Window;

use crate::geometry::Point;

use super::collector::CursorPosition;
use super::host::{CursorIcon, PlatformCursor};

/// [`PlatformCursor`] over a winit window
///
/// Reads positions from the collector's shared [`CursorPosition`] because
/// winit has no cursor position query.
pub struct WinitCursor {
    window: Arc<Window>,
    position: Arc<CursorPosition>,
    scale_factor: f64,
    custom_icons: HashMap<u16, winit::window::CursorIcon>,
}

impl WinitCursor {
    pub fn new(window: Arc<Window>, position: Arc<CursorPosition>) -> Self {
        let scale_factor = window.scale_factor();
        Self {
            window,
            position,
            scale_factor,
            custom_icons: HashMap::new(),
        }
    }

    /// Maps a host-defined icon id to a system cursor
    pub fn with_custom_icon(mut self, id: u16, icon: winit::window::CursorIcon) -> Self {
        self.custom_icons.insert(id, icon);
        self
    }

    /// Update scale factor (DPI scaling)
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    fn system_icon(&self, icon: CursorIcon) -> winit::window::CursorIcon {
        use winit::window::CursorIcon as System;
        match icon {
            CursorIcon::Arrow => System::Default,
            CursorIcon::HandPoint => System::Pointer,
            CursorIcon::DiagonalResize => System::NwseResize,
            CursorIcon::Crosshair => System::Crosshair,
            CursorIcon::Custom(id) => self.custom_icons.get(&id).copied().unwrap_or_default(),
        }
    }
}

impl PlatformCursor for WinitCursor {
    fn position(&self) -> Point {
        self.position.load()
    }

    fn set_position(&mut self, position: Point) {
        let physical = PhysicalPosition::new(
            f64::from(position.x) * self.scale_factor,
            f64::from(position.y) * self.scale_factor,
        );
        if let Err(err) = self.window.set_cursor_position(physical) {
            // Wayland and web backends cannot warp the cursor
            debug!(%err, "cursor warp not supported");
        }
        self.position.store(position);
    }

    fn hide(&mut self) {
        self.window.set_cursor_visible(false);
    }

    fn show(&mut self) {
        self.window.set_cursor_visible(true);
    }

    fn set_icon(&mut self, icon: CursorIcon) {
        self.window.set_cursor(self.system_icon(icon));
    }
}
