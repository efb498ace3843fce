//! Raw pointer events

use crate::geometry::Point;

/// What happened to the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Pointer moved (or was sampled) with no button edge
    Move,
    PrimaryDown,
    PrimaryUp,
    SecondaryDown,
    SecondaryUp,
}

impl PointerEventKind {
    /// Compact encoding used by the lock-free queue slots
    pub(crate) fn to_code(self) -> u8 {
        match self {
            Self::Move => 0,
            Self::PrimaryDown => 1,
            Self::PrimaryUp => 2,
            Self::SecondaryDown => 3,
            Self::SecondaryUp => 4,
        }
    }

    /// Inverse of [`Self::to_code`]
    pub(crate) fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Move),
            1 => Some(Self::PrimaryDown),
            2 => Some(Self::PrimaryUp),
            3 => Some(Self::SecondaryDown),
            4 => Some(Self::SecondaryUp),
            _ => None,
        }
    }

    /// Button edge for a press or release of `button`
    pub fn from_button(button: MouseButton, pressed: bool) -> Self {
        match (button, pressed) {
            (MouseButton::Primary, true) => Self::PrimaryDown,
            (MouseButton::Primary, false) => Self::PrimaryUp,
            (MouseButton::Secondary, true) => Self::SecondaryDown,
            (MouseButton::Secondary, false) => Self::SecondaryUp,
        }
    }
}

/// A single pointer sample in screen space
///
/// Immutable once queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub x: i32,
    pub y: i32,
    pub kind: PointerEventKind,
}

impl PointerEvent {
    /// Creates a new pointer event
    pub const fn new(x: i32, y: i32, kind: PointerEventKind) -> Self {
        Self { x, y, kind }
    }

    /// Shorthand for a [`PointerEventKind::Move`] sample
    pub const fn moved(x: i32, y: i32) -> Self {
        Self::new(x, y, PointerEventKind::Move)
    }

    /// Event position as a point
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Mouse buttons the router distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Primary,
    Secondary,
}

impl MouseButton {
    /// Convert from a winit mouse button
    ///
    /// Buttons other than left/right are not routed.
    pub fn from_winit(button: winit::event::MouseButton) -> Option<Self> {
        match button {
            winit::event::MouseButton::Left => Some(Self::Primary),
            winit::event::MouseButton::Right => Some(Self::Secondary),
            _ => None,
        }
    }
}
