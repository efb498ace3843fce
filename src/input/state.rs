//! Interaction state and per-gesture context

use std::fmt;

use crate::geometry::Point;

use super::host::{WidgetIndex, WindowRef};
use super::scroll::ScrollRegion;

/// The single interaction state of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputState {
    /// Re-initializes hover tracking on the next event, then behaves as Normal
    #[default]
    Reset,
    Normal,
    /// Primary button held on a clickable widget
    WidgetPressed,
    /// Moving a window by its caption
    Dragging,
    /// Secondary-button camera pan of a viewport
    ViewportPan,
    /// Primary button held on a viewport, routed to the active tool
    ViewportToolDrag,
    Resizing,
    /// Primary button held on a scroll widget
    ScrollDragActive,
    /// Secondary-button drag of a scroll widget's content
    ScrollPan,
    DropdownActive,
}

impl InputState {
    /// Every state, in declaration order
    pub const ALL: [InputState; 10] = [
        Self::Reset,
        Self::Normal,
        Self::WidgetPressed,
        Self::Dragging,
        Self::ViewportPan,
        Self::ViewportToolDrag,
        Self::Resizing,
        Self::ScrollDragActive,
        Self::ScrollPan,
        Self::DropdownActive,
    ];

    /// No gesture is in progress
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Reset | Self::Normal)
    }

    /// States that own the platform cursor (hidden and warped each frame)
    pub fn hides_cursor(self) -> bool {
        matches!(self, Self::ViewportPan | Self::ScrollPan)
    }
}

impl fmt::Display for InputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reset => "reset",
            Self::Normal => "normal",
            Self::WidgetPressed => "widget-pressed",
            Self::Dragging => "dragging",
            Self::ViewportPan => "viewport-pan",
            Self::ViewportToolDrag => "viewport-tool-drag",
            Self::Resizing => "resizing",
            Self::ScrollDragActive => "scroll-drag",
            Self::ScrollPan => "scroll-pan",
            Self::DropdownActive => "dropdown",
        };
        f.write_str(name)
    }
}

/// Data captured when a gesture starts
///
/// Only meaningful while the engine is outside Normal/Reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GestureContext {
    pub window: Option<WindowRef>,
    pub widget: Option<WidgetIndex>,
    /// Last processed pointer position
    pub anchor: Point,
    /// Platform cursor position the pan states warp back to
    pub cursor_anchor: Point,
    /// Total pointer travel of a pan gesture
    pub pan_distance: u32,
    pub scroll_region: Option<ScrollRegion>,
    /// Window size when a resize started
    pub original_size: (i32, i32),
    /// The active tool received the down event of this viewport press
    pub tool_engaged: bool,
    pub dropdown_stay_open: bool,
    /// A release over the owning widget was already swallowed
    pub dropdown_release_seen: bool,
}

impl GestureContext {
    /// Starts a gesture on a window (and optionally one of its widgets)
    pub fn begin(window: WindowRef, widget: Option<WidgetIndex>, anchor: Point) -> Self {
        Self {
            window: Some(window),
            widget,
            anchor,
            ..Self::default()
        }
    }

    /// True if the gesture targets exactly this window/widget pair
    pub fn targets(&self, window: WindowRef, widget: Option<WidgetIndex>) -> bool {
        self.window == Some(window) && self.widget == widget
    }
}

/// Typematic repeat counter for a held widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PressRepeatCounter {
    count: u32,
}

impl PressRepeatCounter {
    /// Starts counting a new press
    pub fn press(&mut self) {
        self.count = 1;
    }

    pub fn release(&mut self) {
        self.count = 0;
    }

    /// Counts one more tick of holding; returns true if the held widget
    /// should fire again
    pub fn tick(&mut self, initial_delay: u32, period: u32) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count = self.count.saturating_add(1);
        self.count >= initial_delay && period > 0 && self.count % period == 0
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeats_after_initial_delay_at_fixed_period() {
        let mut counter = PressRepeatCounter::default();
        counter.press();

        let fired: Vec<u32> = (0..30)
            .filter_map(|_| counter.tick(16, 4).then(|| counter.count()))
            .collect();
        assert_eq!(fired, vec![16, 20, 24, 28]);
    }

    #[test]
    fn test_released_counter_never_fires() {
        let mut counter = PressRepeatCounter::default();
        counter.press();
        counter.release();
        assert!((0..40).all(|_| !counter.tick(16, 4)));
    }

    #[test]
    fn test_gesture_identity() {
        let window = WindowRef::new(1, 7);
        let gesture = GestureContext::begin(window, Some(4), Point::new(1, 2));
        assert!(gesture.targets(window, Some(4)));
        assert!(!gesture.targets(window, None));
        assert_eq!(gesture.pan_distance, 0);
    }

    #[test]
    fn test_only_pan_states_hide_the_cursor() {
        let hiding: Vec<_> = InputState::ALL
            .iter()
            .filter(|state| state.hides_cursor())
            .collect();
        assert_eq!(hiding, vec![&InputState::ViewportPan, &InputState::ScrollPan]);
        assert_eq!(InputState::default(), InputState::Reset);
    }
}
