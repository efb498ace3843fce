//! Collaborators the input engine drives
//!
//! The engine never owns windows or widgets. Every gesture stores a
//! [`WindowRef`] and re-resolves it through [`UiHost`] on each event, so a
//! window closed mid-gesture is noticed on the next event instead of being
//! dereferenced.

use crate::geometry::{Point, Rect};

use super::scroll::ScrollState;

/// Lookup identity of a window: class plus instance number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowRef {
    pub class: u16,
    pub number: u16,
}

impl WindowRef {
    pub const fn new(class: u16, number: u16) -> Self {
        Self { class, number }
    }
}

impl std::fmt::Display for WindowRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.class, self.number)
    }
}

/// Position of a widget within its window's widget list
pub type WidgetIndex = usize;

/// Widget variants that select a primary-down branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Window background; its bottom-right corner resizes the window
    Frame,
    ResizeHandle,
    /// View onto the simulated world
    Viewport,
    /// Title bar; dragging it moves the window
    Caption,
    Scrollbar,
    /// Button drawn without a border until hovered
    FlatButton,
    /// Any other clickable widget
    Generic,
}

/// Widget data resolved by a hit test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetInfo {
    pub index: WidgetIndex,
    pub kind: WidgetKind,
    /// Screen-space bounds
    pub rect: Rect,
    pub enabled: bool,
    pub disabled: bool,
    /// Fires its mouse-down handler repeatedly while held
    pub repeatable: bool,
}

impl WidgetInfo {
    /// Enabled and not disabled
    pub fn is_interactive(&self) -> bool {
        self.enabled && !self.disabled
    }
}

/// Result of a hit test: the topmost window and the widget under the point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitTarget {
    pub window: WindowRef,
    pub widget: Option<WidgetInfo>,
}

impl HitTarget {
    pub fn widget_index(&self) -> Option<WidgetIndex> {
        self.widget.map(|w| w.index)
    }

    /// True if this target is `widget` on `window`
    pub fn is(&self, window: WindowRef, widget: Option<WidgetIndex>) -> bool {
        self.window == window && self.widget_index() == widget
    }
}

/// Window data the engine needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowInfo {
    pub rect: Rect,
    pub resizable: bool,
    pub min_size: (i32, i32),
    pub max_size: (i32, i32),
    /// The window cannot be scrolled or panned by the user
    pub position_locked: bool,
    /// Zoom level of the window's viewport, if it has one
    pub viewport_zoom: Option<u8>,
    /// The window is a dropdown overlay
    pub is_dropdown: bool,
}

impl WindowInfo {
    /// True if the window can actually change size
    pub fn can_resize(&self) -> bool {
        self.resizable && self.min_size != self.max_size
    }
}

/// What a widget's mouse-down handler did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseDownOutcome {
    #[default]
    Handled,
    /// A dropdown overlay was opened for the pressed widget
    DropdownOpened { stay_open: bool },
}

/// What a viewport point resolves to in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Nothing,
    Terrain,
    Entity,
    Ride,
    Scenery,
    Footpath,
    ParkEntrance,
    Banner,
}

/// World element under a viewport point, handed to context actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportInteraction {
    pub kind: InteractionKind,
    pub payload: u32,
}

impl ViewportInteraction {
    pub const NOTHING: Self = Self {
        kind: InteractionKind::Nothing,
        payload: 0,
    };
}

/// Platform cursor shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorIcon {
    #[default]
    Arrow,
    HandPoint,
    DiagonalResize,
    Crosshair,
    /// Host-defined icon id
    Custom(u16),
}

/// The operating system cursor
pub trait PlatformCursor {
    /// Absolute cursor position in screen space
    fn position(&self) -> Point;

    /// Warps the cursor to an absolute position
    fn set_position(&mut self, position: Point);

    fn hide(&mut self);

    fn show(&mut self);

    fn set_icon(&mut self, icon: CursorIcon);
}

/// Window and widget registry the engine routes actions to
///
/// Only the queries and the gesture side effects are required. Optional
/// features (tooltips, dropdowns, scroll content notifications, world
/// interactions) default to no-ops.
pub trait UiHost {
    /// The platform cursor
    fn cursor(&mut self) -> &mut dyn PlatformCursor;

    /// Screen size in pixels
    fn screen_size(&self) -> (i32, i32);

    /// Modes such as the title demo in which viewport panning is disabled
    fn restricted_mode(&self) -> bool {
        false
    }

    /// Topmost window and widget at a screen point
    fn hit_test(&self, point: Point) -> Option<HitTarget>;

    /// Resolves a window identity
    fn window(&self, window: WindowRef) -> Option<WindowInfo>;

    /// Resolves a widget of a live window
    fn widget(&self, window: WindowRef, widget: WidgetIndex) -> Option<WidgetInfo>;

    /// Window showing the main world view
    fn main_window(&self) -> Option<WindowRef> {
        None
    }

    fn bring_to_front(&mut self, window: WindowRef);

    fn move_window(&mut self, window: WindowRef, dx: i32, dy: i32);

    /// Called once when a caption drag ends
    fn window_moved(&mut self, _window: WindowRef, _position: Point) {}

    fn resize_window(&mut self, window: WindowRef, dw: i32, dh: i32);

    /// Scrolls a window's viewport by a world-space delta
    fn scroll_viewport(&mut self, window: WindowRef, dx: i32, dy: i32);

    fn invalidate_widget(&mut self, window: WindowRef, widget: WidgetIndex);

    /// Sets the pressed visual state of a widget
    fn set_widget_pressed(&mut self, window: WindowRef, widget: WidgetIndex, pressed: bool);

    fn fire_mouse_down(&mut self, window: WindowRef, widget: WidgetIndex) -> MouseDownOutcome;

    fn fire_mouse_up(&mut self, window: WindowRef, widget: WidgetIndex);

    /// Cursor a widget asks for while hovered
    fn widget_cursor(&self, _window: WindowRef, _widget: WidgetIndex, _point: Point) -> CursorIcon {
        CursorIcon::Arrow
    }

    fn scroll_state(&self, window: WindowRef, widget: WidgetIndex) -> Option<ScrollState>;

    fn set_scroll_state(&mut self, window: WindowRef, widget: WidgetIndex, state: ScrollState);

    /// Scroll thumb geometry changed
    fn notify_thumb_changed(&mut self, _window: WindowRef, _widget: WidgetIndex) {}

    /// Primary press inside the content area of a scroll widget
    fn scroll_mouse_down(&mut self, _window: WindowRef, _widget: WidgetIndex, _content: Point) {}

    /// Held primary button moved inside the content area
    fn scroll_mouse_drag(&mut self, _window: WindowRef, _widget: WidgetIndex, _content: Point) {}

    /// Pointer hovering the content area
    fn scroll_mouse_over(&mut self, _window: WindowRef, _widget: WidgetIndex, _content: Point) {}

    /// Opens the tooltip of a widget; returns false if it has none
    fn open_tooltip(&mut self, _window: WindowRef, _widget: WidgetIndex, _point: Point) -> bool {
        false
    }

    fn close_tooltip(&mut self) {}

    /// Closes transient error popups
    fn close_error_overlays(&mut self) {}

    /// Item of the open dropdown under a screen point
    fn dropdown_item_at(&self, _point: Point) -> Option<usize> {
        None
    }

    /// False for separators and disabled items
    fn dropdown_item_selectable(&self, _item: usize) -> bool {
        false
    }

    fn highlight_dropdown_item(&mut self, _item: usize) {}

    fn close_dropdown(&mut self) {}

    /// Delivers a dropdown result to the owning widget
    fn fire_dropdown_selection(
        &mut self,
        _window: WindowRef,
        _widget: WidgetIndex,
        _item: Option<usize>,
    ) {
    }

    /// World element under a viewport point
    fn viewport_interaction_at(&self, _point: Point) -> ViewportInteraction {
        ViewportInteraction::NOTHING
    }

    /// Opens the secondary-click action for a world element
    fn dispatch_context_action(&mut self, _interaction: ViewportInteraction, _point: Point) {}

    /// Handles a primary click on a viewport when no tool is bound
    fn dispatch_primary_click(&mut self, _interaction: ViewportInteraction, _point: Point) {}
}
