//! In-memory desktop for tests and headless runs
//!
//! [`HeadlessDesktop`] implements [`UiHost`] over a plain window stack and
//! records every externally visible call as a [`HostCall`], so scenarios can
//! assert on exactly what the engine did.

use crate::config::InputConfig;
use crate::geometry::{Point, Rect};
use crate::input::{
    CursorIcon, HitTarget, InteractionKind, MouseDownOutcome, PlatformCursor, ScrollState, UiHost,
    ViewportInteraction, WidgetIndex, WidgetInfo, WidgetKind, WindowInfo, WindowRef,
};

/// Identity given to the dropdown overlay window
pub const DROPDOWN_WINDOW: WindowRef = WindowRef::new(u16::MAX, 0);

/// Height of one dropdown item in pixels
pub const DROPDOWN_ITEM_HEIGHT: i32 = 10;

/// A side effect the engine asked the host to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    BringToFront(WindowRef),
    MoveWindow(WindowRef, i32, i32),
    WindowMoved(WindowRef, Point),
    ResizeWindow(WindowRef, i32, i32),
    ScrollViewport(WindowRef, i32, i32),
    InvalidateWidget(WindowRef, WidgetIndex),
    SetPressed(WindowRef, WidgetIndex, bool),
    MouseDown(WindowRef, WidgetIndex),
    MouseUp(WindowRef, WidgetIndex),
    ThumbChanged(WindowRef, WidgetIndex),
    ScrollMouseDown(WindowRef, WidgetIndex, Point),
    ScrollMouseDrag(WindowRef, WidgetIndex, Point),
    ScrollMouseOver(WindowRef, WidgetIndex, Point),
    OpenTooltip(WindowRef, WidgetIndex),
    CloseTooltip,
    CloseErrorOverlays,
    HighlightDropdownItem(usize),
    CloseDropdown,
    DropdownSelection(WindowRef, WidgetIndex, Option<usize>),
    ContextAction(ViewportInteraction, Point),
    PrimaryClick(ViewportInteraction, Point),
}

/// Cursor state of the headless desktop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessCursor {
    pub position: Point,
    pub visible: bool,
    pub icon: CursorIcon,
    pub icon_changes: u32,
    pub hide_count: u32,
    pub show_count: u32,
    /// Positions the cursor was warped to
    pub warps: Vec<Point>,
}

impl Default for HeadlessCursor {
    fn default() -> Self {
        Self {
            position: Point::default(),
            visible: true,
            icon: CursorIcon::Arrow,
            icon_changes: 0,
            hide_count: 0,
            show_count: 0,
            warps: Vec::new(),
        }
    }
}

impl PlatformCursor for HeadlessCursor {
    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
        self.warps.push(position);
    }

    fn hide(&mut self) {
        self.visible = false;
        self.hide_count += 1;
    }

    fn show(&mut self) {
        self.visible = true;
        self.show_count += 1;
    }

    fn set_icon(&mut self, icon: CursorIcon) {
        self.icon = icon;
        self.icon_changes += 1;
    }
}

/// Items of a widget's dropdown list
#[derive(Debug, Clone, PartialEq, Eq)]
struct DropdownSpec {
    /// One entry per item; false for separators and disabled items
    selectable: Vec<bool>,
    stay_open: bool,
}

/// A widget inside a [`HeadlessWindow`]
#[derive(Debug, Clone)]
pub struct HeadlessWidget {
    kind: WidgetKind,
    /// Bounds relative to the window origin
    rect: Rect,
    enabled: bool,
    disabled: bool,
    repeatable: bool,
    tooltip: bool,
    cursor: CursorIcon,
    pressed: bool,
    scroll: Option<ScrollState>,
    dropdown: Option<DropdownSpec>,
}

impl HeadlessWidget {
    pub fn new(kind: WidgetKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            enabled: true,
            disabled: false,
            repeatable: false,
            tooltip: false,
            cursor: CursorIcon::Arrow,
            pressed: false,
            scroll: None,
            dropdown: None,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    pub fn with_tooltip(mut self) -> Self {
        self.tooltip = true;
        self
    }

    pub fn with_cursor(mut self, cursor: CursorIcon) -> Self {
        self.cursor = cursor;
        self
    }

    /// Gives the widget scrollable content
    pub fn with_scroll(
        mut self,
        content_width: i32,
        content_height: i32,
        h_visible: bool,
        v_visible: bool,
    ) -> Self {
        self.scroll = Some(ScrollState::new(
            &self.rect,
            content_width,
            content_height,
            h_visible,
            v_visible,
            InputConfig::default().scrollbar_thickness,
        ));
        self
    }

    /// Pressing the widget opens a dropdown with these items
    pub fn with_dropdown(mut self, selectable: Vec<bool>, stay_open: bool) -> Self {
        self.dropdown = Some(DropdownSpec {
            selectable,
            stay_open,
        });
        self
    }
}

/// A window on the headless desktop
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    id: WindowRef,
    rect: Rect,
    resizable: bool,
    min_size: (i32, i32),
    max_size: (i32, i32),
    position_locked: bool,
    viewport_zoom: Option<u8>,
    is_dropdown: bool,
    interaction: ViewportInteraction,
    view_offset: (i32, i32),
    widgets: Vec<HeadlessWidget>,
}

impl HeadlessWindow {
    pub fn new(id: WindowRef, rect: Rect) -> Self {
        Self {
            id,
            rect,
            resizable: false,
            min_size: (rect.width, rect.height),
            max_size: (rect.width, rect.height),
            position_locked: false,
            viewport_zoom: None,
            is_dropdown: false,
            interaction: ViewportInteraction::NOTHING,
            view_offset: (0, 0),
            widgets: Vec::new(),
        }
    }

    pub fn resizable(mut self, min_size: (i32, i32), max_size: (i32, i32)) -> Self {
        self.resizable = true;
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    /// Gives the window a viewport at the given zoom level
    pub fn with_viewport(mut self, zoom: u8) -> Self {
        self.viewport_zoom = Some(zoom);
        if self.interaction.kind == InteractionKind::Nothing {
            self.interaction = ViewportInteraction {
                kind: InteractionKind::Terrain,
                payload: 0,
            };
        }
        self
    }

    /// What the viewport reports under any point
    pub fn with_interaction(mut self, interaction: ViewportInteraction) -> Self {
        self.interaction = interaction;
        self
    }

    pub fn locked(mut self) -> Self {
        self.position_locked = true;
        self
    }

    pub fn with_widget(mut self, widget: HeadlessWidget) -> Self {
        self.widgets.push(widget);
        self
    }

    fn info(&self) -> WindowInfo {
        WindowInfo {
            rect: self.rect,
            resizable: self.resizable,
            min_size: self.min_size,
            max_size: self.max_size,
            position_locked: self.position_locked,
            viewport_zoom: self.viewport_zoom,
            is_dropdown: self.is_dropdown,
        }
    }

    fn widget_info(&self, index: WidgetIndex) -> Option<WidgetInfo> {
        let widget = self.widgets.get(index)?;
        Some(WidgetInfo {
            index,
            kind: widget.kind,
            rect: widget.rect.translated(self.rect.x, self.rect.y),
            enabled: widget.enabled,
            disabled: widget.disabled,
            repeatable: widget.repeatable,
        })
    }

    /// Last widget containing the point wins
    fn widget_at(&self, point: Point) -> Option<WidgetInfo> {
        (0..self.widgets.len())
            .rev()
            .filter_map(|index| self.widget_info(index))
            .find(|info| info.rect.contains(point))
    }
}

#[derive(Debug, Clone)]
struct OpenDropdown {
    owner: WindowRef,
    widget: WidgetIndex,
    items: Vec<bool>,
    highlighted: Option<usize>,
}

/// In-memory [`UiHost`]
///
/// The cursor defaults to a recording [`HeadlessCursor`]; any other
/// [`PlatformCursor`] can be plugged in with [`HeadlessDesktop::with_cursor`].
#[derive(Debug, Clone)]
pub struct HeadlessDesktop<C = HeadlessCursor> {
    screen: (i32, i32),
    /// Back to front
    windows: Vec<HeadlessWindow>,
    cursor: C,
    calls: Vec<HostCall>,
    tooltip: Option<(WindowRef, WidgetIndex)>,
    dropdown: Option<OpenDropdown>,
    main_window: Option<WindowRef>,
    restricted: bool,
}

impl HeadlessDesktop<HeadlessCursor> {
    /// Creates an empty desktop of the given screen size
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_cursor(width, height, HeadlessCursor::default())
    }

    /// Places the cursor without recording a warp
    pub fn set_cursor_position(&mut self, position: Point) {
        self.cursor.position = position;
    }

    pub fn cursor_state(&self) -> &HeadlessCursor {
        &self.cursor
    }
}

impl<C: PlatformCursor> HeadlessDesktop<C> {
    pub fn with_cursor(width: i32, height: i32, cursor: C) -> Self {
        Self {
            screen: (width, height),
            windows: Vec::new(),
            cursor,
            calls: Vec::new(),
            tooltip: None,
            dropdown: None,
            main_window: None,
            restricted: false,
        }
    }

    pub fn set_screen_size(&mut self, width: i32, height: i32) {
        self.screen = (width, height);
    }

    /// The platform cursor this desktop drives
    pub fn cursor_mut(&mut self) -> &mut C {
        &mut self.cursor
    }

    /// Opens a window on top of the stack
    pub fn add_window(&mut self, window: HeadlessWindow) -> WindowRef {
        let id = window.id;
        self.windows.push(window);
        id
    }

    /// Closes a window; returns false if it was not open
    pub fn close_window(&mut self, window: WindowRef) -> bool {
        let before = self.windows.len();
        self.windows.retain(|w| w.id != window);
        if self.tooltip.is_some_and(|(w, _)| w == window) {
            self.tooltip = None;
        }
        before != self.windows.len()
    }

    pub fn set_main_window(&mut self, window: WindowRef) {
        self.main_window = Some(window);
    }

    pub fn set_restricted_mode(&mut self, restricted: bool) {
        self.restricted = restricted;
    }

    /// Every call recorded so far
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Returns and clears the recorded calls
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of recorded calls matching a predicate
    pub fn count_calls(&self, predicate: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(*call)).count()
    }

    pub fn window_rect(&self, window: WindowRef) -> Option<Rect> {
        self.find(window).map(|w| w.rect)
    }

    /// Accumulated viewport scroll of a window
    pub fn view_offset(&self, window: WindowRef) -> Option<(i32, i32)> {
        self.find(window).map(|w| w.view_offset)
    }

    pub fn is_pressed(&self, window: WindowRef, widget: WidgetIndex) -> bool {
        self.find(window)
            .and_then(|w| w.widgets.get(widget))
            .is_some_and(|w| w.pressed)
    }

    pub fn scroll(&self, window: WindowRef, widget: WidgetIndex) -> Option<ScrollState> {
        self.find(window)
            .and_then(|w| w.widgets.get(widget))
            .and_then(|w| w.scroll)
    }

    /// Widget whose tooltip is showing
    pub fn tooltip(&self) -> Option<(WindowRef, WidgetIndex)> {
        self.tooltip
    }

    pub fn dropdown_open(&self) -> bool {
        self.dropdown.is_some()
    }

    pub fn highlighted_item(&self) -> Option<usize> {
        self.dropdown.as_ref().and_then(|d| d.highlighted)
    }

    fn find(&self, window: WindowRef) -> Option<&HeadlessWindow> {
        self.windows.iter().find(|w| w.id == window)
    }

    fn find_mut(&mut self, window: WindowRef) -> Option<&mut HeadlessWindow> {
        self.windows.iter_mut().find(|w| w.id == window)
    }

    fn widget_mut(&mut self, window: WindowRef, widget: WidgetIndex) -> Option<&mut HeadlessWidget> {
        self.find_mut(window).and_then(|w| w.widgets.get_mut(widget))
    }

    fn open_dropdown(&mut self, owner: WindowRef, widget: WidgetIndex, spec: DropdownSpec) {
        let Some(anchor) = self.find(owner).and_then(|w| w.widget_info(widget)) else {
            return;
        };
        let height = spec.selectable.len() as i32 * DROPDOWN_ITEM_HEIGHT;
        let rect = Rect::new(anchor.rect.x, anchor.rect.bottom() + 1, anchor.rect.width, height);

        let mut overlay = HeadlessWindow::new(DROPDOWN_WINDOW, rect)
            .with_widget(HeadlessWidget::new(WidgetKind::Frame, Rect::new(0, 0, rect.width, height)));
        overlay.is_dropdown = true;

        self.windows.retain(|w| w.id != DROPDOWN_WINDOW);
        self.windows.push(overlay);
        self.dropdown = Some(OpenDropdown {
            owner,
            widget,
            items: spec.selectable,
            highlighted: None,
        });
    }
}

impl<C: PlatformCursor> UiHost for HeadlessDesktop<C> {
    fn cursor(&mut self) -> &mut dyn PlatformCursor {
        &mut self.cursor
    }

    fn screen_size(&self) -> (i32, i32) {
        self.screen
    }

    fn restricted_mode(&self) -> bool {
        self.restricted
    }

    fn hit_test(&self, point: Point) -> Option<HitTarget> {
        let window = self.windows.iter().rev().find(|w| w.rect.contains(point))?;
        Some(HitTarget {
            window: window.id,
            widget: window.widget_at(point),
        })
    }

    fn window(&self, window: WindowRef) -> Option<WindowInfo> {
        self.find(window).map(HeadlessWindow::info)
    }

    fn widget(&self, window: WindowRef, widget: WidgetIndex) -> Option<WidgetInfo> {
        self.find(window).and_then(|w| w.widget_info(widget))
    }

    fn main_window(&self) -> Option<WindowRef> {
        self.main_window
    }

    fn bring_to_front(&mut self, window: WindowRef) {
        self.calls.push(HostCall::BringToFront(window));
        if let Some(position) = self.windows.iter().position(|w| w.id == window) {
            let raised = self.windows.remove(position);
            self.windows.push(raised);
            // Overlays stay above everything else
            if let Some(overlay) = self.windows.iter().position(|w| w.is_dropdown) {
                let overlay = self.windows.remove(overlay);
                self.windows.push(overlay);
            }
        }
    }

    fn move_window(&mut self, window: WindowRef, dx: i32, dy: i32) {
        self.calls.push(HostCall::MoveWindow(window, dx, dy));
        if let Some(w) = self.find_mut(window) {
            w.rect = w.rect.translated(dx, dy);
        }
    }

    fn window_moved(&mut self, window: WindowRef, position: Point) {
        self.calls.push(HostCall::WindowMoved(window, position));
    }

    fn resize_window(&mut self, window: WindowRef, dw: i32, dh: i32) {
        self.calls.push(HostCall::ResizeWindow(window, dw, dh));
        if let Some(w) = self.find_mut(window) {
            let width = (w.rect.width + dw).clamp(w.min_size.0, w.max_size.0);
            let height = (w.rect.height + dh).clamp(w.min_size.1, w.max_size.1);
            let (grow_w, grow_h) = (width - w.rect.width, height - w.rect.height);
            w.rect.width = width;
            w.rect.height = height;
            for widget in w.widgets.iter_mut().filter(|widget| widget.kind == WidgetKind::Frame) {
                widget.rect.width += grow_w;
                widget.rect.height += grow_h;
            }
        }
    }

    fn scroll_viewport(&mut self, window: WindowRef, dx: i32, dy: i32) {
        self.calls.push(HostCall::ScrollViewport(window, dx, dy));
        if let Some(w) = self.find_mut(window) {
            w.view_offset.0 += dx;
            w.view_offset.1 += dy;
        }
    }

    fn invalidate_widget(&mut self, window: WindowRef, widget: WidgetIndex) {
        self.calls.push(HostCall::InvalidateWidget(window, widget));
    }

    fn set_widget_pressed(&mut self, window: WindowRef, widget: WidgetIndex, pressed: bool) {
        self.calls.push(HostCall::SetPressed(window, widget, pressed));
        if let Some(w) = self.widget_mut(window, widget) {
            w.pressed = pressed;
        }
    }

    fn fire_mouse_down(&mut self, window: WindowRef, widget: WidgetIndex) -> MouseDownOutcome {
        self.calls.push(HostCall::MouseDown(window, widget));
        let spec = self
            .find(window)
            .and_then(|w| w.widgets.get(widget))
            .and_then(|w| w.dropdown.clone());
        match spec {
            Some(spec) => {
                let stay_open = spec.stay_open;
                self.open_dropdown(window, widget, spec);
                MouseDownOutcome::DropdownOpened { stay_open }
            }
            None => MouseDownOutcome::Handled,
        }
    }

    fn fire_mouse_up(&mut self, window: WindowRef, widget: WidgetIndex) {
        self.calls.push(HostCall::MouseUp(window, widget));
    }

    fn widget_cursor(&self, window: WindowRef, widget: WidgetIndex, _point: Point) -> CursorIcon {
        self.find(window)
            .and_then(|w| w.widgets.get(widget))
            .map_or(CursorIcon::Arrow, |w| w.cursor)
    }

    fn scroll_state(&self, window: WindowRef, widget: WidgetIndex) -> Option<ScrollState> {
        self.scroll(window, widget)
    }

    fn set_scroll_state(&mut self, window: WindowRef, widget: WidgetIndex, state: ScrollState) {
        if let Some(w) = self.widget_mut(window, widget) {
            w.scroll = Some(state);
        }
    }

    fn notify_thumb_changed(&mut self, window: WindowRef, widget: WidgetIndex) {
        self.calls.push(HostCall::ThumbChanged(window, widget));
    }

    fn scroll_mouse_down(&mut self, window: WindowRef, widget: WidgetIndex, content: Point) {
        self.calls
            .push(HostCall::ScrollMouseDown(window, widget, content));
    }

    fn scroll_mouse_drag(&mut self, window: WindowRef, widget: WidgetIndex, content: Point) {
        self.calls
            .push(HostCall::ScrollMouseDrag(window, widget, content));
    }

    fn scroll_mouse_over(&mut self, window: WindowRef, widget: WidgetIndex, content: Point) {
        self.calls
            .push(HostCall::ScrollMouseOver(window, widget, content));
    }

    fn open_tooltip(&mut self, window: WindowRef, widget: WidgetIndex, _point: Point) -> bool {
        let has_tooltip = self
            .find(window)
            .and_then(|w| w.widgets.get(widget))
            .is_some_and(|w| w.tooltip);
        if has_tooltip {
            self.calls.push(HostCall::OpenTooltip(window, widget));
            self.tooltip = Some((window, widget));
        }
        has_tooltip
    }

    fn close_tooltip(&mut self) {
        self.calls.push(HostCall::CloseTooltip);
        self.tooltip = None;
    }

    fn close_error_overlays(&mut self) {
        self.calls.push(HostCall::CloseErrorOverlays);
    }

    fn dropdown_item_at(&self, point: Point) -> Option<usize> {
        let dropdown = self.dropdown.as_ref()?;
        let overlay = self.find(DROPDOWN_WINDOW)?;
        if !overlay.rect.contains(point) {
            return None;
        }
        let item = ((point.y - overlay.rect.y) / DROPDOWN_ITEM_HEIGHT) as usize;
        (item < dropdown.items.len()).then_some(item)
    }

    fn dropdown_item_selectable(&self, item: usize) -> bool {
        self.dropdown
            .as_ref()
            .and_then(|d| d.items.get(item).copied())
            .unwrap_or(false)
    }

    fn highlight_dropdown_item(&mut self, item: usize) {
        self.calls.push(HostCall::HighlightDropdownItem(item));
        if let Some(dropdown) = self.dropdown.as_mut() {
            dropdown.highlighted = Some(item);
        }
    }

    fn close_dropdown(&mut self) {
        self.calls.push(HostCall::CloseDropdown);
        self.dropdown = None;
        self.windows.retain(|w| w.id != DROPDOWN_WINDOW);
    }

    fn fire_dropdown_selection(
        &mut self,
        window: WindowRef,
        widget: WidgetIndex,
        item: Option<usize>,
    ) {
        self.calls
            .push(HostCall::DropdownSelection(window, widget, item));
    }

    fn viewport_interaction_at(&self, point: Point) -> ViewportInteraction {
        self.hit_test(point)
            .filter(|target| target.widget.is_some_and(|w| w.kind == WidgetKind::Viewport))
            .and_then(|target| self.find(target.window))
            .map_or(ViewportInteraction::NOTHING, |w| w.interaction)
    }

    fn dispatch_context_action(&mut self, interaction: ViewportInteraction, point: Point) {
        self.calls
            .push(HostCall::ContextAction(interaction, point));
    }

    fn dispatch_primary_click(&mut self, interaction: ViewportInteraction, point: Point) {
        self.calls.push(HostCall::PrimaryClick(interaction, point));
    }
}
