//! The pointer state machine
//!
//! [`InputEngine`] owns the interaction state, the gesture context, hover
//! tracking and the active tool. The platform pushes events into its queue
//! from any thread; the UI loop calls [`InputEngine::pump_once_per_frame`]
//! once per simulation tick.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::InputConfig;
use crate::geometry::{Point, Rect};

use super::events::{PointerEvent, PointerEventKind};
use super::handler::{ToolBinding, ToolHandler};
use super::host::{
    CursorIcon, HitTarget, InteractionKind, MouseDownOutcome, UiHost, WidgetIndex, WidgetInfo,
    WidgetKind, WindowInfo, WindowRef,
};
use super::hover::HoverTracker;
use super::queue::PointerEventQueue;
use super::scroll::{ScrollRegion, ScrollState};
use super::state::{GestureContext, InputState, PressRepeatCounter};

/// Routes pointer events to windows, widgets and the active tool
pub struct InputEngine {
    config: InputConfig,
    queue: Arc<PointerEventQueue>,
    state: InputState,
    gesture: GestureContext,
    hover: HoverTracker,
    repeat: PressRepeatCounter,
    tool: Option<ToolBinding>,
}

impl InputEngine {
    /// Creates an engine in the Reset state with an empty queue
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            queue: Arc::new(PointerEventQueue::new()),
            state: InputState::Reset,
            gesture: GestureContext::default(),
            hover: HoverTracker::new(),
            repeat: PressRepeatCounter::default(),
            tool: None,
        }
    }

    /// Producer handle for the platform layer
    pub fn queue(&self) -> Arc<PointerEventQueue> {
        Arc::clone(&self.queue)
    }

    /// Queues an event for the next frame
    pub fn push_pointer_event(&self, x: i32, y: i32, kind: PointerEventKind) {
        self.queue.push(PointerEvent::new(x, y, kind));
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    pub fn gesture(&self) -> &GestureContext {
        &self.gesture
    }

    pub fn hover(&self) -> &HoverTracker {
        &self.hover
    }

    pub fn press_repeat(&self) -> &PressRepeatCounter {
        &self.repeat
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Installs the active tool, returning the one it replaces
    pub fn bind_tool(&mut self, binding: ToolBinding) -> Option<ToolBinding> {
        debug!(tool = binding.handler.name(), owner = %binding.owner, "tool bound");
        self.tool.replace(binding)
    }

    /// Removes the active tool
    pub fn cancel_tool(&mut self) -> Option<ToolBinding> {
        let binding = self.tool.take();
        if let Some(binding) = &binding {
            debug!(tool = binding.handler.name(), "tool cancelled");
        }
        binding
    }

    pub fn tool(&self) -> Option<&ToolBinding> {
        self.tool.as_ref()
    }

    /// Typed access to the active tool's handler
    pub fn tool_handler_mut<T: ToolHandler + 'static>(&mut self) -> Option<&mut T> {
        self.tool
            .as_mut()?
            .handler
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Drains the queue and advances the state machine by one frame
    ///
    /// The tooltip re-hover clock advances first, in every state. Queued
    /// events are processed next. Then the current cursor position
    /// is fed through as a synthetic move carrying the frame's elapsed ticks,
    /// followed by cursor icon selection, the tool hover update and edge
    /// scrolling.
    pub fn pump_once_per_frame(&mut self, host: &mut dyn UiHost, elapsed_ticks: u32) {
        self.hover.advance(elapsed_ticks);

        while let Some(event) = self.queue.pop() {
            trace!(?event, state = %self.state, "dequeued pointer event");
            self.process(host, event, 0);
        }

        let position = host.cursor().position();
        if self.state.hides_cursor() {
            // Pan gestures read the raw cursor and must not trigger hover
            self.process(host, PointerEvent::moved(position.x, position.y), elapsed_ticks);
            return;
        }

        let (width, height) = host.screen_size();
        let point = Point::new(
            position.x.clamp(0, (width - 1).max(0)),
            position.y.clamp(0, (height - 1).max(0)),
        );
        self.process(host, PointerEvent::moved(point.x, point.y), elapsed_ticks);
        self.update_cursor_icon(host, point);
        self.update_tool(host, point);
        if self.config.edge_scrolling && self.state.is_idle() {
            self.edge_scroll(host, point);
        }
    }

    /// Processes one event immediately, bypassing the queue
    pub fn handle(&mut self, host: &mut dyn UiHost, x: i32, y: i32, kind: PointerEventKind) {
        self.process(host, PointerEvent::new(x, y, kind), 0);
    }

    fn process(&mut self, host: &mut dyn UiHost, event: PointerEvent, elapsed: u32) {
        let point = event.position();
        let target = host.hit_test(point);

        match self.state {
            InputState::Reset => {
                self.hover.reset(host, point);
                self.transition(host, InputState::Normal);
                self.normal(host, target, point, event.kind, elapsed);
            }
            InputState::Normal => self.normal(host, target, point, event.kind, elapsed),
            InputState::WidgetPressed => self.widget_pressed(host, target, event.kind),
            InputState::Dragging => self.dragging(host, point, event.kind),
            InputState::Resizing => self.resizing(host, point, event.kind),
            InputState::ViewportPan => self.viewport_pan(host, event.kind),
            InputState::ViewportToolDrag => self.viewport_tool_drag(host, point, event.kind),
            InputState::ScrollDragActive => self.scroll_drag(host, target, point, event.kind),
            InputState::ScrollPan => self.scroll_pan(host, event.kind),
            InputState::DropdownActive => self.dropdown(host, target, point, event.kind),
        }
    }

    fn transition(&mut self, host: &mut dyn UiHost, next: InputState) {
        if self.state == next {
            return;
        }
        debug!(from = %self.state, to = %next, "input state changed");

        if self.state.hides_cursor() && !next.hides_cursor() {
            host.cursor().show();
        } else if !self.state.hides_cursor() && next.hides_cursor() {
            host.cursor().hide();
        }
        self.state = next;
    }

    /// Ends the current gesture with no callbacks
    fn finish(&mut self, host: &mut dyn UiHost, next: InputState) {
        self.repeat.release();
        self.gesture = GestureContext::default();
        self.transition(host, next);
    }

    /// The gesture's window no longer resolves
    fn reset_stale(&mut self, host: &mut dyn UiHost) {
        debug!(state = %self.state, window = ?self.gesture.window, "gesture target vanished");
        self.finish(host, InputState::Reset);
    }

    /// Resolves the gesture's window, resetting the machine if it is gone
    fn live_window(&mut self, host: &mut dyn UiHost) -> Option<(WindowRef, WindowInfo)> {
        let resolved = self
            .gesture
            .window
            .and_then(|window| host.window(window).map(|info| (window, info)));
        if resolved.is_none() {
            self.reset_stale(host);
        }
        resolved
    }

    /// Resolves the gesture's widget, resetting the machine if it is gone
    fn live_widget(&mut self, host: &mut dyn UiHost) -> Option<(WindowRef, WidgetInfo)> {
        let resolved = match (self.gesture.window, self.gesture.widget) {
            (Some(window), Some(widget)) => host.widget(window, widget).map(|info| (window, info)),
            _ => None,
        };
        if resolved.is_none() {
            self.reset_stale(host);
        }
        resolved
    }

    // ============================================================================
    // NORMAL
    // ============================================================================

    fn normal(
        &mut self,
        host: &mut dyn UiHost,
        target: Option<HitTarget>,
        point: Point,
        kind: PointerEventKind,
        elapsed: u32,
    ) {
        match kind {
            PointerEventKind::Move => {
                self.hover
                    .update(host, &self.config, target.as_ref(), point, elapsed);
            }
            PointerEventKind::PrimaryDown => self.primary_down(host, target, point),
            PointerEventKind::SecondaryDown => self.secondary_down(host, target, point),
            PointerEventKind::PrimaryUp | PointerEventKind::SecondaryUp => {}
        }
    }

    fn primary_down(&mut self, host: &mut dyn UiHost, target: Option<HitTarget>, point: Point) {
        self.hover.close_tooltip(host);
        host.close_error_overlays();

        let Some(target) = target else {
            return;
        };
        host.bring_to_front(target.window);

        let Some(widget) = target.widget else {
            return;
        };
        // Bringing to front may have changed the window, look it up again
        let Some(window) = host.window(target.window) else {
            return;
        };

        match widget.kind {
            WidgetKind::Frame | WidgetKind::ResizeHandle => {
                if window.can_resize() && self.in_resize_corner(&window.rect, point) {
                    self.gesture = GestureContext::begin(target.window, Some(widget.index), point);
                    self.gesture.original_size = (window.rect.width, window.rect.height);
                    debug!(window = %target.window, "resize started");
                    self.transition(host, InputState::Resizing);
                }
            }
            WidgetKind::Viewport => {
                self.gesture = GestureContext::begin(target.window, Some(widget.index), point);
                if let Some(tool) = self.tool.as_mut()
                    && host.window(tool.owner).is_some()
                {
                    tool.handler.on_tool_down(point.x, point.y);
                    self.gesture.tool_engaged = true;
                }
                self.transition(host, InputState::ViewportToolDrag);
            }
            WidgetKind::Caption => {
                self.gesture = GestureContext::begin(target.window, Some(widget.index), point);
                debug!(window = %target.window, "window drag started");
                self.transition(host, InputState::Dragging);
            }
            WidgetKind::Scrollbar => self.scroll_begin(host, target.window, widget, point),
            WidgetKind::FlatButton | WidgetKind::Generic => {
                if !widget.is_interactive() {
                    return;
                }
                self.gesture = GestureContext::begin(target.window, Some(widget.index), point);
                self.repeat.press();
                host.set_widget_pressed(target.window, widget.index, true);
                self.transition(host, InputState::WidgetPressed);

                if let MouseDownOutcome::DropdownOpened { stay_open } =
                    host.fire_mouse_down(target.window, widget.index)
                {
                    self.gesture.dropdown_stay_open = stay_open;
                    self.transition(host, InputState::DropdownActive);
                }
            }
        }
    }

    fn secondary_down(&mut self, host: &mut dyn UiHost, target: Option<HitTarget>, point: Point) {
        let Some(target) = target else {
            return;
        };
        let Some(widget) = target.widget else {
            return;
        };

        match widget.kind {
            WidgetKind::Viewport if self.tool.is_none() && !host.restricted_mode() => {
                self.hover.close_tooltip(host);
                host.bring_to_front(target.window);
                self.gesture = GestureContext::begin(target.window, Some(widget.index), point);
                self.gesture.cursor_anchor = host.cursor().position();
                debug!(window = %target.window, "viewport pan started");
                self.transition(host, InputState::ViewportPan);
            }
            WidgetKind::Scrollbar => {
                if host.scroll_state(target.window, widget.index).is_none() {
                    return;
                }
                self.hover.close_tooltip(host);
                self.gesture = GestureContext::begin(target.window, Some(widget.index), point);
                self.gesture.cursor_anchor = host.cursor().position();
                self.transition(host, InputState::ScrollPan);
            }
            _ => {}
        }
    }

    fn in_resize_corner(&self, rect: &Rect, point: Point) -> bool {
        let corner = self.config.resize_corner_size;
        point.x >= rect.x + rect.width - corner && point.y >= rect.y + rect.height - corner
    }

    // ============================================================================
    // PRESSED WIDGETS
    // ============================================================================

    fn widget_pressed(
        &mut self,
        host: &mut dyn UiHost,
        target: Option<HitTarget>,
        kind: PointerEventKind,
    ) {
        let Some((window, info)) = self.live_widget(host) else {
            return;
        };

        let over_origin = target.is_some_and(|t| t.is(window, Some(info.index)));
        if !over_origin {
            // Pointer slid off the pressed widget: drop the press silently
            host.set_widget_pressed(window, info.index, false);
            self.finish(host, InputState::Normal);
            return;
        }

        match kind {
            PointerEventKind::Move => {
                if info.disabled {
                    return;
                }
                let fire = self
                    .repeat
                    .tick(self.config.repeat_initial_delay, self.config.repeat_period);
                if fire && info.repeatable {
                    trace!(count = self.repeat.count(), "typematic repeat");
                    host.fire_mouse_down(window, info.index);
                }
            }
            PointerEventKind::PrimaryUp => {
                host.set_widget_pressed(window, info.index, false);
                self.finish(host, InputState::Normal);
                self.hover.hand_over(window, Some(info.index));
                if info.is_interactive() {
                    host.invalidate_widget(window, info.index);
                    host.fire_mouse_up(window, info.index);
                }
            }
            _ => {}
        }
    }

    // ============================================================================
    // WINDOW DRAG AND RESIZE
    // ============================================================================

    fn dragging(&mut self, host: &mut dyn UiHost, point: Point, kind: PointerEventKind) {
        let Some((window, _)) = self.live_window(host) else {
            return;
        };
        if !matches!(kind, PointerEventKind::Move | PointerEventKind::PrimaryUp) {
            return;
        }

        let (_, screen_height) = host.screen_size();
        let clamped = Point::new(
            point.x,
            point
                .y
                .clamp(0, (screen_height - self.config.screen_edge_margin).max(0)),
        );
        let (dx, dy) = clamped.delta_from(self.gesture.anchor);
        if dx != 0 || dy != 0 {
            host.move_window(window, dx, dy);
            self.gesture.anchor = clamped;
        }

        if kind == PointerEventKind::PrimaryUp {
            let widget = self.gesture.widget;
            self.finish(host, InputState::Normal);
            self.hover.hand_over(window, widget);
            host.window_moved(window, point);
            debug!(%window, "window drag finished");
        }
    }

    fn resizing(&mut self, host: &mut dyn UiHost, point: Point, kind: PointerEventKind) {
        let Some((window, info)) = self.live_window(host) else {
            return;
        };
        if !matches!(kind, PointerEventKind::Move | PointerEventKind::PrimaryUp) {
            return;
        }

        let (_, screen_height) = host.screen_size();
        if point.y < screen_height - self.config.screen_edge_margin {
            let (dx, dy) = point.delta_from(self.gesture.anchor);
            let (width, height) = self.gesture.original_size;
            let dw = width + dx - info.rect.width;
            let dh = height + dy - info.rect.height;
            if dw != 0 || dh != 0 {
                host.resize_window(window, dw, dh);
            }
        }

        if kind == PointerEventKind::PrimaryUp {
            let widget = self.gesture.widget;
            self.finish(host, InputState::Normal);
            self.hover.hand_over(window, widget);
            debug!(%window, "resize finished");
        }
    }

    // ============================================================================
    // VIEWPORTS
    // ============================================================================

    fn viewport_pan(&mut self, host: &mut dyn UiHost, kind: PointerEventKind) {
        let Some((window, info)) = self.live_window(host) else {
            return;
        };
        let Some(zoom) = info.viewport_zoom else {
            self.reset_stale(host);
            return;
        };

        match kind {
            PointerEventKind::Move => {
                let anchor = self.gesture.cursor_anchor;
                let (dx, dy) = host.cursor().position().delta_from(anchor);
                if dx == 0 && dy == 0 {
                    return;
                }
                let travel = dx.unsigned_abs().saturating_add(dy.unsigned_abs());
                self.gesture.pan_distance = self.gesture.pan_distance.saturating_add(travel);

                if !info.position_locked {
                    let shift = u32::from(zoom) + 1;
                    let (mut sx, mut sy) = (dx << shift, dy << shift);
                    if self.config.invert_viewport_drag {
                        sx = -sx;
                        sy = -sy;
                    }
                    host.scroll_viewport(window, sx, sy);
                }
                host.cursor().set_position(anchor);
            }
            PointerEventKind::SecondaryUp => {
                let anchor = self.gesture.anchor;
                let distance = self.gesture.pan_distance;
                host.cursor().set_position(self.gesture.cursor_anchor);
                self.finish(host, InputState::Reset);
                debug!(%window, distance, "viewport pan finished");

                if distance < self.config.pan_click_threshold {
                    let interaction = host.viewport_interaction_at(anchor);
                    if interaction.kind != InteractionKind::Nothing {
                        host.dispatch_context_action(interaction, anchor);
                    }
                }
            }
            _ => {}
        }
    }

    fn viewport_tool_drag(&mut self, host: &mut dyn UiHost, point: Point, kind: PointerEventKind) {
        if self.live_window(host).is_none() {
            return;
        }

        match kind {
            PointerEventKind::Move => {
                if self.gesture.tool_engaged
                    && let Some(tool) = self.tool.as_mut()
                {
                    tool.handler.on_tool_drag(point.x, point.y);
                }
            }
            PointerEventKind::PrimaryUp => {
                let engaged = self.gesture.tool_engaged;
                self.finish(host, InputState::Reset);

                if engaged {
                    // A tool unbound mid-press gets no release
                    if let Some(tool) = self.tool.as_mut() {
                        tool.handler.on_tool_up(point.x, point.y);
                    }
                } else if self.tool.is_none() {
                    let interaction = host.viewport_interaction_at(point);
                    if interaction.kind != InteractionKind::Nothing {
                        host.dispatch_primary_click(interaction, point);
                    }
                }
            }
            _ => {}
        }
    }

    // ============================================================================
    // SCROLL WIDGETS
    // ============================================================================

    fn scroll_begin(
        &mut self,
        host: &mut dyn UiHost,
        window: WindowRef,
        widget: WidgetInfo,
        point: Point,
    ) {
        let Some(mut scroll) = host.scroll_state(window, widget.index) else {
            return;
        };
        let thickness = self.config.scrollbar_thickness;
        let region = scroll.classify(&widget.rect, point, thickness);

        self.gesture = GestureContext::begin(window, Some(widget.index), point);
        self.gesture.scroll_region = region;
        self.transition(host, InputState::ScrollDragActive);

        match region {
            None => {}
            Some(ScrollRegion::View) => {
                if let Some(content) = scroll.view_point(&widget.rect, point) {
                    host.scroll_mouse_down(window, widget.index, content);
                }
            }
            Some(region) => {
                scroll.apply_discrete(region, &widget.rect, self.config.scroll_button_step, thickness);
                scroll.pressed = Some(region);
                host.set_scroll_state(window, widget.index, scroll);
                host.notify_thumb_changed(window, widget.index);
                host.invalidate_widget(window, widget.index);
            }
        }
    }

    fn scroll_drag(
        &mut self,
        host: &mut dyn UiHost,
        target: Option<HitTarget>,
        point: Point,
        kind: PointerEventKind,
    ) {
        let Some((window, widget)) = self.live_widget(host) else {
            return;
        };

        match kind {
            PointerEventKind::Move => {
                if !target.is_some_and(|t| t.is(window, Some(widget.index))) {
                    self.clear_scroll_press(host, window, widget.index);
                    self.finish(host, InputState::Normal);
                    return;
                }
                let Some(mut scroll) = host.scroll_state(window, widget.index) else {
                    return;
                };
                let thickness = self.config.scrollbar_thickness;

                match self.gesture.scroll_region {
                    Some(region) if region.is_thumb() => {
                        let delta = match region {
                            ScrollRegion::HScrollThumb => point.x - self.gesture.anchor.x,
                            _ => point.y - self.gesture.anchor.y,
                        };
                        self.gesture.anchor = point;
                        scroll.drag_thumb(region, delta, &widget.rect, thickness);
                        scroll.pressed = Some(region);
                        self.commit_scroll(host, window, widget.index, scroll);
                    }
                    Some(region) => {
                        if scroll.classify(&widget.rect, point, thickness) != Some(region) {
                            self.clear_scroll_press(host, window, widget.index);
                            return;
                        }
                        if region == ScrollRegion::View {
                            if let Some(content) = scroll.view_point(&widget.rect, point) {
                                host.scroll_mouse_drag(window, widget.index, content);
                            }
                        } else if region.is_button() {
                            scroll.apply_discrete(
                                region,
                                &widget.rect,
                                self.config.scroll_button_step,
                                thickness,
                            );
                            scroll.pressed = Some(region);
                            self.commit_scroll(host, window, widget.index, scroll);
                        }
                    }
                    None => {}
                }
            }
            PointerEventKind::PrimaryUp => {
                self.clear_scroll_press(host, window, widget.index);
                self.finish(host, InputState::Reset);
            }
            _ => {}
        }
    }

    fn scroll_pan(&mut self, host: &mut dyn UiHost, kind: PointerEventKind) {
        let Some((window, widget)) = self.live_widget(host) else {
            return;
        };
        let anchor = self.gesture.cursor_anchor;

        match kind {
            PointerEventKind::Move => {
                let (dx, dy) = host.cursor().position().delta_from(anchor);
                if dx == 0 && dy == 0 {
                    return;
                }
                if let Some(mut scroll) = host.scroll_state(window, widget.index) {
                    scroll.pan(dx, dy, &widget.rect, self.config.scrollbar_thickness);
                    self.commit_scroll(host, window, widget.index, scroll);
                }
                host.cursor().set_position(anchor);
            }
            PointerEventKind::SecondaryUp => {
                host.cursor().set_position(anchor);
                self.finish(host, InputState::Reset);
            }
            _ => {}
        }
    }

    fn commit_scroll(
        &self,
        host: &mut dyn UiHost,
        window: WindowRef,
        widget: WidgetIndex,
        scroll: ScrollState,
    ) {
        host.set_scroll_state(window, widget, scroll);
        host.notify_thumb_changed(window, widget);
        host.invalidate_widget(window, widget);
    }

    fn clear_scroll_press(&self, host: &mut dyn UiHost, window: WindowRef, widget: WidgetIndex) {
        if let Some(mut scroll) = host.scroll_state(window, widget)
            && scroll.pressed.is_some()
        {
            scroll.pressed = None;
            host.set_scroll_state(window, widget, scroll);
            host.invalidate_widget(window, widget);
        }
    }

    // ============================================================================
    // DROPDOWNS
    // ============================================================================

    fn dropdown(
        &mut self,
        host: &mut dyn UiHost,
        target: Option<HitTarget>,
        point: Point,
        kind: PointerEventKind,
    ) {
        let (Some(owner), Some(widget)) = (self.gesture.window, self.gesture.widget) else {
            host.close_dropdown();
            self.finish(host, InputState::Normal);
            return;
        };
        if host.window(owner).is_none() {
            host.close_dropdown();
            self.reset_stale(host);
            return;
        }

        let over_dropdown = target
            .and_then(|t| host.window(t.window))
            .is_some_and(|info| info.is_dropdown);

        match kind {
            PointerEventKind::Move => {
                if over_dropdown
                    && let Some(item) = host.dropdown_item_at(point)
                    && host.dropdown_item_selectable(item)
                {
                    host.highlight_dropdown_item(item);
                }
            }
            PointerEventKind::PrimaryUp | PointerEventKind::SecondaryDown => {
                if over_dropdown {
                    match host.dropdown_item_at(point) {
                        Some(item) if host.dropdown_item_selectable(item) => {
                            self.close_dropdown(host, owner, widget, Some(Some(item)));
                        }
                        _ => self.close_dropdown(host, owner, widget, None),
                    }
                    return;
                }

                let over_owner = target.is_some_and(|t| t.is(owner, Some(widget)));
                if over_owner
                    && kind == PointerEventKind::PrimaryUp
                    && self.gesture.dropdown_stay_open
                    && !self.gesture.dropdown_release_seen
                {
                    self.gesture.dropdown_release_seen = true;
                    return;
                }
                self.close_dropdown(host, owner, widget, Some(None));
            }
            _ => {}
        }
    }

    /// Closes the dropdown; `selection` is `None` to cancel without a callback
    fn close_dropdown(
        &mut self,
        host: &mut dyn UiHost,
        owner: WindowRef,
        widget: WidgetIndex,
        selection: Option<Option<usize>>,
    ) {
        host.close_dropdown();
        if host.widget(owner, widget).is_some() {
            host.set_widget_pressed(owner, widget, false);
        }
        self.finish(host, InputState::Normal);
        self.hover.hand_over(owner, Some(widget));

        if let Some(item) = selection {
            debug!(%owner, widget, ?item, "dropdown selection");
            host.fire_dropdown_selection(owner, widget, item);
        }
    }

    // ============================================================================
    // PER-FRAME HOVER WORK
    // ============================================================================

    fn update_cursor_icon(&mut self, host: &mut dyn UiHost, point: Point) {
        let icon = if self.state == InputState::Resizing {
            CursorIcon::DiagonalResize
        } else {
            self.icon_at(host, point)
        };
        self.hover.apply_cursor_icon(host, icon);
    }

    fn icon_at(&self, host: &dyn UiHost, point: Point) -> CursorIcon {
        let Some(target) = host.hit_test(point) else {
            return CursorIcon::Arrow;
        };
        let Some(widget) = target.widget else {
            return CursorIcon::Arrow;
        };

        match widget.kind {
            WidgetKind::Viewport => self
                .tool
                .as_ref()
                .map_or(CursorIcon::Arrow, |tool| tool.cursor),
            WidgetKind::Frame | WidgetKind::ResizeHandle => match host.window(target.window) {
                Some(info) if info.can_resize() && self.in_resize_corner(&info.rect, point) => {
                    CursorIcon::DiagonalResize
                }
                _ => CursorIcon::Arrow,
            },
            _ => host.widget_cursor(target.window, widget.index, point),
        }
    }

    fn update_tool(&mut self, host: &mut dyn UiHost, point: Point) {
        let Some(owner) = self.tool.as_ref().map(|tool| tool.owner) else {
            return;
        };
        if host.window(owner).is_none() {
            self.cancel_tool();
            return;
        }
        if let Some(tool) = self.tool.as_mut() {
            tool.handler.on_tool_update(point.x, point.y);
        }
    }

    fn edge_scroll(&mut self, host: &mut dyn UiHost, point: Point) {
        if host.restricted_mode() {
            return;
        }
        let Some(main) = host.main_window() else {
            return;
        };
        let Some(info) = host.window(main) else {
            return;
        };
        let Some(zoom) = info.viewport_zoom else {
            return;
        };
        if info.position_locked {
            return;
        }

        let (width, height) = host.screen_size();
        let direction = |value: i32, max: i32| {
            if value == 0 {
                -1
            } else if value == max - 1 {
                1
            } else {
                0
            }
        };
        let (sx, sy) = (direction(point.x, width), direction(point.y, height));
        if sx == 0 && sy == 0 {
            return;
        }

        let step = self.config.edge_scroll_step << zoom;
        host.scroll_viewport(main, sx * step, sy * step);
    }
}

impl std::fmt::Debug for InputEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputEngine")
            .field("state", &self.state)
            .field("gesture", &self.gesture)
            .field("queue", &self.queue)
            .field("tool", &self.tool)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessDesktop, HeadlessWidget, HeadlessWindow, HostCall};

    const DIALOG: WindowRef = WindowRef::new(2, 0);

    fn dialog_desktop() -> HeadlessDesktop {
        let mut desktop = HeadlessDesktop::new(640, 480);
        desktop.add_window(
            HeadlessWindow::new(DIALOG, Rect::new(0, 0, 200, 150))
                .with_widget(HeadlessWidget::new(WidgetKind::Frame, Rect::new(0, 0, 200, 150)))
                .with_widget(HeadlessWidget::new(WidgetKind::Caption, Rect::new(1, 1, 198, 14)))
                .with_widget(HeadlessWidget::new(WidgetKind::Generic, Rect::new(20, 40, 60, 14))),
        );
        desktop
    }

    #[test]
    fn test_starts_in_reset_and_settles_in_normal() {
        let mut desktop = dialog_desktop();
        let mut engine = InputEngine::new(InputConfig::default());
        assert_eq!(engine.state(), InputState::Reset);

        engine.pump_once_per_frame(&mut desktop, 1);
        assert_eq!(engine.state(), InputState::Normal);
    }

    #[test]
    fn test_click_fires_down_then_up() {
        let mut desktop = dialog_desktop();
        let mut engine = InputEngine::new(InputConfig::default());

        engine.handle(&mut desktop, 30, 45, PointerEventKind::PrimaryDown);
        assert_eq!(engine.state(), InputState::WidgetPressed);
        engine.handle(&mut desktop, 30, 45, PointerEventKind::PrimaryUp);
        assert_eq!(engine.state(), InputState::Normal);

        let callbacks: Vec<_> = desktop
            .calls()
            .iter()
            .filter(|call| matches!(call, HostCall::MouseDown(..) | HostCall::MouseUp(..)))
            .cloned()
            .collect();
        assert_eq!(
            callbacks,
            vec![HostCall::MouseDown(DIALOG, 2), HostCall::MouseUp(DIALOG, 2)]
        );
    }

    #[test]
    fn test_release_elsewhere_withholds_mouse_up() {
        let mut desktop = dialog_desktop();
        let mut engine = InputEngine::new(InputConfig::default());

        engine.handle(&mut desktop, 30, 45, PointerEventKind::PrimaryDown);
        engine.handle(&mut desktop, 150, 120, PointerEventKind::PrimaryUp);

        assert_eq!(engine.state(), InputState::Normal);
        assert!(!desktop.calls().contains(&HostCall::MouseUp(DIALOG, 2)));
        assert!(!desktop.is_pressed(DIALOG, 2));
    }

    #[test]
    fn test_closed_window_resets_drag() {
        let mut desktop = dialog_desktop();
        let mut engine = InputEngine::new(InputConfig::default());

        engine.handle(&mut desktop, 10, 5, PointerEventKind::PrimaryDown);
        assert_eq!(engine.state(), InputState::Dragging);

        desktop.close_window(DIALOG);
        engine.handle(&mut desktop, 50, 5, PointerEventKind::Move);
        assert_eq!(engine.state(), InputState::Reset);
        assert_eq!(engine.gesture(), &GestureContext::default());
    }

    #[test]
    fn test_tool_handler_downcast() {
        struct Marker {
            updates: u32,
        }
        impl ToolHandler for Marker {
            fn name(&self) -> &str {
                "marker"
            }
            fn on_tool_down(&mut self, _x: i32, _y: i32) {}
            fn on_tool_drag(&mut self, _x: i32, _y: i32) {}
            fn on_tool_up(&mut self, _x: i32, _y: i32) {}
            fn on_tool_update(&mut self, _x: i32, _y: i32) {
                self.updates += 1;
            }
            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }
        }

        let mut desktop = dialog_desktop();
        let mut engine = InputEngine::new(InputConfig::default());
        engine.bind_tool(ToolBinding::new(
            DIALOG,
            2,
            CursorIcon::Crosshair,
            Box::new(Marker { updates: 0 }),
        ));

        engine.pump_once_per_frame(&mut desktop, 1);
        engine.pump_once_per_frame(&mut desktop, 1);
        assert_eq!(engine.tool_handler_mut::<Marker>().map(|m| m.updates), Some(2));

        desktop.close_window(DIALOG);
        engine.pump_once_per_frame(&mut desktop, 1);
        assert!(engine.tool().is_none());
    }
}
