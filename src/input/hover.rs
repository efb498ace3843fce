//! Hover tracking, tooltip timing and cursor icon bookkeeping

use tracing::debug;

use crate::config::InputConfig;
use crate::geometry::Point;

use super::host::{CursorIcon, HitTarget, UiHost, WidgetIndex, WidgetKind, WindowRef};
use super::scroll::ScrollRegion;

/// Identity of the hovered element: window (if any) and widget (if any)
pub type HoverIdentity = (Option<WindowRef>, Option<WidgetIndex>);

/// Tracks what the idle pointer is over
///
/// Tooltip timing works in ticks. `timer` counts stationary hover time before
/// a tooltip opens and the open duration afterwards.
#[derive(Debug, Clone)]
pub struct HoverTracker {
    hovered: HoverIdentity,
    hovered_kind: Option<WidgetKind>,
    last_position: Point,
    timer: u32,
    ticks_since_close: u32,
    open: Option<(WindowRef, WidgetIndex)>,
    /// The open tooltip timed out; stay closed until the identity changes
    suppressed: bool,
    cursor_icon: Option<CursorIcon>,
}

impl Default for HoverTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl HoverTracker {
    pub fn new() -> Self {
        Self {
            hovered: (None, None),
            hovered_kind: None,
            last_position: Point::default(),
            timer: 0,
            ticks_since_close: u32::MAX,
            open: None,
            suppressed: false,
            cursor_icon: None,
        }
    }

    pub fn hovered(&self) -> HoverIdentity {
        self.hovered
    }

    /// Widget whose tooltip is currently open
    pub fn open_tooltip(&self) -> Option<(WindowRef, WidgetIndex)> {
        self.open
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn ticks_since_close(&self) -> u32 {
        self.ticks_since_close
    }

    /// Advances the re-hover clock by one frame's ticks, whatever the input state
    pub fn advance(&mut self, elapsed: u32) {
        self.ticks_since_close = self.ticks_since_close.saturating_add(elapsed);
    }

    /// Starts tracking afresh at `point`, closing any open tooltip
    pub fn reset(&mut self, host: &mut dyn UiHost, point: Point) {
        self.close_tooltip(host);
        self.last_position = point;
        self.timer = 0;
        self.suppressed = false;
    }

    /// Closes the open tooltip, if any
    pub fn close_tooltip(&mut self, host: &mut dyn UiHost) {
        if self.open.take().is_some() {
            host.close_tooltip();
            self.ticks_since_close = 0;
        }
    }

    /// Hands tooltip tracking to a widget that just finished a gesture
    pub fn hand_over(&mut self, window: WindowRef, widget: Option<WidgetIndex>) {
        self.hovered = (Some(window), widget);
        self.hovered_kind = None;
        self.timer = 0;
        self.suppressed = false;
    }

    /// Processes an idle pointer sample
    pub fn update(
        &mut self,
        host: &mut dyn UiHost,
        config: &InputConfig,
        target: Option<&HitTarget>,
        point: Point,
        elapsed: u32,
    ) {
        self.check_identity(host, target);

        let Some(target) = target else {
            self.update_tooltip(host, config, None, point, elapsed);
            return;
        };

        match target.widget {
            Some(widget) if widget.kind == WidgetKind::Scrollbar => {
                let region = host
                    .scroll_state(target.window, widget.index)
                    .map(|state| {
                        (
                            state.classify(&widget.rect, point, config.scrollbar_thickness),
                            state.view_point(&widget.rect, point),
                        )
                    });
                match region {
                    Some((Some(ScrollRegion::View), Some(content))) => {
                        host.scroll_mouse_over(target.window, widget.index, content);
                        self.update_tooltip(host, config, Some(target), point, elapsed);
                    }
                    Some((None, _)) | None => {
                        self.update_tooltip(host, config, Some(target), point, elapsed);
                    }
                    Some((Some(_), _)) => self.close_tooltip(host),
                }
            }
            _ => self.update_tooltip(host, config, Some(target), point, elapsed),
        }
    }

    fn check_identity(&mut self, host: &mut dyn UiHost, target: Option<&HitTarget>) {
        let identity = target.map_or((None, None), |t| (Some(t.window), t.widget_index()));
        if identity == self.hovered {
            return;
        }

        if let ((Some(window), Some(widget)), Some(WidgetKind::FlatButton)) =
            (self.hovered, self.hovered_kind)
        {
            host.invalidate_widget(window, widget);
        }

        self.hovered = identity;
        self.hovered_kind = target.and_then(|t| t.widget).map(|w| w.kind);

        if let Some(widget) = target.and_then(|t| t.widget)
            && widget.kind == WidgetKind::FlatButton
            && let Some(target) = target
        {
            host.invalidate_widget(target.window, widget.index);
        }

        self.close_tooltip(host);
        self.timer = 0;
        self.suppressed = false;
    }

    fn update_tooltip(
        &mut self,
        host: &mut dyn UiHost,
        config: &InputConfig,
        target: Option<&HitTarget>,
        point: Point,
        elapsed: u32,
    ) {
        if self.open.is_some() {
            self.timer = self.timer.saturating_add(elapsed);
            if self.timer >= config.tooltip_timeout {
                debug!(timer = self.timer, "tooltip timed out");
                self.close_tooltip(host);
                self.suppressed = true;
                self.timer = 0;
            }
            return;
        }

        let stationary =
            point.chebyshev_distance(self.last_position) <= config.tooltip_stationary_tolerance;
        self.last_position = point;

        let Some((window, widget)) = target.and_then(|t| t.widget_index().map(|w| (t.window, w)))
        else {
            self.timer = 0;
            return;
        };
        if self.suppressed {
            return;
        }

        if stationary {
            self.timer = self.timer.saturating_add(elapsed);
        } else {
            self.timer = 0;
        }

        let threshold = if self.ticks_since_close < config.tooltip_rehover_window {
            0
        } else {
            config.tooltip_delay
        };

        if self.timer >= threshold && host.open_tooltip(window, widget, point) {
            debug!(%window, widget, "tooltip opened");
            self.open = Some((window, widget));
            self.timer = 0;
        }
    }

    /// Forwards a cursor icon to the platform if it changed
    pub fn apply_cursor_icon(&mut self, host: &mut dyn UiHost, icon: CursorIcon) {
        if self.cursor_icon != Some(icon) {
            self.cursor_icon = Some(icon);
            host.cursor().set_icon(icon);
        }
    }
}
