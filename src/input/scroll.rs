//! Scrollbar sub-machine
//!
//! Classifies a point inside a scroll widget into one of eleven regions and
//! applies the matching offset adjustment. Offsets are always kept within
//! `[0, content - view]`.
//!
//! Geometry follows the classic layout: a bar is `thickness` pixels wide, its
//! arrow buttons are `thickness` pixels long, and the thumb travels along the
//! track between the two buttons. When both bars are visible each one gives
//! up `thickness` pixels at its far end for the shared corner.

use crate::geometry::{Point, Rect};

/// Part of a scroll widget under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollRegion {
    /// Scrolled content area
    View,
    HScrollLeftButton,
    HScrollRightButton,
    HScrollLeftTrough,
    HScrollRightTrough,
    HScrollThumb,
    VScrollTopButton,
    VScrollBottomButton,
    VScrollTopTrough,
    VScrollBottomTrough,
    VScrollThumb,
}

impl ScrollRegion {
    /// Regions that repeat their step while held
    pub fn is_button(self) -> bool {
        matches!(
            self,
            Self::HScrollLeftButton
                | Self::HScrollRightButton
                | Self::VScrollTopButton
                | Self::VScrollBottomButton
        )
    }

    pub fn is_thumb(self) -> bool {
        matches!(self, Self::HScrollThumb | Self::VScrollThumb)
    }
}

/// Scroll position and thumb geometry of one scroll widget
///
/// Thumb extents are stored relative to the widget's left/top edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollState {
    pub h_visible: bool,
    pub v_visible: bool,
    pub h_offset: i32,
    pub v_offset: i32,
    pub content_width: i32,
    pub content_height: i32,
    pub h_thumb_left: i32,
    pub h_thumb_right: i32,
    pub v_thumb_top: i32,
    pub v_thumb_bottom: i32,
    /// Region currently drawn as pressed
    pub pressed: Option<ScrollRegion>,
}

impl ScrollState {
    /// Creates a scroll state with thumbs already laid out for `widget`
    pub fn new(
        widget: &Rect,
        content_width: i32,
        content_height: i32,
        h_visible: bool,
        v_visible: bool,
        thickness: i32,
    ) -> Self {
        let mut state = Self {
            h_visible,
            v_visible,
            content_width,
            content_height,
            ..Self::default()
        };
        state.update_thumbs(widget, thickness);
        state
    }

    fn other_bar(visible: bool, thickness: i32) -> i32 {
        if visible { thickness } else { 0 }
    }

    /// Width of the visible content area
    pub fn view_width(&self, widget: &Rect, thickness: i32) -> i32 {
        widget.width - 2 - Self::other_bar(self.v_visible, thickness)
    }

    /// Height of the visible content area
    pub fn view_height(&self, widget: &Rect, thickness: i32) -> i32 {
        widget.height - 2 - Self::other_bar(self.h_visible, thickness)
    }

    pub fn max_h_offset(&self, widget: &Rect, thickness: i32) -> i32 {
        (self.content_width - self.view_width(widget, thickness)).max(0)
    }

    pub fn max_v_offset(&self, widget: &Rect, thickness: i32) -> i32 {
        (self.content_height - self.view_height(widget, thickness)).max(0)
    }

    fn h_track(&self, widget: &Rect, thickness: i32) -> i32 {
        widget.width - 2 * thickness - Self::other_bar(self.v_visible, thickness)
    }

    fn v_track(&self, widget: &Rect, thickness: i32) -> i32 {
        widget.height - 2 * thickness - Self::other_bar(self.h_visible, thickness)
    }

    /// Recomputes thumb extents from the current offsets
    pub fn update_thumbs(&mut self, widget: &Rect, thickness: i32) {
        if self.h_visible {
            let track = self.h_track(widget, thickness);
            let extent = widget.width - 3 - Self::other_bar(self.v_visible, thickness);
            let (left, right) =
                thumb_extent(self.h_offset, extent, self.content_width, track, thickness);
            self.h_thumb_left = left;
            self.h_thumb_right = right;
        }

        if self.v_visible {
            let track = self.v_track(widget, thickness);
            let extent = widget.height - 3 - Self::other_bar(self.h_visible, thickness);
            let (top, bottom) =
                thumb_extent(self.v_offset, extent, self.content_height, track, thickness);
            self.v_thumb_top = top;
            self.v_thumb_bottom = bottom;
        }
    }

    /// Classifies a screen point inside `widget`
    ///
    /// Returns `None` for the shared corner and for the one-pixel border
    /// around the view.
    pub fn classify(&self, widget: &Rect, point: Point, thickness: i32) -> Option<ScrollRegion> {
        let button = thickness - 1;

        if self.h_visible && point.y >= widget.bottom() - thickness {
            let far_edge = widget.right() - Self::other_bar(self.v_visible, thickness);
            return if point.x <= widget.x + button {
                Some(ScrollRegion::HScrollLeftButton)
            } else if point.x >= far_edge {
                None
            } else if point.x >= far_edge - button {
                Some(ScrollRegion::HScrollRightButton)
            } else if point.x < widget.x + self.h_thumb_left {
                Some(ScrollRegion::HScrollLeftTrough)
            } else if point.x > widget.x + self.h_thumb_right {
                Some(ScrollRegion::HScrollRightTrough)
            } else {
                Some(ScrollRegion::HScrollThumb)
            };
        }

        if self.v_visible && point.x >= widget.right() - thickness {
            let far_edge = widget.bottom() - Self::other_bar(self.h_visible, thickness);
            return if point.y <= widget.y + button {
                Some(ScrollRegion::VScrollTopButton)
            } else if point.y >= far_edge {
                None
            } else if point.y >= far_edge - button {
                Some(ScrollRegion::VScrollBottomButton)
            } else if point.y < widget.y + self.v_thumb_top {
                Some(ScrollRegion::VScrollTopTrough)
            } else if point.y > widget.y + self.v_thumb_bottom {
                Some(ScrollRegion::VScrollBottomTrough)
            } else {
                Some(ScrollRegion::VScrollThumb)
            };
        }

        self.view_point(widget, point).map(|_| ScrollRegion::View)
    }

    /// Content coordinates of a screen point inside the view area
    pub fn view_point(&self, widget: &Rect, point: Point) -> Option<Point> {
        let x = point.x - widget.x - 1;
        let y = point.y - widget.y - 1;
        if x < 0 || y < 0 {
            return None;
        }
        Some(Point::new(x + self.h_offset, y + self.v_offset))
    }

    /// Applies one activation of a button or trough
    ///
    /// Buttons move by `step`, troughs by one page of the view. Thumb and
    /// view regions leave the offsets untouched.
    pub fn apply_discrete(&mut self, region: ScrollRegion, widget: &Rect, step: i32, thickness: i32) {
        let max_h = self.max_h_offset(widget, thickness);
        let max_v = self.max_v_offset(widget, thickness);
        let page_h = self.view_width(widget, thickness);
        let page_v = self.view_height(widget, thickness);

        match region {
            ScrollRegion::HScrollLeftButton => self.h_offset -= step,
            ScrollRegion::HScrollRightButton => self.h_offset += step,
            ScrollRegion::HScrollLeftTrough => self.h_offset -= page_h,
            ScrollRegion::HScrollRightTrough => self.h_offset += page_h,
            ScrollRegion::VScrollTopButton => self.v_offset -= step,
            ScrollRegion::VScrollBottomButton => self.v_offset += step,
            ScrollRegion::VScrollTopTrough => self.v_offset -= page_v,
            ScrollRegion::VScrollBottomTrough => self.v_offset += page_v,
            ScrollRegion::View | ScrollRegion::HScrollThumb | ScrollRegion::VScrollThumb => {}
        }

        self.h_offset = self.h_offset.clamp(0, max_h);
        self.v_offset = self.v_offset.clamp(0, max_v);
        self.update_thumbs(widget, thickness);
    }

    /// Moves a grabbed thumb by a pointer delta along its axis
    pub fn drag_thumb(&mut self, region: ScrollRegion, delta: i32, widget: &Rect, thickness: i32) {
        match region {
            ScrollRegion::HScrollThumb => {
                let track = self.h_track(widget, thickness);
                if track > 0 {
                    let moved = self.content_width * delta / track;
                    self.h_offset =
                        (self.h_offset + moved).clamp(0, self.max_h_offset(widget, thickness));
                }
            }
            ScrollRegion::VScrollThumb => {
                let track = self.v_track(widget, thickness);
                if track > 0 {
                    let moved = self.content_height * delta / track;
                    self.v_offset =
                        (self.v_offset + moved).clamp(0, self.max_v_offset(widget, thickness));
                }
            }
            _ => return,
        }
        self.update_thumbs(widget, thickness);
    }

    /// Scrolls every visible bar by a content-space delta
    pub fn pan(&mut self, dx: i32, dy: i32, widget: &Rect, thickness: i32) {
        if self.h_visible {
            self.h_offset = (self.h_offset + dx).clamp(0, self.max_h_offset(widget, thickness));
        }
        if self.v_visible {
            self.v_offset = (self.v_offset + dy).clamp(0, self.max_v_offset(widget, thickness));
        }
        self.update_thumbs(widget, thickness);
    }
}

fn thumb_extent(offset: i32, extent: i32, content: i32, track: i32, thickness: i32) -> (i32, i32) {
    let mut start = offset * track;
    let mut end = extent + offset;
    if content != 0 {
        start /= content;
        end = end * track / content;
    }
    (start + thickness, (end + thickness).min(track + thickness - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i32 = 11;

    fn list_widget() -> Rect {
        // 200x100 list with a vertical bar only
        Rect::new(100, 50, 200, 100)
    }

    fn vertical_list(content_height: i32) -> ScrollState {
        ScrollState::new(&list_widget(), 150, content_height, false, true, T)
    }

    #[test]
    fn test_classify_vertical_bar_parts() {
        let widget = list_widget();
        let state = vertical_list(1000);
        let bar_x = widget.right() - 5;

        assert_eq!(
            state.classify(&widget, Point::new(bar_x, widget.y + 2), T),
            Some(ScrollRegion::VScrollTopButton)
        );
        assert_eq!(
            state.classify(&widget, Point::new(bar_x, widget.bottom() - 2), T),
            Some(ScrollRegion::VScrollBottomButton)
        );
        assert_eq!(
            state.classify(&widget, Point::new(bar_x, widget.y + state.v_thumb_top), T),
            Some(ScrollRegion::VScrollThumb)
        );
        assert_eq!(
            state.classify(&widget, Point::new(bar_x, widget.y + state.v_thumb_bottom + 5), T),
            Some(ScrollRegion::VScrollBottomTrough)
        );
        assert_eq!(
            state.classify(&widget, Point::new(widget.x + 20, widget.y + 20), T),
            Some(ScrollRegion::View)
        );
    }

    #[test]
    fn test_border_pixel_is_not_view() {
        let widget = list_widget();
        let state = vertical_list(1000);
        assert_eq!(state.classify(&widget, Point::new(widget.x, widget.y + 20), T), None);
    }

    #[test]
    fn test_corner_is_unclassified_when_both_bars_visible() {
        let widget = Rect::new(0, 0, 120, 120);
        let state = ScrollState::new(&widget, 500, 500, true, true, T);
        assert_eq!(
            state.classify(&widget, Point::new(widget.right(), widget.bottom()), T),
            None
        );
    }

    #[test]
    fn test_buttons_clamp_at_both_ends() {
        let widget = list_widget();
        let mut state = vertical_list(110);
        let max = state.max_v_offset(&widget, T);
        assert_eq!(max, 12);

        state.apply_discrete(ScrollRegion::VScrollTopButton, &widget, 3, T);
        assert_eq!(state.v_offset, 0);

        for _ in 0..10 {
            state.apply_discrete(ScrollRegion::VScrollBottomButton, &widget, 3, T);
        }
        assert_eq!(state.v_offset, max);
    }

    #[test]
    fn test_trough_jumps_by_page() {
        let widget = list_widget();
        let mut state = vertical_list(1000);
        state.apply_discrete(ScrollRegion::VScrollBottomTrough, &widget, 3, T);
        assert_eq!(state.v_offset, state.view_height(&widget, T));
    }

    #[test]
    fn test_thumbs_move_with_offset() {
        let widget = list_widget();
        let mut state = vertical_list(1000);
        let top_before = state.v_thumb_top;
        assert_eq!(top_before, T);

        state.apply_discrete(ScrollRegion::VScrollBottomTrough, &widget, 3, T);
        assert!(state.v_thumb_top > top_before);
        assert!(state.v_thumb_bottom <= state.v_track(&widget, T) + T - 1);
    }

    #[test]
    fn test_thumb_drag_is_proportional_and_clamped() {
        let widget = list_widget();
        let mut state = vertical_list(1000);
        let track = widget.height - 2 * T;

        state.drag_thumb(ScrollRegion::VScrollThumb, 10, &widget, T);
        assert_eq!(state.v_offset, 1000 * 10 / track);

        state.drag_thumb(ScrollRegion::VScrollThumb, 10_000, &widget, T);
        assert_eq!(state.v_offset, state.max_v_offset(&widget, T));

        state.drag_thumb(ScrollRegion::VScrollThumb, -10_000, &widget, T);
        assert_eq!(state.v_offset, 0);
    }

    #[test]
    fn test_pan_ignores_hidden_bar() {
        let widget = list_widget();
        let mut state = vertical_list(1000);
        state.pan(40, 25, &widget, T);
        assert_eq!(state.h_offset, 0);
        assert_eq!(state.v_offset, 25);
    }

    #[test]
    fn test_view_point_includes_offsets() {
        let widget = list_widget();
        let mut state = vertical_list(1000);
        state.v_offset = 30;
        assert_eq!(
            state.view_point(&widget, Point::new(widget.x + 6, widget.y + 11)),
            Some(Point::new(5, 40))
        );
    }
}
