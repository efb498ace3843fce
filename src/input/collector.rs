//! Pointer event collection from winit events

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use winit::event::{ElementState, WindowEvent};

use crate::geometry::Point;

use super::events::{MouseButton, PointerEvent, PointerEventKind};
use super::queue::{PointerEventQueue, pack_position, unpack_position};

/// Latest cursor position, shared between the event callback and the frame
#[derive(Debug, Default)]
pub struct CursorPosition {
    packed: AtomicU64,
}

impl CursorPosition {
    pub fn new(point: Point) -> Self {
        Self {
            packed: AtomicU64::new(pack_position(point.x, point.y)),
        }
    }

    pub fn load(&self) -> Point {
        let (x, y) = unpack_position(self.packed.load(Ordering::Acquire));
        Point::new(x, y)
    }

    pub fn store(&self, point: Point) {
        self.packed
            .store(pack_position(point.x, point.y), Ordering::Release);
    }
}

/// Producer side of the pointer queue
///
/// Button edges are queued with the cursor position at the time they
/// happened. Plain motion only updates the shared position; the engine
/// samples it once per frame.
pub struct PointerCollector {
    queue: Arc<PointerEventQueue>,
    position: Arc<CursorPosition>,
    scale_factor: f64,
}

impl PointerCollector {
    /// Creates a collector feeding `queue`
    pub fn new(queue: Arc<PointerEventQueue>) -> Self {
        Self {
            queue,
            position: Arc::new(CursorPosition::default()),
            scale_factor: 1.0,
        }
    }

    /// Update scale factor (DPI scaling)
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        if scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    /// Shared handle to the latest cursor position
    pub fn cursor_position(&self) -> Arc<CursorPosition> {
        Arc::clone(&self.position)
    }

    /// Handle a winit window event
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(position.x, position.y);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = MouseButton::from_winit(*button) {
                    self.button_input(button, *state == ElementState::Pressed);
                }
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.set_scale_factor(*scale_factor);
            }

            _ => {}
        }
    }

    /// Records a cursor move given in physical pixels
    pub fn cursor_moved(&mut self, physical_x: f64, physical_y: f64) {
        let point = Point::new(
            (physical_x / self.scale_factor).floor() as i32,
            (physical_y / self.scale_factor).floor() as i32,
        );
        self.position.store(point);
    }

    /// Queues a button edge at the current cursor position
    pub fn button_input(&mut self, button: MouseButton, pressed: bool) {
        let point = self.position.load();
        self.queue.push(PointerEvent::new(
            point.x,
            point.y,
            PointerEventKind::from_button(button, pressed),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_edges_are_queued_at_cursor() {
        let queue = Arc::new(PointerEventQueue::new());
        let mut collector = PointerCollector::new(Arc::clone(&queue));

        collector.cursor_moved(40.0, 12.0);
        collector.button_input(MouseButton::Primary, true);
        collector.cursor_moved(55.0, 12.0);
        collector.button_input(MouseButton::Primary, false);

        assert_eq!(
            queue.pop(),
            Some(PointerEvent::new(40, 12, PointerEventKind::PrimaryDown))
        );
        assert_eq!(
            queue.pop(),
            Some(PointerEvent::new(55, 12, PointerEventKind::PrimaryUp))
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_motion_only_updates_position() {
        let queue = Arc::new(PointerEventQueue::new());
        let mut collector = PointerCollector::new(Arc::clone(&queue));
        let shared = collector.cursor_position();

        collector.cursor_moved(10.0, 20.0);
        assert!(queue.is_empty());
        assert_eq!(shared.load(), Point::new(10, 20));
    }

    #[test]
    fn test_scale_factor_converts_to_logical_pixels() {
        let queue = Arc::new(PointerEventQueue::new());
        let mut collector = PointerCollector::new(queue);
        collector.set_scale_factor(2.0);

        collector.cursor_moved(101.0, 64.0);
        assert_eq!(collector.cursor_position().load(), Point::new(50, 32));
    }

    #[test]
    fn test_negative_positions_survive_packing() {
        let position = CursorPosition::new(Point::new(-3, -700));
        assert_eq!(position.load(), Point::new(-3, -700));
    }
}
