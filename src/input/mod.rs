//! Pointer input routing
//!
//! Turns a raw stream of pointer events into routed actions against a host's
//! windows and widgets:
//! - Collects button edges from winit events into a lock-free queue
//! - Advances a single interaction state machine once per frame
//! - Drives window drag/resize, scrollbars, viewport panning and dropdowns
//! - Tracks hover for flat-button highlights and tooltip timing
//! - Forwards viewport presses to the active tool
//!
//! # Architecture
//!
//! ```text
//! Raw Input (winit) → PointerCollector → PointerEventQueue
//!                            ↓                  ↓
//!                      CursorPosition     InputEngine (once per frame)
//!                                               ↓
//!                          ┌──────────┬─────────┴────────┬─────────────┐
//!                     HoverTracker  ScrollState     ToolHandler     UiHost
//!                     (tooltips)    (scrollbars)    (active tool)   (windows)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut engine = InputEngine::new(config.input.clone());
//! let mut collector = PointerCollector::new(engine.queue());
//!
//! // In window_event()
//! collector.handle_window_event(&event);
//!
//! // Each simulation tick
//! engine.pump_once_per_frame(&mut desktop, ticks);
//! ```

mod collector;
mod engine;
mod events;
mod handler;
mod host;
mod hover;
mod platform;
mod queue;
mod scroll;
mod state;

// Re-export public API
pub use collector::{CursorPosition, PointerCollector};
pub use engine::InputEngine;
pub use events::{MouseButton, PointerEvent, PointerEventKind};
pub use handler::{ToolBinding, ToolHandler};
pub use host::{
    CursorIcon, HitTarget, InteractionKind, MouseDownOutcome, PlatformCursor, UiHost, ViewportInteraction,
    WidgetIndex, WidgetInfo, WidgetKind, WindowInfo, WindowRef,
};
pub use hover::{HoverIdentity, HoverTracker};
pub use platform::WinitCursor;
pub use queue::{PointerEventQueue, QUEUE_CAPACITY};
pub use scroll::{ScrollRegion, ScrollState};
pub use state::{GestureContext, InputState, PressRepeatCounter};
