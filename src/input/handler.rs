//! Active tool handler trait

use super::host::{CursorIcon, WidgetIndex, WindowRef};

/// Trait for tools that intercept viewport pointer events
///
/// A tool is installed by a window (the toolbar that selected it) and
/// receives viewport presses until it is unbound. All coordinates are screen
/// space.
pub trait ToolHandler {
    /// Name of this tool for debugging
    fn name(&self) -> &str;

    /// Primary button pressed over a viewport
    fn on_tool_down(&mut self, x: i32, y: i32);

    /// Pointer moved while the press continues
    fn on_tool_drag(&mut self, x: i32, y: i32);

    /// Primary button released
    fn on_tool_up(&mut self, x: i32, y: i32);

    /// Called every frame with the current pointer position
    ///
    /// Useful for placement previews that follow the cursor.
    fn on_tool_update(&mut self, _x: i32, _y: i32) {
        // Default: no-op
    }

    /// Downcast to concrete type for accessing tool-specific state
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

/// The single active tool and the window that owns it
pub struct ToolBinding {
    pub owner: WindowRef,
    pub widget: WidgetIndex,
    /// Cursor shown while the pointer is over a viewport
    pub cursor: CursorIcon,
    pub handler: Box<dyn ToolHandler>,
}

impl ToolBinding {
    pub fn new(
        owner: WindowRef,
        widget: WidgetIndex,
        cursor: CursorIcon,
        handler: Box<dyn ToolHandler>,
    ) -> Self {
        Self {
            owner,
            widget,
            cursor,
            handler,
        }
    }
}

impl std::fmt::Debug for ToolBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolBinding")
            .field("owner", &self.owner)
            .field("widget", &self.widget)
            .field("cursor", &self.cursor)
            .field("handler", &self.handler.name())
            .finish()
    }
}
