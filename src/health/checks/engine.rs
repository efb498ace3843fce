//! Input engine self-check

use crate::config::{AppConfig, InputConfig};
use crate::geometry::{Point, Rect};
use crate::headless::{HeadlessDesktop, HeadlessWidget, HeadlessWindow, HostCall};
use crate::health::check::{CheckResult, SystemCheck};
use crate::input::{InputEngine, InputState, PointerEventKind, WidgetKind, WindowRef};

const PROBE: WindowRef = WindowRef::new(1, 0);

/// Drives a caption drag and a button click through a headless desktop
pub struct EngineCheck {
    config: InputConfig,
}

impl EngineCheck {
    /// Uses the configuration of the environment's profile
    pub fn new() -> Self {
        Self::with_config(AppConfig::default().input)
    }

    pub fn with_config(config: InputConfig) -> Self {
        Self { config }
    }

    fn desktop() -> HeadlessDesktop {
        let mut desktop = HeadlessDesktop::new(640, 480);
        desktop.add_window(
            HeadlessWindow::new(PROBE, Rect::new(0, 0, 200, 120))
                .with_widget(HeadlessWidget::new(WidgetKind::Frame, Rect::new(0, 0, 200, 120)))
                .with_widget(HeadlessWidget::new(WidgetKind::Caption, Rect::new(0, 0, 200, 14)))
                .with_widget(HeadlessWidget::new(WidgetKind::Generic, Rect::new(20, 40, 60, 14))),
        );
        desktop
    }

    fn drag(&self, failures: &mut Vec<String>) {
        let mut desktop = Self::desktop();
        let mut engine = InputEngine::new(self.config.clone());

        engine.handle(&mut desktop, 10, 10, PointerEventKind::PrimaryDown);
        engine.handle(&mut desktop, 40, 10, PointerEventKind::Move);
        engine.handle(&mut desktop, 40, 10, PointerEventKind::PrimaryUp);

        let moves: Vec<_> = desktop
            .calls()
            .iter()
            .filter(|call| matches!(call, HostCall::MoveWindow(..)))
            .collect();
        if moves != [&HostCall::MoveWindow(PROBE, 30, 0)] {
            failures.push(format!("caption drag produced {moves:?}"));
        }
        if engine.state() != InputState::Normal {
            failures.push(format!("caption drag ended in {}", engine.state()));
        }
        if desktop.window_rect(PROBE).map(|r| Point::new(r.x, r.y)) != Some(Point::new(30, 0)) {
            failures.push("window did not end up at (30, 0)".to_string());
        }
    }

    fn click(&self, failures: &mut Vec<String>) {
        let mut desktop = Self::desktop();
        let mut engine = InputEngine::new(self.config.clone());

        engine.handle(&mut desktop, 30, 45, PointerEventKind::PrimaryDown);
        engine.handle(&mut desktop, 30, 45, PointerEventKind::PrimaryUp);

        let ups = desktop.count_calls(|call| *call == HostCall::MouseUp(PROBE, 2));
        if ups != 1 {
            failures.push(format!("button click fired {ups} mouse-up callbacks"));
        }
        if desktop.is_pressed(PROBE, 2) {
            failures.push("button stayed pressed after release".to_string());
        }
    }
}

impl Default for EngineCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for EngineCheck {
    fn name(&self) -> &'static str {
        "Input engine"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Caption drag and button click against an in-memory desktop")
    }

    fn check(&self) -> CheckResult {
        let mut failures = Vec::new();
        self.drag(&mut failures);
        self.click(&mut failures);
        CheckResult::from_failures("Drag and click routed correctly", failures)
    }
}
