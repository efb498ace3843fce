//! Pointer router demo
//!
//! Opens an empty winit window backed by a headless desktop layout (a main
//! viewport plus a toolbox window) and logs every routed host call.
//! `pointer_router health` runs the self-checks instead.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use pointer_router::config::AppConfig;
use pointer_router::geometry::Rect;
use pointer_router::headless::{HeadlessDesktop, HeadlessWidget, HeadlessWindow};
use pointer_router::health;
use pointer_router::input::{
    CursorIcon, InputEngine, PointerCollector, WidgetKind, WindowRef, WinitCursor,
};
use pointer_router::logging;

/// Pointer routing demo and self-checks
#[derive(Parser)]
#[command(name = "pointer_router")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration profile (defaults to APP_PROFILE, then release)
    #[arg(long, value_name = "PROFILE")]
    profile: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, value_name = "FILTER", default_value = logging::DEFAULT_FILTER)]
    log: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the self-checks; exits 0 (pass), 1 (fail) or 2 (warnings)
    Health,
    /// Open the demo window (default)
    Run,
}

const MAIN_VIEW: WindowRef = WindowRef::new(1, 0);
const TOOLBOX: WindowRef = WindowRef::new(2, 0);

/// Frame pacing of the demo loop
const FRAME: Duration = Duration::from_millis(16);

fn demo_desktop(window: &Window, cursor: WinitCursor) -> HeadlessDesktop<WinitCursor> {
    let size = window.inner_size().to_logical::<f64>(window.scale_factor());
    let (width, height) = (size.width as i32, size.height as i32);
    let screen = Rect::new(0, 0, width, height);

    let mut desktop = HeadlessDesktop::with_cursor(width, height, cursor);
    desktop.add_window(
        HeadlessWindow::new(MAIN_VIEW, screen)
            .with_viewport(0)
            .with_widget(HeadlessWidget::new(WidgetKind::Viewport, screen)),
    );
    desktop.add_window(
        HeadlessWindow::new(TOOLBOX, Rect::new(40, 40, 220, 170))
            .resizable((160, 120), (400, 320))
            .with_widget(HeadlessWidget::new(WidgetKind::Frame, Rect::new(0, 0, 220, 170)))
            .with_widget(HeadlessWidget::new(WidgetKind::Caption, Rect::new(1, 1, 218, 14)))
            .with_widget(
                HeadlessWidget::new(WidgetKind::FlatButton, Rect::new(8, 20, 24, 24))
                    .with_tooltip()
                    .with_cursor(CursorIcon::HandPoint),
            )
            .with_widget(
                HeadlessWidget::new(WidgetKind::Generic, Rect::new(40, 20, 24, 24))
                    .repeatable()
                    .with_tooltip(),
            )
            .with_widget(
                HeadlessWidget::new(WidgetKind::Generic, Rect::new(72, 20, 100, 12))
                    .with_dropdown(vec![true, true, false, true], false),
            )
            .with_widget(
                HeadlessWidget::new(WidgetKind::Scrollbar, Rect::new(8, 50, 200, 100))
                    .with_scroll(400, 600, true, true),
            ),
    );
    desktop.set_main_window(MAIN_VIEW);
    desktop
}

struct App {
    config: AppConfig,
    engine: InputEngine,
    collector: PointerCollector,
    window: Option<Arc<Window>>,
    desktop: Option<HeadlessDesktop<WinitCursor>>,
    last_frame: Option<Instant>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        info!(profile = %config.profile, "Starting pointer router demo");
        info!(?config.input, "Input configuration");

        let engine = InputEngine::new(config.input.clone());
        let collector = PointerCollector::new(engine.queue());
        Self {
            config,
            engine,
            collector,
            window: None,
            desktop: None,
            last_frame: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(format!("Pointer Router ({})", self.config.profile))
            .with_inner_size(LogicalSize::new(1024.0, 768.0));

        match event_loop.create_window(attributes) {
            Ok(window) => {
                let window = Arc::new(window);
                self.collector.set_scale_factor(window.scale_factor());
                let cursor = WinitCursor::new(Arc::clone(&window), self.collector.cursor_position());
                self.desktop = Some(demo_desktop(&window, cursor));
                self.window = Some(window);
                self.last_frame = Some(Instant::now());
                info!("Window created");
            }
            Err(e) => {
                error!(error = %e, "Failed to create window");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(desktop), Some(last_frame)) = (self.desktop.as_mut(), self.last_frame) else {
            return;
        };

        // One tick per millisecond of wall time
        let now = Instant::now();
        let ticks = u32::try_from((now - last_frame).as_millis()).unwrap_or(u32::MAX);
        self.last_frame = Some(now);

        self.engine.pump_once_per_frame(desktop, ticks);
        for call in desktop.take_calls() {
            info!(?call, state = %self.engine.state(), "host call");
        }

        event_loop.set_control_flow(ControlFlow::wait_duration(FRAME));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        self.collector.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let (Some(desktop), Some(window)) = (self.desktop.as_mut(), &self.window) {
                    let logical = size.to_logical::<f64>(window.scale_factor());
                    desktop.set_screen_size(logical.width as i32, logical.height as i32);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(desktop) = self.desktop.as_mut() {
                    desktop.cursor_mut().set_scale_factor(scale_factor);
                }
            }
            _ => {}
        }
    }
}

fn run(config: AppConfig) -> ExitCode {
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!(error = %e, "Failed to create event loop");
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::wait_duration(FRAME));

    let mut app = App::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        error!(error = %e, "Event loop failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.log);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Health => {
            let report = health::run_all_checks();
            health::print_report(&report);
            ExitCode::from(report.exit_code() as u8)
        }
        Commands::Run => {
            let loaded = match cli.profile.as_deref() {
                Some(profile) => AppConfig::load(profile),
                None => AppConfig::load_from_env(),
            };
            let config = loaded.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load config, using default configuration");
                AppConfig::default()
            });
            run(config)
        }
    }
}
