//! Pointer Router
//!
//! Pointer-input routing for a windowed simulation UI, built on winit.

/// Profile-based settings for the input engine
pub mod config;

/// Screen-space points and rectangles
pub mod geometry;

/// In-memory desktop host for tests and headless runs
pub mod headless;

/// Self-checks with a table reporter
pub mod health;

/// Pointer queue, state machine, hover tracking and host traits
pub mod input;

/// Tracing subscriber setup
pub mod logging;
