//! Clinic TUI - Terminal surface for the AyurVeda clinic app
//!
//! A thin display client over `clinic-core`:
//! 1. Converts terminal events to `SurfaceEvent`s
//! 2. Sends events to the embedded Clinic via `ClinicClient`
//! 3. Receives `ClinicMessage`s and updates `DisplayState`
//! 4. Renders based on `DisplayState`
//!
//! All decorative behavior (the landing carousel, the particle field, the
//! palette) lives here; the core carries no UI dependencies.

pub mod app;
pub mod carousel;
pub mod client;
pub mod display;
pub mod forms;
pub mod particles;
pub mod theme;

pub use app::App;
pub use client::ClinicClient;
pub use display::DisplayState;
