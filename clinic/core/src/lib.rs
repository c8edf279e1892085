//! Clinic Core - Headless Front-Desk Orchestration for the AyurVeda Clinic App
//!
//! This crate provides the decision logic of the clinic app, completely
//! independent of any UI framework. It can drive a TUI, a web UI, or run
//! headless for testing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        UI Surfaces                               │
//! │  ┌─────────┐  ┌─────────┐  ┌───────────────────────────────────┐ │
//! │  │   TUI   │  │   Web   │  │           Headless                │ │
//! │  │(ratatui)│  │         │  │       (tests/automation)          │ │
//! │  └────┬────┘  └────┬────┘  └──────────────┬────────────────────┘ │
//! │       │            │                      │                      │
//! │       └────────────┴──────────────────────┘                      │
//! │                           │                                      │
//! │                    SurfaceEvent (up)                             │
//! │                   ClinicMessage (down)                           │
//! │                           │                                      │
//! └───────────────────────────┼──────────────────────────────────────┘
//!                             │
//! ┌───────────────────────────┼──────────────────────────────────────┐
//! │                      CLINIC CORE                                 │
//! │  ┌────────────────────────┴────────────────────────────────────┐ │
//! │  │                        Clinic                                │ │
//! │  │  ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────────┐ │ │
//! │  │  │ Session  │  │   View   │  │   Auth   │  │     Chat     │ │ │
//! │  │  │  State   │  │  Router  │  │   Flow   │  │  Responder   │ │ │
//! │  │  └──────────┘  └──────────┘  └──────────┘  └──────────────┘ │ │
//! │  └─────────────────────────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Clinic`]: The main orchestration struct that manages everything
//! - [`ClinicMessage`]: Directives sent from the Clinic to UI surfaces
//! - [`SurfaceEvent`]: Events sent from UI surfaces to the Clinic
//! - [`SessionState`]: The single in-memory authenticated identity
//! - [`ViewRouter`]: Which one screen is visible
//! - [`AuthFlow`]: The login/signup state machine with the passcode gate
//! - [`RuleResponder`]: The keyword-matching chat assistant
//!
//! # Quick Start
//!
//! ```ignore
//! use clinic_core::{
//!     Clinic, ClinicConfig, RuleResponder,
//!     events::{SurfaceCapabilities, SurfaceEvent, SurfaceType},
//! };
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (tx, mut rx) = mpsc::channel(100);
//!
//!     let responder = RuleResponder::default();
//!     let config = ClinicConfig::from_env();
//!     let mut clinic = Clinic::new(responder, config, tx);
//!
//!     clinic.start().await.unwrap();
//!
//!     clinic.handle_event(SurfaceEvent::Connected {
//!         event_id: SurfaceEvent::new_event_id(),
//!         surface_type: SurfaceType::Tui,
//!         capabilities: SurfaceCapabilities::tui(),
//!     }).await.unwrap();
//!
//!     loop {
//!         // Apply messages from the Clinic to the display
//!         while let Ok(msg) = rx.try_recv() {
//!             // render msg
//!         }
//!
//!         // Publish any chat reply whose composing delay elapsed
//!         clinic.poll_reply().await;
//!
//!         // Handle user input, send as SurfaceEvent
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`events`]: Events from UI surfaces to the Clinic
//! - [`messages`]: Directives from the Clinic to UI surfaces
//! - [`session`]: Roles and the single in-memory session
//! - [`view`]: The view router and dashboard tabs
//! - [`auth`]: Field visibility, validation, and the passcode challenge
//! - [`chat`]: Keyword classification, reply pools, and the composing delay
//! - [`booking`]: Booking validation and the in-memory appointment ledger
//! - [`clinic`]: The main Clinic struct
//! - [`config`]: TOML configuration file support
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework. It's pure decision logic that can be used anywhere.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod booking;
pub mod chat;
pub mod clinic;
pub mod config;
pub mod events;
pub mod messages;
pub mod session;
pub mod view;

// Re-exports for convenience
pub use auth::{
    mode_toggle_visible, validate, visible_fields, AuthField, AuthFlow, AuthForm, AuthMode,
    ChallengeOutcome, SubmitOutcome, ADMIN_PASSWORD, OTP_CODE, OTP_ERROR,
};
pub use booking::{
    format_date, format_time, validate_booking, Appointment, AppointmentId, AppointmentLedger,
    AppointmentStatus, BookingForm, LedgerError, ParsedBooking, BOOKING_CONFIRMED,
    BOOKING_REQUIRED_FIELDS,
};
pub use chat::{
    classify, pick_reply, replies, respond_text, BotReply, ChatEntry, ChatTranscript,
    PendingReply, ReplyPoll, ResponderBackend, ResponseCategory, RuleResponder, FALLBACK,
    QUICK_QUESTIONS, RULES,
};
pub use clinic::{Clinic, ClinicConfig};
pub use config::{
    default_config_path, load_config, load_config_from_path, ClinicToml, ConfigError,
};
pub use events::{SurfaceCapabilities, SurfaceEvent, SurfaceType};
pub use messages::{ChatSpeaker, ClinicMessage, ClinicState, EventId, MessageId, NotifyLevel};
pub use session::{
    LoginData, Role, SessionState, UserId, UserProfile, DEFAULT_SPECIALIZATION,
};
pub use view::{DashboardTab, View, ViewRouter};
