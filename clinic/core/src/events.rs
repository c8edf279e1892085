//! Surface Events
//!
//! Events sent from UI surfaces to the clinic core. These represent all the
//! ways a UI can communicate user actions to the orchestration layer.
//!
//! # Design Philosophy
//!
//! UI surfaces are "dumb" renderers that forward user actions to the core.
//! They don't interpret what actions mean - they just report what happened.
//! The core decides how to respond.

use serde::{Deserialize, Serialize};

use crate::auth::AuthForm;
use crate::booking::{AppointmentId, BookingForm};
use crate::messages::EventId;
use crate::session::Role;
use crate::view::DashboardTab;

/// Events from a UI surface to the clinic core
///
/// These events tell the core what the user is doing. The core responds
/// with `ClinicMessage`s.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SurfaceEvent {
    // ============================================
    // Connection Events
    // ============================================
    /// Surface connected to the core
    Connected {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// Surface type identifier
        surface_type: SurfaceType,
        /// Surface capabilities
        capabilities: SurfaceCapabilities,
    },

    /// Surface disconnecting gracefully
    Disconnected {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// Reason for disconnect (optional)
        reason: Option<String>,
    },

    // ============================================
    // Navigation Events
    // ============================================
    /// User requested the landing screen
    ///
    /// Clears any active session: a session exists only while a dashboard
    /// is the visible view.
    LandingRequested {
        /// Event ID for acknowledgment
        event_id: EventId,
    },

    /// User requested the auth screen for a role
    AuthRequested {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// Role the auth attempt targets
        role: Role,
    },

    /// User requested logout
    LogoutRequested {
        /// Event ID for acknowledgment
        event_id: EventId,
    },

    /// User selected a dashboard tab
    TabSelected {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// The tab to activate
        tab: DashboardTab,
    },

    // ============================================
    // Auth Events
    // ============================================
    /// User toggled login ⇄ signup
    AuthModeToggled {
        /// Event ID for acknowledgment
        event_id: EventId,
    },

    /// User submitted the auth form
    AuthSubmitted {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// The collected form fields (empty string = not supplied)
        form: AuthForm,
    },

    /// User submitted a one-time-passcode
    OtpSubmitted {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// The entered code
        code: String,
    },

    /// User dismissed the passcode prompt without logging in
    OtpCancelled {
        /// Event ID for acknowledgment
        event_id: EventId,
    },

    // ============================================
    // Chat Events
    // ============================================
    /// User opened the chat widget
    ChatOpened {
        /// Event ID for acknowledgment
        event_id: EventId,
    },

    /// User closed the chat widget
    ChatClosed {
        /// Event ID for acknowledgment
        event_id: EventId,
    },

    /// User sent a chat utterance
    ChatMessageSent {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// The utterance text
        content: String,
    },

    /// User clicked a quick question
    ///
    /// Equivalent to sending the question's literal text.
    QuickQuestionClicked {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// The question text
        question: String,
    },

    // ============================================
    // Booking Events
    // ============================================
    /// User submitted the appointment booking form
    BookingSubmitted {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// The collected booking fields
        form: BookingForm,
    },

    /// Doctor confirmed an appointment
    AppointmentConfirmed {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// The appointment to confirm
        id: AppointmentId,
    },

    /// Doctor cancelled an appointment
    AppointmentCancelled {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// The appointment to cancel
        id: AppointmentId,
    },

    // ============================================
    // Lifecycle Events
    // ============================================
    /// User requested quit
    QuitRequested {
        /// Event ID for acknowledgment
        event_id: EventId,
    },
}

impl SurfaceEvent {
    /// Generate a new event ID for this event
    pub fn new_event_id() -> EventId {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        EventId(format!("evt_{id}"))
    }

    /// Get this event's ID
    pub fn event_id(&self) -> &EventId {
        match self {
            Self::Connected { event_id, .. }
            | Self::Disconnected { event_id, .. }
            | Self::LandingRequested { event_id }
            | Self::AuthRequested { event_id, .. }
            | Self::LogoutRequested { event_id }
            | Self::TabSelected { event_id, .. }
            | Self::AuthModeToggled { event_id }
            | Self::AuthSubmitted { event_id, .. }
            | Self::OtpSubmitted { event_id, .. }
            | Self::OtpCancelled { event_id }
            | Self::ChatOpened { event_id }
            | Self::ChatClosed { event_id }
            | Self::ChatMessageSent { event_id, .. }
            | Self::QuickQuestionClicked { event_id, .. }
            | Self::BookingSubmitted { event_id, .. }
            | Self::AppointmentConfirmed { event_id, .. }
            | Self::AppointmentCancelled { event_id, .. }
            | Self::QuitRequested { event_id } => event_id,
        }
    }
}

/// Type of UI surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceType {
    /// Terminal UI (ratatui/crossterm)
    Tui,
    /// Web browser UI
    Web,
    /// Headless (for testing/automation)
    Headless,
    /// Custom surface type
    Custom(String),
}

impl SurfaceType {
    /// Human-readable name
    pub fn name(&self) -> &str {
        match self {
            Self::Tui => "Terminal",
            Self::Web => "Web",
            Self::Headless => "Headless",
            Self::Custom(name) => name,
        }
    }
}

/// Capabilities that a surface can support
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SurfaceCapabilities {
    /// Can display colored text
    pub color: bool,
    /// Can display the image carousel
    pub carousel: bool,
    /// Can display the decorative particle field
    pub particles: bool,
    /// Can handle keyboard input
    pub keyboard_input: bool,
    /// Can handle mouse/touch input
    pub pointer_input: bool,
}

impl SurfaceCapabilities {
    /// Create capabilities for a standard TUI
    pub fn tui() -> Self {
        Self {
            color: true,
            carousel: true,
            particles: true,
            keyboard_input: true,
            pointer_input: false,
        }
    }

    /// Create minimal capabilities for headless/testing
    pub fn headless() -> Self {
        Self {
            color: false,
            carousel: false,
            particles: false,
            keyboard_input: true,
            pointer_input: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_unique() {
        let id1 = SurfaceEvent::new_event_id();
        let id2 = SurfaceEvent::new_event_id();
        assert_ne!(id1.0, id2.0);
    }

    #[test]
    fn test_event_id_accessor() {
        let event = SurfaceEvent::LandingRequested {
            event_id: EventId("evt_test".to_string()),
        };
        assert_eq!(event.event_id().0, "evt_test");
    }

    #[test]
    fn test_surface_capabilities_tui() {
        let caps = SurfaceCapabilities::tui();
        assert!(caps.color);
        assert!(caps.carousel);
        assert!(caps.particles);
        assert!(!caps.pointer_input);
    }

    #[test]
    fn test_surface_type_name() {
        assert_eq!(SurfaceType::Tui.name(), "Terminal");
        assert_eq!(SurfaceType::Custom("Kiosk".to_string()).name(), "Kiosk");
    }
}
