//! Clinic Messages
//!
//! Messages sent from the front-desk core to UI surfaces. These represent all
//! the ways the orchestration layer can communicate with any connected UI
//! (TUI, web page, test harness, etc.).
//!
//! # Design Philosophy
//!
//! The core is the "front desk" that owns sessions, screens, the auth flow,
//! and the chat assistant. UI surfaces are pure renderers that display what
//! the core tells them to. This separation enables:
//!
//! - Hot-swappable UI surfaces
//! - Headless operation for testing
//! - Clean separation of decision logic from rendering

use serde::{Deserialize, Serialize};

use crate::auth::{AuthField, AuthMode};
use crate::booking::{Appointment, AppointmentId, AppointmentStatus};
use crate::session::{Role, UserProfile};
use crate::view::{DashboardTab, View};

/// Messages from the clinic core to a UI surface
///
/// These messages tell the UI what to display and how to behave.
/// The UI should not have any business logic - just render what it's told.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ClinicMessage {
    // ============================================
    // Screen Directives
    // ============================================
    /// Switch the single visible screen
    ShowView {
        /// The view that is now active
        view: View,
    },

    /// A dashboard tab became active
    TabShown {
        /// The dashboard the tab belongs to
        view: View,
        /// The tab that is now active
        tab: DashboardTab,
    },

    // ============================================
    // Auth Form Directives
    // ============================================
    /// Full auth form layout for the current (role, mode) pair
    ///
    /// Sent whenever the role or mode changes. The visible optional fields
    /// are always recomputed from scratch, never patched incrementally.
    AuthFormLayout {
        /// Role the auth attempt targets
        role: Role,
        /// Login or signup
        mode: AuthMode,
        /// Optional fields that should be visible
        visible_fields: Vec<AuthField>,
        /// Whether the login/signup toggle control is shown
        toggle_visible: bool,
    },

    /// Display the joined validation error message
    AuthError {
        /// Human-readable, comma-joined error text
        message: String,
    },

    /// Clear any visible auth error
    AuthErrorCleared,

    /// Open the one-time-passcode prompt
    OtpPromptOpened,

    /// Close the one-time-passcode prompt
    OtpPromptClosed,

    /// Display an inline passcode failure
    OtpError {
        /// The fixed retry instruction
        message: String,
    },

    // ============================================
    // Session Directives
    // ============================================
    /// A session was created; the user is logged in
    SessionStarted {
        /// The authenticated identity
        user: UserProfile,
    },

    /// The session was cleared
    SessionEnded,

    /// Refresh the header identity display
    IdentityUpdated {
        /// Display name
        name: String,
        /// Email, or specialization for doctors
        detail: String,
        /// Uppercase avatar initial
        initial: char,
    },

    // ============================================
    // Chat Directives
    // ============================================
    /// Append one entry to the chat transcript
    ChatMessage {
        /// Unique message ID for tracking
        id: MessageId,
        /// Who said it
        speaker: ChatSpeaker,
        /// The text to display
        text: String,
    },

    /// Show or hide the "assistant is composing" indicator
    ChatComposing {
        /// Whether the indicator should be visible
        active: bool,
    },

    /// Show or hide the quick-question strip
    QuickQuestionsShown {
        /// Whether the strip should be visible
        visible: bool,
    },

    // ============================================
    // Booking Directives
    // ============================================
    /// A booking was accepted and recorded
    AppointmentRecorded {
        /// The recorded appointment
        appointment: Appointment,
    },

    /// An appointment changed status (confirmed/cancelled)
    AppointmentStatusChanged {
        /// The appointment that changed
        id: AppointmentId,
        /// Its new status
        status: AppointmentStatus,
    },

    // ============================================
    // System Messages
    // ============================================
    /// User-visible notification (booking confirmations, refusals, ...)
    Notify {
        /// Notification level
        level: NotifyLevel,
        /// Message content
        message: String,
    },

    /// Core lifecycle state change
    State {
        /// The new state
        state: ClinicState,
    },

    /// Acknowledgment of a received event
    Ack {
        /// Event ID being acknowledged
        event_id: EventId,
    },

    /// Request the surface to quit
    Quit {
        /// Optional goodbye message
        message: Option<String>,
    },
}

/// Message identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    /// Generate a new unique message ID
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        Self(format!("msg_{id}"))
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

/// Event identifier (for acks)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

/// Who authored a chat transcript entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatSpeaker {
    /// The person typing into the widget
    Visitor,
    /// The rule-based assistant
    Assistant,
}

impl ChatSpeaker {
    /// Transcript prefix for this speaker
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Visitor => "You: ",
            Self::Assistant => "AyurBot: ",
        }
    }
}

/// Notification levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
    /// Success
    Success,
}

/// Core lifecycle states
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClinicState {
    /// Starting up, not ready
    Initializing,
    /// Ready for input
    Ready,
    /// Shutting down
    ShuttingDown,
}

impl ClinicState {
    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Initializing => "Starting up...",
            Self::Ready => "Ready",
            Self::ShuttingDown => "Shutting down...",
        }
    }
}
