//! Display State Types
//!
//! Types that represent the current display state for the TUI.
//! These are derived from ClinicMessages and used for rendering.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client" - it just renders what the Clinic tells it
//! to. Display state is the bridge between ClinicMessages and rendering.

use std::time::Duration;

use clinic_core::{
    Appointment, AppointmentStatus, AuthField, AuthMode, ChatSpeaker, ClinicMessage, ClinicState,
    DashboardTab, MessageId, NotifyLevel, Role, View,
};

/// How long a notification toast stays on screen
const TOAST_LIFETIME: Duration = Duration::from_secs(4);

/// A rendered chat transcript entry
#[derive(Clone, Debug)]
pub struct DisplayChatEntry {
    /// Unique message ID
    pub id: MessageId,
    /// Who said it
    pub speaker: ChatSpeaker,
    /// The text
    pub text: String,
}

/// The auth form layout as last announced by the Clinic
#[derive(Clone, Debug)]
pub struct AuthLayout {
    /// Role the auth attempt targets
    pub role: Role,
    /// Login or signup
    pub mode: AuthMode,
    /// Optional fields that should be visible
    pub visible_fields: Vec<AuthField>,
    /// Whether the login/signup toggle is shown
    pub toggle_visible: bool,
}

/// Identity shown in the dashboard header
#[derive(Clone, Debug)]
pub struct IdentityDisplay {
    /// Display name
    pub name: String,
    /// Email, or specialization for doctors
    pub detail: String,
    /// Uppercase avatar initial
    pub initial: char,
}

/// A transient notification toast
#[derive(Clone, Debug)]
pub struct Toast {
    /// Severity
    pub level: NotifyLevel,
    /// Message text
    pub message: String,
    /// Time on screen so far
    pub age: Duration,
}

/// Display state derived from ClinicMessages
#[derive(Debug)]
pub struct DisplayState {
    /// Core lifecycle state
    pub clinic_state: ClinicState,
    /// The one visible view
    pub view: View,
    /// Auth form layout, if announced
    pub auth: Option<AuthLayout>,
    /// Joined validation error, if visible
    pub auth_error: Option<String>,
    /// Whether the passcode prompt is open
    pub otp_open: bool,
    /// Inline passcode error, if visible
    pub otp_error: Option<String>,
    /// Header identity, while a session exists
    pub identity: Option<IdentityDisplay>,
    /// Active dashboard tab
    pub active_tab: Option<DashboardTab>,
    /// Chat transcript
    pub transcript: Vec<DisplayChatEntry>,
    /// Whether the assistant is composing
    pub composing: bool,
    /// Whether the quick-question strip is visible
    pub quick_questions: bool,
    /// Appointments known to the surface
    pub appointments: Vec<Appointment>,
    /// Active notification toasts
    pub toasts: Vec<Toast>,
    /// Goodbye message from a Quit directive
    pub quit_message: Option<String>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayState {
    /// Create an initial display state
    #[must_use]
    pub fn new() -> Self {
        Self {
            clinic_state: ClinicState::Initializing,
            view: View::Landing,
            auth: None,
            auth_error: None,
            otp_open: false,
            otp_error: None,
            identity: None,
            active_tab: None,
            transcript: Vec::new(),
            composing: false,
            quick_questions: true,
            appointments: Vec::new(),
            toasts: Vec::new(),
            quit_message: None,
        }
    }

    /// Apply a message from the Clinic
    pub fn apply_message(&mut self, msg: ClinicMessage) {
        match msg {
            ClinicMessage::ShowView { view } => {
                self.view = view;
                if view == View::Landing {
                    self.identity = None;
                }
                if view != View::Auth {
                    self.auth = None;
                    self.auth_error = None;
                    self.otp_open = false;
                    self.otp_error = None;
                }
            }

            ClinicMessage::TabShown { tab, .. } => {
                self.active_tab = Some(tab);
            }

            ClinicMessage::AuthFormLayout {
                role,
                mode,
                visible_fields,
                toggle_visible,
            } => {
                self.auth = Some(AuthLayout {
                    role,
                    mode,
                    visible_fields,
                    toggle_visible,
                });
            }

            ClinicMessage::AuthError { message } => {
                self.auth_error = Some(message);
            }

            ClinicMessage::AuthErrorCleared => {
                self.auth_error = None;
            }

            ClinicMessage::OtpPromptOpened => {
                self.otp_open = true;
                self.otp_error = None;
            }

            ClinicMessage::OtpPromptClosed => {
                self.otp_open = false;
                self.otp_error = None;
            }

            ClinicMessage::OtpError { message } => {
                self.otp_error = Some(message);
            }

            ClinicMessage::SessionStarted { .. } | ClinicMessage::SessionEnded => {
                // Identity display is driven by IdentityUpdated/ShowView
            }

            ClinicMessage::IdentityUpdated {
                name,
                detail,
                initial,
            } => {
                self.identity = Some(IdentityDisplay {
                    name,
                    detail,
                    initial,
                });
            }

            ClinicMessage::ChatMessage { id, speaker, text } => {
                self.transcript.push(DisplayChatEntry { id, speaker, text });
            }

            ClinicMessage::ChatComposing { active } => {
                self.composing = active;
            }

            ClinicMessage::QuickQuestionsShown { visible } => {
                self.quick_questions = visible;
            }

            ClinicMessage::AppointmentRecorded { appointment } => {
                self.appointments.push(appointment);
            }

            ClinicMessage::AppointmentStatusChanged { id, status } => {
                if let Some(appointment) = self.appointments.iter_mut().find(|a| a.id == id) {
                    appointment.status = status;
                }
            }

            ClinicMessage::Notify { level, message } => {
                self.toasts.push(Toast {
                    level,
                    message,
                    age: Duration::ZERO,
                });
            }

            ClinicMessage::State { state } => {
                self.clinic_state = state;
            }

            ClinicMessage::Ack { .. } => {
                // Delivery bookkeeping only
            }

            ClinicMessage::Quit { message } => {
                self.quit_message = message;
                self.clinic_state = ClinicState::ShuttingDown;
            }
        }
    }

    /// Advance timers, expiring old toasts
    pub fn update(&mut self, delta: Duration) {
        for toast in &mut self.toasts {
            toast.age += delta;
        }
        self.toasts.retain(|t| t.age < TOAST_LIFETIME);
    }

    /// Appointments that are still awaiting a decision
    #[must_use]
    pub fn pending_appointments(&self) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Pending)
            .collect()
    }
}
