//! Clinic Client
//!
//! Thin wrapper around the Clinic for TUI integration.
//! This client embeds the Clinic directly (no network) and provides a
//! convenient interface for sending events and receiving messages.
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it doesn't contain any business logic.
//! All orchestration happens in the Clinic. The TUI's job is:
//! 1. Convert terminal events to SurfaceEvents
//! 2. Send SurfaceEvents to the Clinic
//! 3. Receive ClinicMessages
//! 4. Render display state based on messages

use tokio::sync::mpsc;

use clinic_core::{
    booking::{AppointmentId, BookingForm},
    config::load_config,
    Clinic, ClinicMessage, ClinicState, Role, RuleResponder, SurfaceCapabilities, SurfaceEvent,
    SurfaceType,
};

/// Client for communicating with the embedded Clinic
pub struct ClinicClient {
    /// The embedded Clinic instance
    clinic: Clinic<RuleResponder>,
    /// Receiver for messages from the Clinic
    rx: mpsc::Receiver<ClinicMessage>,
}

impl ClinicClient {
    /// Create a new ClinicClient with an embedded Clinic
    pub fn new() -> Self {
        // Channel for Clinic -> TUI messages
        let (tx, rx) = mpsc::channel(100);

        // Config: defaults, then file, then environment
        let config = load_config();

        // The production keyword responder with the configured delay
        let responder =
            RuleResponder::new(config.composing_delay_min_ms, config.composing_delay_max_ms);

        let clinic = Clinic::new(responder, config, tx);

        Self { clinic, rx }
    }

    /// Start the Clinic
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.clinic.start().await
    }

    /// Connect this surface to the Clinic
    pub async fn connect(&mut self) -> anyhow::Result<()> {
        let event = SurfaceEvent::Connected {
            event_id: SurfaceEvent::new_event_id(),
            surface_type: SurfaceType::Tui,
            capabilities: SurfaceCapabilities::tui(),
        };
        self.clinic.handle_event(event).await
    }

    /// Navigate to the landing screen
    pub async fn go_landing(&mut self) -> anyhow::Result<()> {
        let event = SurfaceEvent::LandingRequested {
            event_id: SurfaceEvent::new_event_id(),
        };
        self.clinic.handle_event(event).await
    }

    /// Open the auth screen for a role
    pub async fn request_auth(&mut self, role: Role) -> anyhow::Result<()> {
        let event = SurfaceEvent::AuthRequested {
            event_id: SurfaceEvent::new_event_id(),
            role,
        };
        self.clinic.handle_event(event).await
    }

    /// Toggle login ⇄ signup
    pub async fn toggle_auth_mode(&mut self) -> anyhow::Result<()> {
        let event = SurfaceEvent::AuthModeToggled {
            event_id: SurfaceEvent::new_event_id(),
        };
        self.clinic.handle_event(event).await
    }

    /// Submit the auth form
    pub async fn submit_auth(&mut self, form: clinic_core::AuthForm) -> anyhow::Result<()> {
        let event = SurfaceEvent::AuthSubmitted {
            event_id: SurfaceEvent::new_event_id(),
            form,
        };
        self.clinic.handle_event(event).await
    }

    /// Submit a one-time-passcode
    pub async fn submit_otp(&mut self, code: String) -> anyhow::Result<()> {
        let event = SurfaceEvent::OtpSubmitted {
            event_id: SurfaceEvent::new_event_id(),
            code,
        };
        self.clinic.handle_event(event).await
    }

    /// Dismiss the passcode prompt
    pub async fn cancel_otp(&mut self) -> anyhow::Result<()> {
        let event = SurfaceEvent::OtpCancelled {
            event_id: SurfaceEvent::new_event_id(),
        };
        self.clinic.handle_event(event).await
    }

    /// Request logout
    pub async fn logout(&mut self) -> anyhow::Result<()> {
        let event = SurfaceEvent::LogoutRequested {
            event_id: SurfaceEvent::new_event_id(),
        };
        self.clinic.handle_event(event).await
    }

    /// Select a dashboard tab
    pub async fn select_tab(&mut self, tab: clinic_core::DashboardTab) -> anyhow::Result<()> {
        let event = SurfaceEvent::TabSelected {
            event_id: SurfaceEvent::new_event_id(),
            tab,
        };
        self.clinic.handle_event(event).await
    }

    /// Open or close the chat widget
    pub async fn set_chat_open(&mut self, open: bool) -> anyhow::Result<()> {
        let event_id = SurfaceEvent::new_event_id();
        let event = if open {
            SurfaceEvent::ChatOpened { event_id }
        } else {
            SurfaceEvent::ChatClosed { event_id }
        };
        self.clinic.handle_event(event).await
    }

    /// Send a chat utterance
    pub async fn send_chat(&mut self, content: String) -> anyhow::Result<()> {
        let event = SurfaceEvent::ChatMessageSent {
            event_id: SurfaceEvent::new_event_id(),
            content,
        };
        self.clinic.handle_event(event).await
    }

    /// Click a quick question
    pub async fn quick_question(&mut self, question: String) -> anyhow::Result<()> {
        let event = SurfaceEvent::QuickQuestionClicked {
            event_id: SurfaceEvent::new_event_id(),
            question,
        };
        self.clinic.handle_event(event).await
    }

    /// Submit the booking form
    pub async fn submit_booking(&mut self, form: BookingForm) -> anyhow::Result<()> {
        let event = SurfaceEvent::BookingSubmitted {
            event_id: SurfaceEvent::new_event_id(),
            form,
        };
        self.clinic.handle_event(event).await
    }

    /// Confirm an appointment
    pub async fn confirm_appointment(&mut self, id: AppointmentId) -> anyhow::Result<()> {
        let event = SurfaceEvent::AppointmentConfirmed {
            event_id: SurfaceEvent::new_event_id(),
            id,
        };
        self.clinic.handle_event(event).await
    }

    /// Cancel an appointment
    pub async fn cancel_appointment(&mut self, id: AppointmentId) -> anyhow::Result<()> {
        let event = SurfaceEvent::AppointmentCancelled {
            event_id: SurfaceEvent::new_event_id(),
            id,
        };
        self.clinic.handle_event(event).await
    }

    /// Notify the Clinic that the user wants to quit
    pub async fn request_quit(&mut self) -> anyhow::Result<()> {
        let event = SurfaceEvent::QuitRequested {
            event_id: SurfaceEvent::new_event_id(),
        };
        self.clinic.handle_event(event).await
    }

    /// Poll for a scheduled chat reply (must be called regularly)
    pub async fn poll_reply(&mut self) -> bool {
        self.clinic.poll_reply().await
    }

    /// Receive all pending messages from the Clinic (non-blocking)
    pub fn recv_all(&mut self) -> Vec<ClinicMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Get the current Clinic state
    pub fn state(&self) -> ClinicState {
        self.clinic.state()
    }

    /// Get the effective configuration
    pub fn config(&self) -> &clinic_core::ClinicConfig {
        self.clinic.config()
    }

    /// Snapshot of the appointment ledger for rendering
    pub fn appointments(&self) -> Vec<clinic_core::Appointment> {
        self.clinic.ledger().all().to_vec()
    }

    /// Send a raw surface event to the Clinic
    pub async fn send_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        self.clinic.handle_event(event).await
    }
}

impl Default for ClinicClient {
    fn default() -> Self {
        Self::new()
    }
}
