//! Clinic - The Front-Desk Orchestration Core
//!
//! The `Clinic` is the "front desk" of the app. It orchestrates:
//! - Screen switching and dashboard tab selection
//! - The mock auth flow, including the doctor passcode challenge
//! - The single in-memory session
//! - The rule-based chat assistant and its composing delay
//! - The appointment ledger
//!
//! # Design Philosophy
//!
//! The Clinic is UI-agnostic. It doesn't know or care whether it's talking
//! to a TUI, a web page, or a test harness. It communicates through:
//! - `ClinicMessage`: directives sent TO the UI surface
//! - `SurfaceEvent`: events received FROM the UI surface
//!
//! Every event is handled synchronously to completion; the only deferred
//! work is the chat composing delay, polled via [`Clinic::poll_reply`].

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::auth::{AuthFlow, ChallengeOutcome, SubmitOutcome};
use crate::booking::{
    validate_booking, AppointmentLedger, AppointmentStatus, BookingForm, BOOKING_CONFIRMED,
};
use crate::chat::{ChatTranscript, PendingReply, ReplyPoll, ResponderBackend};
use crate::events::{SurfaceCapabilities, SurfaceEvent, SurfaceType};
use crate::messages::{ChatSpeaker, ClinicMessage, ClinicState, EventId, NotifyLevel};
use crate::session::{LoginData, Role, SessionState};
use crate::view::{View, ViewRouter};

/// Clinic configuration
#[derive(Clone, Debug)]
pub struct ClinicConfig {
    /// Lower bound of the composing delay, inclusive (ms)
    pub composing_delay_min_ms: u64,
    /// Upper bound of the composing delay, exclusive (ms)
    pub composing_delay_max_ms: u64,
    /// Carousel auto-advance period (ms)
    pub carousel_interval_ms: u64,
    /// Number of carousel slides
    pub carousel_slide_count: usize,
    /// Number of decorative particles
    pub particle_count: usize,
    /// Maximum chat transcript entries to keep (0 = unlimited)
    pub max_transcript_entries: usize,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            composing_delay_min_ms: 1000,
            composing_delay_max_ms: 3000,
            carousel_interval_ms: 4000,
            carousel_slide_count: 3,
            particle_count: 20,
            max_transcript_entries: 200,
        }
    }
}

impl ClinicConfig {
    /// Create configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            composing_delay_min_ms: env_u64(
                "CLINIC_COMPOSING_MIN_MS",
                defaults.composing_delay_min_ms,
            ),
            composing_delay_max_ms: env_u64(
                "CLINIC_COMPOSING_MAX_MS",
                defaults.composing_delay_max_ms,
            ),
            carousel_interval_ms: env_u64("CLINIC_CAROUSEL_MS", defaults.carousel_interval_ms),
            carousel_slide_count: env_usize("CLINIC_CAROUSEL_SLIDES", defaults.carousel_slide_count),
            particle_count: env_usize("CLINIC_PARTICLES", defaults.particle_count),
            max_transcript_entries: env_usize(
                "CLINIC_MAX_TRANSCRIPT",
                defaults.max_transcript_entries,
            ),
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// The Clinic - headless orchestration core
pub struct Clinic<B: ResponderBackend> {
    /// Configuration
    config: ClinicConfig,
    /// Chat responder backend
    responder: Arc<B>,
    /// The single session
    session: SessionState,
    /// The one visible view
    router: ViewRouter,
    /// In-progress auth attempt, present while the auth screen is relevant
    auth: Option<AuthFlow>,
    /// Chat transcript
    transcript: ChatTranscript,
    /// Whether the chat widget is open
    chat_open: bool,
    /// Appointment ledger
    ledger: AppointmentLedger,
    /// Current operational state
    state: ClinicState,
    /// Channel to send messages to the UI surface
    tx: mpsc::Sender<ClinicMessage>,
    /// Connected surface info
    surface_type: Option<SurfaceType>,
    surface_capabilities: Option<SurfaceCapabilities>,
    /// The single outstanding scheduled chat reply, if any
    pending_reply: Option<PendingReply>,
}

impl<B: ResponderBackend + 'static> Clinic<B> {
    /// Create a new Clinic with the given responder backend
    pub fn new(responder: B, config: ClinicConfig, tx: mpsc::Sender<ClinicMessage>) -> Self {
        let transcript = ChatTranscript::with_limit(config.max_transcript_entries);
        let today = chrono::Local::now().date_naive();

        Self {
            config,
            responder: Arc::new(responder),
            session: SessionState::new(),
            router: ViewRouter::new(),
            auth: None,
            transcript,
            chat_open: false,
            ledger: AppointmentLedger::with_demo_entries(today),
            state: ClinicState::Initializing,
            tx,
            surface_type: None,
            surface_capabilities: None,
            pending_reply: None,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &ClinicConfig {
        &self.config
    }

    /// Get current state
    pub fn state(&self) -> ClinicState {
        self.state
    }

    /// The currently visible view
    pub fn active_view(&self) -> View {
        self.router.active()
    }

    /// The authenticated identity, if any
    pub fn current_user(&self) -> Option<&crate::session::UserProfile> {
        self.session.current()
    }

    /// The chat transcript
    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    /// The appointment ledger
    pub fn ledger(&self) -> &AppointmentLedger {
        &self.ledger
    }

    /// Whether a chat reply is scheduled but not yet visible
    pub fn is_composing(&self) -> bool {
        self.pending_reply.is_some()
    }

    /// Whether the chat widget is open
    pub fn is_chat_open(&self) -> bool {
        self.chat_open
    }

    /// Start the Clinic
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.set_state(ClinicState::Ready).await;
        self.send(ClinicMessage::ShowView {
            view: self.router.active(),
        })
        .await;
        Ok(())
    }

    /// Handle an event from the UI surface
    pub async fn handle_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        match event {
            SurfaceEvent::Connected {
                event_id,
                surface_type,
                capabilities,
            } => {
                self.surface_type = Some(surface_type);
                self.surface_capabilities = Some(capabilities);
                self.ack(event_id).await;

                // Sync the new surface with current state
                self.send(ClinicMessage::State { state: self.state }).await;
                self.send(ClinicMessage::ShowView {
                    view: self.router.active(),
                })
                .await;
                self.refresh_identity().await;
            }

            SurfaceEvent::Disconnected { event_id, .. } => {
                self.surface_type = None;
                self.surface_capabilities = None;
                self.ack(event_id).await;
            }

            SurfaceEvent::LandingRequested { event_id } => {
                self.ack(event_id).await;
                self.return_to_landing().await;
            }

            SurfaceEvent::AuthRequested { event_id, role } => {
                self.ack(event_id).await;

                // A session only lives while a dashboard is visible
                if self.session.is_active() {
                    self.session.logout();
                    self.send(ClinicMessage::SessionEnded).await;
                }

                self.auth = Some(AuthFlow::begin(role));
                let view = self.router.show(View::Auth);
                self.send(ClinicMessage::ShowView { view }).await;
                self.send(ClinicMessage::AuthErrorCleared).await;
                self.send_auth_layout().await;
            }

            SurfaceEvent::AuthModeToggled { event_id } => {
                self.ack(event_id).await;
                match self.auth.as_mut() {
                    Some(flow) => {
                        flow.toggle_mode();
                        self.send_auth_layout().await;
                    }
                    // Stale event from a surface that left the auth screen
                    None => tracing::warn!("auth mode toggled with no auth attempt in progress"),
                }
            }

            SurfaceEvent::AuthSubmitted { event_id, form } => {
                self.ack(event_id).await;
                let Some(flow) = self.auth.as_mut() else {
                    tracing::warn!("auth form submitted with no auth attempt in progress");
                    return Ok(());
                };

                let role = flow.role();
                match flow.submit(form) {
                    SubmitOutcome::Rejected(errors) => {
                        self.send(ClinicMessage::AuthError {
                            message: errors.join(", "),
                        })
                        .await;
                    }
                    SubmitOutcome::ChallengeRequired => {
                        self.send(ClinicMessage::AuthErrorCleared).await;
                        self.send(ClinicMessage::OtpPromptOpened).await;
                    }
                    SubmitOutcome::LoggedIn(data) => {
                        self.send(ClinicMessage::AuthErrorCleared).await;
                        self.complete_login(role, data).await;
                    }
                }
            }

            SurfaceEvent::OtpSubmitted { event_id, code } => {
                self.ack(event_id).await;
                let Some(flow) = self.auth.as_mut() else {
                    tracing::warn!("passcode submitted with no auth attempt in progress");
                    return Ok(());
                };
                if !flow.is_challenge_open() {
                    tracing::warn!("passcode submitted with no open challenge");
                    return Ok(());
                }

                let role = flow.role();
                match flow.verify_code(&code) {
                    ChallengeOutcome::Rejected(message) => {
                        self.send(ClinicMessage::OtpError {
                            message: message.to_string(),
                        })
                        .await;
                    }
                    ChallengeOutcome::LoggedIn(data) => {
                        self.send(ClinicMessage::OtpPromptClosed).await;
                        self.complete_login(role, data).await;
                    }
                }
            }

            SurfaceEvent::OtpCancelled { event_id } => {
                self.ack(event_id).await;
                if let Some(flow) = self.auth.as_mut() {
                    flow.cancel_challenge();
                }
                self.send(ClinicMessage::OtpPromptClosed).await;
            }

            SurfaceEvent::LogoutRequested { event_id } => {
                self.ack(event_id).await;
                self.return_to_landing().await;
            }

            SurfaceEvent::TabSelected { event_id, tab } => {
                self.ack(event_id).await;
                let tab = self.router.select_tab(tab);
                self.send(ClinicMessage::TabShown {
                    view: self.router.active(),
                    tab,
                })
                .await;
            }

            SurfaceEvent::ChatOpened { event_id } => {
                self.ack(event_id).await;
                self.chat_open = true;
                self.send(ClinicMessage::QuickQuestionsShown { visible: true })
                    .await;
            }

            SurfaceEvent::ChatClosed { event_id } => {
                self.ack(event_id).await;
                self.chat_open = false;
            }

            SurfaceEvent::ChatMessageSent { event_id, content } => {
                self.ack(event_id).await;
                self.handle_utterance(&content).await;
            }

            SurfaceEvent::QuickQuestionClicked { event_id, question } => {
                self.ack(event_id).await;
                // A quick question is just its literal text, sent
                self.handle_utterance(&question).await;
            }

            SurfaceEvent::BookingSubmitted { event_id, form } => {
                self.ack(event_id).await;
                self.handle_booking(form).await;
            }

            SurfaceEvent::AppointmentConfirmed { event_id, id } => {
                self.ack(event_id).await;
                self.change_appointment_status(
                    id,
                    AppointmentStatus::Confirmed,
                    "Appointment confirmed successfully!",
                )
                .await;
            }

            SurfaceEvent::AppointmentCancelled { event_id, id } => {
                self.ack(event_id).await;
                self.change_appointment_status(
                    id,
                    AppointmentStatus::Cancelled,
                    "Appointment cancelled successfully!",
                )
                .await;
            }

            SurfaceEvent::QuitRequested { event_id } => {
                self.ack(event_id).await;
                self.shutdown().await?;
            }
        }

        Ok(())
    }

    /// Poll for a scheduled chat reply becoming visible
    ///
    /// Call this regularly from the surface frame loop.
    /// Returns true if there was activity.
    pub async fn poll_reply(&mut self) -> bool {
        let poll = match self.pending_reply.as_mut() {
            Some(pending) => pending.poll(),
            None => return false,
        };

        match poll {
            ReplyPoll::Composing => false,

            ReplyPoll::Ready(reply) => {
                self.pending_reply = None;

                let id = self.transcript.add_assistant(reply.text.clone());
                self.send(ClinicMessage::ChatComposing { active: false })
                    .await;
                self.send(ClinicMessage::ChatMessage {
                    id,
                    speaker: ChatSpeaker::Assistant,
                    text: reply.text,
                })
                .await;
                // The quick questions reappear after every reply
                self.send(ClinicMessage::QuickQuestionsShown { visible: true })
                    .await;
                true
            }

            ReplyPoll::Abandoned => {
                // Only reachable after teardown aborted the producing task
                self.pending_reply = None;
                self.send(ClinicMessage::ChatComposing { active: false })
                    .await;
                true
            }
        }
    }

    /// Shut down the Clinic
    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        self.set_state(ClinicState::ShuttingDown).await;

        // A scheduled reply never outlives the core
        if let Some(mut pending) = self.pending_reply.take() {
            pending.abort();
        }

        self.send(ClinicMessage::Quit {
            message: Some("Stay well!".to_string()),
        })
        .await;

        Ok(())
    }

    /// Accept or reject a chat utterance
    async fn handle_utterance(&mut self, content: &str) {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            // Ignore without touching the transcript
            return;
        }

        if self.pending_reply.is_some() {
            // One outstanding reply at a time; drop the attempt entirely
            tracing::debug!("utterance rejected while composing");
            return;
        }

        let id = self.transcript.add_visitor(trimmed);
        self.send(ClinicMessage::ChatMessage {
            id,
            speaker: ChatSpeaker::Visitor,
            text: trimmed.to_string(),
        })
        .await;
        self.send(ClinicMessage::ChatComposing { active: true })
            .await;

        let pending = self.responder.respond(trimmed).await;
        self.pending_reply = Some(pending);
    }

    /// Validate and record a booking
    async fn handle_booking(&mut self, form: BookingForm) {
        let today = chrono::Local::now().date_naive();

        match validate_booking(&form, today) {
            Err(errors) => {
                self.notify(NotifyLevel::Warning, &errors.join(", ")).await;
            }
            Ok(booking) => {
                let patient = self
                    .session
                    .current()
                    .map(|user| user.name.clone())
                    .unwrap_or_else(|| "Guest".to_string());

                let appointment = self.ledger.record(booking, &patient).clone();
                self.send(ClinicMessage::AppointmentRecorded { appointment })
                    .await;
                self.notify(NotifyLevel::Success, BOOKING_CONFIRMED).await;
            }
        }
    }

    /// Confirm or cancel an appointment
    async fn change_appointment_status(
        &mut self,
        id: crate::booking::AppointmentId,
        status: AppointmentStatus,
        notice: &str,
    ) {
        match self.ledger.set_status(id, status) {
            Ok(_) => {
                self.send(ClinicMessage::AppointmentStatusChanged { id, status })
                    .await;
                self.notify(NotifyLevel::Success, notice).await;
            }
            Err(err) => {
                tracing::warn!(%id, "appointment status change failed: {err}");
                self.notify(NotifyLevel::Error, &err.to_string()).await;
            }
        }
    }

    /// Create the session and land on the role's dashboard
    async fn complete_login(&mut self, role: Role, data: LoginData) {
        let user = self.session.login(role, data).clone();
        self.auth = None;

        let view = self.router.show_dashboard(role);
        self.send(ClinicMessage::ShowView { view }).await;
        self.refresh_identity().await;
        if let Some(tab) = self.router.active_tab() {
            self.send(ClinicMessage::TabShown { view, tab }).await;
        }
        self.send(ClinicMessage::SessionStarted { user }).await;
    }

    /// Clear the session (if any) and show the landing screen
    async fn return_to_landing(&mut self) {
        let had_session = self.session.is_active();
        self.session.logout();
        self.auth = None;

        let view = self.router.show(View::Landing);
        self.send(ClinicMessage::ShowView { view }).await;
        if had_session {
            self.send(ClinicMessage::SessionEnded).await;
        }
    }

    /// Send the full auth form layout for the current (role, mode)
    async fn send_auth_layout(&self) {
        let Some(flow) = self.auth.as_ref() else {
            return;
        };

        self.send(ClinicMessage::AuthFormLayout {
            role: flow.role(),
            mode: flow.mode(),
            visible_fields: flow.visible_fields(),
            toggle_visible: crate::auth::mode_toggle_visible(flow.role()),
        })
        .await;
    }

    /// Refresh the header identity display; no-op without a session
    async fn refresh_identity(&self) {
        let Some(user) = self.session.current() else {
            return;
        };

        self.send(ClinicMessage::IdentityUpdated {
            name: user.name.clone(),
            detail: user.detail().to_string(),
            initial: user.initial(),
        })
        .await;
    }

    /// Set state and notify the UI
    async fn set_state(&mut self, state: ClinicState) {
        self.state = state;
        self.send(ClinicMessage::State { state }).await;
    }

    /// Send acknowledgment
    async fn ack(&self, event_id: EventId) {
        self.send(ClinicMessage::Ack { event_id }).await;
    }

    /// Send notification
    async fn notify(&self, level: NotifyLevel, message: &str) {
        self.send(ClinicMessage::Notify {
            level,
            message: message.to_string(),
        })
        .await;
    }

    /// Send a message to the UI surface
    async fn send(&self, msg: ClinicMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("failed to send message to surface: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthForm, OTP_CODE, OTP_ERROR};
    use crate::chat::{BotReply, FALLBACK};
    use async_trait::async_trait;

    /// Replies instantly with a fixed line
    struct InstantResponder;

    #[async_trait]
    impl ResponderBackend for InstantResponder {
        fn name(&self) -> &str {
            "instant"
        }

        async fn respond(&self, _utterance: &str) -> PendingReply {
            PendingReply::ready(BotReply {
                text: FALLBACK.to_string(),
            })
        }
    }

    /// Never delivers: keeps the composing guard held
    struct NeverResponder;

    #[async_trait]
    impl ResponderBackend for NeverResponder {
        fn name(&self) -> &str {
            "never"
        }

        async fn respond(&self, _utterance: &str) -> PendingReply {
            let (tx, rx) = mpsc::channel(1);
            let task = tokio::spawn(async move {
                // Hold the sender until the receiver goes away
                tx.closed().await;
            });
            PendingReply::new(rx, Some(task))
        }
    }

    fn clinic<B: ResponderBackend + 'static>(
        responder: B,
    ) -> (Clinic<B>, mpsc::Receiver<ClinicMessage>) {
        let (tx, rx) = mpsc::channel(100);
        (Clinic::new(responder, ClinicConfig::default(), tx), rx)
    }

    fn drain(rx: &mut mpsc::Receiver<ClinicMessage>) -> Vec<ClinicMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    async fn event<B: ResponderBackend + 'static>(clinic: &mut Clinic<B>, event: SurfaceEvent) {
        clinic.handle_event(event).await.unwrap();
    }

    fn doctor_login_form() -> AuthForm {
        AuthForm {
            email: "priya@example.com".to_string(),
            password: "secret".to_string(),
            ..AuthForm::default()
        }
    }

    #[tokio::test]
    async fn test_start_announces_ready_and_landing() {
        let (mut clinic, mut rx) = clinic(InstantResponder);
        clinic.start().await.unwrap();

        let messages = drain(&mut rx);
        assert!(messages
            .iter()
            .any(|m| matches!(m, ClinicMessage::State { state: ClinicState::Ready })));
        assert!(messages
            .iter()
            .any(|m| matches!(m, ClinicMessage::ShowView { view: View::Landing })));
    }

    #[tokio::test]
    async fn test_patient_login_creates_session_and_shows_dashboard() {
        let (mut clinic, mut rx) = clinic(InstantResponder);

        event(
            &mut clinic,
            SurfaceEvent::AuthRequested {
                event_id: SurfaceEvent::new_event_id(),
                role: Role::Patient,
            },
        )
        .await;
        event(
            &mut clinic,
            SurfaceEvent::AuthSubmitted {
                event_id: SurfaceEvent::new_event_id(),
                form: AuthForm {
                    email: "asha@example.com".to_string(),
                    password: "secret".to_string(),
                    ..AuthForm::default()
                },
            },
        )
        .await;

        assert_eq!(clinic.active_view(), View::PatientDashboard);
        assert_eq!(clinic.current_user().unwrap().name, "asha");

        let messages = drain(&mut rx);
        assert!(messages.iter().any(|m| matches!(
            m,
            ClinicMessage::ShowView {
                view: View::PatientDashboard
            }
        )));
        assert!(messages
            .iter()
            .any(|m| matches!(m, ClinicMessage::SessionStarted { .. })));
    }

    #[tokio::test]
    async fn test_rejected_submission_produces_visible_error() {
        let (mut clinic, mut rx) = clinic(InstantResponder);

        event(
            &mut clinic,
            SurfaceEvent::AuthRequested {
                event_id: SurfaceEvent::new_event_id(),
                role: Role::Patient,
            },
        )
        .await;
        event(
            &mut clinic,
            SurfaceEvent::AuthSubmitted {
                event_id: SurfaceEvent::new_event_id(),
                form: AuthForm::default(),
            },
        )
        .await;

        assert!(clinic.current_user().is_none());
        assert_eq!(clinic.active_view(), View::Auth);

        let messages = drain(&mut rx);
        let error = messages.iter().find_map(|m| match m {
            ClinicMessage::AuthError { message } => Some(message.clone()),
            _ => None,
        });
        assert_eq!(
            error.as_deref(),
            Some("Email is required, Password is required")
        );
    }

    #[tokio::test]
    async fn test_doctor_login_gated_behind_passcode() {
        let (mut clinic, mut rx) = clinic(InstantResponder);

        event(
            &mut clinic,
            SurfaceEvent::AuthRequested {
                event_id: SurfaceEvent::new_event_id(),
                role: Role::Doctor,
            },
        )
        .await;
        event(
            &mut clinic,
            SurfaceEvent::AuthSubmitted {
                event_id: SurfaceEvent::new_event_id(),
                form: doctor_login_form(),
            },
        )
        .await;

        // No session yet; the prompt is open
        assert!(clinic.current_user().is_none());
        assert!(drain(&mut rx)
            .iter()
            .any(|m| matches!(m, ClinicMessage::OtpPromptOpened)));

        // Wrong code: inline error, prompt stays open, still no session
        event(
            &mut clinic,
            SurfaceEvent::OtpSubmitted {
                event_id: SurfaceEvent::new_event_id(),
                code: "000000".to_string(),
            },
        )
        .await;
        assert!(clinic.current_user().is_none());
        let messages = drain(&mut rx);
        assert!(messages.iter().any(|m| matches!(
            m,
            ClinicMessage::OtpError { message } if message == OTP_ERROR
        )));
        assert!(!messages
            .iter()
            .any(|m| matches!(m, ClinicMessage::OtpPromptClosed)));

        // Correct code: session created, doctor dashboard shown
        event(
            &mut clinic,
            SurfaceEvent::OtpSubmitted {
                event_id: SurfaceEvent::new_event_id(),
                code: OTP_CODE.to_string(),
            },
        )
        .await;
        assert_eq!(clinic.active_view(), View::DoctorDashboard);
        let user = clinic.current_user().unwrap();
        assert_eq!(user.role, Role::Doctor);
        assert_eq!(
            user.specialization.as_deref(),
            Some(crate::session::DEFAULT_SPECIALIZATION)
        );
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_returns_to_landing() {
        let (mut clinic, mut rx) = clinic(InstantResponder);

        event(
            &mut clinic,
            SurfaceEvent::AuthRequested {
                event_id: SurfaceEvent::new_event_id(),
                role: Role::Patient,
            },
        )
        .await;
        event(
            &mut clinic,
            SurfaceEvent::AuthSubmitted {
                event_id: SurfaceEvent::new_event_id(),
                form: AuthForm {
                    email: "asha@example.com".to_string(),
                    password: "secret".to_string(),
                    ..AuthForm::default()
                },
            },
        )
        .await;
        drain(&mut rx);

        event(
            &mut clinic,
            SurfaceEvent::LogoutRequested {
                event_id: SurfaceEvent::new_event_id(),
            },
        )
        .await;

        assert!(clinic.current_user().is_none());
        assert_eq!(clinic.active_view(), View::Landing);

        let messages = drain(&mut rx);
        assert!(messages
            .iter()
            .any(|m| matches!(m, ClinicMessage::ShowView { view: View::Landing })));
        assert!(messages
            .iter()
            .any(|m| matches!(m, ClinicMessage::SessionEnded)));
    }

    #[tokio::test]
    async fn test_utterance_appends_and_composes_then_replies() {
        let (mut clinic, mut rx) = clinic(InstantResponder);

        event(
            &mut clinic,
            SurfaceEvent::ChatMessageSent {
                event_id: SurfaceEvent::new_event_id(),
                content: "zzz unknown".to_string(),
            },
        )
        .await;

        assert_eq!(clinic.transcript().len(), 1);
        assert!(clinic.is_composing());

        assert!(clinic.poll_reply().await);
        assert!(!clinic.is_composing());
        assert_eq!(clinic.transcript().len(), 2);
        assert_eq!(clinic.transcript().entries()[1].text, FALLBACK);

        let messages = drain(&mut rx);
        assert!(messages
            .iter()
            .any(|m| matches!(m, ClinicMessage::ChatComposing { active: true })));
        assert!(messages
            .iter()
            .any(|m| matches!(m, ClinicMessage::ChatComposing { active: false })));
    }

    #[tokio::test]
    async fn test_second_utterance_rejected_while_composing() {
        let (mut clinic, mut rx) = clinic(NeverResponder);

        event(
            &mut clinic,
            SurfaceEvent::ChatMessageSent {
                event_id: SurfaceEvent::new_event_id(),
                content: "hello".to_string(),
            },
        )
        .await;
        assert_eq!(clinic.transcript().len(), 1);
        drain(&mut rx);

        // Second send while the first reply is still composing: no-op
        event(
            &mut clinic,
            SurfaceEvent::ChatMessageSent {
                event_id: SurfaceEvent::new_event_id(),
                content: "anyone there?".to_string(),
            },
        )
        .await;

        assert_eq!(clinic.transcript().len(), 1);
        let messages = drain(&mut rx);
        assert!(!messages
            .iter()
            .any(|m| matches!(m, ClinicMessage::ChatMessage { .. })));
    }

    #[tokio::test]
    async fn test_blank_utterance_silently_ignored() {
        let (mut clinic, _rx) = clinic(InstantResponder);

        event(
            &mut clinic,
            SurfaceEvent::ChatMessageSent {
                event_id: SurfaceEvent::new_event_id(),
                content: "   ".to_string(),
            },
        )
        .await;

        assert!(clinic.transcript().is_empty());
        assert!(!clinic.is_composing());
    }

    #[tokio::test]
    async fn test_quick_question_is_a_literal_send() {
        let (mut clinic, _rx) = clinic(InstantResponder);

        event(
            &mut clinic,
            SurfaceEvent::QuickQuestionClicked {
                event_id: SurfaceEvent::new_event_id(),
                question: "How do I book an appointment?".to_string(),
            },
        )
        .await;

        assert_eq!(clinic.transcript().len(), 1);
        assert_eq!(
            clinic.transcript().entries()[0].text,
            "How do I book an appointment?"
        );
        assert!(clinic.is_composing());
    }

    #[tokio::test]
    async fn test_booking_rejected_then_recorded() {
        let (mut clinic, mut rx) = clinic(InstantResponder);
        let seeded = clinic.ledger().len();

        event(
            &mut clinic,
            SurfaceEvent::BookingSubmitted {
                event_id: SurfaceEvent::new_event_id(),
                form: BookingForm::default(),
            },
        )
        .await;
        assert_eq!(clinic.ledger().len(), seeded);
        assert!(drain(&mut rx).iter().any(|m| matches!(
            m,
            ClinicMessage::Notify {
                level: NotifyLevel::Warning,
                ..
            }
        )));

        let tomorrow = chrono::Local::now().date_naive() + chrono::Days::new(1);
        event(
            &mut clinic,
            SurfaceEvent::BookingSubmitted {
                event_id: SurfaceEvent::new_event_id(),
                form: BookingForm {
                    doctor: "Dr. Priya Sharma".to_string(),
                    appointment_type: "Consultation".to_string(),
                    date: tomorrow.format("%Y-%m-%d").to_string(),
                    time: "10:00".to_string(),
                    symptoms: "Fatigue".to_string(),
                },
            },
        )
        .await;
        assert_eq!(clinic.ledger().len(), seeded + 1);
        assert!(drain(&mut rx)
            .iter()
            .any(|m| matches!(m, ClinicMessage::AppointmentRecorded { .. })));
    }

    #[tokio::test]
    async fn test_appointment_confirmation_flow() {
        let (mut clinic, mut rx) = clinic(InstantResponder);
        let id = clinic.ledger().all()[0].id;

        event(
            &mut clinic,
            SurfaceEvent::AppointmentConfirmed {
                event_id: SurfaceEvent::new_event_id(),
                id,
            },
        )
        .await;

        assert_eq!(
            clinic.ledger().get(id).unwrap().status,
            AppointmentStatus::Confirmed
        );
        assert!(drain(&mut rx).iter().any(|m| matches!(
            m,
            ClinicMessage::AppointmentStatusChanged {
                status: AppointmentStatus::Confirmed,
                ..
            }
        )));
    }

    #[tokio::test]
    async fn test_shutdown_aborts_pending_reply() {
        let (mut clinic, mut rx) = clinic(NeverResponder);

        event(
            &mut clinic,
            SurfaceEvent::ChatMessageSent {
                event_id: SurfaceEvent::new_event_id(),
                content: "hello".to_string(),
            },
        )
        .await;
        assert!(clinic.is_composing());

        clinic.shutdown().await.unwrap();
        assert!(!clinic.is_composing());
        assert_eq!(clinic.state(), ClinicState::ShuttingDown);
        assert!(drain(&mut rx)
            .iter()
            .any(|m| matches!(m, ClinicMessage::Quit { .. })));
    }
}
