//! Integration Tests for the TUI + Clinic
//!
//! These tests verify the full interaction flow between a surface and the
//! Clinic, using a mock responder backend in place of the timed keyword
//! responder.
//!
//! # Test Coverage
//!
//! 1. **Startup Flow**: Clinic starts, surface connects, landing shown
//! 2. **Auth Journeys**: patient login, doctor passcode gate, admin
//!    credential check, signup field visibility
//! 3. **Chat Exchange**: utterance in, composing indicator, reply out,
//!    re-entrancy while composing
//! 4. **Booking Flow**: booking recorded, doctor confirms it
//! 5. **Session Invariant**: a session exists iff a dashboard is shown

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use clinic_core::{
    AuthForm, BookingForm, BotReply, ChatSpeaker, Clinic, ClinicConfig, ClinicMessage,
    DashboardTab, PendingReply, ResponderBackend, Role, SurfaceCapabilities, SurfaceEvent,
    SurfaceType, View, OTP_CODE,
};

// ============================================================================
// Configurable Mock Responder
// ============================================================================

/// A configurable mock responder for integration testing
///
/// Unlike the timed production responder, this one:
/// - Tracks the number of utterances received
/// - Replies instantly, or holds the reply forever when configured
struct IntegrationMockResponder {
    /// Count of utterances received
    utterance_count: Arc<AtomicUsize>,
    /// Hold every reply forever (composing never finishes)
    hold_replies: bool,
}

impl IntegrationMockResponder {
    fn instant() -> Self {
        Self {
            utterance_count: Arc::new(AtomicUsize::new(0)),
            hold_replies: false,
        }
    }

    fn holding() -> Self {
        Self {
            utterance_count: Arc::new(AtomicUsize::new(0)),
            hold_replies: true,
        }
    }

    fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.utterance_count)
    }
}

#[async_trait]
impl ResponderBackend for IntegrationMockResponder {
    fn name(&self) -> &str {
        "integration-mock"
    }

    async fn respond(&self, utterance: &str) -> PendingReply {
        self.utterance_count.fetch_add(1, Ordering::SeqCst);

        if self.hold_replies {
            let (tx, rx) = mpsc::channel(1);
            let task = tokio::spawn(async move {
                // Keep the sender alive until the receiver is dropped
                tx.closed().await;
            });
            PendingReply::new(rx, Some(task))
        } else {
            PendingReply::ready(BotReply {
                text: format!("echo: {utterance}"),
            })
        }
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    clinic: Clinic<IntegrationMockResponder>,
    rx: mpsc::Receiver<ClinicMessage>,
}

impl Harness {
    async fn new(responder: IntegrationMockResponder) -> Self {
        let (tx, rx) = mpsc::channel(200);
        let mut clinic = Clinic::new(responder, ClinicConfig::default(), tx);

        clinic.start().await.unwrap();
        clinic
            .handle_event(SurfaceEvent::Connected {
                event_id: SurfaceEvent::new_event_id(),
                surface_type: SurfaceType::Headless,
                capabilities: SurfaceCapabilities::headless(),
            })
            .await
            .unwrap();

        Self { clinic, rx }
    }

    async fn send(&mut self, event: SurfaceEvent) {
        self.clinic.handle_event(event).await.unwrap();
    }

    fn drain(&mut self) -> Vec<ClinicMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    async fn login_as_patient(&mut self) {
        self.send(SurfaceEvent::AuthRequested {
            event_id: SurfaceEvent::new_event_id(),
            role: Role::Patient,
        })
        .await;
        self.send(SurfaceEvent::AuthSubmitted {
            event_id: SurfaceEvent::new_event_id(),
            form: AuthForm {
                email: "asha@example.com".to_string(),
                password: "secret".to_string(),
                ..AuthForm::default()
            },
        })
        .await;
    }
}

fn shows_view(messages: &[ClinicMessage], view: View) -> bool {
    messages
        .iter()
        .any(|m| matches!(m, ClinicMessage::ShowView { view: v } if *v == view))
}

// ============================================================================
// Startup
// ============================================================================

#[tokio::test]
async fn startup_shows_landing_to_the_connected_surface() {
    let mut harness = Harness::new(IntegrationMockResponder::instant()).await;

    let messages = harness.drain();
    assert!(shows_view(&messages, View::Landing));
    assert!(harness.clinic.current_user().is_none());
}

// ============================================================================
// Auth journeys
// ============================================================================

#[tokio::test]
async fn patient_login_journey_lands_on_dashboard() {
    let mut harness = Harness::new(IntegrationMockResponder::instant()).await;
    harness.drain();

    harness.login_as_patient().await;

    let messages = harness.drain();
    assert!(shows_view(&messages, View::PatientDashboard));
    assert!(messages.iter().any(|m| matches!(
        m,
        ClinicMessage::TabShown {
            tab: DashboardTab::Overview,
            ..
        }
    )));
    assert!(messages
        .iter()
        .any(|m| matches!(m, ClinicMessage::IdentityUpdated { name, .. } if name == "asha")));
}

#[tokio::test]
async fn doctor_login_journey_passes_the_passcode_gate() {
    let mut harness = Harness::new(IntegrationMockResponder::instant()).await;

    harness
        .send(SurfaceEvent::AuthRequested {
            event_id: SurfaceEvent::new_event_id(),
            role: Role::Doctor,
        })
        .await;
    harness
        .send(SurfaceEvent::AuthSubmitted {
            event_id: SurfaceEvent::new_event_id(),
            form: AuthForm {
                email: "priya@example.com".to_string(),
                password: "secret".to_string(),
                ..AuthForm::default()
            },
        })
        .await;

    let messages = harness.drain();
    assert!(messages
        .iter()
        .any(|m| matches!(m, ClinicMessage::OtpPromptOpened)));
    assert!(!shows_view(&messages, View::DoctorDashboard));
    assert!(harness.clinic.current_user().is_none());

    harness
        .send(SurfaceEvent::OtpSubmitted {
            event_id: SurfaceEvent::new_event_id(),
            code: OTP_CODE.to_string(),
        })
        .await;

    let messages = harness.drain();
    assert!(messages
        .iter()
        .any(|m| matches!(m, ClinicMessage::OtpPromptClosed)));
    assert!(shows_view(&messages, View::DoctorDashboard));
    assert_eq!(harness.clinic.current_user().unwrap().role, Role::Doctor);
}

#[tokio::test]
async fn admin_journey_rejects_wrong_credential_in_signup_too() {
    let mut harness = Harness::new(IntegrationMockResponder::instant()).await;

    harness
        .send(SurfaceEvent::AuthRequested {
            event_id: SurfaceEvent::new_event_id(),
            role: Role::Admin,
        })
        .await;

    // The toggle is hidden for admin; a stray toggle event changes nothing
    harness
        .send(SurfaceEvent::AuthModeToggled {
            event_id: SurfaceEvent::new_event_id(),
        })
        .await;

    harness
        .send(SurfaceEvent::AuthSubmitted {
            event_id: SurfaceEvent::new_event_id(),
            form: AuthForm {
                email: "admin@ayurvedaclinic.com".to_string(),
                password: "letmein".to_string(),
                ..AuthForm::default()
            },
        })
        .await;

    let messages = harness.drain();
    assert!(messages.iter().any(|m| matches!(
        m,
        ClinicMessage::AuthError { message } if message.contains("Invalid admin credentials")
    )));
    assert!(harness.clinic.current_user().is_none());
}

#[tokio::test]
async fn signup_layout_recomputes_on_toggle() {
    let mut harness = Harness::new(IntegrationMockResponder::instant()).await;

    harness
        .send(SurfaceEvent::AuthRequested {
            event_id: SurfaceEvent::new_event_id(),
            role: Role::Patient,
        })
        .await;
    harness.drain();

    harness
        .send(SurfaceEvent::AuthModeToggled {
            event_id: SurfaceEvent::new_event_id(),
        })
        .await;

    let messages = harness.drain();
    let layout = messages.iter().find_map(|m| match m {
        ClinicMessage::AuthFormLayout { visible_fields, .. } => Some(visible_fields.clone()),
        _ => None,
    });
    let fields = layout.expect("layout resent after toggle");
    assert_eq!(fields.len(), 3, "name, confirm password, phone: {fields:?}");
}

// ============================================================================
// Chat exchange
// ============================================================================

#[tokio::test]
async fn chat_round_trip_with_composing_indicator() {
    let mut harness = Harness::new(IntegrationMockResponder::instant()).await;
    harness.drain();

    harness
        .send(SurfaceEvent::ChatMessageSent {
            event_id: SurfaceEvent::new_event_id(),
            content: "namaste".to_string(),
        })
        .await;

    let messages = harness.drain();
    assert!(messages.iter().any(|m| matches!(
        m,
        ClinicMessage::ChatMessage {
            speaker: ChatSpeaker::Visitor,
            ..
        }
    )));
    assert!(messages
        .iter()
        .any(|m| matches!(m, ClinicMessage::ChatComposing { active: true })));

    assert!(harness.clinic.poll_reply().await);

    let messages = harness.drain();
    assert!(messages
        .iter()
        .any(|m| matches!(m, ClinicMessage::ChatComposing { active: false })));
    assert!(messages.iter().any(|m| matches!(
        m,
        ClinicMessage::ChatMessage {
            speaker: ChatSpeaker::Assistant,
            text,
            ..
        } if text == "echo: namaste"
    )));
}

#[tokio::test]
async fn chat_rejects_input_while_composing() {
    let responder = IntegrationMockResponder::holding();
    let counter = responder.counter();
    let mut harness = Harness::new(responder).await;
    harness.drain();

    harness
        .send(SurfaceEvent::ChatMessageSent {
            event_id: SurfaceEvent::new_event_id(),
            content: "first".to_string(),
        })
        .await;
    assert_eq!(harness.clinic.transcript().len(), 1);

    // The reply is held; further sends must be dropped at the boundary
    for content in ["second", "third"] {
        harness
            .send(SurfaceEvent::ChatMessageSent {
                event_id: SurfaceEvent::new_event_id(),
                content: content.to_string(),
            })
            .await;
    }

    assert_eq!(harness.clinic.transcript().len(), 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(!harness.clinic.poll_reply().await);
}

#[tokio::test]
async fn quick_question_behaves_like_a_typed_send() {
    let mut harness = Harness::new(IntegrationMockResponder::instant()).await;
    harness.drain();

    harness
        .send(SurfaceEvent::QuickQuestionClicked {
            event_id: SurfaceEvent::new_event_id(),
            question: "What is Ayurveda?".to_string(),
        })
        .await;

    assert_eq!(harness.clinic.transcript().len(), 1);
    assert_eq!(harness.clinic.transcript().entries()[0].text, "What is Ayurveda?");
}

// ============================================================================
// Booking flow
// ============================================================================

#[tokio::test]
async fn booking_recorded_then_confirmed_by_doctor() {
    let mut harness = Harness::new(IntegrationMockResponder::instant()).await;
    harness.login_as_patient().await;
    harness.drain();

    let tomorrow = chrono::Local::now().date_naive() + chrono::Days::new(1);
    harness
        .send(SurfaceEvent::BookingSubmitted {
            event_id: SurfaceEvent::new_event_id(),
            form: BookingForm {
                doctor: "Dr. Priya Sharma".to_string(),
                appointment_type: "Consultation".to_string(),
                date: tomorrow.format("%Y-%m-%d").to_string(),
                time: "10:30".to_string(),
                symptoms: "Poor sleep".to_string(),
            },
        })
        .await;

    let messages = harness.drain();
    let appointment = messages
        .iter()
        .find_map(|m| match m {
            ClinicMessage::AppointmentRecorded { appointment } => Some(appointment.clone()),
            _ => None,
        })
        .expect("booking recorded");
    assert_eq!(appointment.patient, "asha");

    harness
        .send(SurfaceEvent::AppointmentConfirmed {
            event_id: SurfaceEvent::new_event_id(),
            id: appointment.id,
        })
        .await;

    let messages = harness.drain();
    assert!(messages.iter().any(|m| matches!(
        m,
        ClinicMessage::AppointmentStatusChanged {
            status: clinic_core::AppointmentStatus::Confirmed,
            ..
        }
    )));
}

// ============================================================================
// Session invariant
// ============================================================================

#[tokio::test]
async fn session_exists_iff_a_dashboard_is_shown() {
    let mut harness = Harness::new(IntegrationMockResponder::instant()).await;

    // Landing: no session
    assert_eq!(harness.clinic.active_view(), View::Landing);
    assert!(harness.clinic.current_user().is_none());

    // Auth screen: still no session
    harness
        .send(SurfaceEvent::AuthRequested {
            event_id: SurfaceEvent::new_event_id(),
            role: Role::Patient,
        })
        .await;
    assert!(harness.clinic.current_user().is_none());

    // Dashboard: session exists
    harness.login_as_patient().await;
    assert!(harness.clinic.active_view().is_dashboard());
    assert!(harness.clinic.current_user().is_some());

    // Back to landing: cleared atomically
    harness
        .send(SurfaceEvent::LandingRequested {
            event_id: SurfaceEvent::new_event_id(),
        })
        .await;
    assert_eq!(harness.clinic.active_view(), View::Landing);
    assert!(harness.clinic.current_user().is_none());
}

#[tokio::test]
async fn quit_aborts_a_held_reply() {
    let mut harness = Harness::new(IntegrationMockResponder::holding()).await;
    harness.drain();

    harness
        .send(SurfaceEvent::ChatMessageSent {
            event_id: SurfaceEvent::new_event_id(),
            content: "hello".to_string(),
        })
        .await;
    assert!(harness.clinic.is_composing());

    harness
        .send(SurfaceEvent::QuitRequested {
            event_id: SurfaceEvent::new_event_id(),
        })
        .await;

    assert!(!harness.clinic.is_composing());
    let messages = harness.drain();
    assert!(messages
        .iter()
        .any(|m| matches!(m, ClinicMessage::Quit { .. })));

    // Give the aborted task a moment to unwind
    tokio::time::sleep(Duration::from_millis(10)).await;
}
