//! Chat Responder
//!
//! The rule-based assistant behind the chat widget. Free text is classified
//! into a topic category by case-insensitive substring matching against an
//! ordered keyword table; the reply is a pseudo-random pick from that
//! category's fixed pool. No natural-language understanding, no network.
//!
//! # Matching contract
//!
//! Rules are evaluated in a fixed priority order and the first rule with any
//! matching keyword wins. The order is observable: an utterance containing
//! keywords from two categories resolves to the earlier one.
//!
//! # Composing delay
//!
//! Accepting an utterance schedules exactly one deferred reply, delivered
//! after a uniform delay in [1000 ms, 3000 ms). The pending receiver is the
//! single-outstanding-reply guard; the spawned task handle is the
//! cancel-on-teardown handle. A scheduled reply always fires unless the
//! whole core is shut down.

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::messages::{ChatSpeaker, MessageId};

/// Fixed chat-topic buckets, in match priority order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseCategory {
    /// Hellos and namastes
    Greeting,
    /// Booking and scheduling
    Appointment,
    /// Ayurveda and treatments in general
    Ayurveda,
    /// The practitioners
    Doctors,
    /// Offered services and therapies
    Services,
    /// Consultation and treatment costs
    Pricing,
    /// Address, phone, and hours
    Contact,
}

impl ResponseCategory {
    /// Human-readable label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Appointment => "appointment",
            Self::Ayurveda => "ayurveda",
            Self::Doctors => "doctors",
            Self::Services => "services",
            Self::Pricing => "pricing",
            Self::Contact => "contact",
        }
    }
}

/// Ordered (category, keywords) rules; first match wins
pub const RULES: &[(ResponseCategory, &[&str])] = &[
    (ResponseCategory::Greeting, &["hello", "hi", "namaste"]),
    (
        ResponseCategory::Appointment,
        &["appointment", "book", "schedule"],
    ),
    (
        ResponseCategory::Ayurveda,
        &["ayurveda", "ayurvedic", "treatment"],
    ),
    (
        ResponseCategory::Doctors,
        &["doctor", "physician", "specialist"],
    ),
    (
        ResponseCategory::Services,
        &["service", "therapy", "panchakarma"],
    ),
    (ResponseCategory::Pricing, &["price", "cost", "fee"]),
    (
        ResponseCategory::Contact,
        &["contact", "address", "phone", "location"],
    ),
];

/// Fixed fallback when no rule matches
pub const FALLBACK: &str = "I understand you're asking about our Ayurvedic services. \
    Could you please be more specific? You can ask about appointments, treatments, \
    doctors, pricing, or contact information.";

/// Quick questions offered by the chat widget
pub const QUICK_QUESTIONS: &[&str] = &[
    "How do I book an appointment?",
    "What is Ayurveda?",
    "What services do you offer?",
    "What are your consultation fees?",
];

/// Classify an utterance into a category by keyword containment
///
/// Case-insensitive; evaluated in [`RULES`] order.
#[must_use]
pub fn classify(utterance: &str) -> Option<ResponseCategory> {
    let lowered = utterance.to_lowercase();
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|(category, _)| *category)
}

/// The reply pool for a category
#[must_use]
pub fn replies(category: ResponseCategory) -> &'static [&'static str] {
    match category {
        ResponseCategory::Greeting => &[
            "Namaste! I'm AyurBot, your Ayurveda assistant. How can I help you today?",
            "Welcome to AyurVeda Clinic! I'm here to help with your queries about our services.",
            "Hello! I'm here to assist you with Ayurvedic wellness and clinic information.",
        ],
        ResponseCategory::Appointment => &[
            "To book an appointment, please log in as a patient and use our booking system. \
             You can select your preferred doctor, date, and time.",
            "Our doctors are available Monday to Friday, 9 AM to 5 PM. You can book \
             consultations, follow-ups, or therapy sessions.",
            "For immediate appointment booking, please use the 'Login as Patient' option \
             in the top right corner.",
        ],
        ResponseCategory::Ayurveda => &[
            "Ayurveda is a 5000-year-old system of natural healing from India. It focuses \
             on balancing mind, body, and consciousness.",
            "Ayurveda uses natural herbs, proper nutrition, and lifestyle practices to \
             promote wellness and treat diseases.",
            "Our clinic specializes in authentic Ayurvedic treatments including Panchakarma, \
             Rasayana therapy, and personalized wellness plans.",
        ],
        ResponseCategory::Doctors => &[
            "We have certified Ayurvedic practitioners specializing in Panchakarma, Rasayana \
             therapy, Ayurvedic nutrition, and Marma therapy.",
            "Dr. Priya Sharma is our Panchakarma specialist, Dr. Rajesh Kumar focuses on \
             Rasayana therapy, and Dr. Anita Patel specializes in Ayurvedic nutrition.",
            "All our doctors are registered Ayurvedic physicians with years of experience \
             in traditional healing methods.",
        ],
        ResponseCategory::Services => &[
            "We offer consultations, Panchakarma treatments, herbal medicine, dietary \
             counseling, and lifestyle guidance.",
            "Our services include Abhyanga (oil massage), Shirodhara, Udvartana, Nasya, \
             and customized herbal formulations.",
            "We provide both preventive and curative treatments for various conditions \
             like stress, digestive issues, joint problems, and more.",
        ],
        ResponseCategory::Pricing => &[
            "Initial consultation starts from \u{20b9}500. Treatment costs vary based on \
             the therapy and duration.",
            "We offer package deals for complete Panchakarma treatments. Please consult \
             with our doctors for personalized pricing.",
            "Insurance coverage may be available for certain treatments. Please check \
             with your provider.",
        ],
        ResponseCategory::Contact => &[
            "You can reach us at admin@ayurvedaclinic.com or call +91 98765 43210.",
            "We're located at 123 Wellness Street, Health City. Open Monday to Friday, \
             9 AM to 5 PM.",
            "For urgent queries, use our appointment booking system or visit the clinic \
             directly.",
        ],
    }
}

/// Pick a reply uniformly from a category's pool
pub fn pick_reply<R: Rng + ?Sized>(category: ResponseCategory, rng: &mut R) -> &'static str {
    let pool = replies(category);
    pool[rng.gen_range(0..pool.len())]
}

/// Classify and pick, falling back to the fixed string on no match
pub fn respond_text<R: Rng + ?Sized>(utterance: &str, rng: &mut R) -> &'static str {
    match classify(utterance) {
        Some(category) => pick_reply(category, rng),
        None => FALLBACK,
    }
}

// ============================================================================
// Transcript
// ============================================================================

/// One chat transcript entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatEntry {
    /// Unique message ID
    pub id: MessageId,
    /// Who said it
    pub speaker: ChatSpeaker,
    /// The text
    pub text: String,
}

/// The ordered chat transcript
#[derive(Clone, Debug, Default)]
pub struct ChatTranscript {
    entries: Vec<ChatEntry>,
    /// Maximum entries to keep (0 = unlimited)
    max_entries: usize,
}

impl ChatTranscript {
    /// Create an unbounded transcript
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transcript that keeps at most `max_entries` entries
    #[must_use]
    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
        }
    }

    /// Append a visitor utterance
    pub fn add_visitor(&mut self, text: impl Into<String>) -> MessageId {
        self.push(ChatSpeaker::Visitor, text.into())
    }

    /// Append an assistant reply
    pub fn add_assistant(&mut self, text: impl Into<String>) -> MessageId {
        self.push(ChatSpeaker::Assistant, text.into())
    }

    fn push(&mut self, speaker: ChatSpeaker, text: String) -> MessageId {
        let entry = ChatEntry {
            id: MessageId::new(),
            speaker,
            text,
        };
        let id = entry.id.clone();
        self.entries.push(entry);

        if self.max_entries > 0 && self.entries.len() > self.max_entries {
            let overflow = self.entries.len() - self.max_entries;
            self.entries.drain(..overflow);
        }

        id
    }

    /// All entries, oldest first
    #[must_use]
    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Responder Backend
// ============================================================================

/// A reply that became visible after the composing delay
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotReply {
    /// The reply text
    pub text: String,
}

/// Poll result for a pending reply
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplyPoll {
    /// Still composing
    Composing,
    /// The reply is ready to display
    Ready(BotReply),
    /// The producing task went away without delivering (teardown)
    Abandoned,
}

/// Handle to the single outstanding scheduled reply
///
/// Holding one of these is the re-entrancy guard: the orchestrator rejects
/// new utterances while a `PendingReply` exists.
#[derive(Debug)]
pub struct PendingReply {
    rx: mpsc::Receiver<BotReply>,
    task: Option<JoinHandle<()>>,
}

impl PendingReply {
    /// Wrap a receiver and its producing task
    #[must_use]
    pub fn new(rx: mpsc::Receiver<BotReply>, task: Option<JoinHandle<()>>) -> Self {
        Self { rx, task }
    }

    /// A reply that is ready immediately (for tests and zero-delay backends)
    #[must_use]
    pub fn ready(reply: BotReply) -> Self {
        let (tx, rx) = mpsc::channel(1);
        // Capacity 1 and the only send: cannot fail
        let _ = tx.try_send(reply);
        Self { rx, task: None }
    }

    /// Check whether the reply has arrived
    pub fn poll(&mut self) -> ReplyPoll {
        match self.rx.try_recv() {
            Ok(reply) => ReplyPoll::Ready(reply),
            Err(mpsc::error::TryRecvError::Empty) => ReplyPoll::Composing,
            Err(mpsc::error::TryRecvError::Disconnected) => ReplyPoll::Abandoned,
        }
    }

    /// Abort the producing task (teardown only)
    pub fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Backend that turns an accepted utterance into a deferred reply
///
/// The seam between the orchestrator and reply production, so tests can
/// substitute instant or never-resolving backends.
#[async_trait]
pub trait ResponderBackend: Send + Sync {
    /// Backend name for diagnostics
    fn name(&self) -> &str;

    /// Schedule a reply for an utterance
    async fn respond(&self, utterance: &str) -> PendingReply;
}

/// Production responder: keyword rules plus a simulated composing delay
#[derive(Clone, Debug)]
pub struct RuleResponder {
    delay_min_ms: u64,
    delay_max_ms: u64,
}

impl RuleResponder {
    /// Create a responder with the given delay bounds (half-open, in ms)
    #[must_use]
    pub fn new(delay_min_ms: u64, delay_max_ms: u64) -> Self {
        Self {
            delay_min_ms,
            delay_max_ms,
        }
    }

    /// Sample a composing delay uniformly from [min, max)
    fn sample_delay(&self) -> std::time::Duration {
        let ms = if self.delay_max_ms > self.delay_min_ms {
            rand::thread_rng().gen_range(self.delay_min_ms..self.delay_max_ms)
        } else {
            self.delay_min_ms
        };
        std::time::Duration::from_millis(ms)
    }
}

impl Default for RuleResponder {
    fn default() -> Self {
        Self::new(1000, 3000)
    }
}

#[async_trait]
impl ResponderBackend for RuleResponder {
    fn name(&self) -> &str {
        "rules"
    }

    async fn respond(&self, utterance: &str) -> PendingReply {
        let text = respond_text(utterance, &mut rand::thread_rng()).to_string();
        let delay = self.sample_delay();

        let (tx, rx) = mpsc::channel(1);
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(BotReply { text }).await;
        });

        PendingReply::new(rx, Some(task))
    }
}
