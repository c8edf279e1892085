//! Session State
//!
//! The single authenticated identity, or absent. There is no credential
//! backend: `login` always succeeds and constructs a profile from whatever
//! the auth flow collected. All state is in-memory and lost on restart.
//!
//! # Design Philosophy
//!
//! A session exists if and only if a dashboard is the visible view. The
//! orchestrator creates it on successful auth (or passcode verification)
//! and clears it on logout or when returning to the landing screen.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::view::View;

/// Fixed placeholder specialization for doctors who logged in through the
/// passcode shortcut without supplying one.
pub const DEFAULT_SPECIALIZATION: &str = "Ayurvedic Specialist";

/// The closed set of roles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Books and views appointments
    Patient,
    /// Manages a practice; login is passcode-gated
    Doctor,
    /// System administration; fixed credential, login only
    Admin,
}

impl Role {
    /// All roles, in landing-page order
    pub const ALL: [Role; 3] = [Role::Patient, Role::Doctor, Role::Admin];

    /// Human-readable label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Doctor => "Doctor",
            Self::Admin => "Admin",
        }
    }

    /// Portal title shown on the auth screen
    #[must_use]
    pub fn portal_title(&self) -> &'static str {
        match self {
            Self::Patient => "\u{1f33f} Patient Portal",
            Self::Doctor => "\u{1f468}\u{200d}\u{2695}\u{fe0f} Doctor Portal",
            Self::Admin => "\u{1f6e1}\u{fe0f} Admin Panel",
        }
    }

    /// Portal subtitle shown on the auth screen
    #[must_use]
    pub fn portal_subtitle(&self) -> &'static str {
        match self {
            Self::Patient => "Book your Ayurvedic consultation",
            Self::Doctor => "Manage your practice",
            Self::Admin => "System administration",
        }
    }

    /// The dashboard view this role lands on after login
    #[must_use]
    pub fn dashboard_view(&self) -> View {
        match self {
            Self::Patient => View::PatientDashboard,
            Self::Doctor => View::DoctorDashboard,
            Self::Admin => View::AdminDashboard,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Opaque user identifier, assigned at login time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new unique user ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fields collected by the auth flow for a login
///
/// Optional fields are `None` when the corresponding form input was empty
/// or hidden for the (role, mode) pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginData {
    /// Email address (always present: validated before login)
    pub email: String,
    /// Display name, if supplied
    pub name: Option<String>,
    /// Specialization, if supplied (doctors)
    pub specialization: Option<String>,
    /// Phone number, if supplied (patients)
    pub phone: Option<String>,
}

/// The in-memory record of the currently authenticated identity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Opaque identifier assigned at login
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Role the session was opened for
    pub role: Role,
    /// Specialization (doctors)
    pub specialization: Option<String>,
    /// Phone number (patients)
    pub phone: Option<String>,
}

impl UserProfile {
    /// Uppercase avatar initial derived from the display name
    #[must_use]
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }

    /// The header detail line: specialization for doctors, email otherwise
    #[must_use]
    pub fn detail(&self) -> &str {
        match (&self.role, &self.specialization) {
            (Role::Doctor, Some(spec)) => spec,
            _ => &self.email,
        }
    }
}

/// Holds the single logged-in identity, or absent
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    current: Option<UserProfile>,
}

impl SessionState {
    /// Create an empty session state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log in, constructing a profile from the collected data
    ///
    /// Never fails. The display name defaults to the local part of the
    /// email address when none was supplied.
    pub fn login(&mut self, role: Role, data: LoginData) -> &UserProfile {
        let name = data
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| local_part(&data.email).to_string());

        self.current = Some(UserProfile {
            id: UserId::new(),
            name,
            email: data.email,
            role,
            specialization: data.specialization,
            phone: data.phone,
        });

        // Just set above
        self.current.as_ref().unwrap()
    }

    /// Clear the session unconditionally; safe with no active session
    pub fn logout(&mut self) {
        self.current = None;
    }

    /// The authenticated identity, if any
    #[must_use]
    pub fn current(&self) -> Option<&UserProfile> {
        self.current.as_ref()
    }

    /// Whether a session is active
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}

/// The local part of an email address (everything before the first '@')
pub(crate) fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}
