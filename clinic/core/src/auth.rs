//! Auth Flow
//!
//! The login/signup state machine. There is no credential backend: the flow
//! validates the submitted fields, optionally gates doctors behind a
//! simulated one-time-passcode challenge, and hands a [`LoginData`] payload
//! to the session state on success.
//!
//! # Design Philosophy
//!
//! Field visibility and validation are pure functions of (role, mode) and
//! the submitted form. They return data - visibility sets and error lists -
//! that the orchestrator turns into messages, so the whole flow is testable
//! without a rendering environment. Visibility is recomputed from scratch on
//! every role or mode change rather than patched incrementally.

use serde::{Deserialize, Serialize};

use crate::session::{LoginData, Role, DEFAULT_SPECIALIZATION};

/// The fixed admin credential. Any other password is rejected for the admin
/// role, in either mode.
pub const ADMIN_PASSWORD: &str = "admin@1234";

/// The accepted one-time-passcode for the doctor login challenge.
pub const OTP_CODE: &str = "123456";

/// Inline error shown when the challenge code does not match.
pub const OTP_ERROR: &str = "Invalid OTP code. Use 123456 for demo.";

/// Login or signup
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthMode {
    /// Existing-account login
    Login,
    /// New-account signup
    Signup,
}

impl AuthMode {
    /// The submit button label for this mode
    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Signup => "Sign Up",
        }
    }

    /// The toggle control label for this mode
    #[must_use]
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Self::Login => "Don't have an account? Sign up",
            Self::Signup => "Already have an account? Login",
        }
    }
}

/// Optional auth form fields whose visibility depends on (role, mode)
///
/// Email and password are always visible and are not listed here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthField {
    /// Display name (signup)
    Name,
    /// Phone number (patient signup)
    Phone,
    /// Specialization (doctor signup)
    Specialization,
    /// License number (doctor signup)
    License,
    /// Password confirmation (signup)
    ConfirmPassword,
}

impl AuthField {
    /// Input label for rendering
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Full Name",
            Self::Phone => "Phone",
            Self::Specialization => "Specialization",
            Self::License => "License Number",
            Self::ConfirmPassword => "Confirm Password",
        }
    }
}

/// The optional fields visible for a (role, mode) pair
///
/// Pure function; the full set is recomputed on every change.
#[must_use]
pub fn visible_fields(role: Role, mode: AuthMode) -> Vec<AuthField> {
    let mut fields = Vec::new();

    if mode == AuthMode::Signup {
        fields.push(AuthField::Name);
        fields.push(AuthField::ConfirmPassword);

        match role {
            Role::Patient => fields.push(AuthField::Phone),
            Role::Doctor => {
                fields.push(AuthField::Specialization);
                fields.push(AuthField::License);
            }
            Role::Admin => {}
        }
    }

    fields
}

/// Whether the login/signup toggle is shown for a role
///
/// Hidden for admin, pinning that role to login.
#[must_use]
pub fn mode_toggle_visible(role: Role) -> bool {
    role != Role::Admin
}

/// The raw auth form as collected by the surface
///
/// Empty string means the field was not supplied (or not visible).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthForm {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
    /// Display name
    pub name: String,
    /// Phone number
    pub phone: String,
    /// Specialization
    pub specialization: String,
    /// License number
    pub license: String,
    /// Password confirmation
    pub confirm_password: String,
}

/// Validate a submitted form, accumulating all applicable errors
///
/// Pure function. The error list order is stable; the orchestrator joins
/// the messages with `", "` into one visible error.
#[must_use]
pub fn validate(role: Role, mode: AuthMode, form: &AuthForm) -> Vec<String> {
    let mut errors = Vec::new();

    if form.email.is_empty() {
        errors.push("Email is required".to_string());
    }
    if form.password.is_empty() {
        errors.push("Password is required".to_string());
    }

    if mode == AuthMode::Signup {
        if form.name.is_empty() {
            errors.push("Name is required".to_string());
        }
        if form.password != form.confirm_password {
            errors.push("Passwords do not match".to_string());
        }
        if role == Role::Doctor && form.license.is_empty() {
            errors.push("License number is required for doctors".to_string());
        }
    }

    if role == Role::Admin && form.password != ADMIN_PASSWORD {
        errors.push("Invalid admin credentials".to_string());
    }

    errors
}

/// Result of submitting the auth form
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; no state change
    Rejected(Vec<String>),
    /// Doctor login: a passcode challenge must be passed first
    ChallengeRequired,
    /// Proceed directly to login
    LoggedIn(LoginData),
}

/// Result of submitting a challenge code
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChallengeOutcome {
    /// Wrong code; the prompt stays open, retries are unlimited
    Rejected(&'static str),
    /// Code accepted; complete the suspended login
    LoggedIn(LoginData),
}

/// The auth attempt state machine
///
/// Transient state for one in-progress auth attempt. Not persisted across
/// logout; a fresh flow is begun whenever the auth screen opens.
#[derive(Clone, Debug)]
pub struct AuthFlow {
    role: Role,
    mode: AuthMode,
    /// Captured form while the passcode challenge is open
    pending: Option<AuthForm>,
}

impl AuthFlow {
    /// Begin an auth attempt for a role, starting in login mode
    #[must_use]
    pub fn begin(role: Role) -> Self {
        Self {
            role,
            mode: AuthMode::Login,
            pending: None,
        }
    }

    /// The role this attempt targets
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// The current mode
    #[must_use]
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Whether the passcode challenge is open
    #[must_use]
    pub fn is_challenge_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Flip login ⇄ signup
    ///
    /// No-op for admin: the toggle control is hidden for that role and the
    /// mode stays pinned to login.
    pub fn toggle_mode(&mut self) -> AuthMode {
        if self.role != Role::Admin {
            self.mode = match self.mode {
                AuthMode::Login => AuthMode::Signup,
                AuthMode::Signup => AuthMode::Login,
            };
        }
        self.mode
    }

    /// The optional fields visible for the current (role, mode)
    #[must_use]
    pub fn visible_fields(&self) -> Vec<AuthField> {
        visible_fields(self.role, self.mode)
    }

    /// Submit the form
    ///
    /// Accumulates all validation errors before reporting. A valid doctor
    /// login does not log in yet: it captures the form and suspends until
    /// the passcode is verified.
    pub fn submit(&mut self, form: AuthForm) -> SubmitOutcome {
        let errors = validate(self.role, self.mode, &form);
        if !errors.is_empty() {
            return SubmitOutcome::Rejected(errors);
        }

        if self.role == Role::Doctor && self.mode == AuthMode::Login {
            self.pending = Some(form);
            return SubmitOutcome::ChallengeRequired;
        }

        SubmitOutcome::LoggedIn(login_data(&form))
    }

    /// Verify a submitted challenge code
    ///
    /// Accepts exactly [`OTP_CODE`]. The success payload reuses the email,
    /// name, and specialization captured at submit time, defaulting the
    /// name to the email local part and the specialization to
    /// [`DEFAULT_SPECIALIZATION`].
    ///
    /// # Panics
    ///
    /// Panics when no challenge is open - the surface must only offer the
    /// prompt after [`SubmitOutcome::ChallengeRequired`].
    pub fn verify_code(&mut self, code: &str) -> ChallengeOutcome {
        let form = self
            .pending
            .as_ref()
            .expect("passcode verified with no open challenge");

        if code != OTP_CODE {
            return ChallengeOutcome::Rejected(OTP_ERROR);
        }

        let mut data = LoginData {
            email: form.email.clone(),
            name: non_empty(&form.name),
            specialization: non_empty(&form.specialization)
                .or_else(|| Some(DEFAULT_SPECIALIZATION.to_string())),
            phone: None,
        };
        if data.name.is_none() {
            data.name = non_empty(crate::session::local_part(&data.email));
        }

        self.pending = None;
        ChallengeOutcome::LoggedIn(data)
    }

    /// Drop the pending challenge without logging in
    pub fn cancel_challenge(&mut self) {
        self.pending = None;
    }
}

/// Build the login payload from a validated form
fn login_data(form: &AuthForm) -> LoginData {
    LoginData {
        email: form.email.clone(),
        name: non_empty(&form.name),
        specialization: non_empty(&form.specialization),
        phone: non_empty(&form.phone),
    }
}

/// `Some` for non-empty input, `None` otherwise
fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_form(email: &str, password: &str) -> AuthForm {
        AuthForm {
            email: email.to_string(),
            password: password.to_string(),
            ..AuthForm::default()
        }
    }

    #[test]
    fn test_visible_fields_login_is_empty() {
        for role in Role::ALL {
            assert!(visible_fields(role, AuthMode::Login).is_empty());
        }
    }

    #[test]
    fn test_visible_fields_patient_signup() {
        assert_eq!(
            visible_fields(Role::Patient, AuthMode::Signup),
            vec![AuthField::Name, AuthField::ConfirmPassword, AuthField::Phone]
        );
    }

    #[test]
    fn test_visible_fields_doctor_signup() {
        assert_eq!(
            visible_fields(Role::Doctor, AuthMode::Signup),
            vec![
                AuthField::Name,
                AuthField::ConfirmPassword,
                AuthField::Specialization,
                AuthField::License
            ]
        );
    }

    #[test]
    fn test_visible_fields_admin_signup_has_no_extras() {
        assert_eq!(
            visible_fields(Role::Admin, AuthMode::Signup),
            vec![AuthField::Name, AuthField::ConfirmPassword]
        );
    }

    #[test]
    fn test_toggle_hidden_for_admin() {
        assert!(mode_toggle_visible(Role::Patient));
        assert!(mode_toggle_visible(Role::Doctor));
        assert!(!mode_toggle_visible(Role::Admin));
    }

    #[test]
    fn test_admin_mode_pinned_to_login() {
        let mut flow = AuthFlow::begin(Role::Admin);
        assert_eq!(flow.toggle_mode(), AuthMode::Login);
        assert_eq!(flow.mode(), AuthMode::Login);
    }

    #[test]
    fn test_empty_form_accumulates_both_required_errors() {
        let errors = validate(Role::Patient, AuthMode::Login, &AuthForm::default());
        assert_eq!(
            errors,
            vec!["Email is required".to_string(), "Password is required".to_string()]
        );
    }

    #[test]
    fn test_signup_accumulates_all_errors() {
        let form = AuthForm {
            password: "a".to_string(),
            confirm_password: "b".to_string(),
            ..AuthForm::default()
        };
        let errors = validate(Role::Doctor, AuthMode::Signup, &form);
        assert_eq!(
            errors,
            vec![
                "Email is required".to_string(),
                "Name is required".to_string(),
                "Passwords do not match".to_string(),
                "License number is required for doctors".to_string(),
            ]
        );
    }

    #[test]
    fn test_admin_wrong_password_rejected_in_both_modes() {
        let form = login_form("admin@ayurvedaclinic.com", "letmein");
        for mode in [AuthMode::Login, AuthMode::Signup] {
            let errors = validate(Role::Admin, mode, &form);
            assert!(errors.contains(&"Invalid admin credentials".to_string()), "{mode:?}");
        }
    }

    #[test]
    fn test_admin_fixed_password_accepted() {
        let mut flow = AuthFlow::begin(Role::Admin);
        let outcome = flow.submit(login_form("admin@ayurvedaclinic.com", ADMIN_PASSWORD));
        assert!(matches!(outcome, SubmitOutcome::LoggedIn(_)));
    }

    #[test]
    fn test_patient_login_goes_straight_through() {
        let mut flow = AuthFlow::begin(Role::Patient);
        let outcome = flow.submit(login_form("asha@example.com", "secret"));
        match outcome {
            SubmitOutcome::LoggedIn(data) => assert_eq!(data.email, "asha@example.com"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_doctor_login_requires_challenge() {
        let mut flow = AuthFlow::begin(Role::Doctor);
        let outcome = flow.submit(login_form("priya@example.com", "secret"));
        assert_eq!(outcome, SubmitOutcome::ChallengeRequired);
        assert!(flow.is_challenge_open());
    }

    #[test]
    fn test_doctor_signup_skips_challenge() {
        let mut flow = AuthFlow::begin(Role::Doctor);
        flow.toggle_mode();
        let form = AuthForm {
            email: "priya@example.com".to_string(),
            password: "secret".to_string(),
            name: "Priya Sharma".to_string(),
            specialization: "Panchakarma".to_string(),
            license: "AYU-1204".to_string(),
            confirm_password: "secret".to_string(),
            ..AuthForm::default()
        };
        let outcome = flow.submit(form);
        assert!(matches!(outcome, SubmitOutcome::LoggedIn(_)));
    }

    #[test]
    fn test_wrong_code_keeps_challenge_open() {
        let mut flow = AuthFlow::begin(Role::Doctor);
        flow.submit(login_form("priya@example.com", "secret"));

        let outcome = flow.verify_code("654321");
        assert_eq!(outcome, ChallengeOutcome::Rejected(OTP_ERROR));
        assert!(flow.is_challenge_open());

        // Retries are unlimited
        let outcome = flow.verify_code("000000");
        assert_eq!(outcome, ChallengeOutcome::Rejected(OTP_ERROR));
        assert!(flow.is_challenge_open());
    }

    #[test]
    fn test_correct_code_completes_login_with_defaults() {
        let mut flow = AuthFlow::begin(Role::Doctor);
        flow.submit(login_form("priya@example.com", "secret"));

        match flow.verify_code(OTP_CODE) {
            ChallengeOutcome::LoggedIn(data) => {
                assert_eq!(data.email, "priya@example.com");
                assert_eq!(data.name.as_deref(), Some("priya"));
                assert_eq!(data.specialization.as_deref(), Some(DEFAULT_SPECIALIZATION));
                assert_eq!(data.phone, None);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!flow.is_challenge_open());
    }

    #[test]
    fn test_cancel_challenge_drops_pending_login() {
        let mut flow = AuthFlow::begin(Role::Doctor);
        flow.submit(login_form("priya@example.com", "secret"));
        flow.cancel_challenge();
        assert!(!flow.is_challenge_open());
    }
}
