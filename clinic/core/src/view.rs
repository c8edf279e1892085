//! View Router
//!
//! Maps a requested screen name to the one visible view. Exactly one view is
//! active at any time and switching is atomic from the observer's
//! perspective: the router's `active` field is the single source of truth,
//! and surfaces render whatever `ShowView` names.
//!
//! An unrecognized role or tab wiring is a programming error, not a runtime
//! condition - the router fails loudly instead of silently rendering nothing.

use serde::{Deserialize, Serialize};

use crate::session::Role;

/// The single currently visible top-level screen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    /// Public landing page with the carousel and particle decoration
    Landing,
    /// Role-specific login/signup form
    Auth,
    /// Patient dashboard
    PatientDashboard,
    /// Doctor dashboard
    DoctorDashboard,
    /// Admin dashboard
    AdminDashboard,
}

impl View {
    /// Whether this view is a role dashboard
    #[must_use]
    pub fn is_dashboard(&self) -> bool {
        matches!(
            self,
            Self::PatientDashboard | Self::DoctorDashboard | Self::AdminDashboard
        )
    }

    /// The role a dashboard belongs to, if this is one
    #[must_use]
    pub fn dashboard_role(&self) -> Option<Role> {
        match self {
            Self::PatientDashboard => Some(Role::Patient),
            Self::DoctorDashboard => Some(Role::Doctor),
            Self::AdminDashboard => Some(Role::Admin),
            Self::Landing | Self::Auth => None,
        }
    }

    /// Screen title for rendering
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Landing => "AyurVeda Clinic",
            Self::Auth => "Sign In",
            Self::PatientDashboard => "Patient Dashboard",
            Self::DoctorDashboard => "Doctor Dashboard",
            Self::AdminDashboard => "Admin Dashboard",
        }
    }
}

/// A tab inside a role dashboard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DashboardTab {
    /// Summary cards and highlights
    Overview,
    /// The appointment booking form (patients)
    Book,
    /// Appointment list
    Appointments,
    /// Patient roster (doctors, admins)
    Patients,
    /// Doctor roster (admins)
    Doctors,
    /// Profile details
    Profile,
}

impl DashboardTab {
    /// The ordered tab set for a role's dashboard
    ///
    /// The first entry is the tab shown when the dashboard opens.
    #[must_use]
    pub fn available_for(role: Role) -> &'static [DashboardTab] {
        match role {
            Role::Patient => &[Self::Overview, Self::Book, Self::Appointments],
            Role::Doctor => &[Self::Appointments, Self::Patients, Self::Profile],
            Role::Admin => &[Self::Overview, Self::Doctors, Self::Patients],
        }
    }

    /// Human-readable label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Book => "Book Appointment",
            Self::Appointments => "Appointments",
            Self::Patients => "Patients",
            Self::Doctors => "Doctors",
            Self::Profile => "Profile",
        }
    }
}

/// Drives which screen is visible and which dashboard tab is active
#[derive(Clone, Debug)]
pub struct ViewRouter {
    /// The one visible view
    active: View,
    /// Active tab, present only while a dashboard is shown
    active_tab: Option<DashboardTab>,
}

impl Default for ViewRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewRouter {
    /// Create a router showing the landing screen
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: View::Landing,
            active_tab: None,
        }
    }

    /// The currently visible view
    #[must_use]
    pub fn active(&self) -> View {
        self.active
    }

    /// The active dashboard tab, if a dashboard is shown
    #[must_use]
    pub fn active_tab(&self) -> Option<DashboardTab> {
        self.active_tab
    }

    /// Deactivate the current view and activate exactly the requested one
    ///
    /// Showing a dashboard also resets the active tab to that dashboard's
    /// first tab.
    pub fn show(&mut self, view: View) -> View {
        self.active = view;
        self.active_tab = view
            .dashboard_role()
            .map(|role| DashboardTab::available_for(role)[0]);
        self.active
    }

    /// Resolve a role to its dashboard and show it
    pub fn show_dashboard(&mut self, role: Role) -> View {
        self.show(role.dashboard_view())
    }

    /// Activate a tab on the currently shown dashboard
    ///
    /// # Panics
    ///
    /// Panics when no dashboard is active or the tab does not belong to the
    /// active dashboard's role. Both indicate a wiring defect in the
    /// surface, not user input.
    pub fn select_tab(&mut self, tab: DashboardTab) -> DashboardTab {
        let role = self
            .active
            .dashboard_role()
            .unwrap_or_else(|| panic!("tab selected outside a dashboard: {:?}", self.active));

        assert!(
            DashboardTab::available_for(role).contains(&tab),
            "tab {tab:?} does not belong to the {role} dashboard"
        );

        self.active_tab = Some(tab);
        tab
    }
}
