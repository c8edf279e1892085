//! Appointment Booking
//!
//! Collects the booking form, validates it, and keeps an in-memory ledger of
//! appointments that doctors can confirm or cancel. Nothing is persisted:
//! the ledger lives and dies with the process.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Required-fields refusal shown when the booking form is incomplete
pub const BOOKING_REQUIRED_FIELDS: &str = "Please fill all required fields";

/// Confirmation notice shown after a successful booking
pub const BOOKING_CONFIRMED: &str =
    "Appointment booked successfully! You will receive a confirmation shortly.";

/// Appointment identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppointmentId(pub Uuid);

impl AppointmentId {
    /// Generate a new unique appointment ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AppointmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of an appointment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    /// Booked, awaiting doctor confirmation
    Pending,
    /// Confirmed by the doctor
    Confirmed,
    /// Cancelled by the doctor
    Cancelled,
}

impl AppointmentStatus {
    /// Human-readable label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Whether this status is final
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Cancelled)
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The raw booking form as collected by the surface
///
/// Empty string means the field was not supplied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingForm {
    /// Selected doctor
    pub doctor: String,
    /// Appointment type (consultation, follow-up, therapy)
    pub appointment_type: String,
    /// Requested date, `YYYY-MM-DD`
    pub date: String,
    /// Requested time, `HH:MM`
    pub time: String,
    /// Symptom description
    pub symptoms: String,
}

/// A validated, typed booking ready to record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedBooking {
    /// Selected doctor
    pub doctor: String,
    /// Appointment type; defaults to "Consultation" when left blank
    pub appointment_type: String,
    /// Requested date
    pub date: NaiveDate,
    /// Requested time
    pub time: NaiveTime,
    /// Symptom description
    pub symptoms: String,
}

/// Validate the booking form against today's date
///
/// Accumulates errors: the required-fields refusal, a format complaint for
/// an unparseable date or time, and a past-date refusal (the booking form's
/// minimum date is today).
pub fn validate_booking(form: &BookingForm, today: NaiveDate) -> Result<ParsedBooking, Vec<String>> {
    let mut errors = Vec::new();

    if form.doctor.is_empty()
        || form.date.is_empty()
        || form.time.is_empty()
        || form.symptoms.is_empty()
    {
        errors.push(BOOKING_REQUIRED_FIELDS.to_string());
    }

    let date = if form.date.is_empty() {
        None
    } else {
        match NaiveDate::parse_from_str(&form.date, "%Y-%m-%d") {
            Ok(date) => {
                if date < today {
                    errors.push("Appointment date cannot be in the past".to_string());
                }
                Some(date)
            }
            Err(_) => {
                errors.push("Appointment date must be YYYY-MM-DD".to_string());
                None
            }
        }
    };

    let time = if form.time.is_empty() {
        None
    } else {
        match NaiveTime::parse_from_str(&form.time, "%H:%M") {
            Ok(time) => Some(time),
            Err(_) => {
                errors.push("Appointment time must be HH:MM".to_string());
                None
            }
        }
    };

    match (date, time) {
        (Some(date), Some(time)) if errors.is_empty() => Ok(ParsedBooking {
            doctor: form.doctor.clone(),
            appointment_type: if form.appointment_type.is_empty() {
                "Consultation".to_string()
            } else {
                form.appointment_type.clone()
            },
            date,
            time,
            symptoms: form.symptoms.clone(),
        }),
        _ => Err(errors),
    }
}

/// A recorded appointment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Unique appointment identifier
    pub id: AppointmentId,
    /// The booking patient's display name
    pub patient: String,
    /// The selected doctor
    pub doctor: String,
    /// Appointment type
    pub appointment_type: String,
    /// Requested date
    pub date: NaiveDate,
    /// Requested time
    pub time: NaiveTime,
    /// Symptom description
    pub symptoms: String,
    /// Current status
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Display line, e.g. "Aug 6, 2026 at 2:05 PM"
    #[must_use]
    pub fn when(&self) -> String {
        format!("{} at {}", format_date(self.date), format_time(self.time))
    }
}

/// Ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The appointment does not exist
    #[error("appointment not found: {0}")]
    NotFound(AppointmentId),
}

/// In-memory appointment ledger
///
/// Holds every appointment recorded this process lifetime. Deliberately has
/// no durable storage.
#[derive(Clone, Debug, Default)]
pub struct AppointmentLedger {
    appointments: Vec<Appointment>,
}

impl AppointmentLedger {
    /// Create an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger seeded with a few pending demo appointments
    ///
    /// Stands in for the sample entries the real clinic would load, so the
    /// doctor dashboard has something to confirm out of the box.
    #[must_use]
    pub fn with_demo_entries(today: NaiveDate) -> Self {
        let mut ledger = Self::new();
        let morning = NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default();
        let afternoon = NaiveTime::from_hms_opt(14, 30, 0).unwrap_or_default();

        ledger.appointments.push(Appointment {
            id: AppointmentId::new(),
            patient: "Asha Verma".to_string(),
            doctor: "Dr. Priya Sharma".to_string(),
            appointment_type: "Consultation".to_string(),
            date: today,
            time: morning,
            symptoms: "Recurring stress headaches".to_string(),
            status: AppointmentStatus::Pending,
        });
        ledger.appointments.push(Appointment {
            id: AppointmentId::new(),
            patient: "Rohan Mehta".to_string(),
            doctor: "Dr. Rajesh Kumar".to_string(),
            appointment_type: "Therapy".to_string(),
            date: today,
            time: afternoon,
            symptoms: "Joint stiffness, mornings".to_string(),
            status: AppointmentStatus::Pending,
        });

        ledger
    }

    /// Record a validated booking for a patient
    pub fn record(&mut self, booking: ParsedBooking, patient: &str) -> &Appointment {
        self.appointments.push(Appointment {
            id: AppointmentId::new(),
            patient: patient.to_string(),
            doctor: booking.doctor,
            appointment_type: booking.appointment_type,
            date: booking.date,
            time: booking.time,
            symptoms: booking.symptoms,
            status: AppointmentStatus::Pending,
        });

        // Just pushed
        self.appointments.last().unwrap()
    }

    /// Change an appointment's status
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] for an unknown ID.
    pub fn set_status(
        &mut self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<&Appointment, LedgerError> {
        let appointment = self
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(LedgerError::NotFound(id))?;

        appointment.status = status;
        Ok(appointment)
    }

    /// Look up an appointment
    #[must_use]
    pub fn get(&self, id: AppointmentId) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    /// All appointments, oldest first
    #[must_use]
    pub fn all(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Appointments for a doctor
    #[must_use]
    pub fn for_doctor(&self, doctor: &str) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.doctor == doctor)
            .collect()
    }

    /// Appointments booked by a patient
    #[must_use]
    pub fn for_patient(&self, patient: &str) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.patient == patient)
            .collect()
    }

    /// Number of recorded appointments
    #[must_use]
    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    /// Whether the ledger is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }
}

/// Format a date like "Aug 6, 2026"
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Format a time like "2:05 PM"
#[must_use]
pub fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}
