//! Booking form workflow: typing raw field values into an
//! [`AppointmentRequest`] and serializing submissions through one guarded
//! controller per form instance.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use chrono::{NaiveDate, NaiveTime};
use shared::{
    domain::{AppointmentType, DoctorId},
    error::ActionError,
    protocol::BookAppointmentBody,
};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    notify::{NotificationSurface, Severity},
    service::AppointmentBackend,
};

/// Raw field values keyed by logical name, exactly as collected from the
/// form surface. Nothing here is trusted until [`RawBookingForm::validate`]
/// runs.
#[derive(Debug, Clone, Default)]
pub struct RawBookingForm {
    pub doctor_id: String,
    pub date: String,
    pub time: String,
    pub patient_name: String,
    pub patient_age: String,
    pub reason_for_visit: String,
    /// Empty selects the default consultation type.
    pub appointment_type: String,
}

/// Fully typed booking request, ready to submit.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentRequest {
    pub doctor_id: DoctorId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub patient_name: String,
    pub patient_age: u32,
    pub reason_for_visit: String,
    pub appointment_type: AppointmentType,
}

impl AppointmentRequest {
    /// Wire body with fields mapped verbatim.
    pub fn body(&self) -> BookAppointmentBody {
        BookAppointmentBody {
            doctor_id: self.doctor_id.clone(),
            date: self.date,
            time: self.time,
            name: self.patient_name.clone(),
            age: self.patient_age,
            reason_for_visit: self.reason_for_visit.clone(),
            appointment_type: self.appointment_type,
        }
    }
}

impl RawBookingForm {
    /// Check and type every field: required fields must be non-empty, the
    /// age must parse to a positive integer, date and time must be
    /// well-formed.
    pub fn validate(&self) -> Result<AppointmentRequest, ActionError> {
        let doctor_id = required(&self.doctor_id, "doctor")?;
        let date = required(&self.date, "date")?;
        let time = required(&self.time, "time")?;
        let patient_name = required(&self.patient_name, "patient name")?;
        let patient_age = required(&self.patient_age, "patient age")?;

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ActionError::Parse(format!("'{date}' is not a valid date")))?;
        let time = NaiveTime::parse_from_str(time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
            .map_err(|_| ActionError::Parse(format!("'{time}' is not a valid time of day")))?;
        let patient_age = patient_age
            .parse::<u32>()
            .ok()
            .filter(|age| *age > 0)
            .ok_or_else(|| {
                ActionError::Parse(format!(
                    "age '{patient_age}' must be a positive whole number"
                ))
            })?;
        let appointment_type = if self.appointment_type.trim().is_empty() {
            AppointmentType::default()
        } else {
            self.appointment_type
                .parse::<AppointmentType>()
                .map_err(ActionError::Parse)?
        };

        Ok(AppointmentRequest {
            doctor_id: DoctorId(doctor_id.to_string()),
            date,
            time,
            patient_name: patient_name.to_string(),
            patient_age,
            reason_for_visit: self.reason_for_visit.trim().to_string(),
            appointment_type,
        })
    }
}

fn required<'a>(value: &'a str, label: &str) -> Result<&'a str, ActionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ActionError::Validation(format!("{label} is required")));
    }
    Ok(trimmed)
}

/// Per-form submission state, owned exclusively by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Succeeded,
    Failed(ActionError),
}

/// Outcome of one `submit` call. Any failure has already been surfaced
/// through the notification surface by the time this value is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Booking accepted; the caller should navigate to or refresh the
    /// appointments view.
    Booked,
    /// Another submission is in flight; this call performed no work.
    InFlight,
    Failed(ActionError),
}

/// Validates and submits new-appointment requests. At most one submission
/// is in flight per controller; the submit affordance is disabled for the
/// whole flight and re-enabled on every exit path.
pub struct BookingFormController {
    backend: Arc<dyn AppointmentBackend>,
    notifier: Arc<dyn NotificationSurface>,
    in_flight: AtomicBool,
    state: Mutex<SubmissionState>,
}

/// Re-enables the submit affordance when the submission leaves scope,
/// whatever path it took.
struct SubmitControlGuard<'a> {
    in_flight: &'a AtomicBool,
}

impl Drop for SubmitControlGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

impl BookingFormController {
    pub fn new(
        backend: Arc<dyn AppointmentBackend>,
        notifier: Arc<dyn NotificationSurface>,
    ) -> Arc<Self> {
        Arc::new(Self {
            backend,
            notifier,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(SubmissionState::Idle),
        })
    }

    /// Whether the submit affordance should currently accept input.
    pub fn submit_enabled(&self) -> bool {
        !self.in_flight.load(Ordering::Acquire)
    }

    pub async fn submission_state(&self) -> SubmissionState {
        self.state.lock().await.clone()
    }

    /// Return to `Idle` once a terminal state has been shown, e.g. when the
    /// form is dismissed or remounted.
    pub async fn reset(&self) {
        *self.state.lock().await = SubmissionState::Idle;
    }

    pub async fn submit(&self, raw: RawBookingForm) -> SubmitOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("booking submit ignored; another submission is in flight");
            return SubmitOutcome::InFlight;
        }
        let _control = SubmitControlGuard {
            in_flight: &self.in_flight,
        };

        *self.state.lock().await = SubmissionState::Submitting;

        let request = match raw.validate() {
            Ok(request) => request,
            Err(err) => return self.fail(err).await,
        };

        let body = request.body();
        match self.backend.book(&body).await {
            Ok(()) => {
                *self.state.lock().await = SubmissionState::Succeeded;
                info!(
                    doctor_id = %body.doctor_id,
                    date = %body.date,
                    "booking submission accepted"
                );
                self.notifier
                    .notify("Appointment booked successfully", Severity::Success)
                    .await;
                SubmitOutcome::Booked
            }
            Err(err) => self.fail(err).await,
        }
    }

    async fn fail(&self, err: ActionError) -> SubmitOutcome {
        warn!(error = %err, "booking submission failed");
        *self.state.lock().await = SubmissionState::Failed(err.clone());
        self.notifier.notify(&err.to_string(), Severity::Error).await;
        SubmitOutcome::Failed(err)
    }
}

#[cfg(test)]
#[path = "tests/booking_tests.rs"]
mod tests;
