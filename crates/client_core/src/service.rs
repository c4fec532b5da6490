//! Typed operations against the scheduling backend. Every call resolves to
//! a `Result` over [`ActionError`]; transport and payload failures are
//! converted locally and never escape as panics.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use reqwest::Client;
use shared::{
    domain::{AppointmentId, DoctorId},
    error::{ActionError, ErrorBody},
    protocol::{
        AckBody, AppointmentDetails, AppointmentEvent, BookAppointmentBody, CalendarRange,
        DoctorsResponse, DoctorSummary, QuickBookingForm, TimeSlotsResponse,
    },
};
use tracing::{info, warn};
use url::Url;

/// Narrow interface to the scheduling backend. The client performs no
/// request deduplication or retry; repeated calls with identical arguments
/// are safe from this layer's point of view.
#[async_trait]
pub trait AppointmentBackend: Send + Sync {
    async fn book(&self, body: &BookAppointmentBody) -> Result<(), ActionError>;
    async fn calendar_events(
        &self,
        range: Option<CalendarRange>,
    ) -> Result<Vec<AppointmentEvent>, ActionError>;
    async fn cancel(&self, id: &AppointmentId) -> Result<(), ActionError>;
    async fn create_from_quick_form(&self, form: &QuickBookingForm) -> Result<(), ActionError>;
    async fn available_doctors(&self) -> Result<Vec<DoctorSummary>, ActionError>;
    async fn available_time_slots(
        &self,
        date: NaiveDate,
        doctor_id: &DoctorId,
    ) -> Result<Vec<NaiveTime>, ActionError>;
    async fn appointment_details(
        &self,
        id: &AppointmentId,
    ) -> Result<AppointmentDetails, ActionError>;
}

/// Null backend for surfaces constructed before a server is configured.
pub struct MissingAppointmentBackend;

fn backend_unavailable() -> ActionError {
    ActionError::Network("appointment backend is unavailable".to_string())
}

#[async_trait]
impl AppointmentBackend for MissingAppointmentBackend {
    async fn book(&self, _body: &BookAppointmentBody) -> Result<(), ActionError> {
        Err(backend_unavailable())
    }

    async fn calendar_events(
        &self,
        _range: Option<CalendarRange>,
    ) -> Result<Vec<AppointmentEvent>, ActionError> {
        Err(backend_unavailable())
    }

    async fn cancel(&self, _id: &AppointmentId) -> Result<(), ActionError> {
        Err(backend_unavailable())
    }

    async fn create_from_quick_form(&self, _form: &QuickBookingForm) -> Result<(), ActionError> {
        Err(backend_unavailable())
    }

    async fn available_doctors(&self) -> Result<Vec<DoctorSummary>, ActionError> {
        Err(backend_unavailable())
    }

    async fn available_time_slots(
        &self,
        _date: NaiveDate,
        _doctor_id: &DoctorId,
    ) -> Result<Vec<NaiveTime>, ActionError> {
        Err(backend_unavailable())
    }

    async fn appointment_details(
        &self,
        _id: &AppointmentId,
    ) -> Result<AppointmentDetails, ActionError> {
        Err(backend_unavailable())
    }
}

/// HTTP implementation over the clinic API.
pub struct AppointmentService {
    http: Client,
    base_url: String,
}

impl AppointmentService {
    pub fn new(base_url: &str) -> Result<Self, ActionError> {
        let parsed = Url::parse(base_url)
            .map_err(|err| ActionError::Validation(format!("invalid server url '{base_url}': {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ActionError::Validation(format!(
                "server url '{base_url}' must use http or https"
            )));
        }
        Ok(Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn send_ack_request(
        &self,
        request: reqwest::RequestBuilder,
        fallback_message: &str,
    ) -> Result<(), ActionError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(reject_from_response(response).await);
        }
        let ack: AckBody = response
            .json()
            .await
            .map_err(|err| ActionError::Parse(format!("malformed acknowledgement: {err}")))?;
        if ack.success {
            Ok(())
        } else {
            Err(ActionError::Backend {
                status: status.as_u16(),
                message: ack.message.unwrap_or_else(|| fallback_message.to_string()),
            })
        }
    }
}

#[async_trait]
impl AppointmentBackend for AppointmentService {
    async fn book(&self, body: &BookAppointmentBody) -> Result<(), ActionError> {
        let response = self
            .http
            .post(format!("{}/api/user/appointments", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(reject_from_response(response).await);
        }
        info!(doctor_id = %body.doctor_id, date = %body.date, "appointment booked");
        Ok(())
    }

    async fn calendar_events(
        &self,
        range: Option<CalendarRange>,
    ) -> Result<Vec<AppointmentEvent>, ActionError> {
        let mut request = self
            .http
            .get(format!("{}/api/appointments/calendar", self.base_url));
        if let Some(range) = range {
            request = request.query(&[
                ("start", range.start.to_string()),
                ("end", range.end.to_string()),
            ]);
        }
        let response = request.send().await.map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(reject_from_response(response).await);
        }
        response
            .json()
            .await
            .map_err(|err| ActionError::Parse(format!("malformed calendar payload: {err}")))
    }

    async fn cancel(&self, id: &AppointmentId) -> Result<(), ActionError> {
        let request = self
            .http
            .post(format!("{}/api/appointments/{}/cancel", self.base_url, id));
        self.send_ack_request(request, "the appointment could not be cancelled")
            .await?;
        info!(appointment_id = %id, "appointment cancelled");
        Ok(())
    }

    async fn create_from_quick_form(&self, form: &QuickBookingForm) -> Result<(), ActionError> {
        let multipart = reqwest::multipart::Form::new()
            .text("DoctorId", form.doctor_id.0.clone())
            .text("Date", form.date.to_string())
            .text("Time", form.time.format("%H:%M").to_string())
            .text("Name", form.patient_name.clone())
            .text("ReasonForVisit", form.reason_for_visit.clone());
        let request = self
            .http
            .post(format!("{}/api/appointments", self.base_url))
            .multipart(multipart);
        self.send_ack_request(request, "the appointment could not be saved")
            .await?;
        info!(doctor_id = %form.doctor_id, date = %form.date, "quick-form appointment created");
        Ok(())
    }

    async fn available_doctors(&self) -> Result<Vec<DoctorSummary>, ActionError> {
        let response = self
            .http
            .get(format!("{}/api/user/availableDoctors", self.base_url))
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(reject_from_response(response).await);
        }
        let body: DoctorsResponse = response
            .json()
            .await
            .map_err(|err| ActionError::Parse(format!("malformed doctors payload: {err}")))?;
        Ok(body.doctors)
    }

    async fn available_time_slots(
        &self,
        date: NaiveDate,
        doctor_id: &DoctorId,
    ) -> Result<Vec<NaiveTime>, ActionError> {
        let response = self
            .http
            .get(format!("{}/api/user/availableTimeSlots", self.base_url))
            .query(&[
                ("date", date.to_string()),
                ("doctorId", doctor_id.0.clone()),
            ])
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(reject_from_response(response).await);
        }
        let body: TimeSlotsResponse = response
            .json()
            .await
            .map_err(|err| ActionError::Parse(format!("malformed time slot payload: {err}")))?;
        body.time_slots
            .iter()
            .map(|label| parse_slot_label(label))
            .collect()
    }

    async fn appointment_details(
        &self,
        id: &AppointmentId,
    ) -> Result<AppointmentDetails, ActionError> {
        let response = self
            .http
            .get(format!(
                "{}/api/user/appointmentDetails/{}",
                self.base_url, id
            ))
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(reject_from_response(response).await);
        }
        response
            .json()
            .await
            .map_err(|err| ActionError::Parse(format!("malformed appointment details: {err}")))
    }
}

fn transport_error(err: reqwest::Error) -> ActionError {
    ActionError::Network(err.to_string())
}

async fn reject_from_response(response: reqwest::Response) -> ActionError {
    let status = response.status().as_u16();
    let message = match response.json::<ErrorBody>().await {
        Ok(body) if !body.message.is_empty() => body.message,
        _ => {
            warn!(status, "backend rejection carried no message body");
            format!("server returned status {status}")
        }
    };
    ActionError::Backend { status, message }
}

/// Slot labels arrive either as 24-hour `HH:MM` or the clinic's posted
/// `H:MM AM/PM` form.
pub fn parse_slot_label(label: &str) -> Result<NaiveTime, ActionError> {
    let trimmed = label.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%I:%M %p"))
        .map_err(|_| ActionError::Parse(format!("unrecognized time slot '{label}'")))
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
