use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AppointmentId, AppointmentStatus, AppointmentType, DoctorId};

/// JSON body for `POST /api/user/appointments`. Field names follow the
/// backend's PascalCase contract verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BookAppointmentBody {
    pub doctor_id: DoctorId,
    pub date: NaiveDate,
    #[serde(with = "time_hm")]
    pub time: NaiveTime,
    pub name: String,
    pub age: u32,
    pub reason_for_visit: String,
    #[serde(rename = "Type")]
    pub appointment_type: AppointmentType,
}

/// Calendar-rendered view of a persisted appointment, shaped so the
/// rendering widget can consume it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentEvent {
    pub id: AppointmentId,
    pub title: String,
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    pub status: AppointmentStatus,
}

/// `{success: bool}` acknowledgement returned by the cancel and quick-create
/// endpoints. `message` rides along on failure when the server has one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckBody {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Field set for the lightweight modal booking form, submitted as multipart
/// form data to `POST /api/appointments`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickBookingForm {
    pub doctor_id: DoctorId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub patient_name: String,
    pub reason_for_visit: String,
}

/// Inclusive date window passed along with a calendar fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub id: DoctorId,
    pub name: String,
    pub specialization: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorsResponse {
    pub doctors: Vec<DoctorSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotsResponse {
    #[serde(rename = "timeSlots")]
    pub time_slots: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetails {
    pub date: NaiveDate,
    #[serde(with = "time_hm")]
    pub time: NaiveTime,
    pub doctor_name: String,
    pub status: AppointmentStatus,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescription: Option<String>,
}

/// Times of day cross the wire as `HH:MM`; seconds are accepted on input.
pub mod time_hm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
