use super::*;
use crate::domain::{AppointmentStatus, AppointmentType};
use serde_json::json;

fn sample_body() -> BookAppointmentBody {
    BookAppointmentBody {
        doctor_id: "D1".into(),
        date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"),
        time: NaiveTime::from_hms_opt(10, 0, 0).expect("valid time"),
        name: "Jane Doe".to_string(),
        age: 34,
        reason_for_visit: "Checkup".to_string(),
        appointment_type: AppointmentType::default(),
    }
}

#[test]
fn booking_body_uses_backend_field_names_verbatim() {
    let value = serde_json::to_value(sample_body()).expect("serialize");
    assert_eq!(
        value,
        json!({
            "DoctorId": "D1",
            "Date": "2024-05-01",
            "Time": "10:00",
            "Name": "Jane Doe",
            "Age": 34,
            "ReasonForVisit": "Checkup",
            "Type": "Regular",
        })
    );
}

#[test]
fn booking_body_round_trips() {
    let body = sample_body();
    let raw = serde_json::to_string(&body).expect("serialize");
    let parsed: BookAppointmentBody = serde_json::from_str(&raw).expect("deserialize");
    assert_eq!(parsed, body);
}

#[test]
fn time_accepts_seconds_on_input() {
    let raw = json!({
        "DoctorId": "D1",
        "Date": "2024-05-01",
        "Time": "10:00:00",
        "Name": "Jane Doe",
        "Age": 34,
        "ReasonForVisit": "",
        "Type": "Regular",
    });
    let parsed: BookAppointmentBody = serde_json::from_value(raw).expect("deserialize");
    assert_eq!(parsed.time, NaiveTime::from_hms_opt(10, 0, 0).expect("valid time"));
}

#[test]
fn calendar_event_parses_widget_payload() {
    let raw = json!({
        "id": "42",
        "title": "Jane Doe - Checkup",
        "start": "2024-05-01T10:00:00Z",
        "status": "scheduled",
    });
    let event: AppointmentEvent = serde_json::from_value(raw).expect("deserialize");
    assert_eq!(event.id, "42".into());
    assert_eq!(event.end, None);
    assert_eq!(event.status, AppointmentStatus::Scheduled);
}

#[test]
fn ack_body_message_is_optional() {
    let ack: AckBody = serde_json::from_value(json!({"success": true})).expect("deserialize");
    assert!(ack.success);
    assert_eq!(ack.message, None);

    let ack: AckBody = serde_json::from_value(json!({"success": false, "message": "slot taken"}))
        .expect("deserialize");
    assert!(!ack.success);
    assert_eq!(ack.message.as_deref(), Some("slot taken"));
}

#[test]
fn appointment_type_parses_lowercase_names() {
    assert_eq!("regular".parse(), Ok(AppointmentType::Regular));
    assert_eq!("family".parse(), Ok(AppointmentType::FamilyPlanning));
    assert_eq!("DOTS".parse(), Ok(AppointmentType::Dots));
    assert!("telepathy".parse::<AppointmentType>().is_err());
}

#[test]
fn status_maps_to_badge_classes() {
    assert_eq!(AppointmentStatus::Scheduled.badge_class(), "success");
    assert_eq!(AppointmentStatus::Cancelled.badge_class(), "danger");
    assert_eq!(AppointmentStatus::Completed.badge_class(), "info");
}
