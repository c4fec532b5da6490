//! The clinic's posted slot schedule: which half-hour starts each
//! consultation type offers on a given weekday. Used to pre-fill the
//! booking form's time choices before the server-side availability lookup.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use shared::domain::AppointmentType;

/// Half-hour slot starts offered for a consultation type on a date. Empty
/// means the type is not offered that day.
pub fn offered_slots(appointment_type: AppointmentType, date: NaiveDate) -> Vec<NaiveTime> {
    let weekday = date.weekday();
    match appointment_type {
        AppointmentType::Regular | AppointmentType::Medical => {
            if is_clinic_weekday(weekday) {
                with_afternoon(morning_slots())
            } else {
                Vec::new()
            }
        }
        AppointmentType::Dental => {
            if is_mon_wed_fri(weekday) {
                morning_slots()
            } else {
                Vec::new()
            }
        }
        AppointmentType::Immunization => {
            if weekday == Weekday::Wed {
                half_hour_slots(8, 12)
            } else {
                Vec::new()
            }
        }
        AppointmentType::Checkup => {
            if matches!(weekday, Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu) {
                with_afternoon(morning_slots())
            } else {
                Vec::new()
            }
        }
        AppointmentType::FamilyPlanning => {
            if is_mon_wed_fri(weekday) {
                with_afternoon(morning_slots())
            } else {
                Vec::new()
            }
        }
        AppointmentType::Dots => {
            if is_clinic_weekday(weekday) {
                afternoon_slots()
            } else {
                Vec::new()
            }
        }
    }
}

fn is_clinic_weekday(weekday: Weekday) -> bool {
    !matches!(weekday, Weekday::Sat | Weekday::Sun)
}

fn is_mon_wed_fri(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Mon | Weekday::Wed | Weekday::Fri)
}

fn morning_slots() -> Vec<NaiveTime> {
    half_hour_slots(8, 11)
}

fn afternoon_slots() -> Vec<NaiveTime> {
    half_hour_slots(13, 16)
}

fn with_afternoon(mut slots: Vec<NaiveTime>) -> Vec<NaiveTime> {
    slots.extend(afternoon_slots());
    slots
}

fn half_hour_slots(from_hour: u32, until_hour: u32) -> Vec<NaiveTime> {
    let mut slots = Vec::new();
    let mut hour = from_hour;
    let mut minute = 0;
    while hour < until_hour {
        if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
            slots.push(time);
        }
        minute += 30;
        if minute == 60 {
            minute = 0;
            hour += 1;
        }
    }
    slots
}

#[cfg(test)]
#[path = "tests/slots_tests.rs"]
mod tests;
