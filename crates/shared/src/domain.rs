use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        /// Opaque server-assigned identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(AppointmentId);
id_newtype!(DoctorId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    /// Badge styling class used by the rendering surface.
    pub fn badge_class(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "success",
            AppointmentStatus::Cancelled => "danger",
            AppointmentStatus::Completed => "info",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Consultation type offered by the clinic. The wire representation is the
/// PascalCase name the backend expects in the `Type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum AppointmentType {
    #[default]
    Regular,
    Medical,
    Dental,
    Immunization,
    Checkup,
    FamilyPlanning,
    Dots,
}

impl std::fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AppointmentType::Regular => "Regular",
            AppointmentType::Medical => "Medical Consultation",
            AppointmentType::Dental => "Dental Consultation",
            AppointmentType::Immunization => "Immunization",
            AppointmentType::Checkup => "BP/Sugar/Weight Check-up",
            AppointmentType::FamilyPlanning => "Prenatal & Family Planning",
            AppointmentType::Dots => "DOTS",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for AppointmentType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "regular" => Ok(AppointmentType::Regular),
            "medical" => Ok(AppointmentType::Medical),
            "dental" => Ok(AppointmentType::Dental),
            "immunization" => Ok(AppointmentType::Immunization),
            "checkup" => Ok(AppointmentType::Checkup),
            "family" | "family_planning" => Ok(AppointmentType::FamilyPlanning),
            "dots" => Ok(AppointmentType::Dots),
            other => Err(format!(
                "unknown appointment type '{other}'; expected one of regular, medical, dental, immunization, checkup, family, dots"
            )),
        }
    }
}
