//! Job-seeker registration model.

use crate::models::list::{null_as_default, ListRow};
use crate::services::text::normalize_text;
use serde::{Deserialize, Serialize};

/// Review status of a job seeker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    Revision,
    Activo,
    Inactivo,
    Rechazado,
}

impl From<&str> for UserStatus {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "ACTIVO" => Self::Activo,
            "INACTIVO" => Self::Inactivo,
            "RECHAZADO" => Self::Rechazado,
            _ => Self::Revision,
        }
    }
}

impl UserStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Revision => "En revisión",
            Self::Activo => "Activo",
            Self::Inactivo => "Inactivo",
            Self::Rechazado => "Rechazado",
        }
    }
}

/// Academic levels offered by the user filter.
pub const ACADEMIC_LEVELS: &[(&str, &str)] = &[
    ("PREESCOLAR", "Preescolar"),
    ("PRIMARIA", "Primaria"),
    ("SECUNDARIA", "Secundaria"),
    ("BACHILLERATO_GENERAL", "Bachillerato General"),
    ("CARRERA_TECNICA", "Carrera Técnica"),
    ("LICENCIATURA", "Licenciatura"),
    ("INGENIERIA", "Ingeniería"),
    ("MAESTRIA", "Maestría"),
    ("DOCTORADO", "Doctorado"),
    ("POSDOCTORADO", "Posdoctorado"),
];

/// Look up the label of an academic level code.
pub fn academic_level_label(code: &str) -> Option<&'static str> {
    ACADEMIC_LEVELS
        .iter()
        .find(|(value, _)| value.eq_ignore_ascii_case(code))
        .map(|(_, label)| *label)
}

/// Job seeker record as sent by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCandidate {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub birth_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cell_phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub academic_level: String,
    pub degree: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job_experience: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub desired_position: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub registered_at: String,

    /// Raw status: `REVISION`, `ACTIVO`, `INACTIVO`, `RECHAZADO`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

impl UserCandidate {
    pub fn status_enum(&self) -> UserStatus {
        UserStatus::from(self.status.as_str())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Avatar initials, e.g. `LR` for Lucía Ramos.
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl ListRow for UserCandidate {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> String {
        normalize_text(&format!("{} {}", self.full_name(), self.email))
    }
}
