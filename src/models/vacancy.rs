//! Vacancy (job posting) model.

use crate::models::list::{null_as_default, ListRow};
use crate::services::text::{group_thousands, normalize_text};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a vacancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VacancyStatus {
    Revision,
    Aprobada,
    Abierta,
    Cerrada,
    Inactiva,
    Rechazada,
}

impl From<&str> for VacancyStatus {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "APROBADA" => Self::Aprobada,
            "ABIERTA" => Self::Abierta,
            "CERRADA" => Self::Cerrada,
            "INACTIVA" => Self::Inactiva,
            "RECHAZADA" => Self::Rechazada,
            _ => Self::Revision,
        }
    }
}

impl std::fmt::Display for VacancyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Revision => write!(f, "REVISION"),
            Self::Aprobada => write!(f, "APROBADA"),
            Self::Abierta => write!(f, "ABIERTA"),
            Self::Cerrada => write!(f, "CERRADA"),
            Self::Inactiva => write!(f, "INACTIVA"),
            Self::Rechazada => write!(f, "RECHAZADA"),
        }
    }
}

impl VacancyStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Revision => "En revisión",
            Self::Aprobada => "Aprobada",
            Self::Abierta => "Abierta",
            Self::Cerrada => "Cerrada",
            Self::Inactiva => "Inactiva",
            Self::Rechazada => "Rechazada",
        }
    }
}

/// Salary range of a vacancy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Salary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub coin: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub min: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max: f64,
}

/// Vacancy record as sent by the backend.
///
/// The employer listing returns these flat; the linker listing nests them
/// under `Vacancy` (see [`VacancyItem`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vacancy {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default", alias = "title")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub salary: Option<Salary>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub number_openings: i64,
    #[serde(default, deserialize_with = "null_as_default", alias = "schedule")]
    pub work_shift: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub modality: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,

    /// Raw moderation status.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,

    /// Raw employer-side status (`ABIERTA`, `CERRADA`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_status: String,

    pub business_sector: Option<String>,
    pub required_degree: Option<String>,
    pub experience: Option<String>,
    pub benefits: Option<String>,
    pub additional_information: Option<String>,
    pub gender: Option<String>,
    pub age_range: Option<(u32, u32)>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub working_day: Vec<String>,
}

impl Vacancy {
    pub fn status_enum(&self) -> VacancyStatus {
        VacancyStatus::from(self.status.as_str())
    }

    /// Salary as shown on cards, e.g. `$12,000 - $18,000 MXN`.
    pub fn salary_range(&self) -> String {
        match &self.salary {
            Some(salary) => {
                let coin = if salary.coin.trim().is_empty() {
                    "MXN"
                } else {
                    salary.coin.trim()
                };
                format!(
                    "${} - ${} {}",
                    group_thousands(salary.min.round() as i64),
                    group_thousands(salary.max.round() as i64),
                    coin
                )
            }
            None => String::new(),
        }
    }

    /// Working days joined for display: `Lunes, Martes y Miércoles`.
    pub fn working_days_label(&self) -> String {
        format_working_days(&self.working_day)
    }
}

/// Company summary attached to a vacancy in the linker listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacancyCompany {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trade_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub legal_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Row of the linker vacancy list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacancyItem {
    #[serde(rename = "Vacancy")]
    pub vacancy: Vacancy,
    #[serde(rename = "Company")]
    pub company: VacancyCompany,
}

impl ListRow for Vacancy {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> String {
        normalize_text(&format!(
            "{} {} {} {}",
            self.name,
            self.location,
            self.modality,
            self.business_sector.as_deref().unwrap_or("")
        ))
    }
}

impl ListRow for VacancyItem {
    fn row_id(&self) -> &str {
        &self.vacancy.id
    }

    fn search_text(&self) -> String {
        format!(
            "{} {}",
            self.vacancy.search_text(),
            normalize_text(&self.company.trade_name)
        )
    }
}

/// Format working day codes (`LUNES`, `MIERCOLES`) for display.
pub fn format_working_days(days: &[String]) -> String {
    let formatted: Vec<String> = days
        .iter()
        .map(|day| match day.to_uppercase().as_str() {
            "LUNES" => "Lunes".to_string(),
            "MARTES" => "Martes".to_string(),
            "MIERCOLES" => "Miércoles".to_string(),
            "JUEVES" => "Jueves".to_string(),
            "VIERNES" => "Viernes".to_string(),
            "SABADO" => "Sábado".to_string(),
            "DOMINGO" => "Domingo".to_string(),
            _ => day.clone(),
        })
        .collect();

    match formatted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} y {}", rest.join(", "), last),
    }
}
