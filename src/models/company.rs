//! Company registration model.

use crate::models::list::{null_as_default, ListRow};
use crate::services::text::normalize_text;
use serde::{Deserialize, Serialize};

/// Review status of a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompanyStatus {
    Revision,
    Activa,
    Inactiva,
    Rechazada,
    Aprobada,
}

impl From<&str> for CompanyStatus {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "ACTIVA" => Self::Activa,
            "INACTIVA" => Self::Inactiva,
            "RECHAZADA" => Self::Rechazada,
            "APROBADA" => Self::Aprobada,
            _ => Self::Revision,
        }
    }
}

impl std::fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Revision => write!(f, "REVISION"),
            Self::Activa => write!(f, "ACTIVA"),
            Self::Inactiva => write!(f, "INACTIVA"),
            Self::Rechazada => write!(f, "RECHAZADA"),
            Self::Aprobada => write!(f, "APROBADA"),
        }
    }
}

impl CompanyStatus {
    /// Label shown in status badges.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Revision => "En revisión",
            Self::Activa => "Activa",
            Self::Inactiva => "Inactiva",
            Self::Rechazada => "Rechazada",
            Self::Aprobada => "Aprobada",
        }
    }
}

/// Employer account standing, as far as the employer portal cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    Aprobada,
    Revision,
    Rechazada,
}

impl AccountStatus {
    /// Map whatever status string the session carries.
    ///
    /// Missing or unrecognized values count as approved.
    pub fn from_loose(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Aprobada;
        };
        let s = raw.to_lowercase();
        if s.contains("reject") || s.contains("rechaz") {
            Self::Rechazada
        } else if ["review", "pending", "revision", "pendiente"]
            .iter()
            .any(|needle| s.contains(needle))
        {
            Self::Revision
        } else {
            Self::Aprobada
        }
    }
}

/// Company record as sent by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trade_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub legal_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub zip_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub street: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub street_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub district: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub municipality: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub investment_country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_workers: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rfc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub work_sector: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub registered_at: String,

    /// Raw status: `REVISION`, `ACTIVA`, `INACTIVA`, `RECHAZADA`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,

    /// Reviewer comment from the last rejection.
    pub comment: Option<String>,

    #[serde(rename = "LinkerId", default)]
    pub linker_id: Option<String>,
}

impl Company {
    /// Parse the status string into an enum.
    pub fn status_enum(&self) -> CompanyStatus {
        CompanyStatus::from(self.status.as_str())
    }

    /// One-line postal address.
    pub fn address(&self) -> String {
        format!(
            "{} #{}, {}, {}, {}, {}",
            self.street,
            self.street_number,
            self.district,
            self.municipality,
            self.state,
            self.zip_code
        )
    }
}

/// Contact person who registered the company.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyAccount {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cell_phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub landline_phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job_title: String,
}

impl CompanyAccount {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Row of the linker company lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyData {
    #[serde(rename = "Company")]
    pub company: Company,
    #[serde(rename = "CompanyAccount")]
    pub account: CompanyAccount,
}

impl ListRow for CompanyData {
    fn row_id(&self) -> &str {
        &self.company.id
    }

    fn search_text(&self) -> String {
        normalize_text(&format!(
            "{} {} {} {} {}",
            self.company.trade_name,
            self.company.legal_name,
            self.company.work_sector,
            self.account.full_name(),
            self.account.email
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_str() {
        assert_eq!(CompanyStatus::from("ACTIVA"), CompanyStatus::Activa);
        assert_eq!(CompanyStatus::from("rechazada"), CompanyStatus::Rechazada);
        assert_eq!(CompanyStatus::from("unknown"), CompanyStatus::Revision);
        assert_eq!(CompanyStatus::Revision.label(), "En revisión");
    }

    #[test]
    fn test_account_status_from_loose() {
        assert_eq!(AccountStatus::from_loose(None), AccountStatus::Aprobada);
        assert_eq!(
            AccountStatus::from_loose(Some("RECHAZADA")),
            AccountStatus::Rechazada
        );
        assert_eq!(
            AccountStatus::from_loose(Some("pending_review")),
            AccountStatus::Revision
        );
        assert_eq!(
            AccountStatus::from_loose(Some("ACTIVA")),
            AccountStatus::Aprobada
        );
    }

    #[test]
    fn test_company_data_deserialize() {
        let json = r#"{
            "Company": {
                "id": "c-1",
                "tradeName": "Panadería Núñez",
                "legalName": "Núñez SA de CV",
                "status": "REVISION",
                "comment": null,
                "LinkerId": null,
                "totalWorkers": 12
            },
            "CompanyAccount": {
                "id": "a-1",
                "firstName": "Lucía",
                "lastName": "Ramos",
                "email": "lucia@example.com"
            }
        }"#;
        let data: CompanyData = serde_json::from_str(json).unwrap();
        assert_eq!(data.row_id(), "c-1");
        assert_eq!(data.company.status_enum(), CompanyStatus::Revision);
        assert_eq!(data.account.full_name(), "Lucía Ramos");
        assert!(data.search_text().contains("panaderia nunez"));
    }
}
