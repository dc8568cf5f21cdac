//! List screens of the portals.

use crate::services::list_view::{ViewMessages, ViewSpec};
use crate::services::session::Role;
use serde::{Deserialize, Serialize};

/// The list screens of the linker and employer portals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    PendingCompanies,
    ApprovedCompanies,
    PendingUsers,
    PendingVacancies,
    EmployerVacancies,
}

impl ViewKind {
    /// Role whose scope the view lives under.
    pub fn required_role(&self) -> Role {
        match self {
            Self::EmployerVacancies => Role::Employer,
            _ => Role::Linker,
        }
    }

    /// Collection, status and texts of the view.
    pub fn spec(&self) -> ViewSpec {
        match self {
            Self::PendingCompanies => ViewSpec {
                entity: "companies".to_string(),
                collection_key: "companies".to_string(),
                item_wrapper: None,
                fixed_status: Some("REVISION".to_string()),
                messages: messages(
                    "Empresas pendientes",
                    "No hay solicitudes de empresas en revisión.",
                    "No se pudieron cargar las empresas pendientes.",
                    ("Empresa aprobada correctamente.", "Empresa rechazada correctamente."),
                    "Ocurrió un error al procesar la solicitud.",
                ),
            },
            Self::ApprovedCompanies => ViewSpec {
                entity: "companies".to_string(),
                collection_key: "companies".to_string(),
                item_wrapper: None,
                fixed_status: Some("ACTIVA".to_string()),
                messages: messages(
                    "Empresas aprobadas",
                    "No hay empresas aprobadas.",
                    "No se pudieron cargar las empresas aprobadas.",
                    ("Empresa aprobada correctamente.", "Empresa rechazada correctamente."),
                    "Ocurrió un error al procesar la solicitud.",
                ),
            },
            Self::PendingUsers => ViewSpec {
                entity: "users".to_string(),
                collection_key: "users".to_string(),
                item_wrapper: Some("User".to_string()),
                fixed_status: Some("REVISION".to_string()),
                messages: messages(
                    "Usuarios pendientes",
                    "No se encontraron usuarios.",
                    "No se pudieron cargar los usuarios pendientes.",
                    ("Usuario aprobado correctamente.", "Usuario rechazado correctamente."),
                    "Ocurrió un error al actualizar el estatus del usuario.",
                ),
            },
            Self::PendingVacancies => ViewSpec {
                entity: "vacancies".to_string(),
                collection_key: "vacancies".to_string(),
                item_wrapper: None,
                fixed_status: Some("REVISION".to_string()),
                messages: messages(
                    "Vacantes pendientes",
                    "Todavía no tienes solicitudes de vacantes en revisión.",
                    "No se pudieron cargar las solicitudes pendientes.",
                    ("Vacante aprobada correctamente.", "Vacante rechazada correctamente."),
                    "Ocurrió un error al actualizar la vacante.",
                ),
            },
            Self::EmployerVacancies => ViewSpec {
                entity: "vacancies".to_string(),
                collection_key: "vacancies".to_string(),
                item_wrapper: None,
                fixed_status: Some("ABIERTA".to_string()),
                messages: messages(
                    "Mis vacantes",
                    "No tienes vacantes abiertas.",
                    "No se pudieron cargar las vacantes.",
                    ("Vacante aprobada correctamente.", "Vacante rechazada correctamente."),
                    "No se pudo cerrar la vacante.",
                ),
            },
        }
    }
}

fn messages(
    title: &str,
    empty: &str,
    load_error: &str,
    (approved, rejected): (&str, &str),
    action_error: &str,
) -> ViewMessages {
    ViewMessages {
        title: title.to_string(),
        empty: empty.to_string(),
        load_error: load_error.to_string(),
        approved: approved.to_string(),
        rejected: rejected.to_string(),
        action_error: action_error.to_string(),
    }
}
