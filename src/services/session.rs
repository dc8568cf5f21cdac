//! Authenticated request context.
//!
//! A `Session` is created once after login and handed to every client, view
//! and command that talks to the backend. Nothing reads it from global state.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Portal role of the logged-in account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform moderator.
    Linker,
    /// Company account.
    Employer,
    /// Job seeker.
    Applicant,
}

impl std::str::FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linker" => Ok(Self::Linker),
            "employer" | "company" => Ok(Self::Employer),
            "applicant" | "user" => Ok(Self::Applicant),
            other => Err(AppError::invalid_input_field(
                format!("Unknown role '{}'", other),
                "role",
            )),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linker => write!(f, "linker"),
            Self::Employer => write!(f, "employer"),
            Self::Applicant => write!(f, "applicant"),
        }
    }
}

/// Account id, bearer token and role of the current login.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub account_id: String,
    pub token: String,
    pub role: Role,
    /// Employer account status as returned at login.
    #[serde(default)]
    pub account_status: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("account_id", &self.account_id)
            .field("token", &"<redacted>")
            .field("role", &self.role)
            .field("account_status", &self.account_status)
            .finish()
    }
}

impl Session {
    /// Create a session; id and token must be non-empty.
    pub fn new(
        account_id: impl Into<String>,
        token: impl Into<String>,
        role: Role,
    ) -> Result<Self, AppError> {
        let account_id = account_id.into().trim().to_string();
        let token = token.into().trim().to_string();

        if account_id.is_empty() {
            return Err(AppError::invalid_input_field(
                "Session has no account ID",
                "accountId",
            ));
        }
        if token.is_empty() {
            return Err(AppError::invalid_input_field("Session has no token", "token"));
        }

        Ok(Self {
            account_id,
            token,
            role,
            account_status: None,
        })
    }

    /// Attach the employer account status.
    pub fn with_account_status(mut self, status: impl Into<String>) -> Self {
        self.account_status = Some(status.into());
        self
    }

    /// Path prefix of the resources owned by this account.
    ///
    /// Linkers act under `/linkers/{id}`, employers under `/companies/{id}`.
    pub fn scope_path(&self) -> Result<String, AppError> {
        let segment = match self.role {
            Role::Linker => "linkers",
            Role::Employer => "companies",
            Role::Applicant => {
                return Err(AppError::invalid_input_field(
                    "Applicant accounts have no management scope",
                    "role",
                ))
            }
        };
        Ok(format!(
            "/{}/{}",
            segment,
            urlencoding::encode(&self.account_id)
        ))
    }

    /// Fail unless the session has the given role.
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::invalid_input_field(
                format!("This action requires a {} session, not {}", role, self.role),
                "role",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_blank_fields() {
        assert!(Session::new("", "tok", Role::Linker).is_err());
        assert!(Session::new("7", "  ", Role::Linker).is_err());
        assert!(Session::new("7", "tok", Role::Linker).is_ok());
    }

    #[test]
    fn test_scope_path() {
        let linker = Session::new("42", "tok", Role::Linker).unwrap();
        assert_eq!(linker.scope_path().unwrap(), "/linkers/42");

        let employer = Session::new("c 9", "tok", Role::Employer).unwrap();
        assert_eq!(employer.scope_path().unwrap(), "/companies/c%209");

        let applicant = Session::new("u1", "tok", Role::Applicant).unwrap();
        assert!(applicant.scope_path().is_err());
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("Linker".parse::<Role>().unwrap(), Role::Linker);
        assert_eq!("company".parse::<Role>().unwrap(), Role::Employer);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new("42", "secret-token", Role::Linker).unwrap();
        let debug = format!("{:?}", session);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }
}
