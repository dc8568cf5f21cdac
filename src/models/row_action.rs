//! Row action models: approve/reject reviews and direct status transitions.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Reviewer decision on a pending row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approve => write!(f, "approve"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Approve/reject request for a single row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowActionRequest {
    pub row_id: String,
    pub decision: Decision,
    #[serde(default)]
    pub reason: Option<String>,
}

impl RowActionRequest {
    /// Approve `row_id`.
    pub fn approve(row_id: impl Into<String>) -> Self {
        Self {
            row_id: row_id.into(),
            decision: Decision::Approve,
            reason: None,
        }
    }

    /// Reject `row_id` with a reason.
    pub fn reject(row_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            row_id: row_id.into(),
            decision: Decision::Reject,
            reason: Some(reason.into()),
        }
    }

    /// A rejection must carry a non-blank reason.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.row_id.trim().is_empty() {
            return Err(AppError::invalid_input_field("Row ID is required", "rowId"));
        }
        if self.decision == Decision::Reject
            && self.reason.as_deref().is_none_or(|r| r.trim().is_empty())
        {
            return Err(AppError::invalid_input_field(
                "A reason is required to reject",
                "reason",
            ));
        }
        Ok(())
    }

    /// Body sent to the review endpoint.
    pub fn body(&self) -> ReviewBody {
        let comment = match self.decision {
            Decision::Approve => None,
            Decision::Reject => self.reason.as_ref().map(|r| r.trim().to_string()),
        };
        ReviewBody {
            validation: self.decision == Decision::Approve,
            comment,
        }
    }
}

/// PATCH body of a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewBody {
    pub validation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Direct status change of a row, e.g. closing a vacancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTransition {
    pub row_id: String,
    /// Status field name in the PUT body (`companyStatus`, `status`).
    pub field: String,
    /// Target status.
    pub value: String,
}

impl StatusTransition {
    pub fn new(
        row_id: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            row_id: row_id.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// PUT body: `{ <field>: <value> }`.
    pub fn body(&self) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert(
            self.field.clone(),
            serde_json::Value::String(self.value.clone()),
        );
        serde_json::Value::Object(body)
    }
}

/// What a dispatch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Backend accepted the change.
    Applied,
    /// Backend answered 409: the row was already in the target state.
    AlreadyApplied,
    /// A previous action on the same row is still running; nothing was sent.
    InFlight,
}

impl DispatchOutcome {
    /// Whether the row changed (or already had) the requested state.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Applied | Self::AlreadyApplied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_requires_reason() {
        let mut request = RowActionRequest::reject("c-1", "   ");
        assert!(request.validate().is_err());

        request.reason = None;
        assert!(request.validate().is_err());

        request.reason = Some("RFC inválido".to_string());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_approve_body_omits_comment() {
        let body = RowActionRequest::approve("c-1").body();
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"validation":true}"#);
    }

    #[test]
    fn test_reject_body_carries_comment() {
        let body = RowActionRequest::reject("u-9", " Documentos incompletos ").body();
        assert!(!body.validation);
        assert_eq!(body.comment.as_deref(), Some("Documentos incompletos"));
    }

    #[test]
    fn test_transition_body() {
        let transition = StatusTransition::new("v-3", "companyStatus", "CERRADA");
        assert_eq!(
            transition.body(),
            serde_json::json!({ "companyStatus": "CERRADA" })
        );
    }

    #[test]
    fn test_request_deserialize() {
        let json = r#"{"rowId": "c-1", "decision": "reject", "reason": "Duplicada"}"#;
        let request: RowActionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.decision, Decision::Reject);
        assert_eq!(request.reason.as_deref(), Some("Duplicada"));
    }
}
