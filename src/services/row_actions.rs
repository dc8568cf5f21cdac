//! Row action dispatcher.
//!
//! Sends approve/reject reviews and direct status transitions for single
//! rows. Nothing is queued or retried: one request per action, and the
//! list view refetches afterwards.

use crate::error::AppError;
use crate::models::{DispatchOutcome, RowActionRequest, StatusTransition};
use crate::services::api_client::{row_endpoint, Transport};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

/// Dispatches row actions and tracks which rows have one in flight.
///
/// Clones share the in-flight set.
#[derive(Clone)]
pub struct RowActionDispatcher {
    transport: Arc<dyn Transport>,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

/// Clears a row's in-flight flag when dropped.
struct InFlightGuard {
    in_flight: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock(&self.in_flight).remove(&self.key);
    }
}

fn lock(set: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RowActionDispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Check if an action on `row_endpoint` is still running.
    pub fn is_in_flight(&self, endpoint_base: &str, row_id: &str) -> bool {
        lock(&self.in_flight).contains(&row_endpoint(endpoint_base, row_id))
    }

    fn try_claim(&self, key: String) -> Option<InFlightGuard> {
        let mut set = lock(&self.in_flight);
        if set.insert(key.clone()) {
            Some(InFlightGuard {
                in_flight: Arc::clone(&self.in_flight),
                key,
            })
        } else {
            None
        }
    }

    /// Approve or reject a row.
    ///
    /// # Arguments
    /// * `endpoint_base` - Collection endpoint, e.g. `/linkers/7/companies`
    /// * `request` - Row and decision
    ///
    /// # Returns
    /// `Applied` on a 2xx answer, `InFlight` if the row already has an action
    /// running. Validation and HTTP failures are errors.
    pub async fn dispatch(
        &self,
        endpoint_base: &str,
        request: &RowActionRequest,
    ) -> Result<DispatchOutcome, AppError> {
        request.validate()?;

        let endpoint = row_endpoint(endpoint_base, &request.row_id);
        let Some(_guard) = self.try_claim(endpoint.clone()) else {
            log::warn!("Ignoring {} on {}: previous action still running", request.decision, endpoint);
            return Ok(DispatchOutcome::InFlight);
        };

        let body = serde_json::to_value(request.body())?;
        let start = Instant::now();

        match self.transport.patch(&endpoint, &body).await {
            Ok(_) => {
                log::info!(
                    "{} {} in {}ms",
                    request.decision,
                    endpoint,
                    start.elapsed().as_millis()
                );
                Ok(DispatchOutcome::Applied)
            }
            Err(e) => {
                log::error!("{} {} failed: {}", request.decision, endpoint, e);
                Err(e)
            }
        }
    }

    /// Move a row directly to another status.
    ///
    /// A 409 answer means the row is already in the target status and is
    /// reported as `AlreadyApplied`.
    pub async fn transition(
        &self,
        endpoint_base: &str,
        transition: &StatusTransition,
    ) -> Result<DispatchOutcome, AppError> {
        if transition.row_id.trim().is_empty() {
            return Err(AppError::invalid_input_field("Row ID is required", "rowId"));
        }
        if transition.field.trim().is_empty() || transition.value.trim().is_empty() {
            return Err(AppError::invalid_input_field(
                "Status field and value are required",
                "value",
            ));
        }

        let endpoint = row_endpoint(endpoint_base, &transition.row_id);
        let Some(_guard) = self.try_claim(endpoint.clone()) else {
            log::warn!("Ignoring transition on {}: previous action still running", endpoint);
            return Ok(DispatchOutcome::InFlight);
        };

        put_status(self.transport.as_ref(), &endpoint, &transition.body()).await
    }
}

/// PUT a status body, treating 409 as already applied.
pub async fn put_status(
    transport: &dyn Transport,
    endpoint: &str,
    body: &serde_json::Value,
) -> Result<DispatchOutcome, AppError> {
    match transport.put(endpoint, body).await {
        Ok(_) => {
            log::info!("Status of {} set to {}", endpoint, body);
            Ok(DispatchOutcome::Applied)
        }
        Err(e) if e.is_conflict() => {
            log::warn!("{} already in requested status (409), continuing", endpoint);
            Ok(DispatchOutcome::AlreadyApplied)
        }
        Err(e) => {
            log::error!("Status change on {} failed: {}", endpoint, e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;

    /// Answers every PUT/PATCH with a fixed status.
    struct StatusTransport(Option<u16>);

    #[async_trait]
    impl Transport for StatusTransport {
        async fn get(&self, _: &str, _: &[(String, String)]) -> Result<Value, AppError> {
            Ok(Value::Null)
        }

        async fn patch(&self, endpoint: &str, _: &Value) -> Result<Value, AppError> {
            self.answer(endpoint)
        }

        async fn put(&self, endpoint: &str, _: &Value) -> Result<Value, AppError> {
            self.answer(endpoint)
        }
    }

    impl StatusTransport {
        fn answer(&self, endpoint: &str) -> Result<Value, AppError> {
            match self.0 {
                None => Ok(Value::Null),
                Some(code) => Err(AppError::api_full("failed", code, endpoint)),
            }
        }
    }

    fn dispatcher(status: Option<u16>) -> RowActionDispatcher {
        RowActionDispatcher::new(Arc::new(StatusTransport(status)))
    }

    #[tokio::test]
    async fn test_dispatch_applied() {
        let outcome = dispatcher(None)
            .dispatch("/linkers/1/companies", &RowActionRequest::approve("c-1"))
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Applied);
    }

    #[tokio::test]
    async fn test_dispatch_validation_error() {
        let request = RowActionRequest {
            reason: None,
            ..RowActionRequest::reject("c-1", "")
        };
        let result = dispatcher(None).dispatch("/linkers/1/companies", &request).await;
        assert!(matches!(result, Err(AppError::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_transition_conflict_is_already_applied() {
        let transition = StatusTransition::new("v-1", "companyStatus", "CERRADA");
        let outcome = dispatcher(Some(409))
            .transition("/companies/3/vacancies", &transition)
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::AlreadyApplied);
    }

    #[tokio::test]
    async fn test_failure_clears_in_flight() {
        let dispatcher = dispatcher(Some(500));
        let result = dispatcher
            .dispatch("/linkers/1/users", &RowActionRequest::approve("u-1"))
            .await;
        assert!(result.is_err());
        assert!(!dispatcher.is_in_flight("/linkers/1/users", "u-1"));
    }
}
