//! Row action dispatch tests.
//!
//! Covers the action side of the list screens:
//! 1. A second action on a row with one in flight sends nothing
//! 2. A 409 on a status change counts as success
//! 3. Rejections need a reason before anything is sent
//! 4. A failed action keeps the rows and sends the error notice
//! 5. Employer actions need an approved employer session
//! 6. Reviews load the list first and act on rows outside it too

mod common;

use common::{
    company_row, context, employer_session, employer_vacancy, linker_session, user_row,
    FakeTransport,
};
use serde_json::json;
use std::sync::Arc;
use talent_portal::commands::{
    close_vacancy, list_employer_vacancies, resubmit_company, review, ListInput, ReviewInput,
    ReviewTarget,
};
use talent_portal::models::{Decision, DispatchOutcome, RowActionRequest};
use talent_portal::services::list_view::ViewState;
use talent_portal::services::notifications::NoticeLevel;
use talent_portal::services::row_actions::RowActionDispatcher;
use talent_portal::services::session::{Role, Session};
use talent_portal::AppError;

const COMPANIES: &str = "/linkers/7/companies";

/// Test: While an approval is running, further actions on the same row are
/// refused without a request; other rows are unaffected
#[tokio::test]
async fn test_in_flight_row_refuses_second_action() {
    let transport = FakeTransport::new();
    let (started, release) = transport.gate_next_patch();
    let dispatcher = RowActionDispatcher::new(transport.clone());

    let first = {
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            dispatcher
                .dispatch(COMPANIES, &RowActionRequest::approve("c-1"))
                .await
        })
    };

    started.notified().await;
    assert!(dispatcher.is_in_flight(COMPANIES, "c-1"));

    let second = dispatcher
        .dispatch(COMPANIES, &RowActionRequest::reject("c-1", "Datos incompletos"))
        .await
        .unwrap();
    assert_eq!(second, DispatchOutcome::InFlight);

    let other = dispatcher
        .dispatch(COMPANIES, &RowActionRequest::approve("c-2"))
        .await
        .unwrap();
    assert_eq!(other, DispatchOutcome::Applied);

    release.notify_one();
    let first = first.await.unwrap().unwrap();
    assert_eq!(first, DispatchOutcome::Applied);
    assert!(!dispatcher.is_in_flight(COMPANIES, "c-1"));

    let patches = transport.requests_by("PATCH");
    let endpoints: Vec<&str> = patches.iter().map(|r| r.endpoint.as_str()).collect();
    assert_eq!(
        endpoints,
        vec!["/linkers/7/companies/c-1", "/linkers/7/companies/c-2"]
    );
}

/// Test: The in-flight flag is cleared when the request fails
#[tokio::test]
async fn test_in_flight_cleared_after_failure() {
    let transport = FakeTransport::new();
    transport.respond(Err(AppError::network("connection reset")));
    let dispatcher = RowActionDispatcher::new(transport.clone());

    let result = dispatcher
        .dispatch(COMPANIES, &RowActionRequest::approve("c-1"))
        .await;
    assert!(matches!(result, Err(AppError::Network { .. })));
    assert!(!dispatcher.is_in_flight(COMPANIES, "c-1"));

    let retry = dispatcher
        .dispatch(COMPANIES, &RowActionRequest::approve("c-1"))
        .await
        .unwrap();
    assert_eq!(retry, DispatchOutcome::Applied);
}

/// Test: Closing a vacancy that is already closed (409) still succeeds and
/// refetches the list
#[tokio::test]
async fn test_close_vacancy_conflict_is_success() {
    let transport = FakeTransport::new();
    transport
        .respond_ok(json!({ "data": [employer_vacancy("v-1", "Recepcionista")] }))
        .respond_status(409)
        .respond_ok(json!({ "data": [] }));
    let (ctx, notices) = context(employer_session(), Arc::clone(&transport));

    let response = close_vacancy(&ctx, " v-1 ").await.unwrap();
    assert!(response.success);
    assert_eq!(response.state, ViewState::Empty);
    assert_eq!(response.remaining_rows, 0);

    let puts = transport.requests_by("PUT");
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].endpoint, "/companies/3/vacancies/v-1");
    assert_eq!(puts[0].body, Some(json!({ "companyStatus": "CERRADA" })));
    assert_eq!(transport.requests_by("GET").len(), 2);

    let drained = notices.drain();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].level, NoticeLevel::Success);
    assert_eq!(drained[0].message, "Vacante cerrada correctamente.");
}

/// Test: Resubmitting a company already in review is tolerated
#[tokio::test]
async fn test_resubmit_company_conflict_tolerated() {
    let transport = FakeTransport::new();
    transport.respond_status(409);
    let (ctx, notices) = context(employer_session(), Arc::clone(&transport));

    let outcome = resubmit_company(&ctx).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::AlreadyApplied);
    assert!(outcome.is_success());

    let put = &transport.requests_by("PUT")[0];
    assert_eq!(put.endpoint, "/companies/3/status");
    assert_eq!(put.body, Some(json!({ "status": "REVISION" })));
    assert_eq!(notices.drain()[0].message, "Tu empresa fue enviada a revisión.");
}

/// Test: Resubmitting fails with the error notice on other statuses
#[tokio::test]
async fn test_resubmit_company_failure_notifies() {
    let transport = FakeTransport::new();
    transport.respond_status(500);
    let (ctx, notices) = context(employer_session(), Arc::clone(&transport));

    let result = resubmit_company(&ctx).await;
    assert_eq!(result.unwrap_err().status_code(), Some(500));

    let drained = notices.drain();
    assert!(drained[0].is_error());
    assert_eq!(drained[0].message, "Error al actualizar el estatus.");
}

/// Test: Rejecting without a reason sends nothing
#[tokio::test]
async fn test_reject_without_reason_sends_nothing() {
    let transport = FakeTransport::new();
    let (ctx, _notices) = context(linker_session(), Arc::clone(&transport));

    let input = ReviewInput {
        target: ReviewTarget::Companies,
        row_id: "c-1".to_string(),
        decision: Decision::Reject,
        reason: Some("   ".to_string()),
    };
    let result = review(&ctx, input).await;

    match result {
        Err(AppError::InvalidInput { field, .. }) => assert_eq!(field.as_deref(), Some("reason")),
        other => panic!("expected invalid input, got {:?}", other.map(|r| r.success)),
    }
    assert!(transport.requests().is_empty());
}

/// Test: Rejecting a user sends the reason as comment
#[tokio::test]
async fn test_reject_user_sends_comment() {
    let transport = FakeTransport::new();
    transport
        .respond_ok(json!({ "data": { "users": [user_row("u-5", "Carla")], "total": 1 } }))
        .respond_ok(json!({}))
        .respond_ok(json!({ "data": { "users": [], "total": 0 } }));
    let (ctx, notices) = context(linker_session(), Arc::clone(&transport));

    let input = ReviewInput {
        target: ReviewTarget::Users,
        row_id: "u-5".to_string(),
        decision: Decision::Reject,
        reason: Some(" Documentación ilegible ".to_string()),
    };
    let response = review(&ctx, input).await.unwrap();
    assert!(response.success);
    assert_eq!(response.total_items, 0);

    let patch = &transport.requests_by("PATCH")[0];
    assert_eq!(patch.endpoint, "/linkers/7/users/u-5");
    assert_eq!(
        patch.body,
        Some(json!({ "validation": false, "comment": "Documentación ilegible" }))
    );
    assert_eq!(notices.drain()[0].message, "Usuario rechazado correctamente.");
}

/// Test: A failed approval keeps the rows and sends the action error notice
#[tokio::test]
async fn test_failed_action_keeps_rows() {
    let transport = FakeTransport::new();
    transport
        .respond_ok(json!({
            "data": { "companies": [company_row("c-1", "Panadería Sol")], "total": 1 }
        }))
        .respond_status(500);
    let (ctx, notices) = context(linker_session(), Arc::clone(&transport));

    let input = ReviewInput {
        target: ReviewTarget::Companies,
        row_id: "c-1".to_string(),
        decision: Decision::Approve,
        reason: None,
    };
    let response = review(&ctx, input).await.unwrap();

    assert!(!response.success);
    assert_eq!(response.remaining_rows, 1);
    assert_eq!(response.state, ViewState::Ready { faded: false });

    let methods: Vec<&str> = transport.requests().iter().map(|r| r.method).collect();
    assert_eq!(methods, vec!["GET", "PATCH"]);

    let drained = notices.drain();
    assert_eq!(drained.len(), 1);
    assert!(drained[0].is_error());
    assert_eq!(drained[0].message, "Ocurrió un error al procesar la solicitud.");
}

/// Test: Employer lists and actions are refused while the account is in
/// review
#[tokio::test]
async fn test_employer_in_review_refused() {
    let transport = FakeTransport::new();
    let session = Session::new("3", "employer-token", Role::Employer)
        .unwrap()
        .with_account_status("REVISION");
    let (ctx, _notices) = context(session, Arc::clone(&transport));

    assert!(list_employer_vacancies(&ctx, ListInput::default()).await.is_err());
    assert!(close_vacancy(&ctx, "v-1").await.is_err());
    assert!(transport.requests().is_empty());
}

/// Test: A linker cannot use employer actions, and an employer cannot review
#[tokio::test]
async fn test_role_scoping() {
    let transport = FakeTransport::new();

    let (linker, _) = context(linker_session(), Arc::clone(&transport));
    assert!(close_vacancy(&linker, "v-1").await.is_err());
    assert!(resubmit_company(&linker).await.is_err());

    let (employer, _) = context(employer_session(), Arc::clone(&transport));
    let input = ReviewInput {
        target: ReviewTarget::Vacancies,
        row_id: "v-1".to_string(),
        decision: Decision::Approve,
        reason: None,
    };
    assert!(review(&employer, input).await.is_err());

    assert!(transport.requests().is_empty());
}

/// Test: A row outside the loaded page is still reviewed, without a detail
#[tokio::test]
async fn test_review_row_outside_loaded_page() {
    let transport = FakeTransport::new();
    transport
        .respond_ok(json!({
            "data": { "companies": [company_row("c-1", "Panadería Sol")], "total": 12 }
        }))
        .respond_ok(json!({}))
        .respond_ok(json!({
            "data": { "companies": [company_row("c-1", "Panadería Sol")], "total": 11 }
        }));
    let (ctx, notices) = context(linker_session(), Arc::clone(&transport));

    let input = ReviewInput {
        target: ReviewTarget::Companies,
        row_id: "c-99".to_string(),
        decision: Decision::Approve,
        reason: None,
    };
    let response = review(&ctx, input).await.unwrap();

    assert!(response.success);
    assert_eq!(response.total_items, 11);

    let methods: Vec<&str> = transport.requests().iter().map(|r| r.method).collect();
    assert_eq!(methods, vec!["GET", "PATCH", "GET"]);
    assert_eq!(
        transport.requests_by("PATCH")[0].endpoint,
        "/linkers/7/companies/c-99"
    );
    assert_eq!(notices.drain()[0].message, "Empresa aprobada correctamente.");
}
