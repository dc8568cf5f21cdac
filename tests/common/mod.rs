//! Shared fixtures for the integration tests.
//!
//! `FakeTransport` answers requests from a script and records every request
//! it sees, so tests can assert on endpoints, parameters and bodies.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use talent_portal::commands::PortalContext;
use talent_portal::services::notifications::NoticeBuffer;
use talent_portal::services::session::{Role, Session};
use talent_portal::services::Transport;
use talent_portal::AppError;
use tokio::sync::Notify;

/// A request seen by the fake.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub endpoint: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Recorded {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Blocks the first PATCH until released.
pub struct PatchGate {
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
}

#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<VecDeque<Result<Value, AppError>>>,
    requests: Mutex<Vec<Recorded>>,
    gate: Mutex<Option<PatchGate>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue the answer for the next request.
    pub fn respond(&self, response: Result<Value, AppError>) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn respond_ok(&self, body: Value) -> &Self {
        self.respond(Ok(body))
    }

    pub fn respond_status(&self, status: u16) -> &Self {
        self.respond(Err(AppError::api_full("scripted failure", status, "/fake")))
    }

    /// Hold the next PATCH until `release` is notified.
    pub fn gate_next_patch(&self) -> (Arc<Notify>, Arc<Notify>) {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(PatchGate {
            started: Arc::clone(&started),
            release: Arc::clone(&release),
        });
        (started, release)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_by(&self, method: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }

    fn record(&self, method: &'static str, endpoint: &str, params: &[(String, String)], body: Option<&Value>) {
        self.requests.lock().unwrap().push(Recorded {
            method,
            endpoint: endpoint.to_string(),
            params: params.to_vec(),
            body: body.cloned(),
        });
    }

    fn next_response(&self) -> Result<Value, AppError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({ "data": [] })))
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value, AppError> {
        self.record("GET", endpoint, params, None);
        self.next_response()
    }

    async fn patch(&self, endpoint: &str, body: &Value) -> Result<Value, AppError> {
        self.record("PATCH", endpoint, &[], Some(body));
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }
        self.next_response()
    }

    async fn put(&self, endpoint: &str, body: &Value) -> Result<Value, AppError> {
        self.record("PUT", endpoint, &[], Some(body));
        self.next_response()
    }
}

pub fn linker_session() -> Session {
    Session::new("7", "linker-token", Role::Linker).unwrap()
}

pub fn employer_session() -> Session {
    Session::new("3", "employer-token", Role::Employer)
        .unwrap()
        .with_account_status("APROBADA")
}

/// Context over a fake transport, plus the buffer receiving its notices.
pub fn context(session: Session, transport: Arc<FakeTransport>) -> (PortalContext, NoticeBuffer) {
    let notices = NoticeBuffer::new();
    let ctx = PortalContext::new(session, transport, Arc::new(notices.clone()));
    (ctx, notices)
}

pub fn company_row(id: &str, trade_name: &str) -> Value {
    json!({
        "Company": {
            "id": id,
            "tradeName": trade_name,
            "legalName": format!("{} SA de CV", trade_name),
            "workSector": "ALIMENTOS",
            "registeredAt": "2025-02-10",
            "status": "REVISION"
        },
        "CompanyAccount": {
            "id": format!("acc-{}", id),
            "firstName": "Lucía",
            "lastName": "Ramos",
            "email": "lucia@example.com"
        }
    })
}

pub fn vacancy_item(id: &str, name: &str) -> Value {
    json!({
        "Vacancy": {
            "id": id,
            "name": name,
            "status": "REVISION",
            "salary": { "coin": "MXN", "min": 9000, "max": 12000 }
        },
        "Company": { "id": "c-1", "tradeName": "Clínica del Valle", "legalName": "CDV SA" }
    })
}

pub fn user_row(id: &str, first_name: &str) -> Value {
    json!({
        "User": {
            "id": id,
            "firstName": first_name,
            "lastName": "Pérez",
            "email": format!("{}@example.com", id),
            "academicLevel": "LICENCIATURA",
            "status": "REVISION"
        }
    })
}

pub fn employer_vacancy(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": "APROBADA",
        "companyStatus": "ABIERTA",
        "numberOpenings": 2,
        "workingDay": ["LUNES", "MARTES"]
    })
}
