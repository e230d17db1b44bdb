//! Shared fixtures for the service-level tests: a scripted transport that
//! records every request and replays queued responses.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use client_lib::adapters::MemorySessionStorage;
use client_lib::{ApiClient, SessionStore};
use serde_json::Value;
use signal_client_core::domain::Session;
use signal_client_core::ports::{
    HttpTransport, PortError, PortResult, TransportRequest, TransportResponse,
};

pub const BASE_URL: &str = "http://signals.test";
pub const FAR_FUTURE: i64 = 4_102_444_800;

#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<PortResult<TransportResponse>>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, response: PortResult<TransportResponse>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn push_json(&self, status: u16, body: Value) {
        self.push(Ok(json_response(status, body)));
    }

    pub fn push_envelope(&self, code: i64, message: &str, data: Value) {
        self.push_json(
            200,
            serde_json::json!({ "code": code, "message": message, "data": data }),
        );
    }

    pub fn push_failure(&self) {
        self.push(Err(PortError::Unexpected("connection refused".to_string())));
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> TransportRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn last_body(&self) -> Value {
        let body = self.last_request().body.expect("request had no body");
        serde_json::from_str(&body).unwrap()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: TransportRequest) -> PortResult<TransportResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PortError::Unexpected("no scripted response".to_string())))
    }
}

pub fn json_response(status: u16, body: Value) -> TransportResponse {
    TransportResponse {
        status,
        headers: vec![(
            "content-type".to_string(),
            "application/json; charset=utf-8".to_string(),
        )],
        body: body.to_string(),
    }
}

pub struct Harness {
    pub client: ApiClient,
    pub transport: Arc<ScriptedTransport>,
    pub session: SessionStore,
}

pub fn harness() -> Harness {
    let transport = ScriptedTransport::new();
    let session = SessionStore::new(Arc::new(MemorySessionStorage::new()));
    let client = ApiClient::new(BASE_URL, transport.clone(), session.clone());
    Harness {
        client,
        transport,
        session,
    }
}

pub fn signed_in_harness() -> Harness {
    let harness = harness();
    harness
        .session
        .save(&Session {
            user_id: "42".to_string(),
            email: Some("trader@example.com".to_string()),
            token: "tok-abc".to_string(),
            expires_at: Some(FAR_FUTURE),
        })
        .unwrap();
    harness
}
