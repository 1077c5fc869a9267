#![allow(clippy::expect_used, dead_code)]
//! Test helpers for integration tests.
//!
//! Provides utilities for:
//! - Building an in-process wardgate host over in-memory storage
//! - Making HTTP requests
//! - Asserting on responses
//!
//! ## Isolation
//! Every [`TestHost`] owns its own `MemoryStore`, so tests run in parallel
//! without sharing a session. Cloning the store into a second host simulates
//! a process restart.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use salvo::http::cookie::Cookie;
use salvo::http::header::HeaderName;
use salvo::http::{Method, ReqBody, StatusCode};
use salvo::prelude::*;
use salvo::test::{RequestBuilder, ResponseExt, TestClient};

use wardgate_service::error::ServiceError;
use wardgate_test::component::app::app::router;
use wardgate_test::component::app::state::AppState;
use wardgate_test::component::auth::{AuthService, CredentialVerifier, VerifyFuture};
use wardgate_test::component::authz::CapabilityPolicy;
use wardgate_test::component::constants::SESSION_COOKIE_NAME;
use wardgate_test::component::guard::RouteGuard;
use wardgate_test::component::guard::routes::RouteTable;
use wardgate_test::component::session::SessionStore;
use wardgate_test::component::storage::MemoryStore;
use wardgate_test::component::{Identity, Role};

pub use tracing;

/// Demo staff accounts: (email, password, role).
pub const DEMO_ACCOUNTS: [(&str, &str, Role); 3] = [
    ("hospital@example.com", "hospital123", Role::HospitalStaff),
    ("medical@example.com", "medical123", Role::MedicalStaff),
    ("insurance@example.com", "insurance123", Role::InsuranceStaff),
];

/// Verifier over [`DEMO_ACCOUNTS`] with plain comparisons, so tests do not
/// pay for Argon2.
pub struct DemoVerifier;

impl CredentialVerifier for DemoVerifier {
    fn verify<'a>(&'a self, email: &'a str, password: &'a str, role: Role) -> VerifyFuture<'a> {
        Box::pin(async move {
            DEMO_ACCOUNTS
                .iter()
                .find(|(e, p, r)| *e == email && *p == password && *r == role)
                .map(|(_, _, r)| Identity::new(r.label(), *r, Utc::now()))
                .ok_or(ServiceError::InvalidCredentials)
        })
    }
}

/// An in-process host and the storage behind its session.
pub struct TestHost {
    pub service: Service,
    pub storage: MemoryStore,
    pub state: Arc<AppState>,
}

impl TestHost {
    /// A hydrated host over fresh storage.
    pub async fn new() -> Self {
        Self::with_storage(MemoryStore::new()).await
    }

    /// A hydrated host over existing storage, as after a restart.
    pub async fn with_storage(storage: MemoryStore) -> Self {
        let host = Self::build(storage, Arc::new(DemoVerifier)).await;
        host.state.auth.session().hydrate().await;
        host
    }

    /// A host whose session has not finished hydrating.
    pub async fn hydrating() -> Self {
        Self::build(MemoryStore::new(), Arc::new(DemoVerifier)).await
    }

    /// A hydrated host with a custom credential verifier.
    pub async fn with_verifier(verifier: Arc<dyn CredentialVerifier>) -> Self {
        let host = Self::build(MemoryStore::new(), verifier).await;
        host.state.auth.session().hydrate().await;
        host
    }

    async fn build(storage: MemoryStore, verifier: Arc<dyn CredentialVerifier>) -> Self {
        let session = Arc::new(SessionStore::new(Arc::new(storage.clone())));
        let guard = RouteGuard::new(session.subscribe(), Arc::new(RouteTable::hospital_default()));
        let auth = AuthService::new(session, verifier, Duration::from_secs(5));
        let policy = CapabilityPolicy::from_table()
            .await
            .expect("capability policy should load");

        let state = Arc::new(AppState {
            auth,
            guard,
            policy,
        });

        Self {
            service: Service::new(router(state.clone())),
            storage,
            state,
        }
    }

    /// Logs in as the demo account for `role`, asserts success and returns
    /// the session token from the login cookie.
    pub async fn login_as(&self, role: Role) -> String {
        let (email, password, _) = DEMO_ACCOUNTS
            .iter()
            .find(|(_, _, r)| *r == role)
            .expect("every role has a demo account");

        TestRequest::post("/api/auth/login")
            .json_body(&serde_json::json!({
                "email": email,
                "password": password,
                "role": role.as_str(),
            }))
            .send(&self.service)
            .await
            .assert_status(StatusCode::OK)
            .session_cookie()
            .expect("login should set the session cookie")
    }
}

/// Test request builder for constructing HTTP requests.
pub struct TestRequest {
    method: Method,
    path: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl TestRequest {
    /// Creates a new test request with the given method and path.
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Creates a new GET request.
    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a new POST request.
    #[must_use]
    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    /// Adds a header to the request.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Presents `token` as the session cookie.
    #[must_use]
    pub fn session(self, token: &str) -> Self {
        self.header("Cookie", &format!("{SESSION_COOKIE_NAME}={token}"))
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a JSON request body.
    #[must_use]
    pub fn json_body(self, value: &serde_json::Value) -> Self {
        self.header("Content-Type", "application/json")
            .body(value.to_string().into_bytes())
    }

    /// Sends the request to the test service and returns the response.
    ///
    /// ## Panics
    /// Panics if the request cannot be sent or the response cannot be read.
    pub async fn send(self, service: &Service) -> TestResponse {
        let url = format!("http://127.0.0.1:5800{}", self.path);

        let mut client = match self.method.as_str() {
            "GET" => TestClient::get(&url),
            "POST" => TestClient::post(&url),
            _ => RequestBuilder::new(&url, self.method.clone()),
        };

        for (name, value) in self.headers {
            if let Ok(header_name) = HeaderName::try_from(name.as_str()) {
                client = client.add_header(header_name, value, true);
            }
        }

        if let Some(body_bytes) = self.body {
            client = client.body(ReqBody::Once(body_bytes.into()));
        }

        let mut response = client.send(service).await;

        let status = response
            .status_code
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body: Vec<u8> = response.take_bytes(None).await.unwrap_or_default().to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Represents an HTTP test response for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Asserts that the response status matches the expected code.
    #[must_use]
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {expected} but got {}: {}",
            self.status,
            self.body_string()
        );
        self
    }

    /// Asserts that a header exists with the expected value.
    #[must_use]
    pub fn assert_header(self, name: &str, expected: &str) -> Self {
        let value = self
            .get_header(name)
            .unwrap_or_else(|| panic!("Header '{name}' not found in response"));
        assert_eq!(
            value, expected,
            "Header '{name}' expected '{expected}' but got '{value}'"
        );
        self
    }

    /// Asserts a 302 to `location`.
    #[must_use]
    pub fn assert_redirect(self, location: &str) -> Self {
        self.assert_status(StatusCode::FOUND)
            .assert_header("Location", location)
    }

    /// Asserts that the response body contains the expected substring.
    #[must_use]
    pub fn assert_body_contains(self, expected: &str) -> Self {
        let body = self.body_string();
        assert!(
            body.contains(expected),
            "Expected body to contain '{expected}' but got:\n{body}"
        );
        self
    }

    /// Returns the body as a UTF-8 string.
    #[must_use]
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parses the body as JSON.
    ///
    /// ## Panics
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("Body is not JSON ({e}):\n{}", self.body_string()))
    }

    /// Value of the session cookie set by this response, if any.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        self.set_cookie(SESSION_COOKIE_NAME)
            .map(|cookie| cookie.value().to_string())
    }

    /// The `Set-Cookie` entry for `name`, if any.
    #[must_use]
    pub fn set_cookie(&self, name: &str) -> Option<Cookie<'static>> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("set-cookie"))
            .filter_map(|(_, v)| Cookie::parse(v.clone()).ok())
            .find(|cookie| cookie.name() == name)
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
