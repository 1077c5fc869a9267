//! Route guard behavior as seen over HTTP.
//!
//! - no identity, or no session cookie: 302 to `/login?return_to=<path>`
//! - wrong role: 302 to `/unauthorized`
//! - still hydrating: 503 with `Retry-After`
//! - unknown path: 302 to `/`

use salvo::http::StatusCode;

use super::helpers::*;
use wardgate_test::component::Role;

#[test_log::test(tokio::test)]
async fn anonymous_request_for_guarded_view_redirects_to_login() {
    let host = TestHost::new().await;

    TestRequest::get("/billing")
        .send(&host.service)
        .await
        .assert_redirect("/login?return_to=%2Fbilling");

    TestRequest::get("/")
        .send(&host.service)
        .await
        .assert_redirect("/login?return_to=%2F");
}

#[test_log::test(tokio::test)]
async fn login_then_return_to_requested_view() {
    let host = TestHost::new().await;

    TestRequest::get("/patient-records")
        .send(&host.service)
        .await
        .assert_redirect("/login?return_to=%2Fpatient-records");

    let login = TestRequest::post("/api/auth/login")
        .json_body(&serde_json::json!({
            "email": "medical@example.com",
            "password": "medical123",
            "role": "Medical Staff",
        }))
        .send(&host.service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(login.json()["redirect_to"], "/patient-records");
    let token = login.session_cookie().expect("login should set the session cookie");

    let page = TestRequest::get("/patient-records")
        .session(&token)
        .send(&host.service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(page.json()["view"], "patient_records");
    assert_eq!(page.json()["role"], "medical_staff");
}

#[test_log::test(tokio::test)]
async fn explicit_return_to_wins_over_recorded_one() {
    let host = TestHost::new().await;
    TestRequest::get("/billing").send(&host.service).await;

    let login = TestRequest::post("/api/auth/login")
        .json_body(&serde_json::json!({
            "email": "hospital@example.com",
            "password": "hospital123",
            "role": "hospital_staff",
            "return_to": "/insurance-claims",
        }))
        .send(&host.service)
        .await
        .assert_status(StatusCode::OK);

    assert_eq!(login.json()["redirect_to"], "/insurance-claims");
}

#[test_log::test(tokio::test)]
async fn foreign_return_to_falls_back_to_dashboard() {
    let host = TestHost::new().await;

    let login = TestRequest::post("/api/auth/login")
        .json_body(&serde_json::json!({
            "email": "hospital@example.com",
            "password": "hospital123",
            "role": "hospital_staff",
            "return_to": "https://evil.example.com/",
        }))
        .send(&host.service)
        .await
        .assert_status(StatusCode::OK);

    assert_eq!(login.json()["redirect_to"], "/dashboard");
}

#[test_log::test(tokio::test)]
async fn insurance_staff_is_redirected_away_from_patient_records() {
    let host = TestHost::new().await;
    let token = host.login_as(Role::InsuranceStaff).await;

    TestRequest::get("/patient-records")
        .session(&token)
        .send(&host.service)
        .await
        .assert_redirect("/unauthorized");

    TestRequest::get("/unauthorized")
        .send(&host.service)
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_body_contains("permission");
}

#[test_log::test(tokio::test)]
async fn medical_staff_is_redirected_away_from_insurance_claims() {
    let host = TestHost::new().await;
    let token = host.login_as(Role::MedicalStaff).await;

    TestRequest::get("/insurance-claims")
        .session(&token)
        .send(&host.service)
        .await
        .assert_redirect("/unauthorized");

    TestRequest::get("/billing")
        .session(&token)
        .send(&host.service)
        .await
        .assert_status(StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn other_clients_do_not_share_the_signed_in_session() {
    let host = TestHost::new().await;
    let token = host.login_as(Role::HospitalStaff).await;

    TestRequest::get("/patient-records")
        .session(&token)
        .send(&host.service)
        .await
        .assert_status(StatusCode::OK);

    TestRequest::get("/patient-records")
        .send(&host.service)
        .await
        .assert_redirect("/login?return_to=%2Fpatient-records");

    TestRequest::get("/patient-records")
        .session("forged-token")
        .send(&host.service)
        .await
        .assert_redirect("/login?return_to=%2Fpatient-records");

    let session = TestRequest::get("/api/session")
        .send(&host.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert!(session.get("identity").is_none());

    TestRequest::get("/api/capabilities/generate_bills")
        .send(&host.service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    // A stranger's logout leaves the owner signed in.
    TestRequest::post("/api/auth/logout")
        .send(&host.service)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    TestRequest::get("/billing")
        .session(&token)
        .send(&host.service)
        .await
        .assert_status(StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn return_to_keeps_the_query_string() {
    let host = TestHost::new().await;

    TestRequest::get("/billing?invoice=42")
        .send(&host.service)
        .await
        .assert_redirect("/login?return_to=%2Fbilling%3Finvoice%3D42");

    let login = TestRequest::post("/api/auth/login")
        .json_body(&serde_json::json!({
            "email": "hospital@example.com",
            "password": "hospital123",
            "role": "hospital_staff",
            "return_to": "/billing?invoice=42",
        }))
        .send(&host.service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(login.json()["redirect_to"], "/billing?invoice=42");
}

#[test_log::test(tokio::test)]
async fn login_sets_an_http_only_session_cookie() {
    let host = TestHost::new().await;

    let login = TestRequest::post("/api/auth/login")
        .json_body(&serde_json::json!({
            "email": "medical@example.com",
            "password": "medical123",
            "role": "medical_staff",
        }))
        .send(&host.service)
        .await
        .assert_status(StatusCode::OK);

    let cookie = login
        .set_cookie("wardgate_session")
        .expect("login should set the session cookie");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
    assert!(!login.body_string().contains(cookie.value()));
    assert_eq!(
        host.state
            .auth
            .session()
            .snapshot()
            .token()
            .map(|token| token.expose().to_string()),
        Some(cookie.value().to_string())
    );
}

#[test_log::test(tokio::test)]
async fn hydrating_session_answers_503_and_never_redirects() {
    let host = TestHost::hydrating().await;

    for path in ["/", "/dashboard", "/patient-records", "/billing", "/insurance-claims"] {
        let response = TestRequest::get(path)
            .send(&host.service)
            .await
            .assert_status(StatusCode::SERVICE_UNAVAILABLE)
            .assert_header("Retry-After", "1");
        assert!(response.get_header("Location").is_none());
    }

    // Public views do not wait for hydration.
    TestRequest::get("/login")
        .send(&host.service)
        .await
        .assert_status(StatusCode::OK);

    host.state.auth.session().hydrate().await;

    TestRequest::get("/dashboard")
        .send(&host.service)
        .await
        .assert_redirect("/login?return_to=%2Fdashboard");
}

#[test_log::test(tokio::test)]
async fn unknown_paths_redirect_to_root() {
    let host = TestHost::new().await;

    TestRequest::get("/admin/settings")
        .send(&host.service)
        .await
        .assert_redirect("/");

    TestRequest::post("/dashboard")
        .send(&host.service)
        .await
        .assert_redirect("/");
}

#[test_log::test(tokio::test)]
async fn login_page_lists_roles_and_echoes_return_to() {
    let host = TestHost::new().await;

    let page = TestRequest::get("/login?return_to=%2Fbilling")
        .send(&host.service)
        .await
        .assert_status(StatusCode::OK);
    let body = page.json();

    assert_eq!(body["return_to"], "/billing");
    let roles = body["roles"].as_array().expect("roles should be a list");
    assert_eq!(roles.len(), 3);
    assert_eq!(roles[0]["key"], "hospital_staff");
    assert_eq!(roles[0]["label"], "Hospital Staff");
}

#[test_log::test(tokio::test)]
async fn healthcheck_is_public() {
    let host = TestHost::hydrating().await;

    TestRequest::get("/healthz")
        .send(&host.service)
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("OK");
}
