//! Dashboard descriptors and the capability API.

use salvo::http::StatusCode;

use super::helpers::*;
use wardgate_test::component::Role;

#[test_log::test(tokio::test)]
async fn dashboard_matches_role_capabilities() {
    let host = TestHost::new().await;
    let token = host.login_as(Role::MedicalStaff).await;

    let body = TestRequest::get("/dashboard")
        .session(&token)
        .send(&host.service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["title"], "Medical Staff Dashboard");
    assert_eq!(
        body["widgets"],
        serde_json::json!(["total_patients", "pending_bills"])
    );

    let actions: Vec<&str> = body["actions"]
        .as_array()
        .expect("actions should be a list")
        .iter()
        .filter_map(|action| action["key"].as_str())
        .collect();
    assert_eq!(actions, vec!["view_patient_records", "generate_bills"]);

    let navigation: Vec<&str> = body["navigation"]
        .as_array()
        .expect("navigation should be a list")
        .iter()
        .filter_map(|link| link["path"].as_str())
        .collect();
    assert_eq!(navigation, vec!["/dashboard", "/patient-records", "/billing"]);
}

#[test_log::test(tokio::test)]
async fn every_dashboard_action_opens_for_its_role() {
    for role in Role::ALL {
        let host = TestHost::new().await;
        let token = host.login_as(role).await;

        let body = TestRequest::get("/dashboard")
            .session(&token)
            .send(&host.service)
            .await
            .assert_status(StatusCode::OK)
            .json();

        for action in body["actions"].as_array().expect("actions should be a list") {
            let destination = action["destination"]
                .as_str()
                .expect("destination should be a string");
            TestRequest::get(destination)
                .session(&token)
                .send(&host.service)
                .await
                .assert_status(StatusCode::OK);
        }
    }
}

#[test_log::test(tokio::test)]
async fn capability_checks_follow_the_policy() {
    let host = TestHost::new().await;

    TestRequest::get("/api/capabilities/generate_bills")
        .send(&host.service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let token = host.login_as(Role::MedicalStaff).await;

    let allowed = TestRequest::get("/api/capabilities/generate_bills")
        .session(&token)
        .send(&host.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(allowed["allowed"], true);

    let denied = TestRequest::get("/api/capabilities/process_claims")
        .session(&token)
        .send(&host.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(denied["allowed"], false);

    TestRequest::get("/api/capabilities/delete_everything")
        .session(&token)
        .send(&host.service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
