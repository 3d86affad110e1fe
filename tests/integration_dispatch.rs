//! End-to-end behavior of the simulated endpoints against the demo store.

mod common;

use lending_api_sim::sim::latency::LatencyPolicy;
use lending_api_sim::sim::types::ResponseDescriptor;
use lending_api_sim::sim::{Simulator, SimulatorOptions};
use lending_api_sim::store::{IdStrategy, InMemoryStore, SeedSet};
use serde_json::Value;

fn body(resp: &ResponseDescriptor) -> &Value {
    resp.body.as_ref().expect("response should carry a body")
}

#[tokio::test]
async fn create_adds_one_deal_with_a_fresh_id() {
    let sim = Simulator::new(
        InMemoryStore::seeded(SeedSet::Demo),
        SimulatorOptions {
            latency: LatencyPolicy::Off,
            id_strategy: IdStrategy::Random,
            seed: 7,
            ..SimulatorOptions::default()
        },
    );

    for _ in 0..20 {
        let before = common::deal_ids(&sim);
        let resp = common::call(
            &sim,
            "create-deal",
            None,
            Some(r#"{"name":"Loop Co","originator":"Acme"}"#),
        )
        .await;
        assert_eq!(resp.status, 201);

        let id = body(&resp)["id"].as_str().unwrap().to_string();
        assert!(!before.contains(&id), "id {id} was already taken");
        assert_eq!(common::deal_count(&sim), before.len() + 1);
    }
}

#[tokio::test]
async fn create_without_required_fields_is_rejected() {
    let sim = common::demo_simulator();
    let before = common::deal_count(&sim);

    for body_text in [
        r#"{"originator":"Acme"}"#,
        r#"{"name":"Test Co"}"#,
        r#"{"name":"","originator":"Acme"}"#,
        r#"{"name":"Test Co","originator":null}"#,
    ] {
        let resp = common::call(&sim, "create-deal", None, Some(body_text)).await;
        assert_eq!(resp.status, 400, "{body_text}");
        assert_eq!(
            resp.error_message(),
            Some("Missing required fields: name, originator")
        );
    }
    assert_eq!(common::deal_count(&sim), before);
}

#[tokio::test]
async fn get_after_create_returns_created_record() {
    let sim = common::demo_simulator();
    let created = common::call(
        &sim,
        "create-deal",
        None,
        Some(r#"{"name":"Test Co","originator":"Acme","amount":1250000,"creditScore":710}"#),
    )
    .await;
    assert_eq!(created.status, 201);
    let id = body(&created)["id"].as_str().unwrap().to_string();

    let path = format!("/api/v1/deals/{id}");
    let fetched = common::call(&sim, "get-deal", Some(&path), None).await;
    assert_eq!(fetched.status, 200);
    assert_eq!(body(&fetched), body(&created));
}

#[tokio::test]
async fn delete_removes_exactly_one_record() {
    let sim = common::demo_simulator();
    let before = common::deal_ids(&sim);

    let resp = common::call(&sim, "delete-deal", Some("/api/v1/deals/D004"), None).await;
    assert_eq!(resp.status, 204);
    assert!(resp.body.is_none());

    let after = common::deal_ids(&sim);
    let expected: Vec<String> = before.into_iter().filter(|id| id != "D004").collect();
    assert_eq!(after, expected);

    let resp = common::call(&sim, "get-deal", Some("/api/v1/deals/D004"), None).await;
    assert_eq!(resp.status, 404);
    assert_eq!(resp.error_message(), Some("Deal not found"));
}

#[tokio::test]
async fn delete_of_unknown_id_leaves_store_alone() {
    let sim = common::demo_simulator();
    let before = common::deal_count(&sim);

    let resp = common::call(&sim, "delete-deal", Some("/api/v1/deals/D999"), None).await;
    assert_eq!(resp.status, 404);
    assert_eq!(common::deal_count(&sim), before);
}

#[tokio::test]
async fn update_status_changes_only_status() {
    let sim = common::demo_simulator();
    let before = common::call(&sim, "get-deal", Some("/api/v1/deals/D002"), None).await;
    let before = body(&before).clone();
    assert_eq!(before["status"], "Pending");

    let resp = common::call(
        &sim,
        "update-deal",
        Some("/api/v1/deals/D002"),
        Some(r#"{"status":"Approved"}"#),
    )
    .await;
    assert_eq!(resp.status, 200);

    let mut expected = before;
    expected["status"] = Value::from("Approved");
    assert_eq!(body(&resp), &expected);
}

#[tokio::test]
async fn create_applies_defaults_and_location() {
    let sim = common::demo_simulator();
    let resp = common::call(
        &sim,
        "create-deal",
        None,
        Some(r#"{"name":"Test Co","originator":"Acme"}"#),
    )
    .await;

    assert_eq!(resp.status, 201);
    assert_eq!(resp.status_text, "Created");
    let deal = body(&resp);
    let id = deal["id"].as_str().unwrap();
    assert!(resp.headers["Location"].contains(id));
    assert_eq!(deal["status"], "Draft");
    assert_eq!(deal["amount"].as_f64(), Some(0.0));
    assert_eq!(deal["currency"], "USD");
    assert_eq!(deal["name"], "Test Co");
}

#[tokio::test]
async fn list_filters_by_exact_originator() {
    let sim = common::demo_simulator();
    let path = "/api/v1/deals?originator=FinCorp";
    let resp = common::call(&sim, "list-deals", Some(path), None).await;
    assert_eq!(resp.status, 200);

    let ids: Vec<&str> = body(&resp)
        .as_array()
        .unwrap()
        .iter()
        .map(|d| {
            assert_eq!(d["originator"], "FinCorp");
            d["id"].as_str().unwrap()
        })
        .collect();
    // "FinCorp Capital" (D005) is not an exact match
    assert_eq!(ids, vec!["D001", "D004", "D007"]);
}

#[tokio::test]
async fn encoded_originator_in_path_is_decoded() {
    let sim = common::demo_simulator();
    for path in [
        "/api/v1/deals?originator=Acme%20Lending",
        "/api/v1/deals?originator=Acme+Lending",
    ] {
        let resp = common::call(&sim, "list-deals", Some(path), None).await;
        let ids: Vec<&str> = body(&resp)
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["D002", "D006"], "{path}");
    }
}

#[tokio::test]
async fn unfiltered_list_returns_every_deal() {
    let sim = common::demo_simulator();
    let resp = common::call(&sim, "list-deals", None, None).await;
    assert_eq!(body(&resp).as_array().map(Vec::len), Some(8));
}

#[test]
fn deal_id_is_extracted_from_path() {
    let sim = common::demo_simulator();
    let request = common::compose(&sim, "get-deal", Some("/api/v1/deals/D001"), None);
    assert_eq!(request.path_params.len(), 1);
    assert_eq!(request.path_param("dealId"), Some("D001"));
}

#[tokio::test]
async fn repeated_update_is_idempotent() {
    let sim = common::demo_simulator();
    let patch = r#"{"status":"Funded","amount":9100000}"#;

    let first = common::call(&sim, "update-deal", Some("/api/v1/deals/D008"), Some(patch)).await;
    let second = common::call(&sim, "update-deal", Some("/api/v1/deals/D008"), Some(patch)).await;
    assert_eq!(first.status, 200);
    assert_eq!(second.status, 200);
    assert_eq!(first.body, second.body);

    let fetched = common::call(&sim, "get-deal", Some("/api/v1/deals/D008"), None).await;
    assert_eq!(fetched.body, first.body);
}

#[tokio::test]
async fn facilities_carry_covenants() {
    let sim = common::demo_simulator();
    let resp = common::call(&sim, "list-facilities", None, None).await;
    assert_eq!(resp.status, 200);

    let facilities = body(&resp).as_array().unwrap();
    assert_eq!(facilities.len(), 3);
    assert_eq!(facilities[0]["id"], "F001");
    assert_eq!(facilities[0]["type"], "Revolving");
    assert_eq!(facilities[0]["covenants"][0]["status"], "Compliant");
}

#[tokio::test]
async fn malformed_bodies_are_400() {
    let sim = common::demo_simulator();

    let resp = common::call(&sim, "create-deal", None, Some("{name:")).await;
    assert_eq!(resp.status, 400);
    assert_eq!(resp.error_message(), Some("Invalid JSON body"));

    let resp = common::call(&sim, "update-deal", Some("/api/v1/deals/D001"), Some("[1,2]")).await;
    assert_eq!(resp.status, 400);
    assert_eq!(resp.error_message(), Some("Request body must be a JSON object"));

    let resp = common::call(
        &sim,
        "update-deal",
        Some("/api/v1/deals/D001"),
        Some(r#"{"amount":"lots"}"#),
    )
    .await;
    assert_eq!(resp.status, 400);
    assert!(resp.error_message().unwrap().starts_with("Invalid deal fields"));
}

#[tokio::test]
async fn update_of_unknown_deal_is_404() {
    let sim = common::demo_simulator();
    let resp = common::call(
        &sim,
        "update-deal",
        Some("/api/v1/deals/D999"),
        Some(r#"{"status":"Approved"}"#),
    )
    .await;
    assert_eq!(resp.status, 404);
}
