mod common;

use base64::Engine;
use common::*;
use httpmock::prelude::*;
use keygen_admin::{
    err::NetworkCode,
    handling::{handle_crud_error, Action, CrudOperation, HandlerOptions},
    models::{LicenseStatus, Timestamped},
    resources::*,
    Builder, Error, ErrorKind,
};
use serde_json::json;

#[tokio::test]
async fn authenticate_keeps_the_token() {
    let server = MockServer::start();
    let credentials =
        base64::engine::general_purpose::STANDARD.encode("admin@example.com:secret");

    let tokens = server.mock(|when, then| {
        when.method(POST)
            .path(account_path("tokens"))
            .header("authorization", format!("Basic {}", credentials))
            .json_body(json!({
                "data": { "type": "tokens", "attributes": { "name": "Keygen Admin Token" } }
            }));
        then.status(201)
            .header("content-type", "application/vnd.api+json")
            .json_body(json!({
                "data": { "id": "T1", "type": "tokens", "attributes": { "token": "tok_abc" } }
            }));
    });
    let me = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/me")
            .header("authorization", "Bearer tok_abc");
        then.status(200)
            .json_body(json!({ "data": user_json("U1", "admin@example.com") }));
    });

    let mut api = api(&server);
    let token = api
        .authenticate("admin@example.com", "secret", None)
        .await
        .unwrap();

    assert_eq!(token, "tok_abc");
    assert_eq!(api.token(), Some("tok_abc"));

    let user = api.me().await.unwrap().data.unwrap();
    assert_eq!(user.attributes.email, "admin@example.com");

    tokens.assert();
    me.assert();
}

#[tokio::test]
async fn authenticate_without_token_fails() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(account_path("tokens"));
        then.status(201).json_body(json!({ "data": { "id": "T1", "type": "tokens", "attributes": {} } }));
    });

    let mut api = api(&server);
    let err = api
        .authenticate("admin@example.com", "secret", Some("CI"))
        .await
        .unwrap_err();

    assert!(err.is_auth_error());
    assert!(err.to_string().starts_with("Authentication Failed"));
    assert_eq!(api.token(), None);
}

#[tokio::test]
async fn list_licenses_sends_filters() {
    let server = MockServer::start();
    let list = server.mock(|when, then| {
        when.method(GET)
            .path(account_path("licenses"))
            .query_param("status", "active")
            .query_param("limit", "5");
        then.status(200).json_body(json!({
            "data": [license_json("L1", "active"), license_json("L2", "active")],
            "meta": { "count": 2 },
            "links": { "self": "/v1/accounts/acct/licenses?limit=5" }
        }));
    });

    let api = api(&server);
    let filters = LicenseFilters {
        status: Some(LicenseStatus::Active),
        limit: Some(5),
        ..Default::default()
    };
    let res = api.licenses().list(&filters).await.unwrap();

    list.assert();
    assert_eq!(res.items().len(), 2);
    assert_eq!(res.count(), Some(2));
    assert_eq!(
        res.items()[0].related("policy").map(|policy| policy.id.as_str()),
        Some("P1")
    );
}

#[tokio::test]
async fn list_with_empty_body_has_no_items() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(account_path("machines"));
        then.status(200).body("");
    });

    let api = api(&server);
    let res = api
        .machines()
        .list(&MachineFilters::default())
        .await
        .unwrap();

    assert!(res.items().is_empty());
}

#[tokio::test]
async fn activate_machine_relates_the_license() {
    let server = MockServer::start();
    let activate = server.mock(|when, then| {
        when.method(POST)
            .path(account_path("machines"))
            .header("content-type", "application/vnd.api+json")
            .json_body(json!({
                "data": {
                    "type": "machines",
                    "attributes": { "fingerprint": "fp-1", "name": "Build box" },
                    "relationships": {
                        "license": { "data": { "type": "licenses", "id": "L1" } }
                    }
                }
            }));
        then.status(201)
            .json_body(json!({ "data": machine_json("M1", "fp-1") }));
    });

    let api = api(&server);
    let machine = NewMachine {
        fingerprint: " fp-1 ".into(),
        license_id: "L1".into(),
        name: Some("Build box".into()),
        ..Default::default()
    };
    let res = api.machines().activate(&machine).await.unwrap();

    activate.assert();
    assert_eq!(res.data.unwrap().attributes.fingerprint, "fp-1");
}

#[tokio::test]
async fn delete_with_no_content_succeeds() {
    let server = MockServer::start();
    let delete = server.mock(|when, then| {
        when.method(DELETE).path(account_path("licenses/L1"));
        then.status(204);
    });

    let api = api(&server);
    api.licenses().delete("L1").await.unwrap();

    delete.assert();
}

#[tokio::test]
async fn update_sends_only_given_fields() {
    let server = MockServer::start();
    let patch = server.mock(|when, then| {
        when.method(PATCH)
            .path(account_path("licenses/L1"))
            .json_body(json!({
                "data": { "type": "licenses", "id": "L1", "attributes": { "name": "Renamed" } }
            }));
        then.status(200)
            .json_body(json!({ "data": license_json("L1", "active") }));
    });

    let api = api(&server);
    let updates = LicenseUpdate {
        name: Some("Renamed".into()),
        ..Default::default()
    };
    api.licenses().update("L1", &updates).await.unwrap();

    patch.assert();
}

#[tokio::test]
async fn group_limits_of_zero() {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST)
            .path(account_path("groups"))
            .json_body(json!({
                "data": { "type": "groups", "attributes": { "name": "Team", "maxUsers": 3 } }
            }));
        then.status(201).json_body(json!({ "data": null }));
    });
    let update = server.mock(|when, then| {
        when.method(PATCH)
            .path(account_path("groups/G1"))
            .json_body(json!({
                "data": { "type": "groups", "id": "G1", "attributes": { "maxLicenses": 0 } }
            }));
        then.status(200).json_body(json!({ "data": null }));
    });

    let api = api(&server);
    let group = NewGroup {
        name: " Team ".into(),
        max_licenses: Some(0),
        max_users: Some(3),
        ..Default::default()
    };
    api.groups().create(&group).await.unwrap();

    let updates = GroupUpdate {
        max_licenses: Some(0),
        ..Default::default()
    };
    api.groups().update("G1", &updates).await.unwrap();

    create.assert();
    update.assert();
}

#[tokio::test]
async fn not_found_is_classified_and_refreshes() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(account_path("licenses/L404"));
        then.status(404).json_body(json!({
            "errors": [{
                "title": "Not found",
                "detail": "The requested license 'L404' was not found",
                "code": "NOT_FOUND"
            }]
        }));
    });

    let api = api(&server);
    let err = api.licenses().get("L404").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.code(), Some("NOT_FOUND"));
    assert!(!err.is_retryable());
    assert!(err.should_refresh_after_error());

    let outcome = handle_crud_error(
        &err,
        CrudOperation::Delete,
        "License",
        &HandlerOptions::default(),
    );
    assert_eq!(outcome.action, Action::Refresh);
    assert_eq!(
        outcome.toast.as_deref(),
        Some("License not found - it may have been deleted")
    );
}

#[tokio::test]
async fn error_without_body_is_synthesized() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(account_path("licenses/L1/actions/suspend"));
        then.status(500).body("<html>Internal Server Error</html>");
    });

    let api = api(&server);
    let err = api.licenses().suspend("L1").await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(err.is_retryable());
    assert_eq!(
        err.combined_message(),
        "HTTP Error: Request failed with status 500"
    );
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let api = Builder::new(ACCOUNT)
        .api_url("http://127.0.0.1:1/v1")
        .build_api();

    let err = api.products().get("P1").await.unwrap_err();

    assert!(err.is_network_error());
    assert!(!err.is_api_error());
    assert_eq!(err.status(), None);
    assert!(err.is_retryable());
    assert!(matches!(
        err,
        Error::Network {
            code: NetworkCode::ConnectionRefused | NetworkCode::NetworkError,
            ..
        }
    ));
}

#[tokio::test]
async fn request_logs_use_bracket_params() {
    let server = MockServer::start();
    let list = server.mock(|when, then| {
        when.method(GET)
            .path(account_path("request-logs"))
            .query_param("date[start]", "2024-01-01")
            .query_param("date[end]", "2024-01-31")
            .query_param("requestor[type]", "license")
            .query_param("method", "POST");
        then.status(200).json_body(json!({ "data": [] }));
    });
    let stats = server.mock(|when, then| {
        when.method(GET)
            .path(account_path("analytics/endpoints"))
            .query_param("date[start]", "2024-01-01")
            .query_param("limit", "10");
        then.status(200).json_body(json!({ "data": [] }));
    });

    let api = api(&server);
    let filters = RequestLogFilters {
        date: Some(DateRange::new("2024-01-01", "2024-01-31")),
        requestor: Some(Requestor {
            kind: Some(RequestorType::License),
            id: None,
        }),
        method: Some("POST".into()),
        ..Default::default()
    };
    let res = api.request_logs().list(&filters).await.unwrap();
    assert!(res.items().is_empty());

    let range = DateRange::new("2024-01-01", "2024-01-31");
    api.request_logs()
        .endpoint_stats(Some(&range), Some(10))
        .await
        .unwrap();

    list.assert();
    stats.assert();
}

#[tokio::test]
async fn webhook_test_defaults_the_event() {
    let server = MockServer::start();
    let test = server.mock(|when, then| {
        when.method(POST)
            .path(account_path("webhooks/W1/actions/test"))
            .json_body(json!({
                "data": { "type": "webhook-events", "attributes": { "event": "webhook.test" } }
            }));
        then.status(201).json_body(json!({ "data": { "id": "E1" } }));
    });

    let api = api(&server);
    api.webhooks().test("W1", None).await.unwrap();

    test.assert();
}

#[tokio::test]
async fn group_membership_uses_relationship_linkage() {
    let server = MockServer::start();
    let add = server.mock(|when, then| {
        when.method(POST)
            .path(account_path("groups/G1/relationships/users"))
            .json_body(json!({ "data": { "type": "users", "id": "U1" } }));
        then.status(200).json_body(json!({ "data": null }));
    });

    let api = api(&server);
    api.groups().add_user("G1", "U1").await.unwrap();

    add.assert();
}

#[tokio::test]
async fn blank_group_name_is_rejected_before_sending() {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST).path(account_path("groups"));
        then.status(201).json_body(json!({ "data": null }));
    });
    let update = server.mock(|when, then| {
        when.method(PATCH).path(account_path("groups/G1"));
        then.status(200).json_body(json!({ "data": null }));
    });

    let api = api(&server);
    let group = NewGroup {
        name: "   ".into(),
        ..Default::default()
    };
    let err = api.groups().create(&group).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(matches!(
        err,
        Error::Validation { field: Some(ref field), ref detail }
            if field == "name" && detail == "Group name is required"
    ));

    let updates = GroupUpdate {
        name: Some("   ".into()),
        ..Default::default()
    };
    let err = api.groups().update("G1", &updates).await.unwrap_err();
    assert!(err.is_validation_error());

    create.assert_calls(0);
    update.assert_calls(0);
}

#[tokio::test]
async fn blank_entitlement_code_is_rejected_before_sending() {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST).path(account_path("entitlements"));
        then.status(201).json_body(json!({ "data": null }));
    });

    let api = api(&server);
    let entitlement = NewEntitlement {
        name: "Feature A".into(),
        code: " ".into(),
        ..Default::default()
    };
    let err = api.entitlements().create(&entitlement).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Validation { field: Some(ref field), .. } if field == "code"
    ));
    assert!(!err.should_show_toast());

    let updates = EntitlementUpdate {
        name: Some("".into()),
        ..Default::default()
    };
    let err = api
        .entitlements()
        .update("E1", &updates)
        .await
        .unwrap_err();
    assert!(err.is_validation_error());

    create.assert_calls(0);
}

#[tokio::test]
async fn created_entitlement_reads_back_with_server_fields() {
    let server = MockServer::start();
    let stored = json!({
        "id": "E1",
        "type": "entitlements",
        "attributes": {
            "name": "Feature A",
            "code": "FEATURE_A",
            "metadata": { "tier": "pro" },
            "created": "2024-03-01T10:00:00.000Z",
            "updated": "2024-03-01T10:00:00.000Z"
        }
    });

    let create = server.mock(|when, then| {
        when.method(POST)
            .path(account_path("entitlements"))
            .json_body(json!({
                "data": {
                    "type": "entitlements",
                    "attributes": {
                        "name": "Feature A",
                        "code": "FEATURE_A",
                        "metadata": { "tier": "pro" }
                    }
                }
            }));
        then.status(201).json_body(json!({ "data": stored.clone() }));
    });
    let get = server.mock(|when, then| {
        when.method(GET).path(account_path("entitlements/E1"));
        then.status(200).json_body(json!({ "data": stored.clone() }));
    });

    let api = api(&server);
    let mut metadata = serde_json::Map::new();
    metadata.insert("tier".into(), json!("pro"));
    let input = NewEntitlement {
        name: " Feature A ".into(),
        code: "FEATURE_A".into(),
        metadata: Some(metadata.clone()),
    };

    let created = api
        .entitlements()
        .create(&input)
        .await
        .unwrap()
        .data
        .unwrap();
    let fetched = api
        .entitlements()
        .get(&created.id)
        .await
        .unwrap()
        .data
        .unwrap();

    create.assert();
    get.assert();
    assert_eq!(fetched.id, "E1");
    assert_eq!(fetched.kind, "entitlements");
    assert_eq!(fetched.attributes.name, "Feature A");
    assert_eq!(fetched.attributes.code, "FEATURE_A");
    assert_eq!(fetched.attributes.metadata, metadata);
    assert!(fetched.attributes.created_at().is_ok());
    assert!(!fetched.attributes.updated.is_empty());
}
