#![allow(dead_code)]

use httpmock::MockServer;
use keygen_admin::{Builder, KeygenApi};
use serde_json::{json, Value};

pub const ACCOUNT: &str = "acct";

// RUST_LOG=keygen_admin=debug shows the request log
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn api(server: &MockServer) -> KeygenApi {
    init_tracing();

    Builder::new(ACCOUNT)
        .api_url(server.url("/v1"))
        .user_agent("keygen-admin-tests")
        .build_api()
}

pub fn account_path(path: &str) -> String {
    format!("/v1/accounts/{}/{}", ACCOUNT, path)
}

pub fn user_json(id: &str, email: &str) -> Value {
    json!({
        "id": id,
        "type": "users",
        "attributes": {
            "firstName": "Ada",
            "lastName": "Admin",
            "email": email,
            "role": "admin",
            "status": "active",
            "metadata": {},
            "created": "2024-01-01T00:00:00.000Z",
            "updated": "2024-01-02T00:00:00.000Z"
        }
    })
}

pub fn license_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "type": "licenses",
        "attributes": {
            "name": "Pro",
            "key": format!("KEY-{}", id),
            "status": status,
            "uses": 0,
            "expiry": null,
            "metadata": {},
            "created": "2024-01-01T00:00:00.000Z",
            "updated": "2024-01-02T00:00:00.000Z"
        },
        "relationships": {
            "policy": { "data": { "type": "policies", "id": "P1" } }
        }
    })
}

pub fn machine_json(id: &str, fingerprint: &str) -> Value {
    json!({
        "id": id,
        "type": "machines",
        "attributes": {
            "name": "Build box",
            "fingerprint": fingerprint,
            "heartbeatStatus": "not-started",
            "created": "2024-01-01T00:00:00.000Z",
            "updated": "2024-01-02T00:00:00.000Z"
        }
    })
}
