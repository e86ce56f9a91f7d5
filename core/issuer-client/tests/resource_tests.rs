use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use issuer_client::{ApiClient, ClientConfig, ClientError};
use issuer_session::{CredentialStore, MemoryStore, Route};
use issuer_types::{
    Credential, LicenseDataField, LicenseFields, LicenseIssuerChanges, NewLicenseIssuer,
    ProductFields,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup(credential: Credential) -> (MockServer, ApiClient, Arc<Mutex<Vec<Route>>>) {
    let server = MockServer::start().await;
    let credentials = CredentialStore::load(Arc::new(MemoryStore::new()));
    credentials.set(credential).unwrap();
    let visits = Arc::new(Mutex::new(Vec::new()));
    let sink = visits.clone();
    let api = ApiClient::new(
        ClientConfig::new(server.uri()),
        credentials,
        Arc::new(move |route: Route| sink.lock().unwrap().push(route)),
    )
    .unwrap();
    (server, api, visits)
}

fn issuer_json(id: i64, username: &str) -> Value {
    json!({
        "id": id,
        "active": true,
        "username": username,
        "email": "ops@acme.test",
        "phoneNumber": "+1 555 0100",
        "maxLicenses": 50,
        "created": "2024-03-01T10:00:00Z",
        "updated": "2024-03-02T10:00:00Z"
    })
}

fn license_json(id: &str) -> Value {
    json!({
        "id": id,
        "productID": 2,
        "name": "Workstation",
        "key": "AAAA-BBBB",
        "note": "",
        "tags": ["desk", "eu"],
        "data": "{\"seats\":\"5\",\"tier\":\"gold\"}",
        "maxSessions": 3,
        "validUntil": null,
        "lastUsed": "2024-05-01T08:30:00Z",
        "created": "2024-03-01T10:00:00Z",
        "updated": "2024-03-02T10:00:00Z"
    })
}

fn session_json(csid: &str) -> Value {
    json!({
        "csid": csid,
        "ssid": "srv+1/2",
        "identifier": "laptop",
        "machineID": "m-42",
        "created": "2024-04-01T00:00:00Z",
        "expire": "2024-04-02T00:00:00Z"
    })
}

fn product_json(id: i64) -> Value {
    json!({
        "id": id,
        "active": true,
        "name": "Studio",
        "contactEmail": "support@acme.test",
        "data": "",
        "created": "2024-03-01T10:00:00Z",
        "updated": "2024-03-02T10:00:00Z"
    })
}

// ── Issuers ─────────────────────────────────────────────────────

#[tokio::test]
async fn issuers_list() {
    let (server, api, _) = setup(Credential::new("root", 0)).await;
    Mock::given(method("GET"))
        .and(path("/api/license-issuers"))
        .and(header("authorization", "Bearer root"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([issuer_json(1, "acme"), issuer_json(2, "globex")])),
        )
        .mount(&server)
        .await;

    let issuers = api.issuers().list().await.unwrap().unwrap();
    let names: Vec<_> = issuers.iter().map(|i| i.username.as_str()).collect();
    assert_eq!(names, vec!["acme", "globex"]);
    assert_eq!(issuers[0].phone_number, "+1 555 0100");
    assert_eq!(issuers[0].max_licenses, 50);
}

#[tokio::test]
async fn issuers_get_not_found_is_none() {
    let (server, api, _) = setup(Credential::new("tok", 3)).await;
    Mock::given(method("GET"))
        .and(path("/api/license-issuers/9"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert_eq!(api.issuers().get(9).await.unwrap(), None);
}

#[tokio::test]
async fn issuers_get_forbidden_is_none_and_navigates_home() {
    let (server, api, visits) = setup(Credential::new("tok", 3)).await;
    Mock::given(method("GET"))
        .and(path("/api/license-issuers"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    assert_eq!(api.issuers().list().await.unwrap(), None);
    assert_eq!(*visits.lock().unwrap(), vec![Route::Home]);
    assert_eq!(api.credentials().get(), Credential::new("tok", 3));
}

#[tokio::test]
async fn issuers_create_posts_full_body() {
    let (server, api, _) = setup(Credential::new("root", 0)).await;
    Mock::given(method("POST"))
        .and(path("/api/license-issuers"))
        .and(body_json(json!({
            "active": true,
            "username": "initech",
            "password": "correct horse battery staple",
            "email": "",
            "phoneNumber": "",
            "maxLicenses": 10
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(issuer_json(7, "initech")))
        .expect(1)
        .mount(&server)
        .await;

    let saved = api
        .issuers()
        .create(&NewLicenseIssuer {
            active: true,
            username: "initech".into(),
            password: "correct horse battery staple".into(),
            email: String::new(),
            phone_number: String::new(),
            max_licenses: 10,
        })
        .await
        .unwrap();

    assert_eq!(saved.status, 201);
    assert_eq!(saved.record.unwrap().id, 7);
}

#[tokio::test]
async fn issuers_update_sends_only_changed_fields() {
    let (server, api, _) = setup(Credential::new("root", 0)).await;
    Mock::given(method("PATCH"))
        .and(path("/api/license-issuers/4"))
        .and(body_json(json!({"active": false, "maxLicenses": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(issuer_json(4, "acme")))
        .expect(1)
        .mount(&server)
        .await;

    let changes = LicenseIssuerChanges {
        active: Some(false),
        max_licenses: Some(5),
        ..Default::default()
    };
    let saved = api.issuers().update(4, &changes).await.unwrap();
    assert!(saved.is_saved());
    assert_eq!(saved.status, 200);
}

#[tokio::test]
async fn issuers_update_conflict_returns_status() {
    let (server, api, visits) = setup(Credential::new("root", 0)).await;
    Mock::given(method("PATCH"))
        .and(path("/api/license-issuers/4"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"error": "username taken"})))
        .mount(&server)
        .await;

    let changes = LicenseIssuerChanges {
        username: Some("globex".into()),
        ..Default::default()
    };
    let saved = api.issuers().update(4, &changes).await.unwrap();
    assert_eq!(saved.record, None);
    assert_eq!(saved.status, 409);
    assert!(visits.lock().unwrap().is_empty());
}

#[tokio::test]
async fn issuers_delete() {
    let (server, api, _) = setup(Credential::new("root", 0)).await;
    Mock::given(method("DELETE"))
        .and(path("/api/license-issuers/4"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/license-issuers/5"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(api.issuers().delete(4).await.unwrap());
    assert!(!api.issuers().delete(5).await.unwrap());
}

// ── Licenses ────────────────────────────────────────────────────

#[tokio::test]
async fn licenses_list_decodes_records() {
    let (server, api, _) = setup(Credential::new("tok", 7)).await;
    Mock::given(method("GET"))
        .and(path("/api/license-issuers/7/licenses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([license_json("a+b/c")])))
        .mount(&server)
        .await;

    let licenses = api.licenses(7).list().await.unwrap().unwrap();
    let license = &licenses[0];
    assert_eq!(license.id, "a+b/c");
    assert_eq!(license.product_id, Some(2));
    assert_eq!(license.tags, vec!["desk".to_string(), "eu".to_string()]);
    assert_eq!(
        license.data,
        vec![
            LicenseDataField::new("seats", "5"),
            LicenseDataField::new("tier", "gold"),
        ]
    );
    assert_eq!(license.valid_until, None);
    assert_eq!(
        license.last_used,
        Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap())
    );
}

#[tokio::test]
async fn licenses_get_uses_url_safe_id() {
    let (server, api, _) = setup(Credential::new("tok", 7)).await;
    Mock::given(method("GET"))
        .and(path("/api/license-issuers/7/licenses/ab_cd-ef_g-"))
        .respond_with(ResponseTemplate::new(200).set_body_json(license_json("ab/cd+ef/g+")))
        .expect(1)
        .mount(&server)
        .await;

    let license = api.licenses(7).get("ab/cd+ef/g+").await.unwrap().unwrap();
    assert_eq!(license.id, "ab/cd+ef/g+");
}

#[tokio::test]
async fn licenses_get_malformed_body_is_an_error() {
    let (server, api, _) = setup(Credential::new("tok", 7)).await;
    Mock::given(method("GET"))
        .and(path("/api/license-issuers/7/licenses/x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "x"})))
        .mount(&server)
        .await;

    let err = api.licenses(7).get("x").await.unwrap_err();
    assert!(matches!(err, ClientError::Serialization(_)));
}

#[tokio::test]
async fn licenses_create_encodes_data_fields() {
    let (server, api, _) = setup(Credential::new("tok", 7)).await;
    Mock::given(method("POST"))
        .and(path("/api/license-issuers/7/licenses"))
        .and(body_json(json!({
            "productID": 2,
            "name": "Workstation",
            "tags": ["desk"],
            "data": "{\"seats\":\"5\"}",
            "maxSessions": 3
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(license_json("new")))
        .expect(1)
        .mount(&server)
        .await;

    let fields = LicenseFields {
        product_id: Some(2),
        name: Some("Workstation".into()),
        tags: Some(vec!["desk".into()]),
        data: Some(vec![LicenseDataField::new("seats", "5")]),
        max_sessions: Some(3),
        ..Default::default()
    };
    let saved = api.licenses(7).create(&fields).await.unwrap();
    assert_eq!(saved.status, 201);
    assert_eq!(saved.record.unwrap().id, "new");
}

#[tokio::test]
async fn licenses_create_rejected_pairs_none_with_status() {
    let (server, api, _) = setup(Credential::new("tok", 7)).await;
    Mock::given(method("POST"))
        .and(path("/api/license-issuers/7/licenses"))
        .respond_with(ResponseTemplate::new(422).set_body_string("max licenses reached"))
        .mount(&server)
        .await;

    let saved = api.licenses(7).create(&LicenseFields::default()).await.unwrap();
    assert_eq!(saved.record, None);
    assert_eq!(saved.status, 422);
}

#[tokio::test]
async fn licenses_update_with_expiry() {
    let (server, api, _) = setup(Credential::new("tok", 7)).await;
    Mock::given(method("PATCH"))
        .and(path("/api/license-issuers/7/licenses/a_b"))
        .and(body_json(json!({"validUntil": "2025-01-01T00:00:00Z"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(license_json("a/b")))
        .expect(1)
        .mount(&server)
        .await;

    let fields = LicenseFields {
        valid_until: Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
        ..Default::default()
    };
    let saved = api.licenses(7).update("a/b", &fields).await.unwrap();
    assert!(saved.is_saved());
}

#[tokio::test]
async fn licenses_unauthorized_logs_out() {
    let (server, api, visits) = setup(Credential::new("stale", 7)).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    assert!(!api.licenses(7).delete("x").await.unwrap());
    assert_eq!(api.credentials().get(), Credential::default());
    assert_eq!(*visits.lock().unwrap(), vec![Route::Login]);
}

// ── Sessions ────────────────────────────────────────────────────

#[tokio::test]
async fn sessions_list_and_get() {
    let (server, api, _) = setup(Credential::new("tok", 7)).await;
    Mock::given(method("GET"))
        .and(path("/api/license-issuers/7/licenses/l_1-/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([session_json("c1")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/license-issuers/7/licenses/l_1-/sessions/c_2-"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_json("c/2+")))
        .mount(&server)
        .await;

    let sessions = api.sessions(7, "l/1+").list().await.unwrap().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].client_id, "c1");
    assert_eq!(sessions[0].server_id, "srv+1/2");
    assert_eq!(sessions[0].machine_id, "m-42");

    let session = api.sessions(7, "l/1+").get("c/2+").await.unwrap().unwrap();
    assert_eq!(session.client_id, "c/2+");
    assert_eq!(
        session.expire,
        Utc.with_ymd_and_hms(2024, 4, 2, 0, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn sessions_revoke() {
    let (server, api, _) = setup(Credential::new("tok", 7)).await;
    Mock::given(method("DELETE"))
        .and(path("/api/license-issuers/7/licenses/lic/sessions/s_1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert!(api.sessions(7, "lic").delete("s/1").await.unwrap());
}

#[tokio::test]
async fn sessions_list_server_error_is_none() {
    let (server, api, _) = setup(Credential::new("tok", 7)).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert_eq!(api.sessions(7, "lic").list().await.unwrap(), None);
}

// ── Products ────────────────────────────────────────────────────

#[tokio::test]
async fn products_crud() {
    let (server, api, _) = setup(Credential::new("tok", 7)).await;
    Mock::given(method("GET"))
        .and(path("/api/license-issuers/7/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([product_json(1)])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/license-issuers/7/products/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json(1)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/license-issuers/7/products"))
        .and(body_json(json!({"active": true, "name": "Studio"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(product_json(2)))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/license-issuers/7/products/2"))
        .and(body_json(json!({"contactEmail": "help@acme.test"})))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/license-issuers/7/products/2"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let products = api.products(7);
    let listed = products.list().await.unwrap().unwrap();
    assert_eq!(listed[0].contact_email, "support@acme.test");
    assert_eq!(products.get(1).await.unwrap().unwrap().name, "Studio");

    let created = products
        .create(&ProductFields {
            active: Some(true),
            name: Some("Studio".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(created.status, 201);
    assert_eq!(created.record.unwrap().id, 2);

    let updated = products
        .update(
            2,
            &ProductFields {
                contact_email: Some("help@acme.test".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.record, None);
    assert_eq!(updated.status, 400);

    assert!(products.delete(2).await.unwrap());
}
