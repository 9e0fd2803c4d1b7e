#![allow(clippy::unwrap_used)]
// End-to-end reconciliation against a mocked array.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use purehost_core::{ArrayConfig, ArraySession, AuthCredentials, CoreError, HostSpec, Personality};

fn api_path(suffix: &str) -> String {
    format!("/api/1.17/{suffix}")
}

async fn connect(server: &MockServer) -> ArraySession {
    Mock::given(method("POST"))
        .and(path(api_path("auth/session")))
        .and(body_json(json!({ "api_token": "token-123" })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=abc; Path=/")
                .set_body_json(json!({ "username": "pureuser" })),
        )
        .expect(1)
        .mount(server)
        .await;

    let config = ArrayConfig::new(
        Url::parse(&server.uri()).unwrap(),
        AuthCredentials::ApiToken("token-123".to_string().into()),
    );
    ArraySession::connect(&config).await.unwrap()
}

/// Base record plus the three detail projections and the connection list.
async fn mount_host_reads(server: &MockServer, name: &str, volumes: &[&str]) {
    Mock::given(method("GET"))
        .and(path(api_path(&format!("host/{name}"))))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": name,
            "iqn": ["iqn.1998-01.com.vmware:esx-01"],
            "wwn": [],
            "nqn": [],
            "hgroup": null
        })))
        .mount(server)
        .await;

    let details = [
        ("preferred_array", json!({ "name": name, "preferred_array": [] })),
        ("personality", json!({ "name": name, "personality": "esxi" })),
        (
            "chap",
            json!({
                "name": name,
                "host_user": null,
                "host_password": null,
                "target_user": null,
                "target_password": null
            }),
        ),
    ];
    for (flag, body) in details {
        Mock::given(method("GET"))
            .and(path(api_path(&format!("host/{name}"))))
            .and(query_param(flag, "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .with_priority(1)
            .mount(server)
            .await;
    }

    let connections: Vec<_> = volumes
        .iter()
        .enumerate()
        .map(|(lun, vol)| json!({ "name": name, "vol": vol, "lun": lun + 1 }))
        .collect();
    Mock::given(method("GET"))
        .and(path(api_path(&format!("host/{name}/volume"))))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(connections)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn create_round_trips_through_the_array() {
    let server = MockServer::start().await;
    let session = connect(&server).await;

    Mock::given(method("POST"))
        .and(path(api_path("host/esx-01")))
        .and(body_json(json!({ "iqnlist": ["iqn.1998-01.com.vmware:esx-01"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "esx-01",
            "iqn": ["iqn.1998-01.com.vmware:esx-01"],
            "wwn": [],
            "nqn": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(api_path("host/esx-01")))
        .and(body_json(json!({ "personality": "esxi" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "esx-01",
            "personality": "esxi"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("host/esx-01/volume/ds1")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": "esx-01", "vol": "ds1", "lun": 1 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    mount_host_reads(&server, "esx-01", &["ds1"]).await;

    let desired = HostSpec {
        iqn: Some(vec!["iqn.1998-01.com.vmware:esx-01".into()]),
        personality: Some(Personality::Esxi),
        connected_volumes: Some(vec!["ds1".into()]),
        ..HostSpec::named("esx-01")
    };
    let created = session.hosts().create(&desired).await.unwrap();

    assert_eq!(created.name, "esx-01");
    assert_eq!(created.personality, Some(Personality::Esxi));
    assert_eq!(created.connected_volumes, Some(vec!["ds1".to_string()]));
    assert_eq!(created.preferred_array, Some(vec![]));
}

#[tokio::test]
async fn missing_host_reads_as_absent() {
    let server = MockServer::start().await;
    let session = connect(&server).await;

    Mock::given(method("GET"))
        .and(path(api_path("host/ghost")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!([
            { "ctx": "ghost", "msg": "Host does not exist." }
        ])))
        .mount(&server)
        .await;

    assert_eq!(session.hosts().read("ghost").await.unwrap(), None);
    let err = session.hosts().import("ghost").await.unwrap_err();
    assert!(matches!(err, CoreError::HostNotFound { .. }));
}

#[tokio::test]
async fn delete_disconnects_then_removes_and_logs_out() {
    let server = MockServer::start().await;
    let session = connect(&server).await;

    Mock::given(method("DELETE"))
        .and(path(api_path("host/esx-01/volume/ds1")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "name": "esx-01", "vol": "ds1" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api_path("host/esx-01")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "esx-01" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api_path("auth/session")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    session
        .hosts()
        .delete("esx-01", &["ds1".to_string()])
        .await
        .unwrap();
    session.close().await;
}

#[tokio::test]
async fn rejected_token_fails_to_connect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("auth/session")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!([
            { "msg": "Invalid API token." }
        ])))
        .mount(&server)
        .await;

    let config = ArrayConfig::new(
        Url::parse(&server.uri()).unwrap(),
        AuthCredentials::ApiToken("bad".to_string().into()),
    );
    let err = ArraySession::connect(&config).await.err().unwrap();
    assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
}
