//! End-to-end tests for the `load`/`save` entry points.

mod common;

use common::{MockResponse, MockServer};
use confstore::{
    ClientConfig, ConfStoreError, JsonCodec, StoreOptions, TomlCodec, load, load_with, save,
    save_with,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Person {
    name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Service {
    host: String,
    port: u16,
    tags: Vec<String>,
    limits: BTreeMap<String, f64>,
    enabled: bool,
}

fn service() -> Service {
    Service {
        host: "db.internal".to_string(),
        port: 5432,
        tags: vec!["primary".to_string(), "eu".to_string()],
        limits: BTreeMap::from([("cpu".to_string(), 1.5), ("mem".to_string(), 512.0)]),
        enabled: true,
    }
}

fn storing_server() -> MockServer {
    let stored = Arc::new(Mutex::new(String::new()));
    MockServer::start(move |request| {
        let mut stored = stored.lock().unwrap();
        if request.method == "POST" {
            *stored = request.body_text();
            MockResponse::ok("")
        } else {
            MockResponse::ok(stored.clone())
        }
    })
}

#[test]
fn test_save_then_load_local() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let target = dir.path().join("x").join("y").join("out.json");
    let path = target.to_string_lossy();

    save(
        &path,
        &Person {
            name: "bob".to_string(),
        },
    )?;
    assert_eq!(std::fs::read_to_string(&target)?, r#"{"name":"bob"}"#);

    let loaded: Person = load(&path)?;
    assert_eq!(loaded.name, "bob");
    Ok(())
}

#[test]
fn test_round_trip_local_and_remote() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let server = storing_server();
    let value = service();

    let local = dir.path().join("service.json");
    let remote = server.url("/service.json");

    for path in [local.to_string_lossy().to_string(), remote] {
        save(&path, &value)?;
        let loaded: Service = load(&path)?;
        assert_eq!(loaded, value, "round trip through {}", path);
    }
    Ok(())
}

#[test]
fn test_round_trip_pretty_json() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let target = dir.path().join("service.json");
    let path = target.to_string_lossy();
    let options = || StoreOptions::new().with_codec(JsonCodec::pretty());

    save_with(&path, &service(), options())?;
    let text = std::fs::read_to_string(&target)?;
    assert!(text.starts_with("{\n  \"host\": \"db.internal\""));

    let loaded: Service = load_with(&path, options())?;
    assert_eq!(loaded, service());
    Ok(())
}

#[test]
fn test_codec_override_applies_to_remote() {
    let server = storing_server();
    let url = server.url("/service.toml");
    let options = || StoreOptions::new().with_codec(TomlCodec::new());

    save_with(&url, &service(), options()).unwrap();
    let requests = server.requests();
    assert!(requests[0].body_text().contains("host = \"db.internal\""));

    let loaded: Service = load_with(&url, options()).unwrap();
    assert_eq!(loaded, service());
}

#[test]
fn test_load_with_client_timeout() {
    let server = MockServer::fixed(MockResponse::ok("{}").delayed(Duration::from_millis(200)));
    let options = StoreOptions::new()
        .with_client_config(ClientConfig::new().with_timeout(Duration::from_millis(10)));

    let err = load_with::<BTreeMap<String, String>>(&server.url("/"), options).unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {:?}", err);
}

#[test]
fn test_save_with_prebuilt_client_timeout() {
    let server = MockServer::fixed(MockResponse::ok("").delayed(Duration::from_millis(200)));
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_millis(10))
        .build()
        .unwrap();
    let options = StoreOptions::new().with_http_client(client);

    let payload = BTreeMap::from([("k", "v")]);
    let err = save_with(&server.url("/"), &payload, options).unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {:?}", err);
}

#[test]
fn test_remote_500_is_status_error() {
    let server = MockServer::fixed(MockResponse::status(500, "boom"));

    let err = load::<Person>(&server.url("/person.json")).unwrap_err();
    assert!(matches!(&err, ConfStoreError::Status { status: 500, body } if body == "boom"));

    let err = save(&server.url("/person.json"), &Person {
        name: "x".to_string(),
    })
    .unwrap_err();
    assert!(matches!(&err, ConfStoreError::Status { status: 500, body } if body == "boom"));
}

#[test]
fn test_unclaimed_path_is_reported() {
    let err = load::<Person>("s3://bucket/person.json").unwrap_err();
    assert!(
        matches!(&err, ConfStoreError::NoProvider { path } if path == "s3://bucket/person.json")
    );
    assert!(err.to_string().contains("s3://bucket/person.json"));
}

#[test]
fn test_missing_local_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = load::<Person>(&path.to_string_lossy()).unwrap_err();
    assert!(matches!(err, ConfStoreError::Io { .. }));
}

#[test]
fn test_shared_group_across_threads() -> anyhow::Result<()> {
    use confstore::ProviderExt;

    let dir = tempfile::tempdir()?;
    let group = confstore::default_provider()?;

    std::thread::scope(|scope| {
        for i in 0..8u16 {
            let group = &group;
            let path = dir.path().join(format!("svc-{}.json", i));
            scope.spawn(move || {
                let path = path.to_string_lossy();
                let mut value = service();
                value.port = 8000 + i;
                group.save(&path, &value).unwrap();
                let loaded: Service = group.load(&path).unwrap();
                assert_eq!(loaded.port, 8000 + i);
            });
        }
    });
    Ok(())
}
