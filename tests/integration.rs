//! Integration tests for ledgershim.
//!
//! Drives a small asset-registry handler set end to end through the
//! dispatcher over the in-memory mock host.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use ledgershim::cursor::ValueMode;
use ledgershim::mock::MockStub;
use ledgershim::stub::{IterItem, RawRecord};
use ledgershim::{Context, Dispatcher, Payload, ShimError};

/// Self-signed P-256 certificate with an authorityKeyIdentifier extension.
const SUBMITTER_PEM: &str = "-----BEGIN CERTIFICATE-----
MIIBmzCCAUGgAwIBAgIUGSVruOzP9hkFmfmVOZWwoZSzfM4wCgYIKoZIzj0EAwIw
JjEOMAwGA1UEAwwFdXNlcjExFDASBgNVBAoMC2V4YW1wbGUub3JnMB4XDTI2MDgy
OTE4NTQzMloXDTQ2MDgyNDE4NTQzMlowJjEOMAwGA1UEAwwFdXNlcjExFDASBgNV
BAoMC2V4YW1wbGUub3JnMFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEYwUzlSAv
hvOg4n+QjwuumaHgZZv1oly535cDyREDSnnWQvmqTUTIBxkBnJQNDjiq3WtNTTt3
hfZ8rwh/Dc6BEKNNMEswHQYDVR0OBBYEFD4J/CrX9kdBH7Lj7kwgyruFJygpMB8G
A1UdIwQYMBaAFD4J/CrX9kdBH7Lj7kwgyruFJygpMAkGA1UdEwQCMAAwCgYIKoZI
zj0EAwIDSAAwRQIgJFDwWPQH7sGzMx3YYPBJ0MapJvstZalCXmDMuj+ENMoCIQDm
dKz2FpACgWjan0l+WvmzogA5c9yIu4A/rSE1LzcXFg==
-----END CERTIFICATE-----
";

const SUBMITTER_SUBJECT_ID: &str =
    "a94295f85f195257da64b9cc861cb45c554dfc8a2f7c142c29b5ac70db382a8f";

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Asset {
    id: String,
    qty: u32,
    owner: String,
}

fn asset_registry() -> Dispatcher {
    Dispatcher::builder()
        .handle("createAsset", |ctx: Context, args, _fcn| async move {
            let identity = ctx.creator_identity().await?;
            let qty: u32 = args[1]
                .parse()
                .map_err(|_| ShimError::HandlerExecution("qty must be a number".to_string()))?;
            let asset = Asset {
                id: args[0].clone(),
                qty,
                owner: identity.subject_id().to_string(),
            };
            let key = ctx.create_composite_key("asset", &[&args[0]])?;
            ctx.put_json_state(&key, &asset).await?;
            Ok(Payload::Empty)
        })
        .handle("getAsset", |ctx: Context, args, _fcn| async move {
            let key = ctx.create_composite_key("asset", &[&args[0]])?;
            let asset: Option<Asset> = ctx.get_json_state(&key).await?;
            match asset {
                Some(asset) => Payload::json(&asset),
                None => Err(ShimError::HandlerExecution(format!(
                    "asset {} not found",
                    args[0]
                ))),
            }
        })
        .handle("listOwners", |ctx: Context, _args, _fcn| async move {
            let mut cursor = ctx
                .query(json!({"selector": {"owner": {"$exists": true}}}), ValueMode::Json)
                .await?;
            let records = cursor.collect_all().await?;
            let keys: Vec<&str> = records.iter().map(|r| r.key.as_str()).collect();
            Payload::json(&keys)
        })
        .handle("whoAmI", |ctx: Context, _args, _fcn| async move {
            let identity = ctx.creator_identity().await?;
            Ok(Payload::from(identity.subject_id().to_string()))
        })
        .handle_static("ping", |_ctx, _args, _fcn| async { Ok(Payload::from("pong")) })
        .build()
}

fn stub_with_creator() -> Arc<MockStub> {
    let stub = Arc::new(MockStub::new());
    stub.set_creator("Org1MSP", SUBMITTER_PEM.as_bytes().to_vec());
    stub
}

/// Full create/read cycle: handler writes JSON state through the context,
/// then reads it back as a structured payload.
#[tokio::test]
async fn test_create_and_read_asset() {
    let stub = stub_with_creator();
    let dispatcher = asset_registry();

    stub.set_function("createAsset", &["a1", "7"]);
    let response = dispatcher.invoke(Context::new(stub.clone())).await;
    assert!(response.is_success(), "{:?}", response);
    assert!(response.payload().unwrap().is_empty());

    // State landed under the composite key.
    let stored = stub.state_of("\u{0}asset\u{0}a1\u{0}").unwrap();
    let stored: Asset = serde_json::from_slice(&stored).unwrap();
    assert_eq!(stored.owner, SUBMITTER_SUBJECT_ID);

    stub.set_function("getAsset", &["a1"]);
    let response = dispatcher.invoke(Context::new(stub.clone())).await;
    let asset: Asset = serde_json::from_slice(response.payload().unwrap()).unwrap();
    assert_eq!(
        asset,
        Asset {
            id: "a1".to_string(),
            qty: 7,
            owner: SUBMITTER_SUBJECT_ID.to_string(),
        }
    );
}

/// Identity resolution surfaces the normalized fingerprint to handlers.
#[tokio::test]
async fn test_whoami_returns_subject_fingerprint() {
    let stub = stub_with_creator();
    let dispatcher = asset_registry();

    stub.set_function("whoAmI", &[]);
    let response = dispatcher.invoke(Context::new(stub)).await;
    assert_eq!(
        response.payload().unwrap().as_ref(),
        SUBMITTER_SUBJECT_ID.as_bytes()
    );
}

/// Static-tier handlers are reachable when no instance handler shadows them.
#[tokio::test]
async fn test_static_handler_dispatch() {
    let stub = stub_with_creator();
    let dispatcher = asset_registry();

    stub.set_function("ping", &[]);
    let response = dispatcher.invoke(Context::new(stub)).await;
    assert_eq!(response.payload().unwrap().as_ref(), b"pong");
}

/// A dispatch miss carries the exact contract message and fails cleanly.
#[tokio::test]
async fn test_unknown_function() {
    let stub = stub_with_creator();
    let dispatcher = asset_registry();

    stub.set_function("transferAsset", &["a1", "bob"]);
    let response = dispatcher.invoke(Context::new(stub)).await;
    assert_eq!(
        response.message().unwrap(),
        "No function of name:transferAsset found"
    );
}

/// Application errors raised inside a handler become failure responses with
/// the handler's message; the dispatcher never propagates them.
#[tokio::test]
async fn test_handler_error_surfaces_message() {
    let stub = stub_with_creator();
    let dispatcher = asset_registry();

    stub.set_function("getAsset", &["ghost"]);
    let response = dispatcher.invoke(Context::new(stub.clone())).await;
    assert_eq!(response.message().unwrap(), "asset ghost not found");

    stub.set_function("createAsset", &["a1", "not-a-number"]);
    let response = dispatcher.invoke(Context::new(stub)).await;
    assert_eq!(response.message().unwrap(), "qty must be a number");
}

/// A handler can stream query results through the cursor and return a
/// structured summary.
#[tokio::test]
async fn test_list_owners_via_query_cursor() {
    let stub = stub_with_creator();
    let dispatcher = asset_registry();

    stub.push_query_result(vec![
        IterItem {
            value: Some(RawRecord::new("ns", "k1", &br#"{"owner":"alice"}"#[..])),
            done: false,
        },
        IterItem {
            value: Some(RawRecord::new("ns", "k2", &br#"{"owner":"bob"}"#[..])),
            done: true,
        },
    ]);

    stub.set_function("listOwners", &[]);
    let response = dispatcher.invoke(Context::new(stub.clone())).await;
    assert_eq!(response.payload().unwrap().as_ref(), br#"["k1","k2"]"#);

    // The selector was serialized into the query string handed to the host.
    let queries = stub.queries();
    assert_eq!(queries.len(), 1);
    assert!(queries[0].contains("\"owner\""));
}

/// Init is an immediate empty success regardless of registered handlers.
#[tokio::test]
async fn test_init_entry_point() {
    let stub = stub_with_creator();
    let dispatcher = asset_registry();

    let response = dispatcher.init(Context::new(stub)).await;
    assert!(response.is_success());
    assert!(response.payload().unwrap().is_empty());
}

/// Repeated deliveries through one dispatcher stay isolated: a failure in
/// one transaction does not affect the next.
#[tokio::test]
async fn test_dispatcher_returns_to_idle_after_failure() {
    let stub = stub_with_creator();
    let dispatcher = asset_registry();

    stub.set_function("getAsset", &["ghost"]);
    let failed = dispatcher.invoke(Context::new(stub.clone())).await;
    assert!(!failed.is_success());

    stub.set_function("ping", &[]);
    let ok = dispatcher.invoke(Context::new(stub)).await;
    assert_eq!(ok.payload().unwrap().as_ref(), b"pong");
}
