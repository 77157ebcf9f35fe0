//! End-to-end: a client polls the gate while an administrator drives the
//! control plane, both over the same file-backed store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use tempfile::TempDir;
use tower::ServiceExt;

use rungate::auth::{CredentialStore, SessionAuthority};
use rungate::config::GateConfig;
use rungate::control_plane::{
    CallbackAction, ChatEvent, ConversationId, InMemorySessionStateStore, Reply, SessionMachine,
};
use rungate::db;
use rungate::gate::{gate_routes, GateState};
use rungate::registry::BundleRegistry;

const NOW: i64 = 1_700_000_000;
const CONV: ConversationId = ConversationId(1);

async fn poll(router: &axum::Router, bundle_id: &str) -> String {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/")
                .header("APP_ID", bundle_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn administrator_denial_reaches_the_gate() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("rungate.db").display());

    // Gate process
    let gate_pool = db::connect(&url).await.unwrap();
    db::init_schema(&gate_pool).await.unwrap();
    let router = gate_routes(Arc::new(GateState {
        registry: BundleRegistry::new(gate_pool),
        config: GateConfig::default(),
    }));

    // Control-plane process, with one provisioned administrator
    let control_pool = db::connect(&url).await.unwrap();
    let credentials = CredentialStore::new(control_pool.clone());
    credentials.create("admin", "password123").await.unwrap();
    let machine = SessionMachine::new(
        credentials,
        SessionAuthority::new("shared_process_secret", 600),
        BundleRegistry::new(control_pool),
        InMemorySessionStateStore::new(),
        10,
    );

    // The client's first poll registers it fail-open
    assert_eq!(poll(&router, "com.example.app").await, "OK");

    // The administrator logs in and blocks it
    machine.handle(CONV, ChatEvent::Start, NOW).await.unwrap();
    machine
        .handle(CONV, ChatEvent::Text("admin".into()), NOW)
        .await
        .unwrap();
    let replies = machine
        .handle(CONV, ChatEvent::Text("password123".into()), NOW)
        .await
        .unwrap();
    assert_eq!(replies, vec![Reply::MainMenu]);

    let replies = machine
        .handle(
            CONV,
            ChatEvent::Callback(CallbackAction::BlockBundle("com.example.app".into())),
            NOW,
        )
        .await
        .unwrap();
    match &replies[0] {
        Reply::BundleDetail { bundle } => assert!(!bundle.allow_execution),
        other => panic!("expected BundleDetail, got {:?}", other),
    }

    // The next poll is denied
    assert_eq!(poll(&router, "com.example.app").await, "BLOCKED");

    // Re-allowing flips it back
    machine
        .handle(
            CONV,
            ChatEvent::Callback(CallbackAction::AllowBundle("com.example.app".into())),
            NOW,
        )
        .await
        .unwrap();
    assert_eq!(poll(&router, "com.example.app").await, "OK");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn removed_bundle_reregisters_fail_open() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("rungate.db").display());

    let gate_pool = db::connect(&url).await.unwrap();
    db::init_schema(&gate_pool).await.unwrap();
    let registry = BundleRegistry::new(gate_pool.clone());
    let router = gate_routes(Arc::new(GateState {
        registry: registry.clone(),
        config: GateConfig::default(),
    }));

    assert_eq!(poll(&router, "com.example.app").await, "OK");
    registry
        .set_execution("com.example.app", false, NOW)
        .await
        .unwrap();
    assert_eq!(poll(&router, "com.example.app").await, "BLOCKED");

    // Removal forgets the denial; the next poll starts over fail-open
    registry.remove("com.example.app").await.unwrap();
    assert_eq!(poll(&router, "com.example.app").await, "OK");
}
