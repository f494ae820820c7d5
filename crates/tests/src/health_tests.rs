use std::sync::Arc;

use serde_json::Value;

use crate::fixtures::{ScriptedEngine, TestApp, scripted_engine};

#[tokio::test]
async fn health_reports_ok() {
    let (segments, info) = scripted_engine::silent_result();
    let engine = Arc::new(ScriptedEngine::returning(segments, info));
    let app = TestApp::spawn(engine).await;

    let resp = app.get("/health").send().await.unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["version"].as_str().is_some());
}
