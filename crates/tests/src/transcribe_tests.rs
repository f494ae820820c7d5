use std::sync::Arc;

use scribed_transcription::Task;
use serde_json::Value;

use crate::fixtures::{ScriptedEngine, TestApp, scripted_engine};

#[tokio::test]
async fn transcribe_returns_the_full_document() {
    let (segments, info) = scripted_engine::rich_result();
    let engine = Arc::new(ScriptedEngine::returning(segments, info));
    let app = TestApp::spawn(engine.clone()).await;

    let resp = app
        .post("/transcribe")
        .json(&vec![0.1f32; 1600])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();

    assert_eq!(json["language"], "en");
    assert_eq!(json["duration"], 3.5);
    assert_eq!(json["segments"].as_array().unwrap().len(), 2);
    assert_eq!(json["segments"][0]["text"], " Hello there");
    assert_eq!(json["segments"][0]["words"][0]["word"], " Hello");
    assert_eq!(json["all_language_probs"]["en"], 0.98);

    // The engine received the samples unchanged, in transcribe mode.
    let requests = engine.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].task, Task::Transcribe);
    assert_eq!(requests[0].samples.len(), 1600);
}

#[tokio::test]
async fn segments_are_ordered_by_start() {
    let (segments, info) = scripted_engine::rich_result();
    let engine = Arc::new(ScriptedEngine::returning(segments, info));
    let app = TestApp::spawn(engine).await;

    let resp = app
        .post("/transcribe")
        .json(&vec![0.1f32; 16000])
        .send()
        .await
        .unwrap();

    let json: Value = resp.json().await.unwrap();
    let starts: Vec<f64> = json["segments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["start"].as_f64().unwrap())
        .collect();
    assert!(starts.windows(2).all(|w| w[0] <= w[1]));
    assert!(json["duration"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn absent_word_data_never_serializes_as_an_empty_array() {
    let (segments, info) = scripted_engine::rich_result();
    let engine = Arc::new(ScriptedEngine::returning(segments, info));
    let app = TestApp::spawn(engine).await;

    let resp = app
        .post("/transcribe")
        .json(&vec![0.1f32; 1600])
        .send()
        .await
        .unwrap();

    let json: Value = resp.json().await.unwrap();
    // Second scripted segment carries no word data.
    assert!(json["segments"][1].get("words").is_none());
}

#[tokio::test]
async fn empty_sample_array_is_not_an_error() {
    let (segments, info) = scripted_engine::silent_result();
    let engine = Arc::new(ScriptedEngine::returning(segments, info));
    let app = TestApp::spawn(engine.clone()).await;

    let resp = app
        .post("/transcribe")
        .json(&Vec::<f32>::new())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["segments"].as_array().unwrap().len(), 0);
    assert_eq!(json["duration"], 0.0);
    assert!(json.get("all_language_probs").is_none());

    // The empty buffer is passed through to the engine as-is.
    assert_eq!(engine.requests()[0].samples.len(), 0);
}

#[tokio::test]
async fn identical_requests_yield_identical_documents() {
    let (segments, info) = scripted_engine::rich_result();
    let engine = Arc::new(ScriptedEngine::returning(segments, info));
    let app = TestApp::spawn(engine).await;

    let samples = vec![0.25f32; 3200];
    let first: Value = app
        .post("/transcribe")
        .json(&samples)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let second: Value = app
        .post("/transcribe")
        .json(&samples)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn engine_failure_maps_to_a_500_with_error_body() {
    let engine = Arc::new(ScriptedEngine::failing("decoder exploded"));
    let app = TestApp::spawn(engine).await;

    let resp = app
        .post("/transcribe")
        .json(&vec![0.1f32; 160])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 500);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "internal");
    assert!(json["message"].as_str().unwrap().contains("decoder exploded"));
}

#[tokio::test]
async fn malformed_body_is_rejected_without_reaching_the_engine() {
    let (segments, info) = scripted_engine::rich_result();
    let engine = Arc::new(ScriptedEngine::returning(segments, info));
    let app = TestApp::spawn(engine.clone()).await;

    let resp = app
        .post("/transcribe")
        .header("content-type", "application/json")
        .body("{\"not\": \"an array\"}")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "bad_request");
    assert!(json["message"].as_str().is_some());
    assert!(engine.requests().is_empty());
}
