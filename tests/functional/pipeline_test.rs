//! End-to-end generation through the orchestrator

use pixilator_gateway::api::models::GenerationRequest;
use pixilator_gateway::config::StorageBackendKind;
use pixilator_gateway::error::AppError;
use pixilator_gateway::middleware::FixedWindowRateLimiter;
use pixilator_gateway::response::data_uri;
use pixilator_gateway::storage::{LibraryFilter, MemoryRecordStore, RecordStore, Stores};
use std::sync::Arc;
use std::time::Duration;

use crate::common::{
    failing_stores, memory_stores, FailingObjectStore, FailingRecordStore, FakeImage, FakeText,
    Harness, RecordingObjectStore, FAKE_PNG,
};

const CINEMATIC_NEGATIVE: &str = "amateur, low quality, poor lighting, unrealistic, flat lighting";

#[tokio::test]
async fn test_cinematic_widescreen_generation() {
    let (stores, objects, records) = memory_stores();
    let harness = Harness::new(
        FakeText::replying("a mountain at dawn, golden hour, volumetric light"),
        FakeImage::working(),
        stores,
    );

    let request = GenerationRequest::new("a mountain at dawn")
        .with_style("cinematic")
        .with_aspect_ratio("16:9")
        .with_model("model-x");
    let record = harness.orchestrator().handle("198.51.100.20", request).await.unwrap();

    assert!(!record.id.starts_with("temp_"));
    assert_eq!(record.original_prompt, "a mountain at dawn");
    assert_eq!(record.refined_prompt, "a mountain at dawn, golden hour, volumetric light");
    assert_eq!(record.negative_prompt, CINEMATIC_NEGATIVE);
    assert_eq!(record.style, "cinematic");
    assert_eq!(record.aspect_ratio, "16:9");
    assert_eq!(record.model_version, "model-x");
    assert_eq!(record.user_id, "public");

    // The synthesizer saw the refined prompt, the style's negative prompt and 16:9 dimensions
    let (model, payload) = harness.image.last_call().unwrap();
    assert_eq!(model, "model-x");
    assert_eq!(payload.inputs, record.refined_prompt);
    assert_eq!(payload.parameters.negative_prompt, CINEMATIC_NEGATIVE);
    assert_eq!((payload.parameters.width, payload.parameters.height), (1024, 576));

    // Uploaded under a generated key and recorded with the public URL
    let keys = objects.keys.lock().clone();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("generation-") && keys[0].ends_with(".png"));
    assert_eq!(record.image_url, format!("https://cdn.test/generated-images/{}", keys[0]));

    let rows = records.query(&LibraryFilter::public(0, 50)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, record.id);
    assert_eq!(rows[0].image_url, record.image_url);
    assert_eq!(rows[0].created_at, record.created_at);
    assert!(rows[0].processing_time.unwrap() <= record.processing_time_ms.unwrap());
}

#[tokio::test]
async fn test_defaults_are_applied() {
    let (stores, _, _) = memory_stores();
    let harness = Harness::new(FakeText::replying("refined"), FakeImage::working(), stores);

    let record = harness
        .orchestrator()
        .handle("198.51.100.21", GenerationRequest::new("a cat"))
        .await
        .unwrap();

    assert_eq!(record.style, "realistic");
    assert_eq!(record.aspect_ratio, "1:1");
    assert_eq!(record.model_version, "tencent/HunyuanImage-3.0");
    let (_, payload) = harness.image.last_call().unwrap();
    assert_eq!((payload.parameters.width, payload.parameters.height), (1024, 1024));
}

#[tokio::test]
async fn test_unknown_style_uses_realistic_negative_prompt() {
    let harness = Harness::new(FakeText::replying("refined"), FakeImage::working(), Stores::disabled());

    let record = harness
        .orchestrator()
        .handle("198.51.100.22", GenerationRequest::new("a cat").with_style("baroque"))
        .await
        .unwrap();

    assert_eq!(record.style, "baroque");
    assert_eq!(
        record.negative_prompt,
        "cartoon, anime, painting, drawing, sketch, low quality, blurry, distorted"
    );
}

#[tokio::test]
async fn test_refinement_failure_keeps_original_prompt() {
    let harness = Harness::new(FakeText::failing(), FakeImage::working(), Stores::disabled());

    let record = harness
        .orchestrator()
        .handle("198.51.100.23", GenerationRequest::new("a cat"))
        .await
        .unwrap();

    assert_eq!(harness.text.calls(), 1);
    assert_eq!(record.refined_prompt, "a cat");
    let (_, payload) = harness.image.last_call().unwrap();
    assert_eq!(payload.inputs, "a cat");
}

#[tokio::test]
async fn test_persistence_failure_returns_inline_image() {
    let harness = Harness::new(FakeText::replying("refined"), FakeImage::working(), failing_stores());

    let record = harness
        .orchestrator()
        .handle("198.51.100.24", GenerationRequest::new("a cat"))
        .await
        .unwrap();

    let millis = record.id.strip_prefix("temp_").unwrap();
    assert!(!millis.is_empty() && millis.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(record.image_url, data_uri::encode_png(FAKE_PNG));
    assert!(record.image_url.starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn test_blank_prompt_makes_no_outbound_calls() {
    let harness = Harness::new(FakeText::replying("refined"), FakeImage::working(), Stores::disabled());

    for prompt in ["", "   ", "\n\t"] {
        let err = harness
            .orchestrator()
            .handle("198.51.100.25", GenerationRequest::new(prompt))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg == "Prompt is required"));
    }

    assert_eq!(harness.text.calls(), 0);
    assert_eq!(harness.image.calls(), 0);
}

#[tokio::test]
async fn test_eleventh_request_is_rejected_before_any_work() {
    let harness = Harness::new(FakeText::replying("refined"), FakeImage::working(), Stores::disabled());

    for _ in 0..10 {
        harness
            .orchestrator()
            .handle("203.0.113.50", GenerationRequest::new("a cat"))
            .await
            .unwrap();
    }

    let err = harness
        .orchestrator()
        .handle("203.0.113.50", GenerationRequest::new("a cat"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::RateLimited(_)));
    assert_eq!(harness.text.calls(), 10);
    assert_eq!(harness.image.calls(), 10);
}

#[tokio::test]
async fn test_rejected_prompts_still_count_against_the_limit() {
    let harness = Harness::with_limiter(
        FakeText::replying("refined"),
        FakeImage::working(),
        Stores::disabled(),
        FixedWindowRateLimiter::new(2, Duration::from_secs(3600)),
    );
    let orchestrator = harness.orchestrator();

    assert!(orchestrator.handle("k", GenerationRequest::new("")).await.is_err());
    assert!(orchestrator.handle("k", GenerationRequest::new("a cat")).await.is_ok());
    assert!(matches!(
        orchestrator.handle("k", GenerationRequest::new("a cat")).await,
        Err(AppError::RateLimited(_))
    ));
}

#[tokio::test]
async fn test_synthesis_failure_skips_persistence() {
    let (stores, objects, records) = memory_stores();
    let harness = Harness::new(FakeText::replying("refined"), FakeImage::failing(), stores);

    let err = harness
        .orchestrator()
        .handle("198.51.100.26", GenerationRequest::new("a cat"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Synthesis(_)));
    assert!(objects.keys.lock().is_empty());
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_failed_upload_still_records_inline_image() {
    let records = Arc::new(MemoryRecordStore::new());
    let stores = Stores {
        kind: StorageBackendKind::Supabase,
        objects: Arc::new(FailingObjectStore),
        records: records.clone(),
    };
    let harness = Harness::new(FakeText::replying("refined"), FakeImage::working(), stores);

    let record = harness
        .orchestrator()
        .handle("198.51.100.27", GenerationRequest::new("a cat"))
        .await
        .unwrap();

    let inline = data_uri::encode_png(FAKE_PNG);
    assert!(!record.id.starts_with("temp_"));
    assert_eq!(record.image_url, inline);

    let rows = records.query(&LibraryFilter::public(0, 50)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, record.id);
    assert_eq!(rows[0].image_url, inline);
}

#[tokio::test]
async fn test_failed_insert_keeps_uploaded_url() {
    let objects = Arc::new(RecordingObjectStore::default());
    let stores = Stores {
        kind: StorageBackendKind::Supabase,
        objects: objects.clone(),
        records: Arc::new(FailingRecordStore),
    };
    let harness = Harness::new(FakeText::replying("refined"), FakeImage::working(), stores);

    let record = harness
        .orchestrator()
        .handle("198.51.100.28", GenerationRequest::new("a cat"))
        .await
        .unwrap();

    let keys = objects.keys.lock().clone();
    assert_eq!(keys.len(), 1);
    assert_eq!(record.image_url, format!("https://cdn.test/generated-images/{}", keys[0]));
    let millis = record.id.strip_prefix("temp_").unwrap();
    assert!(millis.chars().all(|c| c.is_ascii_digit()));
}
