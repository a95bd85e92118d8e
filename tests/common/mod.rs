//! Test doubles shared by the integration and functional suites

#![allow(dead_code)]

use async_trait::async_trait;
use pixilator_gateway::backend::{
    GeneratedText, ImageGenerationRequest, ImageGenerator, TextGenerationRequest, TextGenerator,
};
use pixilator_gateway::config::{Catalog, RefinementConfig, Settings, StorageBackendKind};
use pixilator_gateway::error::{AppError, Result};
use pixilator_gateway::gateway::{
    GenerationOrchestrator, ImageSynthesizer, NegativePromptResolver, PersistenceGateway,
    PromptRefiner,
};
use pixilator_gateway::middleware::FixedWindowRateLimiter;
use pixilator_gateway::storage::{
    GenerationRow, LibraryFilter, MemoryRecordStore, NewGeneration, ObjectStore, RecordStore,
    Stores,
};
use pixilator_gateway::AppState;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const FAKE_PNG: &[u8] = b"\x89PNG-fake-image";

/// Text generator with a scripted reply
pub struct FakeText {
    reply: Option<String>,
    calls: AtomicUsize,
    last_inputs: Mutex<Option<String>>,
}

impl FakeText {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
            last_inputs: Mutex::new(None),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
            last_inputs: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_inputs(&self) -> Option<String> {
        self.last_inputs.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeText {
    fn name(&self) -> &str {
        "fake-text"
    }

    async fn generate_text(&self, request: &TextGenerationRequest) -> Result<Vec<GeneratedText>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_inputs.lock() = Some(request.inputs.clone());
        match &self.reply {
            Some(text) => Ok(vec![GeneratedText {
                generated_text: Some(text.clone()),
            }]),
            None => Err(AppError::BackendError("Backend returned 500: boom".to_string())),
        }
    }
}

/// Image generator returning fixed bytes or failing
pub struct FakeImage {
    fail: bool,
    calls: AtomicUsize,
    last: Mutex<Option<(String, ImageGenerationRequest)>>,
}

impl FakeImage {
    pub fn working() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Model and payload of the most recent call
    pub fn last_call(&self) -> Option<(String, ImageGenerationRequest)> {
        self.last.lock().clone()
    }
}

#[async_trait]
impl ImageGenerator for FakeImage {
    fn name(&self) -> &str {
        "fake-image"
    }

    async fn generate_image(&self, model: &str, request: &ImageGenerationRequest) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock() = Some((model.to_string(), request.clone()));
        if self.fail {
            return Err(AppError::BackendError("Backend returned 503: loading".to_string()));
        }
        Ok(FAKE_PNG.to_vec())
    }
}

/// Object store that accepts uploads and remembers their keys
#[derive(Default)]
pub struct RecordingObjectStore {
    pub keys: Mutex<Vec<String>>,
}

#[async_trait]
impl ObjectStore for RecordingObjectStore {
    fn name(&self) -> &str {
        "recording"
    }

    async fn upload(&self, key: &str, _bytes: Vec<u8>, _content_type: &str) -> Result<()> {
        self.keys.lock().push(key.to_string());
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://cdn.test/generated-images/{}", key)
    }
}

/// Object store whose uploads always fail
pub struct FailingObjectStore;

#[async_trait]
impl ObjectStore for FailingObjectStore {
    fn name(&self) -> &str {
        "failing"
    }

    async fn upload(&self, _key: &str, _bytes: Vec<u8>, _content_type: &str) -> Result<()> {
        Err(AppError::Storage("Upload failed with 500".to_string()))
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://cdn.test/{}", key)
    }
}

/// Record store whose calls always fail
pub struct FailingRecordStore;

#[async_trait]
impl RecordStore for FailingRecordStore {
    fn name(&self) -> &str {
        "failing"
    }

    async fn insert(&self, _record: &NewGeneration) -> Result<GenerationRow> {
        Err(AppError::Storage("relation \"generations\" does not exist".to_string()))
    }

    async fn query(&self, _filter: &LibraryFilter) -> Result<Vec<GenerationRow>> {
        Err(AppError::Storage("relation \"generations\" does not exist".to_string()))
    }
}

/// Working in-memory stores
pub fn memory_stores() -> (Stores, Arc<RecordingObjectStore>, Arc<MemoryRecordStore>) {
    let objects = Arc::new(RecordingObjectStore::default());
    let records = Arc::new(MemoryRecordStore::new());
    let stores = Stores {
        kind: StorageBackendKind::Supabase,
        objects: objects.clone(),
        records: records.clone(),
    };
    (stores, objects, records)
}

/// Stores that accept nothing
pub fn failing_stores() -> Stores {
    Stores {
        kind: StorageBackendKind::Supabase,
        objects: Arc::new(FailingObjectStore),
        records: Arc::new(FailingRecordStore),
    }
}

/// Fully wired state over fakes, with a 10 per hour limiter
pub struct Harness {
    pub text: Arc<FakeText>,
    pub image: Arc<FakeImage>,
    pub state: Arc<AppState>,
}

impl Harness {
    pub fn new(text: Arc<FakeText>, image: Arc<FakeImage>, stores: Stores) -> Self {
        Self::with_limiter(
            text,
            image,
            stores,
            FixedWindowRateLimiter::new(10, Duration::from_secs(3600)),
        )
    }

    pub fn with_limiter(
        text: Arc<FakeText>,
        image: Arc<FakeImage>,
        stores: Stores,
        limiter: FixedWindowRateLimiter,
    ) -> Self {
        let settings = Settings::default();
        let catalog = Arc::new(Catalog::builtin().unwrap());
        let default_model = settings.inference.default_model_id().unwrap().to_string();

        let orchestrator = GenerationOrchestrator::new(
            Arc::new(limiter),
            PromptRefiner::new(text.clone(), &RefinementConfig::default()),
            NegativePromptResolver::new(catalog.clone()),
            ImageSynthesizer::new(image.clone(), catalog.clone(), &settings.inference),
            PersistenceGateway::new(stores.clone()),
            default_model,
        );

        let state = Arc::new(AppState::new(settings, catalog, orchestrator, stores));
        Self { text, image, state }
    }

    pub fn orchestrator(&self) -> &GenerationOrchestrator {
        &self.state.orchestrator
    }
}
