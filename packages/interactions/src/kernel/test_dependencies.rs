// TestDependencies - mock implementations for testing
//
// Provides recording doubles that can be injected into InteractionDeps.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use url::Url;

use super::{
    BaseEventSink, BaseInteractionStore, BaseInteractionUrl, DefaultInteractionUrl,
    InMemoryInteractionStore, InteractionDeps, RouteUrlBuilder,
};
use crate::common::AuthorizationContext;
use crate::domains::interactions::{InteractionEvent, InteractionSession};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Recording Event Sink
// =============================================================================

#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<InteractionEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all emitted events
    pub fn events(&self) -> Vec<InteractionEvent> {
        lock(&self.events).clone()
    }

    /// Count events emitted under a name
    pub fn count(&self, name: &str) -> usize {
        lock(&self.events)
            .iter()
            .filter(|event| event.name() == name)
            .count()
    }
}

impl BaseEventSink for RecordingEventSink {
    fn emit(&self, event: &InteractionEvent) {
        lock(&self.events).push(event.clone());
    }
}

// =============================================================================
// Mock Interaction Store
// =============================================================================

/// Arguments captured from a save call
#[derive(Debug, Clone)]
pub struct SaveCallArgs {
    pub uid: String,
    pub expires_in: u64,
}

/// In-memory store that records saves and can be told to fail
pub struct MockInteractionStore {
    inner: InMemoryInteractionStore,
    save_calls: Mutex<Vec<SaveCallArgs>>,
    fail_saves: AtomicBool,
}

impl MockInteractionStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryInteractionStore::new(),
            save_calls: Mutex::new(Vec::new()),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Make every subsequent save fail
    pub fn failing() -> Self {
        let store = Self::new();
        store.fail_saves.store(true, Ordering::SeqCst);
        store
    }

    /// Get all save calls with their arguments
    pub fn save_calls(&self) -> Vec<SaveCallArgs> {
        lock(&self.save_calls).clone()
    }

    pub fn was_saved(&self, uid: &str) -> bool {
        lock(&self.save_calls).iter().any(|call| call.uid == uid)
    }
}

impl Default for MockInteractionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseInteractionStore for MockInteractionStore {
    async fn save(&self, interaction: &InteractionSession, expires_in: u64) -> Result<()> {
        // Record the call
        lock(&self.save_calls).push(SaveCallArgs {
            uid: interaction.uid.clone(),
            expires_in,
        });

        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(anyhow!("interaction store unavailable"));
        }
        self.inner.save(interaction, expires_in).await
    }

    async fn find(&self, uid: &str) -> Result<Option<InteractionSession>> {
        self.inner.find(uid).await
    }

    async fn destroy(&self, uid: &str) -> Result<()> {
        self.inner.destroy(uid).await
    }
}

// =============================================================================
// Failing Interaction URL
// =============================================================================

pub struct FailingInteractionUrl;

#[async_trait]
impl BaseInteractionUrl for FailingInteractionUrl {
    async fn resolve(
        &self,
        _ctx: &AuthorizationContext,
        _interaction: &InteractionSession,
    ) -> Result<String> {
        Err(anyhow!("interaction url resolver failed"))
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Recording doubles plus the InteractionDeps wired from them
pub struct TestDependencies {
    pub store: Arc<MockInteractionStore>,
    pub events: Arc<RecordingEventSink>,
    pub urls: Arc<RouteUrlBuilder>,
    pub interaction_url: Arc<dyn BaseInteractionUrl>,
}

pub const TEST_ISSUER: &str = "https://op.example.com";

impl TestDependencies {
    pub fn new() -> Self {
        let issuer = Url::parse(TEST_ISSUER).expect("test issuer is a valid URL");
        let urls = RouteUrlBuilder::with_default_routes(issuer);
        Self {
            store: Arc::new(MockInteractionStore::new()),
            events: Arc::new(RecordingEventSink::new()),
            interaction_url: Arc::new(DefaultInteractionUrl::new(urls.clone())),
            urls: Arc::new(urls),
        }
    }

    pub fn with_store(mut self, store: MockInteractionStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    pub fn with_interaction_url(mut self, interaction_url: impl BaseInteractionUrl + 'static) -> Self {
        self.interaction_url = Arc::new(interaction_url);
        self
    }

    pub fn deps(&self) -> InteractionDeps {
        InteractionDeps::new(
            self.store.clone(),
            self.events.clone(),
            self.urls.clone(),
            self.interaction_url.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
