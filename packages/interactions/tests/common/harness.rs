//! Test harness wiring the resolver to recording doubles.

use std::sync::Arc;

use interactions_core::domains::interactions::{InteractionResolver, InteractionsConfig, Prompt};
use interactions_core::kernel::test_dependencies::{MockInteractionStore, TestDependencies};
use interactions_core::kernel::BaseInteractionUrl;

pub struct TestHarness {
    pub deps: TestDependencies,
    pub resolver: InteractionResolver,
}

impl TestHarness {
    pub fn new(prompts: Vec<Prompt>) -> Self {
        Self::with_deps(prompts, TestDependencies::new())
    }

    pub fn with_deps(prompts: Vec<Prompt>, deps: TestDependencies) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let config = InteractionsConfig::new(prompts).expect("valid prompt configuration");
        let resolver = InteractionResolver::new(Arc::new(config), deps.deps());
        Self { deps, resolver }
    }

    pub fn with_failing_store(prompts: Vec<Prompt>) -> Self {
        Self::with_deps(
            prompts,
            TestDependencies::new().with_store(MockInteractionStore::failing()),
        )
    }

    pub fn with_interaction_url(
        prompts: Vec<Prompt>,
        interaction_url: impl BaseInteractionUrl + 'static,
    ) -> Self {
        Self::with_deps(
            prompts,
            TestDependencies::new().with_interaction_url(interaction_url),
        )
    }
}
