//! Dependencies for the interaction resolver (using traits for testability)
//!
//! All collaborators sit behind trait objects so tests can swap in the
//! recording doubles from `test_dependencies`.

use std::sync::Arc;

use super::{BaseEventSink, BaseInteractionStore, BaseInteractionUrl, BaseUrlBuilder};

#[derive(Clone)]
pub struct InteractionDeps {
    pub store: Arc<dyn BaseInteractionStore>,
    pub events: Arc<dyn BaseEventSink>,
    /// Builds the resume URL
    pub urls: Arc<dyn BaseUrlBuilder>,
    /// Resolves the interaction destination for a started session
    pub interaction_url: Arc<dyn BaseInteractionUrl>,
}

impl InteractionDeps {
    pub fn new(
        store: Arc<dyn BaseInteractionStore>,
        events: Arc<dyn BaseEventSink>,
        urls: Arc<dyn BaseUrlBuilder>,
        interaction_url: Arc<dyn BaseInteractionUrl>,
    ) -> Self {
        Self {
            store,
            events,
            urls,
            interaction_url,
        }
    }
}
