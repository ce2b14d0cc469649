// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The resolver in domains/interactions decides; these only persist, notify
// and build URLs.
//
// Naming convention: Base* for trait names (e.g., BaseInteractionStore)

use anyhow::Result;
use async_trait::async_trait;
use url::Url;

use crate::common::AuthorizationContext;
use crate::domains::interactions::{InteractionEvent, InteractionSession};

// =============================================================================
// Interaction Store Trait (Infrastructure - durable interaction sessions)
// =============================================================================

#[async_trait]
pub trait BaseInteractionStore: Send + Sync {
    /// Persist an interaction session for `expires_in` seconds
    async fn save(&self, interaction: &InteractionSession, expires_in: u64) -> Result<()>;

    /// Load a session by uid (None when missing or expired)
    async fn find(&self, uid: &str) -> Result<Option<InteractionSession>>;

    /// Remove a session
    async fn destroy(&self, uid: &str) -> Result<()>;
}

// =============================================================================
// Event Sink Trait (Infrastructure - fire-and-forget notifications)
// =============================================================================

pub trait BaseEventSink: Send + Sync {
    fn emit(&self, event: &InteractionEvent);
}

// =============================================================================
// URL Builder Trait (Infrastructure - named provider routes)
// =============================================================================

pub trait BaseUrlBuilder: Send + Sync {
    /// Absolute URL for a named route, filling `:param` placeholders
    fn url_for(&self, route: &str, params: &[(&str, &str)]) -> Result<Url>;
}

// =============================================================================
// Interaction URL Trait (Infrastructure - where the interaction UI lives)
// =============================================================================

#[async_trait]
pub trait BaseInteractionUrl: Send + Sync {
    async fn resolve(
        &self,
        ctx: &AuthorizationContext,
        interaction: &InteractionSession,
    ) -> Result<String>;
}
