use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

use super::BaseInteractionStore;
use crate::domains::interactions::InteractionSession;

/// Interaction session as stored, with its expiry
#[derive(Clone, Debug)]
struct StoredInteraction {
    payload: serde_json::Value,
    expires_at: DateTime<Utc>,
}

impl StoredInteraction {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-memory interaction store
///
/// Sessions are kept in their serialized form and expire after the
/// lifetime given to `save`. Clones share the same map.
#[derive(Clone)]
pub struct InMemoryInteractionStore {
    interactions: Arc<RwLock<HashMap<String, StoredInteraction>>>,
}

impl InMemoryInteractionStore {
    pub fn new() -> Self {
        Self {
            interactions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored sessions, expired ones included
    pub async fn len(&self) -> usize {
        self.interactions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Clean up expired sessions (run periodically)
    pub async fn cleanup_expired(&self) {
        let mut interactions = self.interactions.write().await;
        let now = Utc::now();

        let before = interactions.len();
        interactions.retain(|_, stored| !stored.is_expired(now));

        let purged = before - interactions.len();
        if purged > 0 {
            debug!(purged, "Purged expired interaction sessions");
        }
    }

    /// Run `cleanup_expired` every `period` until the handle is aborted
    pub fn spawn_cleanup(&self, period: std::time::Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                store.cleanup_expired().await;
            }
        })
    }
}

impl Default for InMemoryInteractionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn expiry(expires_in: u64) -> Result<DateTime<Utc>> {
    let lifetime = i64::try_from(expires_in)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| anyhow!("interaction lifetime out of range: {}s", expires_in))?;

    Utc::now()
        .checked_add_signed(lifetime)
        .ok_or_else(|| anyhow!("interaction expiry out of range: {}s", expires_in))
}

#[async_trait]
impl BaseInteractionStore for InMemoryInteractionStore {
    async fn save(&self, interaction: &InteractionSession, expires_in: u64) -> Result<()> {
        let stored = StoredInteraction {
            payload: serde_json::to_value(interaction)?,
            expires_at: expiry(expires_in)?,
        };

        let mut interactions = self.interactions.write().await;
        interactions.insert(interaction.uid.clone(), stored);
        Ok(())
    }

    async fn find(&self, uid: &str) -> Result<Option<InteractionSession>> {
        let interactions = self.interactions.read().await;
        let Some(stored) = interactions.get(uid) else {
            return Ok(None);
        };

        if stored.is_expired(Utc::now()) {
            return Ok(None);
        }

        Ok(Some(serde_json::from_value(stored.payload.clone())?))
    }

    async fn destroy(&self, uid: &str) -> Result<()> {
        let mut interactions = self.interactions.write().await;
        interactions.remove(uid);
        Ok(())
    }
}
