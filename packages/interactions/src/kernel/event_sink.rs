use tracing::info;

use super::BaseEventSink;
use crate::domains::interactions::InteractionEvent;

/// Event sink that logs every event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl BaseEventSink for TracingEventSink {
    fn emit(&self, event: &InteractionEvent) {
        match event {
            InteractionEvent::AuthorizationAccepted {
                uid,
                account_id,
                scope,
            } => info!(event = event.name(), %uid, %account_id, %scope, "Authorization accepted"),
            InteractionEvent::InteractionStarted { uid, prompt } => info!(
                event = event.name(),
                %uid,
                prompt = %prompt.name,
                reasons = ?prompt.reasons,
                "Interaction started"
            ),
        }
    }
}
