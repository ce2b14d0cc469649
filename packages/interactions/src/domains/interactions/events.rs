use super::prompt::PromptDecision;

/// Interaction events - facts about how an authorization request was resolved
///
/// Errors go in Result::Err, not in events.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// No interaction was needed and the grant is complete
    AuthorizationAccepted {
        uid: String,
        account_id: String,
        scope: String,
    },

    /// The end-user was sent to an interaction
    InteractionStarted { uid: String, prompt: PromptDecision },
}

impl InteractionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionEvent::AuthorizationAccepted { .. } => "authorization.accepted",
            InteractionEvent::InteractionStarted { .. } => "interaction.started",
        }
    }

    pub fn uid(&self) -> &str {
        match self {
            InteractionEvent::AuthorizationAccepted { uid, .. }
            | InteractionEvent::InteractionStarted { uid, .. } => uid,
        }
    }
}
