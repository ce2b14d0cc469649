//! Grant completion guard: runs when no prompt needs interaction.

use tracing::debug;

use super::events::InteractionEvent;
use crate::common::{AuthorizationContext, InteractionError};
use crate::kernel::BaseEventSink;

/// Require a resolved account and a non-empty granted scope, then emit
/// `authorization.accepted`.
///
/// Without them the policy is misconfigured; the request is denied instead
/// of issuing a scope-less grant.
pub fn complete_grant(
    ctx: &AuthorizationContext,
    events: &dyn BaseEventSink,
) -> Result<(), InteractionError> {
    let Some(account_id) = ctx.account_id() else {
        return Err(InteractionError::access_denied(
            "request resolved without requesting interactions but no account id was resolved",
        ));
    };

    let Some(scope) = ctx.accepted_scope() else {
        return Err(InteractionError::access_denied(
            "request resolved without requesting interactions but no scope was granted",
        ));
    };

    debug!(
        target: "interactions::accepted",
        uid = %ctx.uid,
        params = ?ctx.params,
        "Authorization accepted"
    );
    events.emit(&InteractionEvent::AuthorizationAccepted {
        uid: ctx.uid.clone(),
        account_id: account_id.to_string(),
        scope,
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::EndUserSession;
    use crate::kernel::test_dependencies::RecordingEventSink;

    #[test]
    fn test_missing_account_denied() {
        let events = RecordingEventSink::new();
        let ctx = AuthorizationContext::default().with_granted_scope(["openid"]);

        let result = complete_grant(&ctx, &events);
        assert!(matches!(result, Err(InteractionError::AccessDenied { .. })));
        assert!(events.events().is_empty());
    }

    #[test]
    fn test_empty_scope_denied() {
        let events = RecordingEventSink::new();
        let ctx = AuthorizationContext::default().with_session(EndUserSession::authenticated("acct-1"));

        let result = complete_grant(&ctx, &events);
        assert!(matches!(result, Err(InteractionError::AccessDenied { .. })));
        assert!(events.events().is_empty());
    }

    #[test]
    fn test_complete_grant_emits_once() {
        let events = RecordingEventSink::new();
        let ctx = AuthorizationContext::default()
            .with_session(EndUserSession::authenticated("acct-1"))
            .with_granted_scope(["openid"]);

        complete_grant(&ctx, &events).unwrap();
        assert_eq!(events.count("authorization.accepted"), 1);
        assert_eq!(events.events().len(), 1);
    }
}
