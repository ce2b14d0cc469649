//! Interactions domain - decides whether an authorization request needs the
//! end-user before it can complete
//!
//! Flow:
//!   resolve_prompt (ordered prompts, concurrent checks)
//!     → Exhausted: complete_grant → continue
//!     → Found + prompt=none: silent_failure
//!     → Found: start_interaction → redirect
//!
//! Responsibilities:
//! - Prompt/check configuration and evaluation
//! - Interaction session capture and persistence
//! - Interaction and resume cookies

pub mod config;
pub mod evaluator;
pub mod events;
pub mod guard;
pub mod policy;
pub mod prompt;
pub mod resolver;
pub mod session;
pub mod silent;

pub use config::{CookieNames, InteractionsConfig};
pub use evaluator::{evaluate_check, evaluate_prompt, PromptMatch};
pub use events::InteractionEvent;
pub use guard::complete_grant;
pub use policy::default_prompts;
pub use prompt::{
    Check, CheckFailure, CheckPredicate, Details, DetailsResolver, NoDetails, PrimaryFailure,
    Prompt, PromptDecision,
};
pub use resolver::{resolve_prompt, InteractionOutcome, InteractionResolver, Resolution};
pub use session::{
    start_interaction, CookieOptions, InteractionRedirect, InteractionSession, SameSite,
    SessionSnapshot, SetCookie,
};
pub use silent::{silent_failure, silent_status};

use crate::common::InteractionError;
use crate::kernel::BaseInteractionStore;

/// Read back a stored interaction session for the interaction UI.
pub async fn interaction_details(
    store: &dyn BaseInteractionStore,
    uid: &str,
) -> Result<Option<InteractionSession>, InteractionError> {
    store.find(uid).await.map_err(InteractionError::Store)
}
