// OpenID Connect interaction resolver - API Core
//
// Decides whether an in-flight authorization request needs an end-user
// interaction (login, consent, ...) before it can complete, and if so starts
// a resumable interaction session and hands back the redirect.
//
// Collaborators (interaction store, event sink, URL building) sit behind the
// Base* traits in kernel/ so the resolver can be driven from tests.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
