// Infrastructure: collaborator traits, adapters and the dependency container

pub mod deps;
pub mod event_sink;
pub mod interaction_store;
pub mod test_dependencies;
pub mod traits;
pub mod url_builder;

pub use deps::InteractionDeps;
pub use event_sink::TracingEventSink;
pub use interaction_store::InMemoryInteractionStore;
pub use traits::*;
pub use url_builder::{location_path, DefaultInteractionUrl, RouteUrlBuilder};
