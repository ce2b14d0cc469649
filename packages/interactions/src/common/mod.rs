// Common types shared across the crate

pub mod context;
pub mod errors;

pub use context::{AuthorizationContext, AuthorizationParams, DeviceCode, EndUserSession};
pub use errors::{class_name, ErrorBody, ErrorClass, InteractionError, OidcError, OidcErrorKind};
