//! `prompt=none` handling: interaction is needed but may not be shown.

use axum::http::StatusCode;

use super::prompt::PrimaryFailure;
use crate::common::{class_name, AuthorizationContext, ErrorClass, OidcError};

/// Status for silent-mode failures: code and device routes answer the user
/// agent directly, everything else goes back to the client.
pub fn silent_status(ctx: &AuthorizationContext) -> StatusCode {
    if ctx.is_code_or_device_route() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::FOUND
    }
}

/// Map the primary failure to a concrete error class, or a generic error
/// carrying the raw code. Always exposed to the caller.
pub fn silent_failure(primary: &PrimaryFailure, ctx: &AuthorizationContext) -> OidcError {
    let err = match ErrorClass::lookup(&class_name(&primary.error)) {
        Some(class) => OidcError::new(class, primary.error_description.clone()),
        None => OidcError::generic(
            StatusCode::BAD_REQUEST,
            primary.error.clone(),
            primary.error_description.clone(),
        ),
    };

    err.with_status(silent_status(ctx)).exposed()
}
