// HTTP routes
pub mod authorization;
pub mod health;
pub mod interaction;

pub use authorization::*;
pub use health::*;
pub use interaction::*;
