mod auth;
mod origin;

pub use auth::{AuthMiddlewareFactory, AuthMiddlewareService};
pub use origin::{OriginGuardFactory, OriginGuardService, OriginPolicy};
