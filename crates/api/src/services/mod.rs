//! Business services for the FootFlex gateway.

pub mod auth;
pub mod token;

pub use auth::{AuthError, AuthService};
pub use token::{Audience, TokenError, TokenIssuer};
