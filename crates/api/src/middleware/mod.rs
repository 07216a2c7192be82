//! Request extractors for the gateway.
//!
//! - [`auth`] - the two bearer-token guards (`RequireUser`, `RequireAdmin`)
//! - [`json`] - JSON body extractor that maps malformed input to a 400

pub mod auth;
pub mod json;

pub use auth::{RequireAdmin, RequireUser};
pub use json::ApiJson;
