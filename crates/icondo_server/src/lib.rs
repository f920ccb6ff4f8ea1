//! HTTP surface for iCondo.
//!
//! # Responsibility
//! - Route inbound requests to the condominium controller.
//! - Render HTML pages and JSON/CSV payloads.
//! - Run the hyper connection loop.

pub mod controller;
pub mod error;
pub mod http;
pub mod response;
pub mod router;
pub mod state;
pub mod templates;

pub use error::ControllerError;
pub use http::{bind, serve, serve_until_ctrl_c, MAX_BODY_BYTES};
pub use router::dispatch;
pub use state::AppState;
