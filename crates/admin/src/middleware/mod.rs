//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (record `x-request-id` in span and Sentry scope)
//! 4. Session layer (tower-sessions, `admin.session`)
//!
//! Authentication is per-handler through [`RequireAdminAuth`]; scope checks
//! follow inside the handler.

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{OptionalAdminAuth, RequireAdminAuth, clear_current_admin, set_current_admin};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::create_session_layer;
