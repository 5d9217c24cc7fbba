//! Networking modules for the REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` owns request setup (credentials, timeout, body sanitizing), `api`
//! maps backend endpoints onto typed calls, `error` defines the transport
//! error taxonomy, and `types` the shared wire schema.

pub mod api;
pub mod error;
pub mod http;
pub mod types;
