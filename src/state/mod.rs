//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain (`session`, `resources`, `snackbar`) so pages and
//! components can depend on small focused models. Only `session` owns
//! network actions; the others are plain transitions driven by pages.

pub mod resources;
pub mod session;
pub mod snackbar;
