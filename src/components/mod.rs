//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the admin chrome and read/write shared state from Leptos
//! context providers set up in `app::App`.

pub mod admin_layout;
pub mod nav_menu;
pub mod session_gate;
pub mod snackbar_host;
