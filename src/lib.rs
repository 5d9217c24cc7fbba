//! # amal-admin
//!
//! Leptos + WASM admin frontend for the educational content backend
//! (books, courses, departments, categories, groups, lessons, units).
//!
//! This crate contains the session store and route guard that gate every
//! navigation, the REST client glue, resource list state, the snackbar
//! queue, navigation menus, and the pages/components that render them.

pub mod app;
pub mod components;
pub mod config;
pub mod navigation;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;
