//! News Board - a reader for aggregated news, Reddit and podcast items
//!
//! This crate loads the JSON document produced by the fetcher once at
//! startup and serves it as a navigable sidebar and content pane.

pub mod bootstrap;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod render;
pub mod routes;
pub mod sanitize;
pub mod sidebar;
pub mod store;
pub mod time_ago;
