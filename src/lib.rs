//! Simulated lending-platform API: mock deal store, endpoint registry,
//! request composer and response renderer.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
/// Endpoint registry and handlers.
pub mod endpoints;
pub mod io;
pub mod logging;
pub mod render;
/// Request composition, dispatch and scripted sessions.
pub mod sim;
pub mod store;
