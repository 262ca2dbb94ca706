//! Terminal client for the icon library service.
//!
//! [`client`] talks HTTP, [`app::Controller`] owns the session state and
//! [`view::render`] projects it into the tree the [`ui`] draws.

pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod ui;
pub mod view;
