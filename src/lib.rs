//! Talent Portal - list views and row actions for the recruitment platform.
//!
//! This is the library behind the `talent-portal` binary. It exposes the
//! list-view composition shared by the linker and employer portals, plus
//! commands for each concrete screen.

pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::PortalConfig;
pub use error::AppError;
