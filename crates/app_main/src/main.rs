//! Virtual Gallery - framed exhibition viewer with original/processed flips
//!
//! Main entry point.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;

use anyhow::Result;

fn main() -> Result<()> {
    // Initialize logging and panic hook first
    let _log_guard = app_log::init()?;

    // Clean up old logs (7 days)
    if let Err(e) = app_log::cleanup_old_logs(7) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("Virtual Gallery starting...");

    let config = app_core::AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("{}; using default configuration", e.user_message());
        app_core::AppConfig::default()
    });

    app::run(config)
}
