/// State management module
///
/// This module handles all application state, including:
/// - Per-image records (entry.rs)
/// - The tombstoning image registry (registry.rs)
/// - Compression settings and the settings file (settings.rs)

pub mod entry;
pub mod registry;
pub mod settings;
