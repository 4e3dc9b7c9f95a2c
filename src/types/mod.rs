// Tabspace shared type definitions
// Each submodule defines types used across the engine.

pub mod browser;
pub mod config;
pub mod errors;
pub mod persist;
pub mod settings;
pub mod workspace;
