// Tabstash shared type definitions
// Each submodule defines types used across the application.

pub mod browser;
pub mod color;
pub mod display;
pub mod errors;
pub mod preferences;
pub mod session;
