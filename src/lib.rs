// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod catalog;
pub mod config;
pub mod engine;
pub mod presentation;
pub mod projector;
pub mod reporter;
pub mod runtime;
pub mod scoring;
pub mod session_log;
pub mod tracker;
pub mod tween;
