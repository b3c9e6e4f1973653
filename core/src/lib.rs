// Core generation pipeline shared by the portfolio widgets:
// - API client for the hosted generation endpoint
// - Request/outcome data structures
// - Configuration loading
// - Shared error types

// Export client module - API client and the TextGenerator seam
pub mod client;
pub use client::*;

// Export types module - Request/outcome data structures
pub mod types;
pub use types::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;
