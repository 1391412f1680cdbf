//! Request handler module
//!
//! Routes requests to the catalog listing and asset serving handlers.

pub mod assets;
pub mod listing;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
