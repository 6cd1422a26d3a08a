//! HTTP protocol layer module
//!
//! Content-type inference and response building, decoupled from the
//! static file handler.

pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{apply_isolation_headers, build_404_response, build_405_response};
