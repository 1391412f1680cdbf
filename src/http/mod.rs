//! HTTP protocol layer module
//!
//! Protocol helpers shared by the listing and asset handlers: MIME types,
//! `ETag` validation, Range parsing and response builders.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use range::parse_range_header;
pub use response::{
    apply_common_headers, build_304_response, build_404_response, build_405_response,
    build_413_response, build_416_response, build_500_response, build_health_response,
    build_json_response, build_options_response, build_status_response, build_text_response,
};
