//! HTTP protocol layer module
//!
//! Provides HTTP response-building base functionality, decoupled from the
//! dispatch logic that decides which response to send.

pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_405_response, build_413_response, build_500_response,
    build_503_response, build_health_response, build_json_response, build_options_response,
    build_text_response,
};
