//! # Blog Shared
//!
//! Wire envelopes shared by the API server and its clients.

pub mod response;

pub use response::{ApiResponse, ErrorResponse};
