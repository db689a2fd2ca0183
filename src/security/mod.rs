//! Security utilities and middleware

pub mod headers;
pub mod timing;

pub use headers::{api_security_header_map, api_security_headers};
pub use timing::constant_time_eq;
