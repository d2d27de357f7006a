//! Request handlers behind `handle_request`. Each takes the raw query or
//! form body and returns the response body.

pub mod progress;
pub mod util;
