pub mod identity;
pub mod middleware;
pub mod routes;

// Re-export public types and functions
pub use identity::{DEFAULT_IDENTITY_HEADER, Identity};
pub use middleware::log_request_errors;
pub use routes::{IssueTokenRequest, IssueTokenResponse, healthz, issue_token, stream_media};
