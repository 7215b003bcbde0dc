// Domain layer modules
pub mod invoke_params;
pub mod proxy_response;

// Re-exports
pub use invoke_params::InvokeParams;
pub use proxy_response::{ok_response, response_body, STATUS_OK};
