// Infrastructure layer modules
pub mod log_sink;
pub mod logging;

// Re-exports
pub use log_sink::{LogSink, SinkError, StdoutLogSink, TracingLogSink};
pub use logging::init_logging;
