//! Observability for amqp-send
//!
//! Structured logging only. Logs go to stderr so stdout carries nothing but the
//! banner and the result line.

pub mod logging;

// Re-export for convenience
pub use logging::{
    init_default_logging, init_logging, level_from_verbosity, parse_level, LogFormat,
};

// Span macros for structured logging
pub use logging::publish_span;
