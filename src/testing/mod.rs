//! Testing utilities and mock implementations
//!
//! This module provides a mock broker transport so the publish procedure can be
//! tested without a running AMQP broker.

pub mod mocks;

pub use mocks::*;
