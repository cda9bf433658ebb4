//! Single-message publishing
//!
//! [`model`] holds the request-scoped values and their validation, [`sender`] the
//! connect-publish-release procedure that runs against any [`Transport`](crate::transport::Transport).

pub mod model;
pub mod sender;

pub use model::{ConnectionSpec, DestinationType, PublishArgs, PublishRequest, Rejection};
pub use sender::{run, send_message, Delivery, WARNING_BANNER};
