//! Remote control over the pub/sub broker.
//!
//! - [`topics`] builds every topic the node subscribes or publishes to.
//! - [`router`] turns an inbound `(topic, payload)` into a
//!   [`RemoteCommand`](crate::app::commands::RemoteCommand).
//! - [`payload`] (de)serialises the JSON bodies.
//! - [`inbox`] is the transport-callback entry point.

pub mod inbox;
pub mod payload;
pub mod router;
pub mod topics;
