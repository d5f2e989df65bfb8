//! Transport-callback entry point.
//!
//! The MQTT client invokes [`on_message`] from its own task.  Routing is
//! done in place and the result queued for the control task; nothing here
//! blocks or mutates the mode.

use log::{debug, warn};

use crate::app::commands::ControlMsg;
use crate::events::DeferredQueue;

use super::router::Router;

pub const CONTROL_INBOX_DEPTH: usize = 10;

/// Drained by the control task.
pub static CONTROL_INBOX: DeferredQueue<ControlMsg, CONTROL_INBOX_DEPTH> = DeferredQueue::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Queued,
    /// Topic not handled by this node.
    Ignored,
    /// Inbox full; message lost.
    Overflow,
}

/// Route one inbound message into [`CONTROL_INBOX`].
pub fn on_message(router: &Router, topic: &str, payload: &[u8]) -> Delivery {
    deliver(&CONTROL_INBOX, router, topic, payload)
}

pub fn deliver<const N: usize>(
    inbox: &DeferredQueue<ControlMsg, N>,
    router: &Router,
    topic: &str,
    payload: &[u8],
) -> Delivery {
    let msg = match router.route(topic, payload) {
        Ok(Some(cmd)) => ControlMsg::Remote(cmd),
        Ok(None) => {
            debug!("Ignoring message on {}", topic);
            return Delivery::Ignored;
        }
        Err(e) => ControlMsg::Malformed(e),
    };
    if inbox.post(msg) {
        Delivery::Queued
    } else {
        warn!("Control inbox full, dropped message on {}", topic);
        Delivery::Overflow
    }
}
