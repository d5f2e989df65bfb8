//! Inbound topic router.
//!
//! Pure function of `(topic, payload)`; it never touches the mode.  Mode
//! preconditions and bounds are checked by the FSM when the command is
//! applied.

use heapless::String;

use crate::app::commands::RemoteCommand;
use crate::error::{ConfigError, RoutingError};

use super::payload::parse_delay;
use super::topics::{PREFIX_CAP, SUFFIX_CONFIG, SUFFIX_DELAY, SUFFIX_ON, SUFFIX_SLEEP, prefix_from};

#[derive(Debug, Clone)]
pub struct Router {
    prefix: String<PREFIX_CAP>,
}

impl Router {
    pub fn new(prefix: &str) -> Result<Self, ConfigError> {
        Ok(Self { prefix: prefix_from(prefix)? })
    }

    /// `Ok(None)` for topics this node does not handle.
    pub fn route(&self, topic: &str, payload: &[u8]) -> Result<Option<RemoteCommand>, RoutingError> {
        let Some(suffix) = topic
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
        else {
            return Ok(None);
        };

        let cmd = match suffix {
            SUFFIX_ON => RemoteCommand::SetPerformance,
            SUFFIX_SLEEP => RemoteCommand::SetIdle,
            SUFFIX_CONFIG => RemoteCommand::SetConfiguration,
            SUFFIX_DELAY | "config/DELAY" => {
                RemoteCommand::SetInterval(parse_delay(payload).map_err(RoutingError::Parse)?)
            }
            _ => return Ok(None),
        };
        Ok(Some(cmd))
    }
}
