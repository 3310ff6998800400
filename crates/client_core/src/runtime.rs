//! Single-threaded loop that feeds inbound traffic through a bridge.

use crossbeam_channel::Receiver;
use shared::protocol::HostMessage;
use tracing::{info, warn};

use crate::{channel::HostChannel, controller::Bridge, controller::UserIntent};

#[derive(Debug)]
pub enum BridgeInput {
    /// Raw JSON text as posted by the host.
    Raw(String),
    Host(HostMessage),
    User(UserIntent),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub handled: usize,
    pub dropped: usize,
}

/// Processes inputs in arrival order until every sender is gone. Each input
/// is fully applied before the next is received. Undecodable host messages
/// are logged and dropped.
pub fn run_bridge<C: HostChannel>(bridge: &Bridge<C>, inbound: Receiver<BridgeInput>) -> RunStats {
    let mut stats = RunStats::default();

    for input in inbound.iter() {
        match input {
            BridgeInput::Raw(raw) => match bridge.handle_raw(&raw) {
                Ok(()) => stats.handled += 1,
                Err(err) => {
                    warn!(error = %err, "dropping undecodable host message");
                    stats.dropped += 1;
                }
            },
            BridgeInput::Host(message) => {
                bridge.handle_message(message);
                stats.handled += 1;
            }
            BridgeInput::User(intent) => {
                bridge.handle_intent(intent);
                stats.handled += 1;
            }
        }
    }

    info!(
        handled = stats.handled,
        dropped = stats.dropped,
        "inbound channel closed; bridge loop exiting"
    );
    stats
}
