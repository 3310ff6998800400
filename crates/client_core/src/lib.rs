//! Bridge between the login webview's state store and its host process.
//!
//! The [`Bridge`] is the only writer to the [`state_store::StateStore`]:
//! host messages become store mutations, and user intents become store
//! mutations plus fire-and-forget [`shared::protocol::HostCommand`]s posted
//! through a [`HostChannel`].

pub mod channel;
pub mod controller;
pub mod options;
pub mod runtime;

pub use channel::{dispatch_host_command, HostChannel, PostError};
pub use controller::{Bridge, UserIntent};
pub use options::{BridgeOptions, UnknownVariant, Variant};
pub use runtime::{run_bridge, BridgeInput, RunStats};
