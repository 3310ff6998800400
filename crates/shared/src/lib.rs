//! Records and message envelopes shared by the login webview and its host.

pub mod domain;
pub mod error;
pub mod protocol;
