// src/reload/mod.rs

//! Live reload: messages, the notifier seam the runtime talks to, and a
//! WebSocket broadcaster plus the browser script that listens to it.

pub mod message;
pub mod server;

use std::fmt::Debug;

pub use message::ReloadMessage;
pub use server::WsReloadServer;

/// Browser client, embedded so the binary is self-contained.
const CLIENT_JS: &str = include_str!("client.js");

/// Fire-and-forget sink for reload messages.
///
/// Implementations must never fail the caller: a browser that went away is
/// not a build problem.
pub trait ReloadNotifier: Send + Sync + Debug {
    fn notify(&self, message: &ReloadMessage);
}

/// Drops every message. Used for one-shot builds and `--no-serve`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl ReloadNotifier for NullNotifier {
    fn notify(&self, _message: &ReloadMessage) {}
}

/// `<script>` block that connects a page to the reload server on `port`.
pub fn client_script_tag(port: u16) -> String {
    format!(
        "<script>window.__SITEPIPE_RELOAD_PORT__ = {port};\n{}</script>",
        CLIENT_JS.trim_end()
    )
}
