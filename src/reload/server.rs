// src/reload/server.rs

//! WebSocket broadcaster for live reload.
//!
//! Three kinds of threads cooperate over one channel:
//! - the acceptor hands every TCP connection to its own handshake thread;
//! - a handshake thread upgrades the socket (bounded by a read timeout) and
//!   passes the client on;
//! - the broadcaster owns the client list and writes every frame, dropping
//!   clients whose writes fail.
//!
//! `notify` only enqueues, so a stalled browser never holds up the runtime.

use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam::channel::{Receiver, Sender, unbounded};
use tracing::{debug, info, warn};
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::{ReloadMessage, ReloadNotifier};

/// A connection that has not finished the upgrade by then is dropped.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);
/// Writes to a stalled browser give up after this long.
const WRITE_TIMEOUT: Duration = Duration::from_secs(2);

enum Outgoing {
    Client(WebSocket<TcpStream>),
    Frame(String),
}

#[derive(Clone)]
pub struct WsReloadServer {
    port: u16,
    tx: Sender<Outgoing>,
    clients: Arc<AtomicUsize>,
}

impl std::fmt::Debug for WsReloadServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsReloadServer")
            .field("port", &self.port)
            .field("clients", &self.client_count())
            .finish()
    }
}

impl WsReloadServer {
    /// Bind `127.0.0.1:<port>` and start accepting clients. Port 0 picks a
    /// free port; see [`WsReloadServer::port`].
    pub fn bind(port: u16) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port))
            .with_context(|| format!("binding live-reload port {port}"))?;
        let port = listener.local_addr()?.port();
        let (tx, rx) = unbounded();
        let clients = Arc::new(AtomicUsize::new(0));

        let count = Arc::clone(&clients);
        std::thread::Builder::new()
            .name("sitepipe-reload-send".into())
            .spawn(move || broadcast_loop(rx, count))
            .context("spawning live-reload broadcaster thread")?;

        let accept_tx = tx.clone();
        std::thread::Builder::new()
            .name("sitepipe-reload-accept".into())
            .spawn(move || accept_loop(listener, accept_tx))
            .context("spawning live-reload acceptor thread")?;

        info!("live reload listening on ws://127.0.0.1:{port}");
        Ok(Self { port, tx, clients })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn client_count(&self) -> usize {
        self.clients.load(Ordering::Relaxed)
    }
}

impl ReloadNotifier for WsReloadServer {
    fn notify(&self, message: &ReloadMessage) {
        if self.tx.send(Outgoing::Frame(message.to_json())).is_err() {
            warn!("live-reload broadcaster stopped; dropping message");
        }
    }
}

fn accept_loop(listener: TcpListener, tx: Sender<Outgoing>) {
    for stream in listener.incoming() {
        let stream = match stream {
            Ok(s) => s,
            Err(err) => {
                warn!("live-reload accept error: {err}");
                continue;
            }
        };

        let tx = tx.clone();
        let spawned = std::thread::Builder::new()
            .name("sitepipe-reload-handshake".into())
            .spawn(move || handshake(stream, tx));
        if let Err(err) = spawned {
            warn!("live-reload handshake thread failed to start: {err}");
        }
    }
}

fn handshake(stream: TcpStream, tx: Sender<Outgoing>) {
    let _ = stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT));
    let _ = stream.set_write_timeout(Some(WRITE_TIMEOUT));

    match tungstenite::accept(stream) {
        Ok(ws) => {
            let _ = tx.send(Outgoing::Client(ws));
        }
        Err(err) => debug!("live-reload handshake failed: {err}"),
    }
}

fn broadcast_loop(rx: Receiver<Outgoing>, count: Arc<AtomicUsize>) {
    let mut clients: Vec<WebSocket<TcpStream>> = Vec::new();

    for event in rx.iter() {
        match event {
            Outgoing::Client(ws) => {
                clients.push(ws);
                debug!(total = clients.len(), "live-reload client connected");
            }
            Outgoing::Frame(text) => {
                if clients.is_empty() {
                    debug!("no live-reload clients connected");
                    continue;
                }
                let frame = Message::text(text);
                let before = clients.len();
                clients.retain_mut(|ws| match ws.send(frame.clone()) {
                    Ok(()) => true,
                    Err(err) => {
                        debug!("live-reload client dropped: {err}");
                        false
                    }
                });
                debug!(sent = clients.len(), dropped = before - clients.len(), "broadcast reload");
            }
        }
        count.store(clients.len(), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn wait_for_clients(server: &WsReloadServer, n: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while server.client_count() < n {
            assert!(Instant::now() < deadline, "client never registered");
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    fn connect(server: &WsReloadServer) -> WebSocket<tungstenite::stream::MaybeTlsStream<TcpStream>> {
        let url = format!("ws://127.0.0.1:{}/", server.port());
        tungstenite::connect(url).unwrap().0
    }

    #[test]
    fn broadcasts_json_frames() {
        let server = WsReloadServer::bind(0).unwrap();
        let mut client = connect(&server);
        wait_for_clients(&server, 1);

        server.notify(&ReloadMessage::Stylesheet {
            path: "/build/styles/main.min.css".into(),
        });
        server.notify(&ReloadMessage::FullPage);

        let first = client.read().unwrap();
        assert_eq!(
            first.to_text().unwrap(),
            r#"{"type":"css","path":"/build/styles/main.min.css"}"#
        );
        let second = client.read().unwrap();
        assert_eq!(second.to_text().unwrap(), r#"{"type":"reload"}"#);
    }

    #[test]
    fn silent_connection_does_not_block_browsers() {
        let server = WsReloadServer::bind(0).unwrap();
        let _silent = TcpStream::connect(("127.0.0.1", server.port())).unwrap();
        std::thread::sleep(Duration::from_millis(50));

        let mut client = connect(&server);
        wait_for_clients(&server, 1);

        server.notify(&ReloadMessage::FullPage);
        assert_eq!(client.read().unwrap().to_text().unwrap(), r#"{"type":"reload"}"#);
    }

    #[test]
    fn notify_only_enqueues() {
        let server = WsReloadServer::bind(0).unwrap();
        let mut client = connect(&server);
        wait_for_clients(&server, 1);

        let started = Instant::now();
        for _ in 0..1000 {
            server.notify(&ReloadMessage::FullPage);
        }
        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(client.read().unwrap().to_text().unwrap(), r#"{"type":"reload"}"#);
    }

    #[test]
    fn notify_without_clients_is_a_no_op() {
        let server = WsReloadServer::bind(0).unwrap();
        server.notify(&ReloadMessage::FullPage);
        assert_eq!(server.client_count(), 0);
    }
}
