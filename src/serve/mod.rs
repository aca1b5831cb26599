// src/serve/mod.rs

//! Static development server for the project root.
//!
//! Serves files with `tiny_http` on its own thread and injects the live-reload
//! client into HTML pages.

pub mod content;
pub mod path;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};
use tracing::{debug, info, warn};

use content::{PLAIN, content_type, maybe_inject_reload};
use path::{Resolved, resolve_request_path};

/// Handle to a running development server.
#[derive(Debug, Clone)]
pub struct DevServer {
    port: u16,
}

impl DevServer {
    /// Serve `root` on `127.0.0.1:<port>` (0 picks a free port). When
    /// `reload_port` is set, HTML responses carry the reload client.
    pub fn start(root: impl Into<PathBuf>, port: u16, reload_port: Option<u16>) -> Result<Self> {
        let root = root.into();
        let server = Server::http(("127.0.0.1", port))
            .map_err(|e| anyhow!("binding dev server port {port}: {e}"))?;
        let port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .unwrap_or(port);

        let serve_root = root.clone();
        std::thread::Builder::new()
            .name("sitepipe-serve".into())
            .spawn(move || {
                for request in server.incoming_requests() {
                    let url = request.url().to_string();
                    if let Err(err) = handle_request(request, &serve_root, reload_port) {
                        warn!(url = %url, "dev server response failed: {err:#}");
                    }
                }
            })
            .context("spawning dev server thread")?;

        info!("serving {} at http://127.0.0.1:{port}/", root.display());
        Ok(Self { port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

fn handle_request(request: Request, root: &Path, reload_port: Option<u16>) -> Result<()> {
    if !matches!(request.method(), Method::Get | Method::Head) {
        return send(request, 405, PLAIN, b"405 Method Not Allowed".to_vec());
    }

    match resolve_request_path(request.url(), root) {
        Resolved::File(path) => {
            debug!(url = request.url(), file = %path.display(), "serving file");
            let ctype = content_type(&path);
            let body = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            let body = maybe_inject_reload(body, ctype, reload_port);
            send(request, 200, ctype, body)
        }
        Resolved::Forbidden => send(request, 403, PLAIN, b"403 Forbidden".to_vec()),
        Resolved::NotFound => send(request, 404, PLAIN, b"404 Not Found".to_vec()),
    }
}

fn send(request: Request, status: u16, ctype: &str, body: Vec<u8>) -> Result<()> {
    let header = Header::from_bytes("Content-Type", ctype)
        .map_err(|_| anyhow!("invalid content type header: {ctype}"))?;
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(header);
    request.respond(response)?;
    Ok(())
}
