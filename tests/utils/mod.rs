//! Loopback HTTP server standing in for the GitHub GraphQL endpoint.
//!
//! Each request body is collected before the handler runs so tests can
//! assert on the exact JSON the client sent.

use assert_cmd::prelude::*;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response, StatusCode, body::Incoming, server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use std::io::ErrorKind;
use std::{
    net::SocketAddr,
    process::Command,
    sync::{Arc, Mutex},
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

/// Shared handler invoked for each incoming request.
pub type Handler = Arc<Mutex<Box<dyn FnMut(&Request<Bytes>) -> Response<Full<Bytes>> + Send>>>;

/// Handle returned by [`start_server`] for shutting down the server.
pub struct ShutdownHandle {
    join: JoinHandle<()>,
    stop: oneshot::Sender<()>,
}

impl ShutdownHandle {
    /// Signal the server to stop and await shutdown.
    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        let _ = self.join.await;
    }
}

/// Start an HTTP/1 server forwarding requests to a shared handler.
///
/// # Errors
///
/// Returns an error if the server fails to bind to a local port.
#[expect(
    clippy::integer_division_remainder_used,
    reason = "tokio::select! uses % internally"
)]
pub async fn start_server() -> Result<(SocketAddr, Handler, ShutdownHandle), std::io::Error> {
    let handler: Handler = Arc::new(Mutex::new(Box::new(|_req| {
        Response::builder()
            .status(404)
            .body(Full::from("No handler"))
            .expect("failed to create default response")
    })));
    let handler_clone = handler.clone();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, mut rx) = oneshot::channel();

    let join = tokio::spawn(async move {
        loop {
            tokio::select! {
                res = listener.accept() => match res {
                    Ok((stream, _)) => {
                        let io = TokioIo::new(stream);
                        let h = handler_clone.clone();
                        let service = service_fn(move |req: Request<Incoming>| {
                            let h = h.clone();
                            async move {
                                let (parts, body) = req.into_parts();
                                let bytes = body.collect().await.map(|b| b.to_bytes()).unwrap_or_default();
                                let req = Request::from_parts(parts, bytes);
                                let mut f = h.lock().expect("lock handler in service");
                                let resp = (f)(&req);
                                Ok::<_, std::convert::Infallible>(resp)
                            }
                        });
                        tokio::spawn(async move {
                            let _ = http1::Builder::new().serve_connection(io, service).await;
                        });
                    }
                    Err(e) => {
                        eprintln!("accept error: {e}");
                        match e.kind() {
                            ErrorKind::ConnectionAborted
                            | ErrorKind::ConnectionReset
                            | ErrorKind::Interrupted
                            | ErrorKind::WouldBlock => {}
                            _ => break,
                        }
                    }
                },
                _ = &mut rx => break,
            }
        }
    });

    Ok((addr, handler, ShutdownHandle { join, stop: tx }))
}

/// Replace the server's handler with one answering `status` and `body`.
#[allow(dead_code, reason = "helper used in some tests only")]
pub fn respond_with(handler: &Handler, status: StatusCode, body: impl Into<Bytes>) {
    let body = body.into();
    *handler.lock().expect("lock handler") = Box::new(move |_req| {
        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Full::new(body.clone()))
            .expect("build response")
    });
}

/// Record every request body and answer with `status` and `body`.
#[allow(dead_code, reason = "helper used in some tests only")]
pub fn respond_and_capture(
    handler: &Handler,
    status: StatusCode,
    body: impl Into<Bytes>,
) -> Arc<Mutex<Vec<Request<Bytes>>>> {
    let body = body.into();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&captured);
    *handler.lock().expect("lock handler") = Box::new(move |req: &Request<Bytes>| {
        let mut copy = Request::new(req.body().clone());
        *copy.method_mut() = req.method().clone();
        *copy.uri_mut() = req.uri().clone();
        *copy.headers_mut() = req.headers().clone();
        sink.lock().expect("lock captured").push(copy);
        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Full::new(body.clone()))
            .expect("build response")
    });
    captured
}

/// Create a `ghql` command pointed at the loopback server.
#[allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    reason = "helper for integration tests"
)]
pub fn ghql_cmd(addr: SocketAddr) -> Command {
    let mut cmd = Command::cargo_bin("ghql").expect("binary");
    cmd.env("GITHUB_GRAPHQL_URL", format!("http://{addr}/graphql"))
        .env("GITHUB_TOKEN", "dummy")
        .env_remove("GHQL_GITHUB_TOKEN")
        .env_remove("GHQL_CONFIG_PATH");
    cmd
}
