//! Local HTTP server with an ever-changing page of test codes
//!
//! `/` and `/index.html` render a fresh [`page`] on every request; any other
//! path is served from the static root (the working directory).

pub mod codes;
pub mod page;

use axum::Router;
use axum::response::Html;
use axum::routing::get;
use std::fmt;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use codes::{CodeSet, generate_code, is_valid_code};

/// Fixed port the extension settings point at
pub const PORT: u16 = 8000;

/// Default listen address
pub fn default_addr() -> SocketAddr {
  SocketAddr::from((Ipv4Addr::LOCALHOST, PORT))
}

/// Build a page with freshly drawn codes and the local time
pub fn fresh_page() -> String {
  let codes = CodeSet::random(&mut rand::thread_rng());
  page::render_page(&codes, chrono::Local::now().naive_local())
}

async fn index() -> Html<String> {
  Html(fresh_page())
}

pub fn router(static_root: &Path) -> Router {
  Router::new()
    .route("/", get(index))
    .route("/index.html", get(index))
    .fallback_service(ServeDir::new(static_root))
    .layer(TraceLayer::new_for_http())
}

#[derive(Debug)]
pub enum BindError {
  /// Another process already listens on the port
  PortInUse(u16),
  Io(io::Error),
}

impl fmt::Display for BindError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BindError::PortInUse(port) => write!(
        f,
        "Port {} is already in use. Try a different port or stop the existing server.",
        port
      ),
      BindError::Io(err) => write!(f, "{}", err),
    }
  }
}

impl std::error::Error for BindError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      BindError::PortInUse(_) => None,
      BindError::Io(err) => Some(err),
    }
  }
}

/// Bind once; an occupied port is reported, never retried
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, BindError> {
  TcpListener::bind(addr).await.map_err(|err| match err.kind() {
    io::ErrorKind::AddrInUse => BindError::PortInUse(addr.port()),
    _ => BindError::Io(err),
  })
}

/// Serve until Ctrl+C
pub async fn serve(listener: TcpListener, static_root: &Path) -> io::Result<()> {
  axum::serve(listener, router(static_root))
    .with_graceful_shutdown(shutdown_signal())
    .await
}

async fn shutdown_signal() {
  if let Err(err) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %err, "failed to listen for Ctrl+C");
    std::future::pending::<()>().await;
  }
}
