//! An incremental HTTP/1.x protocol engine for event driven servers
//!
//! This crate turns arbitrarily fragmented bytes arriving on a connection into a parsed request,
//! and turns application output into a correctly framed response, without ever blocking. It does
//! not own sockets: a connection manager feeds it read events and flushes what it produced.
//!
//! # Features
//!
//! - Resumable request parsing, byte-at-a-time delivery behaves like one-shot delivery
//! - HTTP/0.9, HTTP/1.0 and HTTP/1.1 request lines, origin and absolute form targets
//! - Request path decoding, validation and canonicalization
//! - Fixed length request bodies
//! - Response builder with fixed length and chunked bodies
//! - Header section size and count limits
//! - A reference connection manager on tokio
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn, Level};
//! use tracing_subscriber::FmtSubscriber;
//! use micro_evhttp::connection::HttpConnection;
//! use micro_evhttp::handler::make_handler;
//! use micro_evhttp::protocol::SendError;
//! use micro_evhttp::session::Session;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Initialize logging
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     info!(port = 8080, "start listening");
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let handler = Arc::new(make_handler(hello_world));
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = handler.clone();
//!
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             let connection = HttpConnection::new(reader, writer);
//!             match connection.process(&handler).await {
//!                 Ok(_) => {
//!                     info!("finished process, connection shutdown");
//!                 }
//!                 Err(e) => {
//!                     error!("service has error, cause {}, connection shutdown", e);
//!                 }
//!             }
//!         });
//!     }
//! }
//!
//! fn hello_world(session: &mut Session) -> Result<(), SendError> {
//!     info!(path = session.request().path(), "receiving request");
//!     session.response_mut().send(200u16, Some("text/plain"), &b"Hello World!\r\n"[..])?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`session`]: The protocol driver, one [`Session`](session::Session) per connection
//! - [`protocol`]: Request, response, header map and error types
//! - [`codec`]: Byte level decoding and encoding
//! - [`config`]: Parser limits and connection settings
//! - [`connection`]: Reference connection manager on tokio
//! - [`handler`]: Request handler traits and utilities
//!
//! # Core Components
//!
//! ## Driving a session
//!
//! The connection manager appends read bytes to its input buffer and calls
//! [`Session::on_read`](session::Session::on_read). The returned
//! [`Signal`](session::Signal) says whether to wait for more input, handle the complete request
//! or close the connection. After handling, the serialized response is taken with
//! [`Session::take_outbound`](session::Session::take_outbound).
//!
//! ## Error Handling
//!
//! - [`protocol::HttpError`]: Top-level error type
//! - [`protocol::ParseError`]: Request parsing errors, all of them fatal for the connection
//! - [`protocol::SendError`]: Response misuse, reported without touching the outbound buffer
//!
//! # Limitations
//!
//! - HTTP/1.x only (HTTP/2 or HTTP/3 is not supported)
//! - No TLS support (use a reverse proxy for HTTPS)
//! - Chunked request bodies are detected but not decoded
//! - One request per connection, no keep-alive
//! - Maximum header size: 8KB by default
//! - Maximum number of headers: 64 by default

pub mod codec;
pub mod config;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod session;

mod utils;
pub(crate) use utils::ensure;
