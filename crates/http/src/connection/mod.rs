//! HTTP connection handling module
//!
//! A reference connection manager for the [`Session`](crate::session::Session) protocol driver,
//! built on tokio. It owns the transport, forwards read events to the session, runs the
//! [`Handler`](crate::handler::Handler) once the request is complete and flushes the response.
//!
//! # Components
//!
//! - [`HttpConnection`]: one request per connection:
//!   - Optional idle timeout on every read
//!   - Malformed requests close the connection without a response
//!   - Handler failures are answered with `500` if nothing was sent yet

mod http_connection;

pub use http_connection::HttpConnection;
