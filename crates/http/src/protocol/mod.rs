//! Core HTTP protocol abstractions.
//!
//! This module provides the types an exchange is built from: the incrementally parsed request,
//! the response builder, the header map both of them use and the error types.
//!
//! # Architecture
//!
//! - **Message Handling** ([`message`]): Payload items moved between the codecs
//!   - [`PayloadItem`]: A body chunk or the end of the body
//!   - [`PayloadSize`]: How a request declared its body
//!
//! - **Request Processing** ([`request`]): The request as seen by application code
//!   - [`Request`]: Request line, headers and buffered body
//!   - [`RequestStatus`]: Parsing progress, only ever moving forward
//!
//! - **Response Processing** ([`response`]): Response construction
//!   - [`Response`]: Status, headers and body framing, serialized into an outbound buffer
//!   - [`reason_phrase`]: Status code to reason phrase table
//!
//! - **Paths** ([`path`]): [`validate_path`] and [`canonicalize_path`] for decoded request paths
//!
//! - **Headers** ([`header_map`]): [`HeaderMap`], ordered and case-insensitive
//!
//! - **Error Handling** ([`error`]):
//!   - [`HttpError`]: Top-level error type
//!   - [`ParseError`]: Request parsing errors, always fatal for the connection
//!   - [`SendError`]: Response misuse and write errors

mod message;
pub use message::PayloadItem;
pub use message::PayloadSize;

mod header_map;
pub use header_map::HeaderMap;

mod path;
pub use path::canonicalize_path;
pub use path::validate_path;

mod reason;
pub use reason::UNKNOWN_REASON;
pub use reason::known_reason;
pub use reason::reason_phrase;

mod request;
pub use request::Request;
pub use request::RequestStatus;
pub use request::version_as_str;

mod response;
pub use response::Response;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
