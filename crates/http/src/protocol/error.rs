use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

/// Errors raised while parsing a request; every one of them is fatal for the connection.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed request line: {reason}")]
    MalformedRequestLine { reason: String },

    #[error("invalid http version: {0:?}")]
    InvalidVersion(String),

    #[error("invalid request target: {target}")]
    InvalidTarget { target: String },

    #[error("invalid request path: {reason}")]
    InvalidPath { reason: String },

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn malformed_request_line<S: ToString>(str: S) -> Self {
        Self::MalformedRequestLine { reason: str.to_string() }
    }

    pub fn invalid_version<S: ToString>(str: S) -> Self {
        Self::InvalidVersion(str.to_string())
    }

    pub fn invalid_target<S: ToString>(str: S) -> Self {
        Self::InvalidTarget { target: str.to_string() }
    }

    pub fn invalid_path<S: ToString>(str: S) -> Self {
        Self::InvalidPath { reason: str.to_string() }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Errors raised by the response builder.
///
/// Apart from [`SendError::Io`] these are misuse reports: the call was rejected and the outbound
/// buffer was left untouched, the exchange itself is still usable.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("response header already sent")]
    HeaderFrozen,

    #[error("content-length is not set, can't send fixed length body")]
    NotFixedLength,

    #[error("body exceed content-length, already sent: {sent}, incoming: {incoming}, declared: {declared}")]
    ExceedContentLength { sent: u64, incoming: usize, declared: u64 },

    #[error("content-length is set, can't send chunked body")]
    NotChunked,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn exceed_content_length(sent: u64, incoming: usize, declared: u64) -> Self {
        Self::ExceedContentLength { sent, incoming, declared }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
