//! Parser limits and connection settings.

use std::time::Duration;

/// Maximum size in bytes of the request line plus header section.
pub const DEFAULT_MAX_HEADER_BYTES: usize = 8 * 1024;

/// Maximum number of distinct headers in a request.
pub const DEFAULT_MAX_HEADER_NUM: usize = 64;

/// Maximum length in bytes of a decoded request path (exclusive).
pub const DEFAULT_MAX_PATH_LEN: usize = 4096;

/// Maximum length in bytes of a single path segment (exclusive).
pub const DEFAULT_MAX_SEGMENT_LEN: usize = 255;

/// Default capacity of the connection read buffer.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8 * 1024;

/// Limits applied by a [`Session`](crate::session::Session) while parsing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    max_header_bytes: usize,
    max_header_num: usize,
    max_path_len: usize,
    max_segment_len: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_header_bytes: DEFAULT_MAX_HEADER_BYTES,
            max_header_num: DEFAULT_MAX_HEADER_NUM,
            max_path_len: DEFAULT_MAX_PATH_LEN,
            max_segment_len: DEFAULT_MAX_SEGMENT_LEN,
        }
    }
}

impl SessionConfig {
    pub fn with_max_header_bytes(mut self, max_header_bytes: usize) -> Self {
        self.max_header_bytes = max_header_bytes;
        self
    }

    pub fn with_max_header_num(mut self, max_header_num: usize) -> Self {
        self.max_header_num = max_header_num;
        self
    }

    pub fn with_max_path_len(mut self, max_path_len: usize) -> Self {
        self.max_path_len = max_path_len;
        self
    }

    pub fn with_max_segment_len(mut self, max_segment_len: usize) -> Self {
        self.max_segment_len = max_segment_len;
        self
    }

    #[inline]
    pub fn max_header_bytes(&self) -> usize {
        self.max_header_bytes
    }

    #[inline]
    pub fn max_header_num(&self) -> usize {
        self.max_header_num
    }

    #[inline]
    pub fn max_path_len(&self) -> usize {
        self.max_path_len
    }

    #[inline]
    pub fn max_segment_len(&self) -> usize {
        self.max_segment_len
    }
}

/// Settings for the reference [`HttpConnection`](crate::connection::HttpConnection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    read_buffer_size: usize,
    idle_timeout: Option<Duration>,
    session: SessionConfig,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { read_buffer_size: DEFAULT_READ_BUFFER_SIZE, idle_timeout: None, session: SessionConfig::default() }
    }
}

impl ConnectionConfig {
    pub fn with_read_buffer_size(mut self, read_buffer_size: usize) -> Self {
        self.read_buffer_size = read_buffer_size;
        self
    }

    /// Closes the connection when no bytes arrive for `idle_timeout`.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = Some(idle_timeout);
        self
    }

    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    #[inline]
    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }

    #[inline]
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
    }

    #[inline]
    pub fn session(&self) -> &SessionConfig {
        &self.session
    }
}
