use std::error::Error;
use std::io;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, info, warn};

use crate::config::ConnectionConfig;
use crate::handler::Handler;
use crate::protocol::{HttpError, ParseError, SendError};
use crate::session::{CloseReason, Session, Signal};

/// An HTTP connection that drives one [`Session`] over an async transport
///
/// `HttpConnection` handles one exchange per connection:
/// - Reading bytes and feeding them to the session until the request is complete
/// - Running the handler on the complete request
/// - Flushing the serialized response and closing
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
///
pub struct HttpConnection<R, W> {
    reader: R,
    writer: W,
    config: ConnectionConfig,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_config(reader, writer, ConnectionConfig::default())
    }

    pub fn with_config(reader: R, writer: W, config: ConnectionConfig) -> Self {
        Self { reader, writer, config }
    }

    /// Processes a single request.
    ///
    /// Returns `Ok(())` when the response was flushed, or when the peer went away or idled out
    /// before sending a complete request. A malformed request closes the connection without a
    /// response and returns its parse error.
    pub async fn process<H: Handler>(mut self, handler: &H) -> Result<(), HttpError> {
        let mut session = Session::on_init(*self.config.session());
        let mut input = BytesMut::with_capacity(self.config.read_buffer_size());

        loop {
            let read = match self.read_more(&mut input).await {
                Some(read) => read,
                None => {
                    info!(timeout = ?self.config.idle_timeout(), "connection idle timeout, break this connection down");
                    session.on_close(CloseReason::Timeout);
                    return Ok(());
                }
            };

            match read {
                Ok(0) => {
                    info!(status = ?session.status(), "cant read more request, break this connection down");
                    session.on_close(CloseReason::Other);
                    return Ok(());
                }
                Ok(_) => {}
                Err(e) => {
                    error!(cause = %e, "read request error");
                    session.on_close(CloseReason::Other);
                    return Err(ParseError::io(e).into());
                }
            }

            match session.on_read(&mut input) {
                Signal::Suspend => continue,
                Signal::Proceed => break,
                Signal::Fatal => {
                    let e = session
                        .take_error()
                        .unwrap_or_else(|| ParseError::io(io::Error::other("request parse failed")));
                    error!(cause = %e, "can't receive request");
                    session.on_close(CloseReason::Other);
                    return Err(e.into());
                }
            }
        }

        handle(&mut session, handler);

        let result = self.flush(&mut session).await;
        let reason = if result.is_ok() { CloseReason::Shutdown } else { CloseReason::Other };
        session.on_close(reason);
        result
    }

    /// Reads into `input`, returning `None` if the idle timeout elapsed first.
    async fn read_more(&mut self, input: &mut BytesMut) -> Option<io::Result<usize>> {
        input.reserve(self.config.read_buffer_size());
        match self.config.idle_timeout() {
            Some(timeout) => tokio::time::timeout(timeout, self.reader.read_buf(input)).await.ok(),
            None => Some(self.reader.read_buf(input).await),
        }
    }

    async fn flush(&mut self, session: &mut Session) -> Result<(), HttpError> {
        let outbound = session.take_outbound();
        self.writer.write_all(&outbound).await.map_err(SendError::io)?;
        self.writer.flush().await.map_err(SendError::io)?;
        session.on_write();
        self.writer.shutdown().await.map_err(SendError::io)?;
        Ok(())
    }
}

fn handle<H: Handler>(session: &mut Session, handler: &H) {
    if let Err(e) = handler.call(session) {
        let e: Box<dyn Error + Send + Sync> = e.into();
        error!(cause = %e, "handle response error");
        if !session.response().is_header_frozen() {
            send_empty(session, 500);
        }
        return;
    }

    if !session.response().is_header_frozen() {
        warn!("handler did not send a response, sending header only");
        let code = session.response().status_code();
        send_empty(session, code);
    }
}

fn send_empty(session: &mut Session, code: u16) {
    if let Err(e) = session.response_mut().send(code, None, &b""[..]) {
        error!(cause = %e, code, "can't send response");
    }
}
