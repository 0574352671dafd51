use std::sync::Arc;

use micro_evhttp::config::{ConnectionConfig, SessionConfig};
use micro_evhttp::connection::HttpConnection;
use micro_evhttp::handler::make_handler;
use micro_evhttp::protocol::SendError;
use micro_evhttp::session::Session;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!(port = 8080, "start listening");
    let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
        Ok(tcp_listener) => tcp_listener,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return;
        }
    };

    let config = ConnectionConfig::default()
        .with_idle_timeout(Duration::from_secs(30))
        .with_session(SessionConfig::default().with_max_header_num(32));
    let handler = Arc::new(make_handler(route));

    loop {
        let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        let handler = handler.clone();

        tokio::spawn(async move {
            let (reader, writer) = tcp_stream.into_split();
            let connection = HttpConnection::with_config(reader, writer, config);
            match connection.process(&handler).await {
                Ok(()) => info!(%remote_addr, "finished process, connection shutdown"),
                Err(e) => error!(%remote_addr, cause = %e, "service has error, connection shutdown"),
            }
        });
    }
}

fn route(session: &mut Session) -> Result<(), SendError> {
    let request = session.request();
    info!(
        method = request.method(),
        path = request.path(),
        query = request.query(),
        version = request.version_str(),
        "receiving request"
    );

    let path = request.path().to_string();
    match path.as_str() {
        "/echo" => echo(session),
        "/chunked" => chunked(session),
        _ => hello(session),
    }
}

fn hello(session: &mut Session) -> Result<(), SendError> {
    session.response_mut().send(200u16, Some("text/plain"), &b"Hello World!\r\n"[..])?;
    Ok(())
}

fn echo(session: &mut Session) -> Result<(), SendError> {
    let content_type = session.request().header("Content-Type").unwrap_or("text/plain").to_string();
    let body = session.request_mut().take_content(0).unwrap_or_default();
    session.response_mut().send(200u16, Some(content_type.as_str()), body)?;
    Ok(())
}

fn chunked(session: &mut Session) -> Result<(), SendError> {
    let response = session.response_mut();
    response.set_content(Some("text/plain"), 0)?;
    for part in ["streamed ", "in ", "chunks\r\n"] {
        response.send_chunk(part.as_bytes())?;
    }
    response.send_chunk(&b""[..])?;
    Ok(())
}
