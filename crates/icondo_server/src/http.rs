//! hyper connection loop.
//!
//! # Responsibility
//! - Accept TCP connections and serve HTTP/1 on a task per connection.
//! - Buffer request bodies, dispatch, and log one `http_request` event per
//!   request.
//!
//! # Invariants
//! - Connection errors never stop the accept loop.
//! - Resolving the shutdown future stops accepting new connections.
//! - Request bodies above `MAX_BODY_BYTES` are refused with 413 before
//!   dispatch.

use crate::response;
use crate::router::dispatch;
use crate::state::AppState;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, StatusCode};
use hyper_util::rt::TokioIo;
use log::{debug, info, warn};
use std::convert::Infallible;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Instant;
use tokio::net::TcpListener;
use uuid::Uuid;

/// Largest request body buffered in memory.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Binds the listening socket. Port `0` picks a free port.
pub async fn bind(addr: SocketAddr) -> io::Result<TcpListener> {
    TcpListener::bind(addr).await
}

/// Serves connections from `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()>,
{
    let local_addr = listener.local_addr()?;
    info!("event=server_listen module=http status=ok addr={local_addr}");

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(connection) => connection,
                    Err(err) => {
                        warn!("event=server_accept module=http status=error error={err}");
                        continue;
                    }
                };
                let state = state.clone();

                tokio::spawn(async move {
                    let service = service_fn(move |request: Request<Incoming>| {
                        let state = state.clone();
                        async move { Ok::<_, Infallible>(handle(&state, request).await) }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await
                    {
                        debug!("event=connection_closed module=http status=error peer={peer} error={err}");
                    }
                });
            }
            () = &mut shutdown => {
                info!("event=server_shutdown module=http status=ok addr={local_addr}");
                return Ok(());
            }
        }
    }
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve_until_ctrl_c(addr: SocketAddr, state: AppState) -> io::Result<()> {
    let listener = bind(addr).await?;
    serve(listener, state, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            // Without a signal handler the server runs until killed.
            warn!("event=server_signal module=http status=error error={err}");
            std::future::pending::<()>().await;
        }
    })
    .await
}

async fn handle(state: &AppState, request: Request<Incoming>) -> response::HttpResponse {
    let started_at = Instant::now();
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let (parts, body) = request.into_parts();
    let response = match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => dispatch(state, Request::from_parts(parts, collected.to_bytes())).await,
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => response::error(
            StatusCode::PAYLOAD_TOO_LARGE,
            &format!("request body exceeds {MAX_BODY_BYTES} bytes"),
        ),
        Err(err) => response::error(
            StatusCode::BAD_REQUEST,
            &format!("failed to read request body: {err}"),
        ),
    };

    info!(
        "event=http_request module=http status={} request_id={request_id} method={method} path={path} duration_ms={}",
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
