use icondo_server::{bind, serve, AppState, MAX_BODY_BYTES};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct Server {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
    _dir: tempfile::TempDir,
}

async fn start() -> Server {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::open(dir.path().join("icondo.sqlite3")).unwrap();
    let listener = bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown, shutdown_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(serve(listener, state, async {
        let _ = shutdown_rx.await;
    }));
    Server {
        addr,
        shutdown,
        task,
        _dir: dir,
    }
}

/// Sends one raw HTTP/1.1 request and returns the full response text.
async fn round_trip(addr: SocketAddr, method: &str, path: &str, body: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let head = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    stream.write_all(head.as_bytes()).await.unwrap();
    stream.write_all(body).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn serves_requests_over_tcp() {
    let server = start().await;

    let created = round_trip(
        server.addr,
        "POST",
        "/condos",
        br#"{"razao_social":"Condominio Alfa"}"#,
    )
    .await;
    assert!(created.starts_with("HTTP/1.1 201"), "{created}");
    assert!(created.contains("Condominio Alfa"));

    let health = round_trip(server.addr, "GET", "/health", b"").await;
    assert!(health.starts_with("HTTP/1.1 200"), "{health}");

    server.shutdown.send(()).unwrap();
    server.task.await.unwrap().unwrap();
}

#[tokio::test]
async fn oversized_body_is_refused_with_413() {
    let server = start().await;

    let body = vec![b' '; MAX_BODY_BYTES + 1];
    let response = round_trip(server.addr, "POST", "/condos", &body).await;
    assert!(response.starts_with("HTTP/1.1 413"), "{response}");
    assert!(response.contains("\"error\""));

    let listed = round_trip(server.addr, "GET", "/condos", b"").await;
    assert!(listed.ends_with("[]"), "{listed}");

    server.shutdown.send(()).unwrap();
    server.task.await.unwrap().unwrap();
}
