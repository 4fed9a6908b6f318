use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use nano_web::{Server, ServerConfig, ServerError};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

fn local_config() -> ServerConfig {
    ServerConfig::default().with_bind_address(IpAddr::V4(Ipv4Addr::LOCALHOST)).with_port(0).with_workers(2)
}

struct Reply {
    head: String,
    body: String,
}

impl Reply {
    fn status_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(": ")?;
            (key == name).then_some(value)
        })
    }
}

async fn read_reply(stream: &mut TcpStream) -> Reply {
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    let raw = String::from_utf8(buf).unwrap();
    let (head, body) = raw.split_once("\r\n\r\n").unwrap();
    Reply { head: head.to_owned(), body: body.to_owned() }
}

async fn exchange(addr: SocketAddr, raw: &str) -> Reply {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    read_reply(&mut stream).await
}

#[tokio::test]
async fn concurrent_health_checks() {
    let server = Server::with_default_routes(local_config());
    let addr = server.start().unwrap();

    let replies =
        futures::future::join_all((0..16).map(|_| exchange(addr, "GET /health HTTP/1.1\r\nHost: localhost\r\n\r\n"))).await;

    for reply in replies {
        assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");
        assert_eq!(reply.header("Content-Type"), Some("application/json"));
        assert_eq!(reply.header("Connection"), Some("close"));
        assert_eq!(reply.header("Server"), Some("nano-http"));

        let json: Value = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    server.stop().await;
}

#[tokio::test]
async fn concurrent_connections_get_their_own_response() {
    let server = Server::with_default_routes(local_config());
    let addr = server.start().unwrap();

    let replies = futures::future::join_all((0..32).map(|id| async move {
        let reply = exchange(addr, &format!("GET /echo?id={id} HTTP/1.1\r\nX-Client: {id}\r\n\r\n")).await;
        (id, reply)
    }))
    .await;

    for (id, reply) in replies {
        assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");

        let json: Value = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(json["query_params"]["id"], id.to_string());
        assert_eq!(json["headers"]["X-Client"], id.to_string());
    }

    server.stop().await;
}

#[tokio::test]
async fn echo_reflects_request() {
    let server = Server::with_default_routes(local_config());
    let addr = server.start().unwrap();

    let reply = exchange(addr, "POST /echo?x=1&y=two HTTP/1.1\r\nHost: localhost\r\nX-Custom: abc\r\n\r\npayload").await;
    assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");

    let json: Value = serde_json::from_str(&reply.body).unwrap();
    assert_eq!(json["method"], "POST");
    assert_eq!(json["path"], "/echo");
    assert_eq!(json["version"], "HTTP/1.1");
    assert_eq!(json["headers"]["X-Custom"], "abc");
    assert_eq!(json["query_params"]["x"], "1");
    assert_eq!(json["query_params"]["y"], "two");
    assert_eq!(json["body"], "payload");

    server.stop().await;
}

#[tokio::test]
async fn root_page_and_missing_route() {
    let server = Server::with_default_routes(local_config());
    let addr = server.start().unwrap();

    let reply = exchange(addr, "GET / HTTP/1.1\r\n\r\n").await;
    assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(reply.header("Content-Type"), Some("text/html; charset=utf-8"));
    assert!(reply.body.contains("nano-http"));

    let reply = exchange(addr, "GET /missing HTTP/1.1\r\n\r\n").await;
    assert_eq!(reply.status_line(), "HTTP/1.1 404 Not Found");
    assert_eq!(reply.body, "Route not found: /missing");

    let reply = exchange(addr, "DELETE /echo HTTP/1.1\r\n\r\n").await;
    assert_eq!(reply.status_line(), "HTTP/1.1 404 Not Found");

    server.stop().await;
}

#[tokio::test]
async fn empty_request_is_rejected() {
    let server = Server::with_default_routes(local_config());
    let addr = server.start().unwrap();

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.shutdown().await.unwrap();
    let reply = read_reply(&mut stream).await;

    assert_eq!(reply.status_line(), "HTTP/1.1 400 Bad Request");
    assert_eq!(reply.body, "Invalid HTTP request");

    server.stop().await;
}

#[tokio::test]
async fn serves_static_files() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("index.html"), "<h1>home</h1>").unwrap();
    std::fs::create_dir(root.path().join("css")).unwrap();
    std::fs::write(root.path().join("css").join("site.css"), "body {}").unwrap();

    let server = Server::with_default_routes(local_config().with_static_root(root.path()));
    let addr = server.start().unwrap();

    let reply = exchange(addr, "GET /static HTTP/1.1\r\n\r\n").await;
    assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");
    assert_eq!(reply.body, "<h1>home</h1>");

    let reply = exchange(addr, "GET /static/css/site.css HTTP/1.1\r\n\r\n").await;
    assert_eq!(reply.header("Content-Type"), Some("text/css"));
    assert_eq!(reply.body, "body {}");

    let reply = exchange(addr, "GET /static/../Cargo.toml HTTP/1.1\r\n\r\n").await;
    assert_eq!(reply.status_line(), "HTTP/1.1 400 Bad Request");

    let reply = exchange(addr, "GET /static/nope.txt HTTP/1.1\r\n\r\n").await;
    assert_eq!(reply.status_line(), "HTTP/1.1 404 Not Found");
    assert_eq!(reply.body, "File not found: /nope.txt");

    server.stop().await;
}

#[tokio::test]
async fn stop_waits_for_in_flight_connection() {
    let server = Arc::new(Server::with_default_routes(local_config()));
    let addr = server.start().unwrap();

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"GET /health HTTP/1.1\r\n").await.unwrap();
    // let the accept loop pick the connection up before cancelling it
    tokio::time::sleep(Duration::from_millis(200)).await;

    let stopping = tokio::spawn({
        let server = Arc::clone(&server);
        async move { server.stop().await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!stopping.is_finished());
    assert!(!server.is_running());

    stream.write_all(b"\r\n").await.unwrap();
    let reply = read_reply(&mut stream).await;
    assert_eq!(reply.status_line(), "HTTP/1.1 200 OK");

    tokio::time::timeout(Duration::from_secs(5), stopping).await.unwrap().unwrap();
    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn stopped_server_cannot_restart() {
    let server = Server::with_default_routes(local_config());
    server.start().unwrap();
    assert!(matches!(server.start(), Err(ServerError::AlreadyRunning)));

    server.stop().await;
    assert!(matches!(server.start(), Err(ServerError::Stopped)));
}

#[tokio::test]
async fn run_until_stops_on_signal() {
    let server = Server::with_default_routes(local_config());
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let signal = async move {
        rx.await.unwrap_or_default();
    };
    let run = server.run_until(signal);
    tokio::pin!(run);

    tokio::select! {
        _ = &mut run => panic!("server returned before the signal"),
        () = tokio::time::sleep(Duration::from_millis(50)) => {}
    }
    assert!(server.is_running());

    tx.send(()).unwrap();
    run.await.unwrap();
    assert!(!server.is_running());
}
