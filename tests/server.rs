//! Real sockets: the server in front of a router.

use std::time::Duration;

use takanashi::{Context, Router, Server};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

async fn connect(port: u16) -> TcpStream {
    for _ in 0..50 {
        if let Ok(stream) = TcpStream::connect(("127.0.0.1", port)).await {
            return stream;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server never came up on port {port}");
}

async fn roundtrip(port: u16, raw: &str) -> String {
    let mut stream = connect(port).await;
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    String::from_utf8_lossy(&buf).into_owned()
}

#[tokio::test]
async fn serves_routes_and_shuts_down() {
    let port = free_port();
    let router = Router::new()
        .get("/hello/:name", |ctx: Context| async move {
            format!("hello {}", ctx.param("name").unwrap_or("?"))
        })
        .post("/echo", |ctx: Context| async move { ctx.body().clone() });

    let (stop, stopped) = oneshot::channel::<()>();
    let server = Server::bind(&format!("127.0.0.1:{port}")).unwrap();
    let running = tokio::spawn(server.serve_with_shutdown(router, async {
        let _ = stopped.await;
    }));

    let res = roundtrip(
        port,
        "GET /hello/world HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n",
    )
    .await;
    assert!(res.starts_with("HTTP/1.1 200 OK\r\n"), "{res}");
    assert!(res.contains("content-type: text/plain; charset=utf-8\r\n"), "{res}");
    assert!(res.ends_with("hello world"), "{res}");

    let res = roundtrip(
        port,
        "POST /echo HTTP/1.1\r\nhost: localhost\r\ncontent-length: 5\r\nconnection: close\r\n\r\nabcde",
    )
    .await;
    assert!(res.ends_with("\r\n\r\nabcde"), "{res}");

    let res = roundtrip(
        port,
        "GET /missing HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n",
    )
    .await;
    assert!(res.starts_with("HTTP/1.1 404 Not Found\r\n"), "{res}");
    assert!(res.ends_with("404 Not Found."), "{res}");

    stop.send(()).unwrap();
    running.await.unwrap().unwrap();
}

#[tokio::test]
async fn failing_handler_aborts_the_connection() {
    let port = free_port();
    let router = Router::new().get("/boom", |_ctx: Context| async {
        Err::<&'static str, _>(std::io::Error::other("boom"))
    });

    let (stop, stopped) = oneshot::channel::<()>();
    let server = Server::bind(&format!("127.0.0.1:{port}")).unwrap();
    let running = tokio::spawn(server.serve_with_shutdown(router, async {
        let _ = stopped.await;
    }));

    let mut stream = connect(port).await;
    stream
        .write_all(b"GET /boom HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut buf = Vec::new();
    // Either a clean EOF or a reset; never an HTTP response.
    let _ = stream.read_to_end(&mut buf).await;
    assert!(!String::from_utf8_lossy(&buf).starts_with("HTTP/1.1 200"));

    stop.send(()).unwrap();
    running.await.unwrap().unwrap();
}

#[test]
fn static_dir_is_collected_at_build_time() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();

    let server = Server::bind("127.0.0.1:0").unwrap().static_dir(dir.path()).unwrap();
    assert_eq!(server.assets().len(), 1);
    assert!(server.assets()[0].ends_with("app.js"));
}

#[test]
fn invalid_address_is_rejected() {
    assert!(matches!(
        Server::bind("not-an-address"),
        Err(takanashi::Error::InvalidAddress(_))
    ));
}
