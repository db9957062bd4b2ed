//! Minimal HTTP/1.1 server with scripted redirect routes for integration tests.
//!
//! Routes:
//! - `/r/N`        301 to `/r/N-1`; `/r/0` answers 200 with a body.
//! - `/loop/a|b`   302 to each other.
//! - `/self`       302 to itself.
//! - `/nolocation` 302 without `Location` for both verbs.
//! - `/get-only`   HEAD 405; GET 301 to `/r/0`.
//! - `/hidden`     HEAD 302 without `Location`; GET 302 to `/r/0`.
//! - `/abs`        301 to an absolute URL on the same server (`/r/0`).
//! - `/latin1`     301 to `/caf\xe9` (raw Latin-1 byte); `/caf%E9` answers 200.
//! - `/stall`      waits three seconds before answering 200.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

struct Reply {
    status: &'static str,
    location: Option<Vec<u8>>,
    body: Vec<u8>,
}

impl Reply {
    fn ok() -> Self {
        Self {
            status: "200 OK",
            location: None,
            body: vec![b'x'; 64 * 1024],
        }
    }

    fn redirect(status: &'static str, location: Option<String>) -> Self {
        Self::redirect_raw(status, location.map(String::into_bytes))
    }

    fn redirect_raw(status: &'static str, location: Option<Vec<u8>>) -> Self {
        Self {
            status,
            location,
            body: b"redirecting".to_vec(),
        }
    }
}

/// Starts the server in a background thread. Returns the base URL
/// (e.g. "http://127.0.0.1:12345/"). The server runs until the process exits.
pub fn start() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let base = format!("http://127.0.0.1:{}/", port);
    let origin = base.clone();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let origin = origin.clone();
            thread::spawn(move || handle(stream, &origin));
        }
    });
    base
}

/// A base URL on which nothing is listening.
pub fn dead_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: TcpStream, origin: &str) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut first = request.lines().next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("");
    let path = first.next().unwrap_or("/");
    let is_head = method.eq_ignore_ascii_case("HEAD");

    let reply = route(path, is_head, origin);
    let mut head = format!("HTTP/1.1 {}\r\n", reply.status).into_bytes();
    if let Some(loc) = &reply.location {
        head.extend_from_slice(b"Location: ");
        head.extend_from_slice(loc);
        head.extend_from_slice(b"\r\n");
    }
    head.extend_from_slice(
        format!(
            "Content-Length: {}\r\nConnection: close\r\n\r\n",
            reply.body.len()
        )
        .as_bytes(),
    );
    let _ = stream.write_all(&head);
    if !is_head {
        let _ = stream.write_all(&reply.body);
    }
}

fn route(path: &str, is_head: bool, origin: &str) -> Reply {
    if let Some(n) = path.strip_prefix("/r/").and_then(|n| n.parse::<u32>().ok()) {
        return if n == 0 {
            Reply::ok()
        } else {
            Reply::redirect("301 Moved Permanently", Some(format!("/r/{}", n - 1)))
        };
    }
    match path {
        "/loop/a" => Reply::redirect("302 Found", Some("/loop/b".to_string())),
        "/loop/b" => Reply::redirect("302 Found", Some("/loop/a".to_string())),
        "/self" => Reply::redirect("302 Found", Some("/self".to_string())),
        "/nolocation" => Reply::redirect("302 Found", None),
        "/get-only" if is_head => Reply {
            status: "405 Method Not Allowed",
            location: None,
            body: Vec::new(),
        },
        "/get-only" => Reply::redirect("301 Moved Permanently", Some("/r/0".to_string())),
        "/hidden" if is_head => Reply::redirect("302 Found", None),
        "/hidden" => Reply::redirect("302 Found", Some("/r/0".to_string())),
        "/abs" => Reply::redirect("301 Moved Permanently", Some(format!("{}r/0", origin))),
        "/latin1" => Reply::redirect_raw("301 Moved Permanently", Some(b"/caf\xe9".to_vec())),
        "/caf%E9" => Reply::ok(),
        "/stall" => {
            thread::sleep(Duration::from_secs(3));
            Reply::ok()
        }
        _ => Reply {
            status: "404 Not Found",
            location: None,
            body: b"not found".to_vec(),
        },
    }
}
