//! A minimal static file server for previewing the generated site. It answers
//! one request at a time and runs until the process is killed.

use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};

/// Binds `address` and serves files under `root` forever.
pub fn serve(root: &Path, address: &str) -> io::Result<()> {
    let root = root.canonicalize()?;
    let listener = TcpListener::bind(address)?;
    log::info!("Serving `{}` on http://{}", root.display(), address);
    log::info!("Press Ctrl+C to stop");

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                if let Err(e) = handle_request(stream, &root) {
                    log::warn!("Request error: {}", e);
                }
            }
            Err(e) => log::warn!("Connection error: {}", e),
        }
    }
    Ok(())
}

fn handle_request(mut stream: TcpStream, root: &Path) -> io::Result<()> {
    let mut buffer = [0; 4096];
    let n = stream.read(&mut buffer)?;
    let request = String::from_utf8_lossy(&buffer[..n]);

    let request_line = request.lines().next().unwrap_or("");
    let mut parts = request_line.split_whitespace();
    let (method, target) = match (parts.next(), parts.next()) {
        (Some(method), Some(target)) => (method, target),
        _ => return send_response(&mut stream, Status::BadRequest, "text/plain", b"Bad Request"),
    };

    if method != "GET" {
        return send_response(
            &mut stream,
            Status::MethodNotAllowed,
            "text/plain",
            b"Method Not Allowed",
        );
    }

    let (status, content_type, body) = match resolve(root, target) {
        Resolved::File(path) => match std::fs::read(&path) {
            Ok(body) => (Status::Ok, content_type(&path), body),
            Err(_) => (Status::NotFound, "text/plain", b"Not Found".to_vec()),
        },
        Resolved::NotFound => (Status::NotFound, "text/plain", b"Not Found".to_vec()),
        Resolved::Forbidden => (Status::Forbidden, "text/plain", b"Forbidden".to_vec()),
    };
    log::info!("{} {} {}", status.code(), method, target);
    send_response(&mut stream, status, content_type, &body)
}

#[derive(Debug, PartialEq)]
enum Resolved {
    File(PathBuf),
    NotFound,
    Forbidden,
}

/// Maps a request target onto a file under `root` (which must be
/// canonical). Directories resolve to their `index.html`, and nothing
/// outside `root` is reachable.
fn resolve(root: &Path, target: &str) -> Resolved {
    let decoded = percent_decode(target.split('?').next().unwrap_or(target));
    let candidate = root.join(decoded.trim_start_matches('/'));
    let canonical = match candidate.canonicalize() {
        Ok(path) => path,
        Err(_) => return Resolved::NotFound,
    };
    if !canonical.starts_with(root) {
        return Resolved::Forbidden;
    }
    let path = if canonical.is_dir() {
        canonical.join("index.html")
    } else {
        canonical
    };
    if path.is_file() {
        Resolved::File(path)
    } else {
        Resolved::NotFound
    }
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Status {
    Ok,
    BadRequest,
    Forbidden,
    NotFound,
    MethodNotAllowed,
}

impl Status {
    fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::Forbidden => 403,
            Status::NotFound => 404,
            Status::MethodNotAllowed => 405,
        }
    }

    fn reason(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::BadRequest => "Bad Request",
            Status::Forbidden => "Forbidden",
            Status::NotFound => "Not Found",
            Status::MethodNotAllowed => "Method Not Allowed",
        }
    }
}

fn send_response(
    stream: &mut TcpStream,
    status: Status,
    content_type: &str,
    body: &[u8],
) -> io::Result<()> {
    write!(
        stream,
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status.code(),
        status.reason(),
        content_type,
        body.len()
    )?;
    stream.write_all(body)?;
    stream.flush()
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("atom") | Some("xml") => "application/atom+xml; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve() -> io::Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().join("export");
        std::fs::create_dir_all(root.join("2024/01"))?;
        std::fs::write(root.join("index.html"), "home")?;
        std::fs::write(root.join("2024/01/index.html"), "january")?;
        std::fs::write(root.join("2024/01/hello world.html"), "post")?;
        std::fs::write(dir.path().join("secret.txt"), "secret")?;
        let root = root.canonicalize()?;

        assert_eq!(resolve(&root, "/"), Resolved::File(root.join("index.html")));
        assert_eq!(
            resolve(&root, "/2024/01/?page=2"),
            Resolved::File(root.join("2024/01/index.html"))
        );
        assert_eq!(
            resolve(&root, "/2024/01/hello%20world.html"),
            Resolved::File(root.join("2024/01/hello world.html"))
        );
        assert_eq!(resolve(&root, "/2024/"), Resolved::NotFound);
        assert_eq!(resolve(&root, "/missing.html"), Resolved::NotFound);
        assert_eq!(resolve(&root, "/../secret.txt"), Resolved::Forbidden);
        Ok(())
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("/a%20b"), "/a b");
        assert_eq!(percent_decode("/caf%C3%A9"), "/café");
        assert_eq!(percent_decode("/100%"), "/100%");
        assert_eq!(percent_decode("/%zz"), "/%zz");
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type(Path::new("a.html")), "text/html; charset=utf-8");
        assert_eq!(content_type(Path::new("feed.atom")), "application/atom+xml; charset=utf-8");
        assert_eq!(content_type(Path::new("blob")), "application/octet-stream");
    }
}
