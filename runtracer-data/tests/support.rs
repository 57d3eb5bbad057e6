//! Canned HTTP server for exercising the directions oracle over a real
//! socket.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

/// How the server answers its single request.
#[derive(Debug, Clone)]
pub enum Canned {
    /// Reply with a JSON body.
    Respond {
        /// HTTP status code.
        status: u16,
        /// Reason phrase for the status line.
        reason: &'static str,
        /// Response body.
        body: String,
    },
    /// Read the request and then stay silent for the given time.
    Stall(Duration),
}

/// One-shot HTTP server bound to a loopback port.
#[derive(Debug)]
pub struct CannedServer {
    base_url: String,
    request_line: Arc<Mutex<Option<String>>>,
}

impl CannedServer {
    /// Start a server that answers one request with `canned`.
    pub fn start(canned: Canned) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .unwrap_or_else(|err| panic!("failed to bind loopback listener: {err}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|err| panic!("listener has no address: {err}"));
        let request_line = Arc::new(Mutex::new(None));
        let captured = Arc::clone(&request_line);

        thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let Ok(read_half) = stream.try_clone() else {
                return;
            };
            let mut reader = BufReader::new(read_half);
            let mut first = String::new();
            if reader.read_line(&mut first).is_err() {
                return;
            }
            loop {
                let mut header = String::new();
                match reader.read_line(&mut header) {
                    Ok(0) | Err(_) => break,
                    Ok(_) if header == "\r\n" => break,
                    Ok(_) => {}
                }
            }
            *captured.lock().unwrap_or_else(PoisonError::into_inner) =
                Some(first.trim_end().to_owned());

            match canned {
                Canned::Stall(duration) => thread::sleep(duration),
                Canned::Respond {
                    status,
                    reason,
                    body,
                } => {
                    let response = format!(
                        "HTTP/1.1 {status} {reason}\r\n\
                         Content-Type: application/json\r\n\
                         Content-Length: {}\r\n\
                         Connection: close\r\n\r\n{body}",
                        body.len()
                    );
                    stream
                        .write_all(response.as_bytes())
                        .and_then(|()| stream.flush())
                        .expect("write canned response");
                }
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            request_line,
        }
    }

    /// Base URL to configure the oracle with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request line of the request the server received, if any.
    pub fn request_line(&self) -> Option<String> {
        self.request_line
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Base URL of a loopback port with nothing listening on it.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .unwrap_or_else(|err| panic!("failed to bind loopback listener: {err}"));
    let addr = listener
        .local_addr()
        .unwrap_or_else(|err| panic!("listener has no address: {err}"));
    drop(listener);
    format!("http://{addr}")
}
