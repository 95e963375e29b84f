//! Liveness endpoint — a minimal always-200 HTTP responder.
//!
//! External health checks poll this to confirm the board is up; it runs on
//! its own execution context for the whole process lifetime and never
//! observes or mutates round state.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `EspHttpServer` (ESP-IDF `esp_http_server`
//!   component, one lightweight task per connection).
//! - **all other targets**: a `std::net::TcpListener` with a thread per
//!   connection, so host tests exercise a real TCP exchange.

use log::info;

use crate::error::CommsError;

/// Fixed response body.
const BODY: &[u8] = b"OK";

pub struct LivenessServer {
    #[cfg(target_os = "espidf")]
    _server: esp_idf_svc::http::server::EspHttpServer<'static>,
    #[cfg(not(target_os = "espidf"))]
    addr: std::net::SocketAddr,
}

impl LivenessServer {
    /// Bind and start answering. The server keeps running as long as the
    /// returned handle is alive; `main` holds it for the process lifetime.
    #[cfg(target_os = "espidf")]
    pub fn start(port: u16) -> Result<Self, CommsError> {
        use esp_idf_svc::http::Method;
        use esp_idf_svc::http::server::{Configuration, EspHttpServer};
        use esp_idf_svc::io::{EspIOError, Write as _};

        let mut server = EspHttpServer::new(&Configuration {
            http_port: port,
            uri_match_wildcard: true,
            ..Default::default()
        })
        .map_err(|_| CommsError::LivenessBindFailed)?;

        // Any GET path answers OK — health checkers probe "/" but nothing
        // else is worth a 404 here.
        server
            .fn_handler("/*", Method::Get, |request| -> Result<(), EspIOError> {
                request.into_ok_response()?.write_all(BODY)?;
                Ok(())
            })
            .map_err(|_| CommsError::LivenessBindFailed)?;

        info!("liveness: listening on port {}", port);
        Ok(Self { _server: server })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn start(port: u16) -> Result<Self, CommsError> {
        use std::io::{Read as _, Write as _};
        use std::net::{TcpListener, TcpStream};

        fn handle(mut stream: TcpStream) {
            // Request content is irrelevant; read what arrived and answer.
            let mut buf = [0u8; 512];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(
                b"HTTP/1.1 200 OK\r\n\
                  Content-Type: text/plain\r\n\
                  Content-Length: 2\r\n\
                  Connection: close\r\n\
                  \r\n",
            );
            let _ = stream.write_all(BODY);
        }

        let listener =
            TcpListener::bind(("0.0.0.0", port)).map_err(|_| CommsError::LivenessBindFailed)?;
        let addr = listener
            .local_addr()
            .map_err(|_| CommsError::LivenessBindFailed)?;

        std::thread::spawn(move || {
            for stream in listener.incoming() {
                if let Ok(stream) = stream {
                    std::thread::spawn(move || handle(stream));
                }
            }
        });

        info!("liveness(sim): listening on {}", addr);
        Ok(Self { addr })
    }

    /// Actual bound address (host build; port 0 binds ephemerally in tests).
    #[cfg(not(target_os = "espidf"))]
    pub fn local_addr(&self) -> std::net::SocketAddr {
        self.addr
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use std::io::{Read as _, Write as _};
    use std::net::TcpStream;
    use std::time::Duration;

    fn probe(server: &LivenessServer) -> String {
        let mut stream = TcpStream::connect(server.local_addr()).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        stream
            .write_all(b"GET / HTTP/1.1\r\nHost: propsense\r\n\r\n")
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    #[test]
    fn answers_200_ok_to_a_get() {
        let server = LivenessServer::start(0).unwrap();
        let response = probe(&server);
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.ends_with("OK"));
    }

    #[test]
    fn answers_every_connection_independently() {
        let server = LivenessServer::start(0).unwrap();
        for _ in 0..3 {
            assert!(probe(&server).contains("200 OK"));
        }
    }
}
