//! Mock mask service for integration tests.

#![allow(dead_code)]

use std::io::Read;
use std::sync::mpsc;

use image::{Rgba, RgbaImage};
use maskcanvas::config::RemoteConfig;
use maskcanvas::remote::RemoteClient;
use tiny_http::{Header, Response, Server};

/// One request as the mock service saw it.
#[derive(Debug)]
pub struct Recorded {
    pub method: String,
    pub url: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

/// Serve the given `(status, json body)` responses in order, one per request,
/// on an ephemeral port.  Returns the base URL (`http://127.0.0.1:<port>/api`)
/// and a receiver yielding every request received.
pub fn serve(responses: Vec<(u16, &'static str)>) -> (String, mpsc::Receiver<Recorded>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        for (status, body) in responses {
            let Ok(mut request) = server.recv() else {
                return;
            };
            let mut bytes = Vec::new();
            request.as_reader().read_to_end(&mut bytes).unwrap();
            let content_type = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Content-Type"))
                .map(|h| h.value.as_str().to_string())
                .unwrap_or_default();
            let _ = tx.send(Recorded {
                method: request.method().to_string(),
                url: request.url().to_string(),
                content_type,
                body: bytes,
            });

            let response = Response::from_string(body)
                .with_status_code(status)
                .with_header("Content-Type: application/json".parse::<Header>().unwrap());
            let _ = request.respond(response);
        }
    });

    (format!("http://{}/api", addr), rx)
}

pub fn client(base_url: &str) -> RemoteClient {
    RemoteClient::new(RemoteConfig::new(base_url).unwrap()).unwrap()
}

/// A 10×10 solid red PNG.
pub fn red_png() -> Vec<u8> {
    let img = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
    maskcanvas::export::encode_png(&img).unwrap()
}

/// Fresh scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("maskcanvas-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
