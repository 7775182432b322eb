use crate::config::Target;
use crate::transport::{DeviceTransport, HttpReply};
use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};
use serde_json::Value;

pub fn build(target: &Target) -> Result<Client> {
    Client::builder()
        .timeout(target.timeout())
        .build()
        .context("http client build failed")
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(target: &Target) -> Result<Self> {
        Ok(Self {
            client: build(target)?,
        })
    }
}

impl DeviceTransport for HttpTransport {
    fn get(&self, url: &str) -> Result<HttpReply> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("GET {} failed", url))?;
        Ok(into_reply(response))
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply> {
        log::debug!("POST {} {}", url, body);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .with_context(|| format!("POST {} failed", url))?;
        Ok(into_reply(response))
    }
}

fn into_reply(response: Response) -> HttpReply {
    let status = response.status().as_u16();
    let body = response.text().unwrap_or_default();
    HttpReply { status, body }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;
    use serde_json::json;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;
    use std::time::Duration;

    fn transport(timeout_ms: &str) -> HttpTransport {
        let args = Args::parse_from(["gimbal-teleop", "--timeout-ms", timeout_ms]);
        HttpTransport::new(&Target::from_args(&args).unwrap()).unwrap()
    }

    fn serve_once(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            request
        });
        (url, handle)
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut data = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&data);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        if name.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if data.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    #[test]
    fn get_passes_status_and_body_through() {
        let (url, server) = serve_once("200 OK", r#"{"Degree":[10,20,30]}"#);

        let reply = transport("2000").get(&format!("{}/gimbal", url)).unwrap();

        assert_eq!(reply, HttpReply::new(200, r#"{"Degree":[10,20,30]}"#));
        assert!(server.join().unwrap().starts_with("GET /gimbal HTTP/1.1"));
    }

    #[test]
    fn post_sends_json_and_keeps_error_status() {
        let (url, server) = serve_once("503 Service Unavailable", "busy");
        let body = json!({ "cmd": "SdkSetConfig", "key": 3, "val": 0 });

        let reply = transport("2000").post_json(&url, &body).unwrap();

        assert_eq!(reply, HttpReply::new(503, "busy"));
        assert!(!reply.is_ok());
        let request = server.join().unwrap();
        assert!(request.starts_with("POST / HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        let (_, sent) = request.split_once("\r\n\r\n").unwrap();
        assert_eq!(serde_json::from_str::<Value>(sent).unwrap(), body);
    }

    #[test]
    fn refused_connection_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/gimbal", listener.local_addr().unwrap());
        drop(listener);

        let err = transport("2000").get(&url).unwrap_err();

        assert!(format!("{:#}", err).starts_with(&format!("GET {} failed", url)));
    }

    #[test]
    fn silent_device_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_millis(800));
            drop(stream);
        });

        let result = transport("200").post_json(&url, &json!({ "msg_id": 701, "x": 50, "y": 50 }));

        assert!(result.is_err());
        server.join().unwrap();
    }
}
