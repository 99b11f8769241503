//! Catalog API HTTP client
//!
//! Uses synchronous HTTP (ureq) so a tick is plain blocking code.

use anyhow::{Context, Result};
use std::time::Duration;
use ureq::Agent;

use super::hal::{CatalogEvent, EventCollection, HAL_JSON, RootDocument};
use super::traits::EventSource;

/// HTTP client for the catalog service
///
/// Non-2xx responses are returned as errors by ureq.
pub struct CatalogClient {
    agent: Agent,
}

impl CatalogClient {
    /// Default timeout for a whole request, including reading the body
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a new client with the default timeout
    pub fn new() -> Self {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    /// Create a new client with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent }
    }

    /// Fetch the catalog's root document
    pub fn get_root(&self, url: &str) -> Result<RootDocument> {
        let mut response = self
            .agent
            .get(url)
            .header("Accept", HAL_JSON)
            .call()
            .with_context(|| format!("Failed to request catalog root {}", url))?;

        let root: RootDocument = response
            .body_mut()
            .read_json()
            .context("Failed to parse catalog root document")?;

        Ok(root)
    }

    /// Fetch an event collection
    pub fn get_events(&self, uri: &str) -> Result<EventCollection> {
        let mut response = self
            .agent
            .get(uri)
            .header("Accept", HAL_JSON)
            .call()
            .with_context(|| format!("Failed to request catalog events {}", uri))?;

        let collection: EventCollection = response
            .body_mut()
            .read_json()
            .context("Failed to parse catalog events response")?;

        Ok(collection)
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CatalogClient {
    fn fetch_events(&self, uri: &str) -> Result<Vec<CatalogEvent>> {
        Ok(self.get_events(uri)?.into_events())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;

    /// Serve a single canned HTTP response, reporting the raw request head
    fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/hal+json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            let _ = tx.send(String::from_utf8_lossy(&head).into_owned());
        });

        (format!("http://{}", addr), rx)
    }

    #[test]
    fn test_fetch_events_requests_hal() {
        let body = r#"{
            "_embedded": { "productAddeds": [
                { "publicationDate": "2024-01-01T00:00:00",
                  "_links": { "product": { "href": "http://catalog/products/1" } } }
            ] }
        }"#;
        let (base, requests) = serve_once("200 OK", body);

        let client = CatalogClient::with_timeout(Duration::from_secs(5));
        let events = client
            .fetch_events(&format!("{}/events?type=productAdded", base))
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].product_id().unwrap().as_str(),
            "http://catalog/products/1"
        );

        let request = requests.recv().unwrap().to_lowercase();
        assert!(request.starts_with("get /events?type=productadded"));
        assert!(request.contains("accept: application/hal+json"));
    }

    #[test]
    fn test_fetch_events_surfaces_server_errors() {
        let (base, _requests) = serve_once("503 Service Unavailable", "{}");

        let client = CatalogClient::with_timeout(Duration::from_secs(5));
        let result = client.fetch_events(&format!("{}/events", base));

        assert!(result.is_err());
    }

    #[test]
    fn test_fetch_events_rejects_malformed_body() {
        let (base, _requests) = serve_once("200 OK", "not json");

        let client = CatalogClient::with_timeout(Duration::from_secs(5));
        assert!(client.fetch_events(&format!("{}/events", base)).is_err());
    }

    #[test]
    fn test_get_root() {
        let body = r#"{ "_links": { "events": { "href": "/events{?type,since}", "templated": true } } }"#;
        let (base, _requests) = serve_once("200 OK", body);

        let client = CatalogClient::with_timeout(Duration::from_secs(5));
        let root = client.get_root(&base).unwrap();

        assert_eq!(root.links.get("events").unwrap().href, "/events{?type,since}");
    }
}
