//! HTTP exchanged as plain data.
//!
//! # Design
//! The core never opens a socket. Controller operations hand the host an
//! `HttpRequest` value; the host performs the round-trip with whatever
//! transport it likes and feeds the resulting `HttpResponse` back. This
//! keeps every state transition deterministic and lets tests script
//! network outcomes, including failures, without a server.
//!
//! Owned `String` / `Vec` fields throughout, so requests and responses can
//! be moved freely between the controller, the transport, and test code.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// An HTTP request described as plain data.
///
/// Produced by the controller (via `TodoClient` builders). `path` is the
/// full URL; `headers` carry at most a content-type for bodied requests.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the host after executing an `HttpRequest` and passed back
/// into the controller for resolution.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range. The controller draws no finer
    /// distinction: any 2xx is success, everything else is a failed call.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
