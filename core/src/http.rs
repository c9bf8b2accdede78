//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `ApiClient` builds an
//! `HttpRequest`, a `Transport` executes it and hands back an `HttpResponse`.
//! The client never looks at the status line; only the body matters.
//!
//! `RequestOptions` is the caller-facing configuration. It is merged over
//! the client's defaults before an `HttpRequest` is produced.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::RequestError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `options` carries any transport-specific settings the caller passed in
/// `RequestOptions::extra`; transports ignore keys they do not understand.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub options: Map<String, Value>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Caller-supplied request configuration.
///
/// Every field is optional so that a caller can override only what it
/// needs. See [`RequestOptions::merged_over`] for the merge rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Option<HttpMethod>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub extra: Map<String, Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Set a header, replacing any existing header with the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `payload` as the JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self, RequestError> {
        let body = serde_json::to_string(payload).map_err(RequestError::Serialization)?;
        self.body = Some(body);
        Ok(self)
    }

    /// Set a transport option that has no dedicated field.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Merge `self` over `defaults`.
    ///
    /// Headers merge name by name (compared case-insensitively) and the
    /// caller's value wins. `extra` merges key by key the same way. Method
    /// and body are replaced wholesale when the caller sets them.
    pub fn merged_over(self, defaults: RequestOptions) -> RequestOptions {
        let mut headers = defaults.headers;
        for (name, value) in self.headers {
            set_header(&mut headers, name, value);
        }
        let mut extra = defaults.extra;
        extra.extend(self.extra);

        RequestOptions {
            method: self.method.or(defaults.method),
            headers,
            body: self.body.or(defaults.body),
            extra,
        }
    }
}

pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

fn set_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    match headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
        Some(slot) => *slot = (name, value),
        None => headers.push((name, value)),
    }
}
