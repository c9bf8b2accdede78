//! Executing `HttpRequest`s.
//!
//! # Design
//! `ApiClient` is generic over `Transport` so the pipeline can run against
//! any HTTP stack, or against a canned responder in tests. `UreqTransport`
//! is the bundled blocking implementation. It returns every response as
//! data, including 4xx/5xx, because the envelope inside the body decides
//! the outcome.

use crate::error::RequestError;
use crate::http::{HttpRequest, HttpResponse};

pub trait Transport {
    /// Execute `request`. Only failures that leave no response body to read
    /// are errors.
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError>;
}

impl<F> Transport for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, RequestError>,
{
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        self(request)
    }
}

#[cfg(feature = "ureq-transport")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq-transport")]
mod blocking {
    use ureq::{Agent, RequestBuilder};

    use super::Transport;
    use crate::error::RequestError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by a shared `ureq::Agent`.
    ///
    /// Only method, url, headers and body are sent. Entries in
    /// `HttpRequest::options` are ignored.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: Agent,
    }

    impl std::fmt::Debug for UreqTransport {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("UreqTransport").finish_non_exhaustive()
        }
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    fn with_headers<B>(
        mut builder: RequestBuilder<B>,
        headers: &[(String, String)],
    ) -> RequestBuilder<B> {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    impl Transport for UreqTransport {
        fn send(&self, req: HttpRequest) -> Result<HttpResponse, RequestError> {
            let url = req.url.as_str();
            let headers = req.headers.as_slice();
            let body = req.body.as_deref();

            let result = match req.method {
                HttpMethod::Get => with_headers(self.agent.get(url), headers).call(),
                HttpMethod::Delete => with_headers(self.agent.delete(url), headers).call(),
                HttpMethod::Post => {
                    let builder = with_headers(self.agent.post(url), headers);
                    match body {
                        Some(body) => builder.send(body.as_bytes()),
                        None => builder.send_empty(),
                    }
                }
                HttpMethod::Put => {
                    let builder = with_headers(self.agent.put(url), headers);
                    match body {
                        Some(body) => builder.send(body.as_bytes()),
                        None => builder.send_empty(),
                    }
                }
                HttpMethod::Patch => {
                    let builder = with_headers(self.agent.patch(url), headers);
                    match body {
                        Some(body) => builder.send(body.as_bytes()),
                        None => builder.send_empty(),
                    }
                }
            };
            let mut response = result.map_err(RequestError::transport)?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(RequestError::transport)?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
