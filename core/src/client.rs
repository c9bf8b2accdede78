//! Request pipeline: default options, token injection, transport, parsing
//! and classification.
//!
//! # Design
//! `ApiClient` holds its collaborators explicitly: a `Transport` for the
//! round-trip, a `TokenStore` read on every request, and a
//! `ResponseClassifier` that owns the global error wiring. Nothing is looked
//! up from ambient state.
//!
//! The pipeline is also available in two halves, `build_request` and
//! `parse_response`, for hosts that want to run the HTTP call themselves.

use std::fmt::Display;
use std::sync::Arc;

use crate::classify::ResponseClassifier;
use crate::config::ClientConfig;
use crate::envelope::Envelope;
use crate::error::RequestError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
use crate::query::with_query;
use crate::store::{GlobalErrorRegistry, StoreBinding};
use crate::token::TokenStore;
use crate::transport::Transport;

/// Defaults every request starts from: `GET`, JSON `Accept` and
/// `Content-Type`, and a bearer `Authorization` header when `tokens`
/// currently holds a token.
pub fn default_options(tokens: &dyn TokenStore) -> RequestOptions {
    let options = RequestOptions::new()
        .method(HttpMethod::Get)
        .header("Accept", "application/json")
        .header("Content-Type", "application/json");
    match tokens.read().filter(|t| !t.is_empty()) {
        Some(token) => options.header("Authorization", format!("Bearer {token}")),
        None => options,
    }
}

pub struct ApiClient<T> {
    config: ClientConfig,
    transport: T,
    tokens: Arc<dyn TokenStore>,
    classifier: ResponseClassifier,
}

impl<T: std::fmt::Debug> std::fmt::Debug for ApiClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("transport", &self.transport)
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}

impl<T> ApiClient<T> {
    /// A client with no global error codes registered.
    pub fn new(config: ClientConfig, transport: T, tokens: Arc<dyn TokenStore>) -> Self {
        let classifier = ResponseClassifier::new(
            Arc::clone(&tokens),
            GlobalErrorRegistry::default(),
            Arc::new(StoreBinding::new()),
        );
        Self {
            config,
            transport,
            tokens,
            classifier,
        }
    }

    /// Report failing envelopes whose code is in `registry` through `store`.
    pub fn with_global_errors(
        mut self,
        registry: GlobalErrorRegistry,
        store: Arc<StoreBinding>,
    ) -> Self {
        self.classifier = ResponseClassifier::new(Arc::clone(&self.tokens), registry, store);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The binding the application store is injected into.
    pub fn store(&self) -> &StoreBinding {
        self.classifier.store()
    }

    pub fn classifier(&self) -> &ResponseClassifier {
        &self.classifier
    }

    /// Merge `options` over the defaults and resolve `url`.
    pub fn build_request(&self, url: &str, options: Option<RequestOptions>) -> HttpRequest {
        let defaults = default_options(self.tokens.as_ref());
        let merged = options.unwrap_or_default().merged_over(defaults);
        HttpRequest {
            method: merged.method.unwrap_or(HttpMethod::Get),
            url: self.config.resolve(url),
            headers: merged.headers,
            body: merged.body,
            options: merged.extra,
        }
    }

    /// Parse the body as JSON and classify it. The status line is ignored.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Envelope, RequestError> {
        let value: serde_json::Value =
            serde_json::from_str(&response.body).map_err(RequestError::Parse)?;
        self.classifier
            .classify(Envelope::new(value))
            .map_err(RequestError::from)
    }
}

impl<T: Transport> ApiClient<T> {
    /// Send a request and return the envelope if it classifies as success.
    pub fn request(
        &self,
        url: &str,
        options: Option<RequestOptions>,
    ) -> Result<Envelope, RequestError> {
        let request = self.build_request(url, options);
        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        let response = self.transport.send(request)?;
        tracing::debug!(status = response.status, "response received");

        self.parse_response(response)
    }

    /// `GET url?params`. Pairs are encoded in iteration order; no `?` is
    /// added when `params` is empty.
    pub fn get<I, K, V>(&self, url: &str, params: I) -> Result<Envelope, RequestError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        let options = RequestOptions::new().method(HttpMethod::Get);
        self.request(&with_query(url, params), Some(options))
    }
}
