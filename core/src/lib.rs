//! Client-side request helper for envelope-style JSON APIs.
//!
//! # Overview
//! Every request goes through one pipeline: default JSON headers plus a
//! bearer token when one is stored, caller options merged on top, a
//! round-trip through a `Transport`, JSON parsing, and classification of
//! the response envelope into success or `ApplicationError`.
//!
//! # Design
//! - Collaborators (token store, transport, application store) are traits
//!   passed in at construction, never ambient globals.
//! - The outcome lives in the body: `code == 0` or an embedded 2xx
//!   `status_code` is success, whatever the HTTP status line says.
//! - Code 9001 clears the stored token. Codes in the
//!   `GlobalErrorRegistry` are also reported to the application store.
//! - `casing` converts payload keys between camelCase and snake_case and is
//!   independent of the pipeline.

pub mod casing;
pub mod classify;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod query;
pub mod store;
pub mod token;
pub mod transport;

pub use casing::{camel_to_snake, snake_to_camel, transform_keys_deep};
pub use classify::{ResponseClassifier, SESSION_INVALID_CODE, SUCCESS_CODE};
pub use client::{default_options, ApiClient};
pub use config::ClientConfig;
pub use envelope::Envelope;
pub use error::{AlreadyInjected, ApplicationError, RequestError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
pub use store::{Dispatch, GlobalErrorRegistry, StoreAction, StoreBinding};
pub use token::{MemoryTokenStore, TokenStore};
#[cfg(feature = "ureq-transport")]
pub use transport::UreqTransport;
pub use transport::Transport;
