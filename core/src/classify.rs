//! Success/failure classification of response envelopes.
//!
//! # Design
//! The server reports outcomes in the body, not the status line. An envelope
//! is a success when `code == 0` or when it embeds a 2xx `status_code`; the
//! two checks are independent, so a zero code wins even next to a 404.
//!
//! Two side effects ride along. Code 9001 means the session token is no
//! longer valid, and the token is cleared whatever else the envelope says.
//! Failing codes found in the `GlobalErrorRegistry` are also forwarded to the
//! application store before the failure is returned.

use std::sync::Arc;

use crate::envelope::Envelope;
use crate::error::ApplicationError;
use crate::store::{GlobalErrorRegistry, StoreAction, StoreBinding};
use crate::token::TokenStore;

/// Code meaning "success".
pub const SUCCESS_CODE: i64 = 0;

/// Code meaning "session expired or token invalid".
pub const SESSION_INVALID_CODE: i64 = 9001;

pub struct ResponseClassifier {
    tokens: Arc<dyn TokenStore>,
    registry: GlobalErrorRegistry,
    store: Arc<StoreBinding>,
}

impl ResponseClassifier {
    pub fn new(
        tokens: Arc<dyn TokenStore>,
        registry: GlobalErrorRegistry,
        store: Arc<StoreBinding>,
    ) -> Self {
        Self {
            tokens,
            registry,
            store,
        }
    }

    pub fn store(&self) -> &StoreBinding {
        &self.store
    }

    pub fn classify(&self, envelope: Envelope) -> Result<Envelope, ApplicationError> {
        let code = envelope.code();

        if code == Some(SESSION_INVALID_CODE) {
            tracing::warn!(code = SESSION_INVALID_CODE, "session invalid, clearing token");
            self.tokens.clear();
        }

        if is_success(&envelope) {
            return Ok(envelope);
        }

        if let Some(code) = code.filter(|c| self.registry.contains(*c)) {
            if self.store.dispatch(StoreAction::GlobalError { code }) {
                tracing::debug!(code, "global error dispatched");
            } else {
                tracing::error!(code, "global error raised before a store was injected");
            }
        }

        Err(ApplicationError {
            message: envelope.error_message(),
            data: envelope,
        })
    }
}

impl std::fmt::Debug for ResponseClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseClassifier")
            .field("registry", &self.registry)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// `code == 0` OR a 2xx `status_code`. Kept as two separate branches.
pub fn is_success(envelope: &Envelope) -> bool {
    envelope.code() == Some(SUCCESS_CODE)
        || envelope
            .status_code()
            .is_some_and(|status| (200..300).contains(&status))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use serde_json::json;
    use tracing_test::traced_test;

    use super::*;
    use crate::store::Dispatch;
    use crate::token::MemoryTokenStore;

    /// Counts `clear` calls and never holds a token.
    #[derive(Default)]
    struct CountingTokens {
        clears: AtomicUsize,
    }

    impl TokenStore for CountingTokens {
        fn read(&self) -> Option<String> {
            None
        }

        fn clear(&self) {
            self.clears.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Fixture {
        tokens: Arc<CountingTokens>,
        actions: Arc<Mutex<Vec<StoreAction>>>,
        classifier: ResponseClassifier,
    }

    fn fixture(registry: &[i64]) -> Fixture {
        let tokens = Arc::new(CountingTokens::default());
        let actions = Arc::new(Mutex::new(Vec::<StoreAction>::new()));
        let sink = Arc::clone(&actions);
        let store: Arc<dyn Dispatch> =
            Arc::new(move |action: StoreAction| sink.lock().unwrap().push(action));
        let classifier = ResponseClassifier::new(
            tokens.clone(),
            GlobalErrorRegistry::new(registry.iter().copied()),
            Arc::new(StoreBinding::with_store(store)),
        );
        Fixture {
            tokens,
            actions,
            classifier,
        }
    }

    impl Fixture {
        fn clears(&self) -> usize {
            self.tokens.clears.load(Ordering::SeqCst)
        }

        fn dispatched(&self) -> Vec<StoreAction> {
            self.actions.lock().unwrap().clone()
        }
    }

    #[test]
    fn zero_code_succeeds_regardless_of_status() {
        let fx = fixture(&[]);
        for status in [json!(null), json!(200), json!(404), json!(500)] {
            let env = Envelope::new(json!({"code": 0, "status_code": status, "payload": [1]}));
            assert_eq!(fx.classifier.classify(env.clone()), Ok(env));
        }
    }

    #[test]
    fn two_hundred_range_status_succeeds_with_nonzero_code() {
        let fx = fixture(&[]);
        for status in [200, 201, 250, 299] {
            let env = Envelope::new(json!({"code": 17, "status_code": status}));
            assert!(fx.classifier.classify(env).is_ok(), "status {status}");
        }
        for status in [199, 300, 404] {
            let env = Envelope::new(json!({"code": 17, "status_code": status}));
            assert!(fx.classifier.classify(env).is_err(), "status {status}");
        }
    }

    #[test]
    fn unregistered_failure_carries_message_and_envelope() {
        let fx = fixture(&[1001]);
        let input = json!({"code": 1, "status_code": 404, "message": "not found"});
        let err = fx.classifier.classify(Envelope::new(input.clone())).unwrap_err();
        assert_eq!(err.message.as_deref(), Some("not found"));
        assert_eq!(err.data.as_value(), &input);
        assert!(fx.dispatched().is_empty());
        assert_eq!(fx.clears(), 0);
    }

    #[test]
    fn session_invalid_clears_token_and_fails() {
        let fx = fixture(&[]);
        let err = fx
            .classifier
            .classify(Envelope::new(json!({"code": 9001, "message": "expired"})))
            .unwrap_err();
        assert_eq!(err.message.as_deref(), Some("expired"));
        assert_eq!(fx.clears(), 1);
    }

    #[test]
    fn session_invalid_clears_token_even_on_success() {
        let fx = fixture(&[]);
        let env = Envelope::new(json!({"code": 9001, "status_code": 200}));
        assert!(fx.classifier.classify(env).is_ok());
        assert_eq!(fx.clears(), 1);
    }

    #[test]
    fn registered_failure_dispatches_once() {
        let fx = fixture(&[1001, 9001]);
        let _ = fx.classifier.classify(Envelope::new(json!({"code": 1001})));
        assert_eq!(fx.dispatched(), vec![StoreAction::GlobalError { code: 1001 }]);

        let _ = fx.classifier.classify(Envelope::new(json!({"code": 9001})));
        assert_eq!(fx.dispatched().len(), 2);
        assert_eq!(fx.clears(), 1);
    }

    #[test]
    fn registered_code_on_success_does_not_dispatch() {
        let fx = fixture(&[1001]);
        let env = Envelope::new(json!({"code": 1001, "status_code": 204}));
        assert!(fx.classifier.classify(env).is_ok());
        assert!(fx.dispatched().is_empty());
    }

    #[test]
    fn missing_code_and_status_fails_without_side_effects() {
        let fx = fixture(&[1001]);
        let err = fx.classifier.classify(Envelope::new(json!({"message": "?"}))).unwrap_err();
        assert_eq!(err.code(), None);
        assert!(fx.dispatched().is_empty());
        assert_eq!(fx.clears(), 0);
    }

    #[test]
    fn numeric_message_is_kept_as_text() {
        let fx = fixture(&[]);
        let err = fx
            .classifier
            .classify(Envelope::new(json!({"code": 3, "message": 42})))
            .unwrap_err();
        assert_eq!(err.message.as_deref(), Some("42"));
        assert_eq!(err.to_string(), "42");
    }

    #[test]
    fn non_object_body_fails() {
        let fx = fixture(&[]);
        let err = fx.classifier.classify(Envelope::new(json!([0]))).unwrap_err();
        assert_eq!(err.message, None);
    }

    #[test]
    #[traced_test]
    fn registered_failure_without_store_is_logged() {
        let tokens = MemoryTokenStore::new();
        let classifier = ResponseClassifier::new(
            Arc::new(tokens),
            GlobalErrorRegistry::new([1001]),
            Arc::new(StoreBinding::new()),
        );
        let err = classifier.classify(Envelope::new(json!({"code": 1001}))).unwrap_err();
        assert_eq!(err.code(), Some(1001));
        assert!(logs_contain("global error raised before a store was injected"));
    }

    #[test]
    fn late_injection_is_seen_by_existing_classifier() {
        let binding = Arc::new(StoreBinding::new());
        let classifier = ResponseClassifier::new(
            Arc::new(MemoryTokenStore::new()),
            GlobalErrorRegistry::new([1001]),
            Arc::clone(&binding),
        );
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        binding
            .inject(Arc::new(move |_: StoreAction| {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        let _ = classifier.classify(Envelope::new(json!({"code": 1001})));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
