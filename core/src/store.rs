//! Global error reporting.
//!
//! # Design
//! Some error codes concern the whole application (maintenance mode, account
//! locked, ...) rather than the request that hit them. Those codes live in a
//! `GlobalErrorRegistry`, and when a failing envelope carries one the
//! classifier forwards a `StoreAction::GlobalError` to the application's
//! store through a `StoreBinding`.
//!
//! The binding is a set-once slot. It is created empty, handed to the
//! classifier at construction, and filled by a single `inject` call at
//! startup. That lets the classifier exist before the application store
//! does while keeping every dependency explicit.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::AlreadyInjected;

/// Action sent to the application store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreAction {
    GlobalError { code: i64 },
}

/// The application store's dispatch entry point.
pub trait Dispatch: Send + Sync {
    fn dispatch(&self, action: StoreAction);
}

impl<F> Dispatch for F
where
    F: Fn(StoreAction) + Send + Sync,
{
    fn dispatch(&self, action: StoreAction) {
        self(action)
    }
}

/// Codes that are reported application-wide. Membership is all that matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalErrorRegistry {
    codes: HashSet<i64>,
}

impl GlobalErrorRegistry {
    pub fn new(codes: impl IntoIterator<Item = i64>) -> Self {
        Self {
            codes: codes.into_iter().collect(),
        }
    }

    pub fn contains(&self, code: i64) -> bool {
        self.codes.contains(&code)
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl FromIterator<i64> for GlobalErrorRegistry {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Set-once slot for the application store's dispatch handle.
#[derive(Default)]
pub struct StoreBinding {
    slot: OnceLock<Arc<dyn Dispatch>>,
}

impl StoreBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// A binding that is already injected.
    pub fn with_store(store: Arc<dyn Dispatch>) -> Self {
        let binding = Self::new();
        let _ = binding.slot.set(store);
        binding
    }

    pub fn inject(&self, store: Arc<dyn Dispatch>) -> Result<(), AlreadyInjected> {
        self.slot.set(store).map_err(|_| AlreadyInjected)
    }

    pub fn is_injected(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Forward `action` to the injected store. Returns `false` when nothing
    /// has been injected yet.
    pub fn dispatch(&self, action: StoreAction) -> bool {
        match self.slot.get() {
            Some(store) => {
                store.dispatch(action);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for StoreBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreBinding")
            .field("injected", &self.is_injected())
            .finish()
    }
}
