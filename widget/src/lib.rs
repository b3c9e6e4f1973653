// Widget state machines backed by souschef-core:
// - chat: the floating Sous-Chef assistant
// - kitchen: the Experimental Kitchen idea generator

pub mod chat;
pub use chat::*;

pub mod kitchen;
pub use kitchen::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared "is the hosting view still mounted" flag.
///
/// A generation request cannot be aborted once in flight; when the hosting
/// view is torn down mid-flight, the completion path checks this flag and
/// discards the result instead of applying it.
#[derive(Debug, Clone)]
pub struct AliveFlag(Arc<AtomicBool>);

impl AliveFlag {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// Mark the hosting view as torn down.
    pub fn revoke(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Default for AliveFlag {
    fn default() -> Self {
        Self::new()
    }
}
