//! Open file writers
//!
//! A writer belongs to the session that opened it. The registry remembers
//! that session so writers can be closed on cleanup even when the request
//! that opened them is long gone.

use native_client::{NativeSession, WriterId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Registry of writers that are open
#[derive(Default)]
pub struct WriterRegistry {
    writers: Mutex<HashMap<WriterId, Arc<dyn NativeSession>>>,
}

impl WriterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn writers(&self) -> MutexGuard<'_, HashMap<WriterId, Arc<dyn NativeSession>>> {
        self.writers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records a writer opened on `session`
    pub fn insert(&self, writer: WriterId, session: Arc<dyn NativeSession>) {
        self.writers().insert(writer, session);
    }

    /// Session a writer was opened on
    pub fn session(&self, writer: WriterId) -> Option<Arc<dyn NativeSession>> {
        self.writers().get(&writer).cloned()
    }

    /// Forgets a writer, returning its session
    pub fn remove(&self, writer: WriterId) -> Option<Arc<dyn NativeSession>> {
        self.writers().remove(&writer)
    }

    /// Forgets every writer
    pub fn drain(&self) -> Vec<(WriterId, Arc<dyn NativeSession>)> {
        self.writers().drain().collect()
    }

    pub fn len(&self) -> usize {
        self.writers().len()
    }

    pub fn is_empty(&self) -> bool {
        self.writers().is_empty()
    }
}
