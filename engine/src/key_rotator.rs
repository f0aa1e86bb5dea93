use crate::error::EngineError;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Cyclic credential dispenser shared by all in-flight requests.
///
/// The cursor advance is a single atomic fetch-add, so concurrent callers
/// each observe a distinct position in the cycle.
#[derive(Debug)]
pub struct KeyRotator {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl KeyRotator {
    pub fn new(keys: Vec<String>) -> Result<Self, EngineError> {
        if keys.is_empty() {
            return Err(EngineError::Configuration(
                "credential list is empty".to_string(),
            ));
        }
        Ok(Self {
            keys,
            cursor: AtomicUsize::new(0),
        })
    }

    pub fn next_key(&self) -> &str {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed);
        &self.keys[idx % self.keys.len()]
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
