use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Scope of an identifier sequence: one counter per program, department and intake year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SequenceKey {
    pub program: String,
    pub department: String,
    pub year: u16,
}

impl SequenceKey {
    pub fn new(program: &str, department: &str, year: u16) -> Self {
        Self {
            program: program.trim().to_ascii_lowercase(),
            department: department.trim().to_ascii_lowercase(),
            year,
        }
    }
}

impl fmt::Display for SequenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.program, self.department, self.year)
    }
}

/// Single-writer source of identifier sequence numbers.
///
/// Every call for the same key must return a number never handed out before
/// for that key. Concurrent issuance is serialized here and nowhere else.
pub trait SequenceSource: Send + Sync {
    fn next(&self, key: &SequenceKey) -> Result<u32, SequenceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    #[error("sequence {key} exhausted after {last}")]
    Exhausted { key: SequenceKey, last: u32 },
    #[error("sequence source unavailable: {0}")]
    Unavailable(String),
}

/// Highest sequence the fixed-width university identifier can carry.
pub const MAX_SEQUENCE: u32 = 999;

/// Process-local counter. Each key starts at 1 unless seeded.
#[derive(Debug, Default)]
pub struct InMemorySequenceSource {
    counters: Mutex<HashMap<SequenceKey, u32>>,
}

impl InMemorySequenceSource {
    /// Resume a key after `last_issued`, e.g. from the highest stored identifier.
    pub fn seed(&self, key: SequenceKey, last_issued: u32) -> Result<(), SequenceError> {
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| SequenceError::Unavailable("sequence mutex poisoned".to_string()))?;
        let entry = counters.entry(key).or_insert(0);
        *entry = (*entry).max(last_issued);
        Ok(())
    }
}

impl SequenceSource for InMemorySequenceSource {
    fn next(&self, key: &SequenceKey) -> Result<u32, SequenceError> {
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| SequenceError::Unavailable("sequence mutex poisoned".to_string()))?;
        let last = counters.entry(key.clone()).or_insert(0);
        if *last >= MAX_SEQUENCE {
            return Err(SequenceError::Exhausted {
                key: key.clone(),
                last: *last,
            });
        }
        *last += 1;
        Ok(*last)
    }
}
