//! In-memory progress store for testing.

use animind_core::error::StoreError;
use animind_core::traits::ProgressStore;

/// Holds the record in memory and counts writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    record: Option<String>,
    writes: usize,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a raw stored record.
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: Some(record.into()),
            writes: 0,
        }
    }

    /// The raw stored record, if any.
    pub fn record(&self) -> Option<&str> {
        self.record.as_deref()
    }

    /// Number of writes performed so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl ProgressStore for MemoryProgressStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn read_record(&self) -> Result<Option<String>, StoreError> {
        Ok(self.record.clone())
    }

    fn write_record(&mut self, contents: &str) -> Result<(), StoreError> {
        self.record = Some(contents.to_string());
        self.writes += 1;
        Ok(())
    }
}
