//! Bounded diagnostic history
//!
//! Fixed-capacity, oldest-first buffer: once full, every push discards the
//! oldest entry.

use std::collections::VecDeque;

use authsync_domain::Diagnostic;

/// Most recent contained failures, oldest first
#[derive(Debug, Clone)]
pub struct DiagnosticLog {
    entries: VecDeque<Diagnostic>,
    capacity: usize,
}

impl DiagnosticLog {
    /// A capacity of zero is clamped to `1`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        if self.entries.len() >= self.capacity {
            let _ = self.entries.pop_front();
        }
        self.entries.push_back(diagnostic);
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Diagnostic> {
        self.entries.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Copy of the retained entries, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Diagnostic> {
        self.entries.iter().cloned().collect()
    }
}
