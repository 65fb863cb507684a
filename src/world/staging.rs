//! # World Staging Buffer
//!
//! Named holding area for descriptors that have been declared but not yet
//! built into scene-graph nodes. The batch build drains it in insertion
//! order; staging the same name twice replaces the descriptor in place.

use super::descriptor::ObjectDescriptor;

/// Insertion-ordered map from object name to pending descriptor
#[derive(Debug, Default)]
pub struct StagingBuffer {
    entries: Vec<(String, ObjectDescriptor)>,
}

impl StagingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a descriptor under the given name
    ///
    /// An existing entry with the same name is replaced without changing its
    /// position in the batch order.
    pub fn insert(&mut self, name: impl Into<String>, descriptor: ObjectDescriptor) {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = descriptor;
        } else {
            self.entries.push((name, descriptor));
        }
    }

    pub fn get(&self, name: &str) -> Option<&ObjectDescriptor> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Takes every staged entry, leaving the buffer empty
    pub fn drain(&mut self) -> Vec<(String, ObjectDescriptor)> {
        std::mem::take(&mut self.entries)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
