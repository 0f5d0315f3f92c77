//! The `{"objects": [...]}` envelope used by every list endpoint.

use serde::{Deserialize, Serialize};

/// List envelope shared by GET responses and PATCH bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objects<T> {
    #[serde(default = "Vec::new")]
    pub objects: Vec<T>,
}

impl<T> Objects<T> {
    pub fn new(objects: Vec<T>) -> Self {
        Self { objects }
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }
}

impl<T> Default for Objects<T> {
    fn default() -> Self {
        Self {
            objects: Vec::new(),
        }
    }
}
