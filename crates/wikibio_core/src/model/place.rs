use super::handle::Handle;
use super::References;
use serde::{Deserialize, Serialize};

/// Place with an optional enclosing place, forming a leaf-to-root chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub handle: Handle,
    pub name: String,
    #[serde(default)]
    pub enclosed_by: Option<Handle>,
}

impl Place {
    pub fn new(handle: Handle, name: impl Into<String>, enclosed_by: Option<Handle>) -> Self {
        Self {
            handle,
            name: name.into(),
            enclosed_by,
        }
    }
}

impl References for Place {
    fn referenced_handles(&self) -> Vec<&Handle> {
        self.enclosed_by.iter().collect()
    }
}
