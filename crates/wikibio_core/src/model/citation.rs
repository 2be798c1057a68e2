//! Sources, citations and media objects.

use super::date::GenDate;
use super::handle::Handle;
use super::References;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub handle: Handle,
    pub title: String,
}

impl Source {
    pub fn new(handle: Handle, title: impl Into<String>) -> Self {
        Self {
            handle,
            title: title.into(),
        }
    }
}

impl References for Source {
    fn referenced_handles(&self) -> Vec<&Handle> {
        Vec::new()
    }
}

/// One reference into a source (page, date, attached media and notes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub handle: Handle,
    pub source: Handle,
    #[serde(default)]
    pub page: String,
    #[serde(default)]
    pub date: GenDate,
    #[serde(default)]
    pub media: Vec<Handle>,
    #[serde(default)]
    pub notes: Vec<Handle>,
}

impl Citation {
    pub fn new(handle: Handle, source: Handle) -> Self {
        Self {
            handle,
            source,
            page: String::new(),
            date: GenDate::empty(),
            media: Vec::new(),
            notes: Vec::new(),
        }
    }
}

impl References for Citation {
    fn referenced_handles(&self) -> Vec<&Handle> {
        let mut refs = vec![&self.source];
        refs.extend(&self.media);
        refs.extend(&self.notes);
        refs
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub handle: Handle,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub path: String,
}

impl References for Media {
    fn referenced_handles(&self) -> Vec<&Handle> {
        Vec::new()
    }
}
