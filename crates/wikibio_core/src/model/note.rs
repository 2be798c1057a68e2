//! Notes, including the template/header/footer notes read by the assembler.

use super::handle::Handle;
use super::References;
use serde::{Deserialize, Serialize};

pub const TEMPLATE_NOTE_TYPE: &str = "WikiTree Template";
pub const HEADER_NOTE_TYPE: &str = "WikiTree Header";
pub const FOOTER_NOTE_TYPE: &str = "WikiTree Footer";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteType {
    #[default]
    General,
    Research,
    Transcript,
    SourceText,
    Citation,
    Person,
    Event,
    Custom(String),
}

impl NoteType {
    pub fn label(&self) -> &str {
        match self {
            Self::General => "General",
            Self::Research => "Research",
            Self::Transcript => "Transcript",
            Self::SourceText => "Source text",
            Self::Citation => "Citation",
            Self::Person => "Person Note",
            Self::Event => "Event Note",
            Self::Custom(label) => label.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub handle: Handle,
    #[serde(default)]
    pub note_type: NoteType,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub private: bool,
}

impl Note {
    pub fn new(handle: Handle, note_type: NoteType, text: impl Into<String>) -> Self {
        Self {
            handle,
            note_type,
            text: text.into(),
            private: false,
        }
    }
}

impl References for Note {
    fn referenced_handles(&self) -> Vec<&Handle> {
        Vec::new()
    }
}
