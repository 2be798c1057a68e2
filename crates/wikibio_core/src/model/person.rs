//! Person records, names and attributes.
//!
//! # Responsibility
//! - Define the canonical person record read by the biography engine.
//! - Decode the external (WikiTree) identity stored as a JSON attribute.
//!
//! # Invariants
//! - `handle` is stable and never reused for another person.
//! - At most one `WikiTree` attribute is meaningful; the first one wins.

use super::event::EventRef;
use super::handle::Handle;
use super::References;
use serde::{Deserialize, Serialize};

/// Attribute type holding the external identity JSON.
pub const EXTERNAL_ID_ATTRIBUTE: &str = "WikiTree";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameType {
    #[default]
    BirthName,
    AlsoKnownAs,
    MarriedName,
    Unknown,
    Custom(String),
}

impl NameType {
    pub fn label(&self) -> &str {
        match self {
            Self::BirthName => "Birth Name",
            Self::AlsoKnownAs => "Also Known As",
            Self::MarriedName => "Married Name",
            Self::Unknown => "Unknown",
            Self::Custom(label) => label.as_str(),
        }
    }
}

/// Origin of a surname. `None` renders as empty text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurnameOrigin {
    #[default]
    None,
    Inherited,
    Given,
    Taken,
    Patronymic,
    Matronymic,
    Feudal,
    Pseudonym,
    Patrilineal,
    Matrilineal,
    Occupation,
    Location,
    Unknown,
    Custom(String),
}

impl SurnameOrigin {
    pub fn label(&self) -> &str {
        match self {
            Self::None => "",
            Self::Inherited => "Inherited",
            Self::Given => "Given",
            Self::Taken => "Taken",
            Self::Patronymic => "Patronymic",
            Self::Matronymic => "Matronymic",
            Self::Feudal => "Feudal",
            Self::Pseudonym => "Pseudonym",
            Self::Patrilineal => "Patrilineal",
            Self::Matrilineal => "Matrilineal",
            Self::Occupation => "Occupation",
            Self::Location => "Location",
            Self::Unknown => "Unknown",
            Self::Custom(label) => label.as_str(),
        }
    }
}

/// One name record of a person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    #[serde(default)]
    pub name_type: NameType,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub origin: SurnameOrigin,
    #[serde(default)]
    pub citations: Vec<Handle>,
}

impl Name {
    pub fn new(first_name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            surname: surname.into(),
            ..Self::default()
        }
    }

    /// `First Surname`, as used throughout the biography.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
    }
}

/// Free-form typed attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// Decoded external identity attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIdentity {
    pub id: String,
    #[serde(default)]
    pub owner: i64,
}

/// Canonical person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub handle: Handle,
    /// Human-facing id such as `I0001`.
    #[serde(default)]
    pub gramps_id: String,
    #[serde(default)]
    pub gender: Gender,
    pub primary_name: Name,
    #[serde(default)]
    pub alternate_names: Vec<Name>,
    #[serde(default)]
    pub event_refs: Vec<EventRef>,
    /// Families where this person is a parent/spouse.
    #[serde(default)]
    pub family_handles: Vec<Handle>,
    /// Families where this person is a child.
    #[serde(default)]
    pub parent_family_handles: Vec<Handle>,
    #[serde(default)]
    pub note_handles: Vec<Handle>,
    #[serde(default)]
    pub citations: Vec<Handle>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub private: bool,
    /// Last modification, unix seconds.
    #[serde(default)]
    pub change_time: i64,
}

impl Person {
    pub fn new(handle: Handle, gender: Gender, primary_name: Name) -> Self {
        Self {
            handle,
            gramps_id: String::new(),
            gender,
            primary_name,
            alternate_names: Vec::new(),
            event_refs: Vec::new(),
            family_handles: Vec::new(),
            parent_family_handles: Vec::new(),
            note_handles: Vec::new(),
            citations: Vec::new(),
            attributes: Vec::new(),
            private: false,
            change_time: 0,
        }
    }

    /// Decodes the external identity attribute.
    ///
    /// Malformed attribute JSON is treated as absent.
    pub fn external_identity(&self) -> Option<ExternalIdentity> {
        self.attributes
            .iter()
            .find(|attr| attr.kind == EXTERNAL_ID_ATTRIBUTE)
            .and_then(|attr| serde_json::from_str(&attr.value).ok())
    }

    /// Writes the external id, keeping any existing `owner` value.
    pub fn set_external_id(&mut self, id: impl Into<String>) -> Result<(), serde_json::Error> {
        let id = id.into();
        if let Some(attr) = self
            .attributes
            .iter_mut()
            .find(|attr| attr.kind == EXTERNAL_ID_ATTRIBUTE)
        {
            let mut identity = serde_json::from_str::<ExternalIdentity>(&attr.value)
                .unwrap_or(ExternalIdentity {
                    id: String::new(),
                    owner: 0,
                });
            identity.id = id;
            attr.value = serde_json::to_string(&identity)?;
            return Ok(());
        }

        let value = serde_json::to_string(&ExternalIdentity { id, owner: 0 })?;
        self.attributes.push(Attribute {
            kind: EXTERNAL_ID_ATTRIBUTE.to_string(),
            value,
        });
        Ok(())
    }
}

impl References for Person {
    fn referenced_handles(&self) -> Vec<&Handle> {
        let mut refs: Vec<&Handle> = self.event_refs.iter().map(|r| &r.event).collect();
        refs.extend(&self.family_handles);
        refs.extend(&self.parent_family_handles);
        refs.extend(&self.note_handles);
        refs.extend(&self.citations);
        refs.extend(&self.primary_name.citations);
        for name in &self.alternate_names {
            refs.extend(&name.citations);
        }
        refs
    }
}
