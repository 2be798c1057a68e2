//! Event records and event references.
//!
//! # Invariants
//! - Stored roles are the closed set `EventRole`; collector-only roles live
//!   in `narrative::collector` and are never persisted.

use super::date::GenDate;
use super::handle::Handle;
use super::References;
use serde::{Deserialize, Serialize};

/// Enumerated event type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Birth,
    Baptism,
    Christening,
    Death,
    Burial,
    Cremation,
    CauseOfDeath,
    Marriage,
    Divorce,
    Engagement,
    Residence,
    Occupation,
    Census,
    Immigration,
    Emigration,
    Graduation,
    Probate,
    Will,
    Custom(String),
}

impl EventType {
    /// Display label.
    pub fn label(&self) -> &str {
        match self {
            Self::Birth => "Birth",
            Self::Baptism => "Baptism",
            Self::Christening => "Christening",
            Self::Death => "Death",
            Self::Burial => "Burial",
            Self::Cremation => "Cremation",
            Self::CauseOfDeath => "Cause Of Death",
            Self::Marriage => "Marriage",
            Self::Divorce => "Divorce",
            Self::Engagement => "Engagement",
            Self::Residence => "Residence",
            Self::Occupation => "Occupation",
            Self::Census => "Census",
            Self::Immigration => "Immigration",
            Self::Emigration => "Emigration",
            Self::Graduation => "Graduation",
            Self::Probate => "Probate",
            Self::Will => "Will",
            Self::Custom(label) => label.as_str(),
        }
    }

    /// Birth, Death and Marriage lead a merged date bucket when primary.
    pub fn is_headline(&self) -> bool {
        matches!(self, Self::Birth | Self::Death | Self::Marriage)
    }

    pub fn is_birth_fallback(&self) -> bool {
        matches!(self, Self::Baptism | Self::Christening)
    }

    pub fn is_death_fallback(&self) -> bool {
        matches!(self, Self::Burial | Self::Cremation | Self::CauseOfDeath)
    }
}

/// Role a person or family plays in an event, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventRole {
    Primary,
    Family,
    Witness,
    Informant,
}

impl EventRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Family => "Family",
            Self::Witness => "Witness",
            Self::Informant => "Informant",
        }
    }
}

/// Link from a person or family to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRef {
    pub event: Handle,
    pub role: EventRole,
}

impl EventRef {
    pub fn new(event: Handle, role: EventRole) -> Self {
        Self { event, role }
    }
}

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub handle: Handle,
    #[serde(rename = "type")]
    pub kind: EventType,
    #[serde(default)]
    pub date: GenDate,
    #[serde(default)]
    pub place: Option<Handle>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub citations: Vec<Handle>,
}

impl Event {
    pub fn new(handle: Handle, kind: EventType, date: GenDate) -> Self {
        Self {
            handle,
            kind,
            date,
            place: None,
            description: String::new(),
            citations: Vec::new(),
        }
    }
}

impl References for Event {
    fn referenced_handles(&self) -> Vec<&Handle> {
        self.place.iter().chain(self.citations.iter()).collect()
    }
}
