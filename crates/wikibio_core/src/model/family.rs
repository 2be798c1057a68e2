//! Family records.
//!
//! Families follow a two-role model: one father slot and one mother slot.

use super::event::EventRef;
use super::handle::Handle;
use super::References;
use serde::{Deserialize, Serialize};

/// Relation of a child to one parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildRelation {
    #[default]
    Birth,
    Adopted,
    Stepchild,
    Foster,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRef {
    pub child: Handle,
    #[serde(default)]
    pub father_relation: ChildRelation,
    #[serde(default)]
    pub mother_relation: ChildRelation,
}

impl ChildRef {
    /// Birth child of both parents.
    pub fn birth(child: Handle) -> Self {
        Self {
            child,
            father_relation: ChildRelation::Birth,
            mother_relation: ChildRelation::Birth,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub handle: Handle,
    #[serde(default)]
    pub father: Option<Handle>,
    #[serde(default)]
    pub mother: Option<Handle>,
    #[serde(default)]
    pub children: Vec<ChildRef>,
    #[serde(default)]
    pub event_refs: Vec<EventRef>,
}

impl Family {
    pub fn new(handle: Handle, father: Option<Handle>, mother: Option<Handle>) -> Self {
        Self {
            handle,
            father,
            mother,
            children: Vec::new(),
            event_refs: Vec::new(),
        }
    }
}

impl References for Family {
    fn referenced_handles(&self) -> Vec<&Handle> {
        let mut refs: Vec<&Handle> = self.father.iter().chain(self.mother.iter()).collect();
        refs.extend(self.children.iter().map(|c| &c.child));
        refs.extend(self.event_refs.iter().map(|r| &r.event));
        refs
    }
}
