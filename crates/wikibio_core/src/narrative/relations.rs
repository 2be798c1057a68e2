//! Person and relationship accessors over a tree database.
//!
//! # Responsibility
//! - Resolve birth/death events with fallbacks, parents, spouses and
//!   children.
//! - Resolve place chains and event participants with their roles.
//! - Render clickable person names with optional life dates.
//!
//! # Invariants
//! - Missing records degrade to absent values; only store errors propagate.
//! - Private persons render as `(private)` and never leak names or dates.
//! - Families follow a two-role model; `spouse_of` does not generalize
//!   beyond father/mother.

use super::markup::{html_escape, PRIVATE_PLACEHOLDER};
use crate::model::date::DateDisplayer;
use crate::model::event::{Event, EventRole, EventType};
use crate::model::family::{ChildRelation, Family};
use crate::model::handle::{Handle, RecordClass};
use crate::model::person::{Gender, Person};
use crate::repo::tree_db::{RepoResult, TreeDatabase};
use log::debug;
use std::collections::HashSet;

/// A person or family referencing an event, with its declared role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub class: RecordClass,
    pub handle: Handle,
    /// `None` when the referencing record has no matching event reference.
    pub role: Option<EventRole>,
}

/// Participants declaring `role`, in participant order.
pub fn filter_participants(participants: &[Participant], role: EventRole) -> Vec<&Participant> {
    participants
        .iter()
        .filter(|participant| participant.role == Some(role))
        .collect()
}

/// Spouse slot of `family` relative to `person`, by gender.
pub fn spouse_of(person: &Person, family: &Family) -> Option<Handle> {
    if person.gender == Gender::Male {
        family.mother.clone()
    } else {
        family.father.clone()
    }
}

/// Read-only accessors bound to one database and date displayer.
pub struct Relations<'a, D: TreeDatabase + ?Sized> {
    db: &'a D,
    dates: &'a dyn DateDisplayer,
}

impl<'a, D: TreeDatabase + ?Sized> Relations<'a, D> {
    pub fn new(db: &'a D, dates: &'a dyn DateDisplayer) -> Self {
        Self { db, dates }
    }

    pub fn db(&self) -> &'a D {
        self.db
    }

    pub fn dates(&self) -> &'a dyn DateDisplayer {
        self.dates
    }

    /// Formatted date of an event, if any.
    pub fn event_date(&self, event: &Event) -> Option<String> {
        self.dates.display(&event.date)
    }

    /// Birth event, else the first Baptism/Christening.
    pub fn birth_or_fallback(&self, person: &Person) -> RepoResult<Option<Event>> {
        self.primary_event(person, |kind| *kind == EventType::Birth, EventType::is_birth_fallback)
    }

    /// Death event, else the first Burial/Cremation/Cause Of Death.
    pub fn death_or_fallback(&self, person: &Person) -> RepoResult<Option<Event>> {
        self.primary_event(person, |kind| *kind == EventType::Death, EventType::is_death_fallback)
    }

    fn primary_event(
        &self,
        person: &Person,
        preferred: impl Fn(&EventType) -> bool,
        fallback: impl Fn(&EventType) -> bool,
    ) -> RepoResult<Option<Event>> {
        let mut first_fallback = None;
        for event_ref in &person.event_refs {
            if event_ref.role != EventRole::Primary {
                continue;
            }
            let Some(event) = self.db.event(&event_ref.event)? else {
                continue;
            };
            if preferred(&event.kind) {
                return Ok(Some(event));
            }
            if first_fallback.is_none() && fallback(&event.kind) {
                first_fallback = Some(event);
            }
        }
        Ok(first_fallback)
    }

    /// Birth parents as `(mother, father)`.
    ///
    /// Uses the first parent family in which the person is a birth child of
    /// at least one parent.
    pub fn birth_parents(&self, person: &Person) -> RepoResult<(Option<Handle>, Option<Handle>)> {
        for family_handle in &person.parent_family_handles {
            let Some(family) = self.db.family(family_handle)? else {
                continue;
            };
            let Some(child_ref) = family
                .children
                .iter()
                .find(|child_ref| child_ref.child == person.handle)
            else {
                continue;
            };

            let mother = family
                .mother
                .clone()
                .filter(|_| child_ref.mother_relation == ChildRelation::Birth);
            let father = family
                .father
                .clone()
                .filter(|_| child_ref.father_relation == ChildRelation::Birth);
            if mother.is_some() || father.is_some() {
                return Ok((mother, father));
            }
        }
        Ok((None, None))
    }

    /// Spouses across all of the person's families, skipping empty slots.
    pub fn spouses(&self, person: &Person) -> RepoResult<Vec<Handle>> {
        let mut spouses = Vec::new();
        for family_handle in &person.family_handles {
            if let Some(family) = self.db.family(family_handle)? {
                spouses.extend(spouse_of(person, &family));
            }
        }
        Ok(spouses)
    }

    /// Leaf-to-root place chain joined with `", "`.
    ///
    /// Stops at a missing record or a repeated place.
    pub fn full_place_name(&self, place_handle: &Handle) -> RepoResult<String> {
        let mut parts: Vec<String> = Vec::new();
        let mut visited = HashSet::new();
        let mut cursor = Some(place_handle.clone());
        while let Some(handle) = cursor {
            if !visited.insert(handle.clone()) {
                break;
            }
            let Some(place) = self.db.place(&handle)? else {
                debug!("event=missing_reference module=relations class=place handle={handle}");
                break;
            };
            parts.push(place.name);
            cursor = place.enclosed_by;
        }
        Ok(parts.join(", "))
    }

    /// Every person and family referencing `event`, with declared roles.
    pub fn participants_of(&self, event: &Event) -> RepoResult<Vec<Participant>> {
        let links = self
            .db
            .backlinks(&event.handle, &[RecordClass::Person, RecordClass::Family])?;

        let mut participants = Vec::with_capacity(links.len());
        for link in links {
            let event_refs = match link.class {
                RecordClass::Person => self.db.person(&link.handle)?.map(|p| p.event_refs),
                RecordClass::Family => self.db.family(&link.handle)?.map(|f| f.event_refs),
                _ => None,
            };
            let role = event_refs.and_then(|refs| {
                refs.iter()
                    .find(|event_ref| event_ref.event == event.handle)
                    .map(|event_ref| event_ref.role)
            });
            participants.push(Participant {
                class: link.class,
                handle: link.handle,
                role,
            });
        }
        Ok(participants)
    }

    /// Person name for wikitext, linked when an external id exists.
    ///
    /// Returns `""` for an absent handle or missing person and `(private)`
    /// for private persons. With `include_dates`, appends the life-date info
    /// string when one can be built.
    pub fn clickable_name(&self, handle: Option<&Handle>, include_dates: bool) -> RepoResult<String> {
        let Some(handle) = handle else {
            return Ok(String::new());
        };
        let Some(person) = self.db.person(handle)? else {
            debug!("event=missing_reference module=relations class=person handle={handle}");
            return Ok(String::new());
        };
        if person.private {
            return Ok(PRIVATE_PLACEHOLDER.to_string());
        }

        let name = person.primary_name.full_name();
        let mut res = match person.external_identity() {
            Some(identity) => format!("[[{}|{name}]]", identity.id),
            None => name,
        };
        if include_dates {
            let info = self.info_string(&person)?;
            if !info.is_empty() {
                res.push(' ');
                res.push_str(&info);
            }
        }
        Ok(res)
    }

    /// `(*birth, +death)` with fallback types marked `~` and `[]`.
    pub fn info_string(&self, person: &Person) -> RepoResult<String> {
        let birth = self.life_date(self.birth_or_fallback(person)?.as_ref(), LifeMark::Birth);
        let death = self.life_date(self.death_or_fallback(person)?.as_ref(), LifeMark::Death);

        Ok(match (birth.is_empty(), death.is_empty()) {
            (false, false) => format!("({birth}, {death})"),
            (false, true) => format!("({birth})"),
            (true, false) => format!("({death})"),
            (true, true) => String::new(),
        })
    }

    fn life_date(&self, event: Option<&Event>, mark: LifeMark) -> String {
        let Some(event) = event else {
            return String::new();
        };
        let Some(text) = self.event_date(event) else {
            return String::new();
        };
        let text = html_escape(&text);
        match (mark, event.kind == mark.preferred()) {
            (LifeMark::Birth, true) => format!("*{text}"),
            (LifeMark::Birth, false) => format!("~<i>{text}</i>"),
            (LifeMark::Death, true) => format!("+{text}"),
            (LifeMark::Death, false) => format!("[]<i>{text}</i>"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifeMark {
    Birth,
    Death,
}

impl LifeMark {
    fn preferred(self) -> EventType {
        match self {
            Self::Birth => EventType::Birth,
            Self::Death => EventType::Death,
        }
    }
}
