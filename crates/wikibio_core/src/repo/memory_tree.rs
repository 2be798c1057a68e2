//! In-memory tree store.
//!
//! # Responsibility
//! - Hold a small genealogy database in process for tests and imports.
//! - Answer backlink queries by scanning record references.
//!
//! # Invariants
//! - Inserting a record with an existing handle replaces it.
//! - Iteration order is handle order, so backlinks are deterministic.

use crate::model::citation::{Citation, Media, Source};
use crate::model::event::Event;
use crate::model::family::Family;
use crate::model::handle::{Handle, RecordClass};
use crate::model::note::Note;
use crate::model::person::Person;
use crate::model::place::Place;
use crate::model::References;
use crate::repo::tree_db::{Backlink, RepoResult, TreeDatabase};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    persons: BTreeMap<Handle, Person>,
    families: BTreeMap<Handle, Family>,
    events: BTreeMap<Handle, Event>,
    places: BTreeMap<Handle, Place>,
    notes: BTreeMap<Handle, Note>,
    sources: BTreeMap<Handle, Source>,
    citations: BTreeMap<Handle, Citation>,
    media: BTreeMap<Handle, Media>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_person(&mut self, person: Person) -> &mut Self {
        self.persons.insert(person.handle.clone(), person);
        self
    }

    pub fn insert_family(&mut self, family: Family) -> &mut Self {
        self.families.insert(family.handle.clone(), family);
        self
    }

    pub fn insert_event(&mut self, event: Event) -> &mut Self {
        self.events.insert(event.handle.clone(), event);
        self
    }

    pub fn insert_place(&mut self, place: Place) -> &mut Self {
        self.places.insert(place.handle.clone(), place);
        self
    }

    pub fn insert_note(&mut self, note: Note) -> &mut Self {
        self.notes.insert(note.handle.clone(), note);
        self
    }

    pub fn insert_source(&mut self, source: Source) -> &mut Self {
        self.sources.insert(source.handle.clone(), source);
        self
    }

    pub fn insert_citation(&mut self, citation: Citation) -> &mut Self {
        self.citations.insert(citation.handle.clone(), citation);
        self
    }

    pub fn insert_media(&mut self, media: Media) -> &mut Self {
        self.media.insert(media.handle.clone(), media);
        self
    }

    /// Mutable access for in-place edits such as setting an external id.
    pub fn person_mut(&mut self, handle: &Handle) -> Option<&mut Person> {
        self.persons.get_mut(handle)
    }
}

fn referencing<'a, T: References>(
    class: RecordClass,
    records: &'a BTreeMap<Handle, T>,
    target: &'a Handle,
) -> impl Iterator<Item = Backlink> + 'a {
    records
        .iter()
        .filter(move |(_, record)| record.referenced_handles().contains(&target))
        .map(move |(handle, _)| Backlink {
            class,
            handle: handle.clone(),
        })
}

impl TreeDatabase for MemoryTree {
    fn person(&self, handle: &Handle) -> RepoResult<Option<Person>> {
        Ok(self.persons.get(handle).cloned())
    }

    fn person_by_gramps_id(&self, gramps_id: &str) -> RepoResult<Option<Person>> {
        Ok(self
            .persons
            .values()
            .find(|person| person.gramps_id == gramps_id)
            .cloned())
    }

    fn family(&self, handle: &Handle) -> RepoResult<Option<Family>> {
        Ok(self.families.get(handle).cloned())
    }

    fn event(&self, handle: &Handle) -> RepoResult<Option<Event>> {
        Ok(self.events.get(handle).cloned())
    }

    fn place(&self, handle: &Handle) -> RepoResult<Option<Place>> {
        Ok(self.places.get(handle).cloned())
    }

    fn note(&self, handle: &Handle) -> RepoResult<Option<Note>> {
        Ok(self.notes.get(handle).cloned())
    }

    fn source(&self, handle: &Handle) -> RepoResult<Option<Source>> {
        Ok(self.sources.get(handle).cloned())
    }

    fn citation(&self, handle: &Handle) -> RepoResult<Option<Citation>> {
        Ok(self.citations.get(handle).cloned())
    }

    fn media(&self, handle: &Handle) -> RepoResult<Option<Media>> {
        Ok(self.media.get(handle).cloned())
    }

    fn note_handles(&self) -> RepoResult<Vec<Handle>> {
        Ok(self.notes.keys().cloned().collect())
    }

    fn backlinks(&self, target: &Handle, classes: &[RecordClass]) -> RepoResult<Vec<Backlink>> {
        let mut links = Vec::new();
        for class in classes {
            match class {
                RecordClass::Person => links.extend(referencing(*class, &self.persons, target)),
                RecordClass::Family => links.extend(referencing(*class, &self.families, target)),
                RecordClass::Event => links.extend(referencing(*class, &self.events, target)),
                RecordClass::Place => links.extend(referencing(*class, &self.places, target)),
                RecordClass::Source => links.extend(referencing(*class, &self.sources, target)),
                RecordClass::Citation => {
                    links.extend(referencing(*class, &self.citations, target))
                }
                RecordClass::Media => links.extend(referencing(*class, &self.media, target)),
                RecordClass::Note => links.extend(referencing(*class, &self.notes, target)),
            }
        }
        links.sort();
        links.dedup();
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryTree;
    use crate::model::date::GenDate;
    use crate::model::event::{Event, EventRef, EventRole, EventType};
    use crate::model::family::Family;
    use crate::model::handle::{Handle, RecordClass};
    use crate::model::person::{Gender, Name, Person};
    use crate::repo::tree_db::TreeDatabase;

    #[test]
    fn backlinks_report_persons_before_families() {
        let mut tree = MemoryTree::new();
        let marriage = Handle::from("e1");
        tree.insert_event(Event::new(
            marriage.clone(),
            EventType::Marriage,
            GenDate::year(1900),
        ));

        let mut witness = Person::new(Handle::from("p9"), Gender::Male, Name::new("W", "X"));
        witness
            .event_refs
            .push(EventRef::new(marriage.clone(), EventRole::Witness));
        tree.insert_person(witness);

        let mut family = Family::new(Handle::from("f1"), None, None);
        family
            .event_refs
            .push(EventRef::new(marriage.clone(), EventRole::Family));
        tree.insert_family(family);

        let links = tree
            .backlinks(&marriage, &[RecordClass::Family, RecordClass::Person])
            .unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].class, RecordClass::Person);
        assert_eq!(links[0].handle, Handle::from("p9"));
        assert_eq!(links[1].class, RecordClass::Family);
    }

    #[test]
    fn unknown_handles_resolve_to_none() {
        let tree = MemoryTree::new();
        assert!(tree.person(&Handle::from("nobody")).unwrap().is_none());
        assert!(tree.place(&Handle::from("nowhere")).unwrap().is_none());
    }

    #[test]
    fn person_mut_edits_are_visible_to_reads() {
        let mut tree = MemoryTree::new();
        tree.insert_person(Person::new(
            Handle::from("p1"),
            Gender::Female,
            Name::new("Ann", "Lee"),
        ));

        tree.person_mut(&Handle::from("p1"))
            .expect("inserted person")
            .set_external_id("Lee-12")
            .unwrap();

        let stored = tree.person(&Handle::from("p1")).unwrap().unwrap();
        assert_eq!(stored.external_identity().unwrap().id, "Lee-12");
        assert!(tree.person_mut(&Handle::from("p2")).is_none());
    }
}
